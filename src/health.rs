use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::time::timeout;

use crate::upstream::UpstreamClient;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub transactions: usize,
    pub orders: usize,
    pub dependencies: HashMap<String, DependencyStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencyStatus {
    Healthy { status: String, latency_ms: u64 },
    Unhealthy { status: String, error: String },
}

impl DependencyStatus {
    fn unhealthy(error: impl Into<String>) -> Self {
        DependencyStatus::Unhealthy {
            status: "unhealthy".to_string(),
            error: error.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, DependencyStatus::Healthy { .. })
    }
}

#[async_trait]
pub trait DependencyChecker: Send + Sync {
    async fn check(&self) -> DependencyStatus;
}

/// Reachability of the upstream backend. Any HTTP answer counts as up.
pub struct UpstreamChecker {
    client: UpstreamClient,
}

impl UpstreamChecker {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DependencyChecker for UpstreamChecker {
    async fn check(&self) -> DependencyStatus {
        let start = Instant::now();
        match self.client.probe().await {
            Ok(_) => DependencyStatus::Healthy {
                status: "healthy".to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => DependencyStatus::unhealthy(e.to_string()),
        }
    }
}

pub async fn check_health(
    upstream: &dyn DependencyChecker,
    transactions: usize,
    orders: usize,
    start_time: Instant,
) -> HealthResponse {
    let timeout_duration = Duration::from_secs(5);

    let upstream_result = timeout(timeout_duration, upstream.check())
        .await
        .unwrap_or_else(|_| DependencyStatus::unhealthy("timeout"));

    let mut dependencies = HashMap::new();
    dependencies.insert("upstream".to_string(), upstream_result);

    HealthResponse {
        status: determine_overall_status(&dependencies),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: start_time.elapsed().as_secs(),
        transactions,
        orders,
        dependencies,
    }
}

/// The local stores are always up, so an unreachable upstream only degrades.
fn determine_overall_status(dependencies: &HashMap<String, DependencyStatus>) -> String {
    if dependencies.values().all(DependencyStatus::is_healthy) {
        "healthy".to_string()
    } else {
        "degraded".to_string()
    }
}
