use crate::config::Config;
use crate::upstream::UpstreamClient;
use anyhow::{Context, Result};

pub struct ValidationReport {
    pub environment: bool,
    pub upstream: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// The upstream is optional at boot; only a broken environment fails.
    pub fn is_valid(&self) -> bool {
        self.environment
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Upstream Reachable:    {}", status(self.upstream));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config, upstream: &UpstreamClient) -> ValidationReport {
    let mut report = ValidationReport {
        environment: true,
        upstream: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {:#}", e));
    }

    if let Err(e) = validate_upstream(upstream).await {
        report.upstream = false;
        report.errors.push(format!("Upstream: {:#}", e));
    }

    report
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.upstream_url.is_empty() {
        anyhow::bail!("UPSTREAM_URL is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }

    let url = url::Url::parse(&config.upstream_url).context("UPSTREAM_URL is not a valid URL")?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("UPSTREAM_URL must use http or https, got '{}'", url.scheme());
    }

    if let Some(origins) = &config.cors_allowed_origins {
        for origin in origins {
            url::Url::parse(origin)
                .with_context(|| format!("CORS origin '{}' is not a valid URL", origin))?;
        }
    }

    Ok(())
}

async fn validate_upstream(upstream: &UpstreamClient) -> Result<()> {
    let status = upstream
        .probe()
        .await
        .with_context(|| format!("Failed to connect to {}", upstream.base_url()))?;

    if status.is_server_error() {
        anyhow::bail!("Upstream returned status: {}", status);
    }

    Ok(())
}
