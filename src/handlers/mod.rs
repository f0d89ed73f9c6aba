pub mod orders;
pub mod proxy;
pub mod transactions;

use crate::error::AppError;
use crate::health::{check_health, HealthResponse, UpstreamChecker};
use crate::AppState;
use axum::{extract::State, Json};

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    let checker = UpstreamChecker::new(state.upstream.clone());
    let transactions = state.transactions.count().await?;
    let orders = state.orders.count().await?;

    Ok(Json(
        check_health(&checker, transactions, orders, state.start_time).await,
    ))
}
