use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::domain::Transaction;
use crate::error::AppError;
use crate::services::TransactionQueryParams;
use crate::utils::pagination::Page;
use crate::AppState;

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionQueryParams>,
) -> Result<Json<Page<Transaction>>, AppError> {
    let page = state.transactions.query(&params).await?;
    Ok(Json(page))
}

/// The filtered page as a CSV download.
pub async fn export_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionQueryParams>,
) -> Result<impl IntoResponse, AppError> {
    let csv = state.transactions.export_csv(&params).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=transactions.csv",
            ),
        ],
        csv,
    ))
}
