use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::AppState;

const PROXIED_PREFIX: &str = "/api/";

/// Fallback for every route not served locally. `/api/*` goes to the
/// upstream backend unchanged; anything else is a 404.
pub async fn proxy(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    if !uri.path().starts_with(PROXIED_PREFIX) {
        return Err(AppError::NotFound(format!("Route {} not found", uri.path())));
    }

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());

    let proxied = state
        .upstream
        .forward(method.clone(), path_and_query, headers, body)
        .await
        .map_err(|e| {
            tracing::error!(
                method = %method,
                path = %uri.path(),
                circuit = %state.upstream.circuit_state(),
                "Proxy request failed: {}",
                e
            );
            AppError::Upstream(e.to_string())
        })?;

    Ok((
        proxied.status,
        [(header::CONTENT_TYPE, proxied.content_type)],
        proxied.body,
    )
        .into_response())
}
