use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::error::AppError;
use crate::upstream::Identity;
use crate::AppState;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

async fn resolve(state: &AppState, token: Option<String>) -> Result<Option<Identity>, AppError> {
    let Some(token) = token else {
        return Ok(None);
    };

    state.upstream.current_user(&token).await.map_err(|e| {
        tracing::error!("Identity lookup failed: {}", e);
        AppError::Internal("Failed to verify identity".to_string())
    })
}

/// A caller whose bearer token the upstream identity service accepted.
/// Rejects with 401 when the token is missing or refused.
pub struct Authenticated(pub Identity);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

        resolve(state, Some(token))
            .await?
            .map(Authenticated)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string()))
    }
}

/// Like [`Authenticated`] but a missing or refused token yields `None`.
/// Identity service outages still fail the request.
pub struct MaybeAuthenticated(pub Option<Identity>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthenticated {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers);
        Ok(MaybeAuthenticated(resolve(state, token).await?))
    }
}
