use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{Order, OrderStatus, UnknownStatus};
use crate::error::AppError;
use crate::middleware::auth::{Authenticated, MaybeAuthenticated};
use crate::services::order_service::{checkout_items, orders_to_csv, CheckoutItemInput};
use crate::upstream::Identity;
use crate::AppState;

pub const GUEST_NAME: &str = "Guest";
pub const GUEST_EMAIL: &str = "guest@example.com";

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub items: Vec<CheckoutItemInput>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    #[serde(flatten)]
    pub order: Order,
    /// Set when the order was placed under the guest identity.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unauthenticated: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Orders owned by the caller, newest first.
pub async fn list_orders(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.orders.list_orders_for(&identity.email).await?;
    Ok(Json(orders))
}

pub async fn export_orders(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
) -> Result<impl IntoResponse, AppError> {
    let orders = state.orders.list_orders_for(&identity.email).await?;
    let csv = orders_to_csv(&orders)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=orders.csv"),
        ],
        csv,
    ))
}

pub async fn get_order(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get_order(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

    if !order.belongs_to(&identity.email) {
        tracing::warn!(order_id = %id, "Order requested by non-owner");
        return Err(AppError::Forbidden(
            "Order belongs to another customer".to_string(),
        ));
    }

    Ok(Json(order))
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let request = json_body(payload)?;
    let raw = request
        .status
        .ok_or_else(|| AppError::BadRequest("status is required".to_string()))?;
    let status: OrderStatus = raw
        .parse()
        .map_err(|e: UnknownStatus| AppError::BadRequest(e.to_string()))?;

    tracing::info!(
        order_id = %id,
        requested_by = %identity.email,
        status = %status,
        "Order status change requested"
    );

    let order = state.orders.update_status(&id, status).await?;
    Ok(Json(order))
}

pub async fn checkout(
    State(state): State<AppState>,
    MaybeAuthenticated(identity): MaybeAuthenticated,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;

    let (identity, unauthenticated) = match identity {
        Some(identity) => (identity, false),
        None if state.config.allows_guest_checkout() => (
            Identity {
                email: GUEST_EMAIL.to_string(),
                fullname: GUEST_NAME.to_string(),
            },
            true,
        ),
        None => {
            return Err(AppError::Unauthorized(
                "Sign in to place an order".to_string(),
            ))
        }
    };

    let items = checkout_items(request.items)?;
    let customer_name = if identity.fullname.trim().is_empty() {
        identity.email.as_str()
    } else {
        identity.fullname.trim()
    };

    let order = state
        .orders
        .create_order(customer_name, &identity.email, items)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            order,
            unauthenticated,
        }),
    ))
}
