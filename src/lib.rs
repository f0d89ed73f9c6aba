pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod startup;
pub mod upstream;
pub mod utils;
pub mod validation;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::adapters::{InMemoryOrderRepository, InMemoryTransactionRepository};
use crate::config::Config;
use crate::domain::{Order, Transaction};
use crate::middleware::request_logger::{request_logger_middleware, RequestLogOptions};
use crate::services::{seed, OrderService, TransactionQueryService};
use crate::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub transactions: TransactionQueryService,
    pub orders: OrderService,
    pub upstream: UpstreamClient,
    pub config: Arc<Config>,
    pub start_time: Instant,
}

impl AppState {
    /// State over the given datasets, talking to `config.upstream_url`.
    pub fn new(config: Config, transactions: Vec<Transaction>, orders: Vec<Order>) -> Self {
        let transactions = TransactionQueryService::new(
            Arc::new(InMemoryTransactionRepository::new(transactions)),
            config.csv_timezone,
        );
        let orders = OrderService::new(Arc::new(InMemoryOrderRepository::new(orders)));
        let upstream = UpstreamClient::new(config.upstream_url.clone());

        AppState {
            transactions,
            orders,
            upstream,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// State over freshly generated demo data, sized by the config.
    pub fn seeded(config: Config) -> Self {
        let now = Utc::now();
        let mut rng = rand::thread_rng();
        let transactions = seed::generate_transactions(&mut rng, config.seed_transactions, now);
        let orders = seed::generate_orders(&mut rng, config.seed_orders, now);

        tracing::info!(
            transactions = transactions.len(),
            orders = orders.len(),
            "Seeded in-memory stores"
        );

        Self::new(config, transactions, orders)
    }
}

pub fn create_app(state: AppState) -> Router {
    let log_options = RequestLogOptions {
        log_body: state.config.log_request_body,
    };
    let cors = state.config.cors_allowed_origins.as_deref().map(cors_layer);

    // Methods a local route does not serve fall through to the upstream.
    let app = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/transactions",
            get(handlers::transactions::list_transactions).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/transactions/export",
            get(handlers::transactions::export_transactions).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/orders",
            get(handlers::orders::list_orders).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/orders/export",
            get(handlers::orders::export_orders).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/orders/:id",
            get(handlers::orders::get_order).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/orders/:id/status",
            put(handlers::orders::update_order_status).fallback(handlers::proxy::proxy),
        )
        .route(
            "/api/checkout",
            post(handlers::orders::checkout).fallback(handlers::proxy::proxy),
        )
        .fallback(handlers::proxy::proxy)
        .layer(axum::middleware::from_fn_with_state(
            log_options,
            request_logger_middleware,
        ))
        .with_state(state);

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}
