#![allow(dead_code)]

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::str::FromStr;
use storefront_core::config::Config;
use storefront_core::domain::{Order, OrderItem, OrderStatus, Transaction};
use storefront_core::services::{seed, CsvTimeZone};
use storefront_core::{create_app, AppState};

pub const TRANSACTION_COUNT: usize = 25;
pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub upstream: mockito::ServerGuard,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Makes the upstream accept `token` as the given customer.
    pub async fn mock_identity(&mut self, token: &str, email: &str, fullname: &str) -> mockito::Mock {
        let body = serde_json::json!({ "email": email, "fullname": fullname });
        self.upstream
            .mock("GET", "/api/auth/me")
            .match_header("authorization", format!("Bearer {}", token).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    pub async fn mock_customers(&mut self) -> Vec<mockito::Mock> {
        vec![
            self.mock_identity(ALICE_TOKEN, "alice@example.com", "Alice Nguyen")
                .await,
            self.mock_identity(BOB_TOKEN, "bob@example.com", "Bob Tran").await,
        ]
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// Deterministic transactions, newest first.
pub fn fixture_transactions() -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(42);
    seed::generate_transactions(&mut rng, TRANSACTION_COUNT, fixed_now())
}

fn item(product_id: &str, name: &str, price: &str, quantity: u32) -> OrderItem {
    OrderItem {
        product_id: product_id.to_string(),
        name: name.to_string(),
        image: "https://placehold.co/400x400".to_string(),
        category: None,
        price: BigDecimal::from_str(price).unwrap(),
        quantity,
    }
}

/// Two orders for Alice (one with a mixed-case email) and one for Bob.
pub fn fixture_orders() -> Vec<Order> {
    let now = fixed_now();
    vec![
        Order::new(
            "10003".to_string(),
            "Bob Tran".to_string(),
            "bob@example.com".to_string(),
            vec![item("57", "Kindle Paperwhite", "149.99", 1)],
            OrderStatus::Shipped,
            now - Duration::days(1),
        ),
        Order::new(
            "10002".to_string(),
            "Alice Nguyen".to_string(),
            "Alice@Example.com".to_string(),
            vec![item("45", "Urban Fleece Hoodie", "39.99", 2)],
            OrderStatus::Delivered,
            now - Duration::days(2),
        ),
        Order::new(
            "10001".to_string(),
            "Alice Nguyen".to_string(),
            "alice@example.com".to_string(),
            vec![
                item("1", "iPhone 15", "799.00", 1),
                item("83", "Cuisinart 4-Slice Toaster", "89.99", 1),
            ],
            OrderStatus::Processing,
            now - Duration::days(3),
        ),
    ]
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let upstream = mockito::Server::new_async().await;

    let mut config = Config {
        upstream_url: upstream.url(),
        csv_timezone: CsvTimeZone::Utc,
        ..Config::default()
    };
    configure(&mut config);

    let state = AppState::new(config, fixture_transactions(), fixture_orders());
    let app = create_app(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 0));
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let actual_addr = server.local_addr();

    tokio::spawn(async move {
        server.await.unwrap();
    });

    TestApp {
        base_url: format!("http://{}", actual_addr),
        client: reqwest::Client::new(),
        upstream,
    }
}
