use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode};
use failsafe::futures::CircuitBreaker as FuturesCircuitBreaker;
use failsafe::{backoff, failure_policy, Config, Error as FailsafeError, StateMachine};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const AUTH_ME_PATH: &str = "/api/auth/me";
const DEFAULT_CONTENT_TYPE: &str = "application/json";

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Circuit breaker open: {0}")]
    CircuitBreakerOpen(String),
}

/// The caller as resolved by the upstream `/api/auth/me` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub fullname: String,
}

/// Status, content type and body mirrored back from the upstream backend.
#[derive(Debug, Clone)]
pub struct ProxiedResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

/// HTTP client for the upstream backend that owns authentication and the
/// remaining storefront API.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    circuit_breaker: StateMachine<failure_policy::ConsecutiveFailures<backoff::EqualJittered>, ()>,
}

impl UpstreamClient {
    /// Creates a new UpstreamClient with the specified base URL
    pub fn new(base_url: String) -> Self {
        Self::with_circuit_breaker(base_url, 3, 60)
    }

    /// Creates a new UpstreamClient with custom circuit breaker configuration
    pub fn with_circuit_breaker(
        base_url: String,
        failure_threshold: u32,
        reset_timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        let backoff = backoff::equal_jittered(
            Duration::from_secs(reset_timeout_secs),
            Duration::from_secs(reset_timeout_secs * 2),
        );
        let policy = failure_policy::consecutive_failures(failure_threshold, backoff);
        let circuit_breaker = Config::new().failure_policy(policy).build();

        UpstreamClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            circuit_breaker,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the current state of the circuit breaker
    pub fn circuit_state(&self) -> String {
        if self.circuit_breaker.is_call_permitted() {
            "closed".to_string()
        } else {
            "open".to_string()
        }
    }

    /// Resolves a bearer token to an identity.
    ///
    /// `Ok(None)` means the upstream answered but did not accept the token.
    pub async fn current_user(&self, token: &str) -> Result<Option<Identity>, UpstreamError> {
        let url = format!("{}{}", self.base_url, AUTH_ME_PATH);
        let request = self.client.get(&url).bearer_auth(token);

        let result = self.circuit_breaker.call(fetch_identity(request)).await;

        unwrap_breaker(result)
    }

    /// Forwards a request verbatim, minus the `Host` header.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        mut headers: HeaderMap,
        body: Bytes,
    ) -> Result<ProxiedResponse, UpstreamError> {
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);

        let url = format!("{}{}", self.base_url, path_and_query);
        let mut request = self.client.request(method, &url).headers(headers);
        if !body.is_empty() {
            request = request.body(body);
        }

        let result = self.circuit_breaker.call(fetch_proxied(request)).await;

        unwrap_breaker(result)
    }

    /// Plain GET of the base URL; any HTTP answer counts as reachable.
    pub async fn probe(&self) -> Result<StatusCode, UpstreamError> {
        let response = self.client.get(&self.base_url).send().await?;
        Ok(response.status())
    }
}

async fn fetch_identity(request: RequestBuilder) -> Result<Option<Identity>, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "Identity lookup rejected");
        return Ok(None);
    }

    match response.json::<Identity>().await {
        Ok(identity) => Ok(Some(identity)),
        Err(e) => {
            tracing::warn!("Identity response could not be parsed: {}", e);
            Ok(None)
        }
    }
}

async fn fetch_proxied(request: RequestBuilder) -> Result<ProxiedResponse, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();
    let body = response.bytes().await?;

    Ok(ProxiedResponse {
        status,
        content_type,
        body,
    })
}

fn unwrap_breaker<T>(result: Result<T, FailsafeError<UpstreamError>>) -> Result<T, UpstreamError> {
    match result {
        Ok(value) => Ok(value),
        Err(FailsafeError::Rejected) => Err(UpstreamError::CircuitBreakerOpen(
            "Upstream circuit breaker is open".to_string(),
        )),
        Err(FailsafeError::Inner(e)) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_client_creation() {
        let client = UpstreamClient::new("http://localhost:3001/".to_string());
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(client.circuit_state(), "closed");
    }

    #[tokio::test]
    async fn test_current_user_with_mock() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", AUTH_ME_PATH)
            .match_header("authorization", "Bearer good-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"email":"alice@example.com","fullname":"Alice Nguyen","id":7}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(server.url());
        let identity = client.current_user("good-token").await.unwrap();

        assert_eq!(
            identity,
            Some(Identity {
                email: "alice@example.com".to_string(),
                fullname: "Alice Nguyen".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_current_user_rejected_token() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("GET", AUTH_ME_PATH)
            .with_status(401)
            .with_body(r#"{"message":"invalid token"}"#)
            .create_async()
            .await;

        let client = UpstreamClient::new(server.url());
        assert_eq!(client.current_user("bad-token").await.unwrap(), None);
        assert_eq!(client.circuit_state(), "closed");
    }

    #[tokio::test]
    async fn test_circuit_opens_after_transport_failures() {
        // Nothing listens on port 9 locally.
        let client = UpstreamClient::with_circuit_breaker("http://127.0.0.1:9".to_string(), 2, 60);

        for _ in 0..2 {
            let err = client.current_user("t").await.unwrap_err();
            assert!(matches!(err, UpstreamError::RequestError(_)));
        }

        let err = client.current_user("t").await.unwrap_err();
        assert!(matches!(err, UpstreamError::CircuitBreakerOpen(_)));
        assert_eq!(client.circuit_state(), "open");
    }

    #[tokio::test]
    async fn test_forward_mirrors_response() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock("POST", mockito::Matcher::Regex(r"^/api/products".to_string()))
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .match_header("x-custom", "1")
            .match_body("payload")
            .with_status(418)
            .with_header("content-type", "text/plain")
            .with_body("teapot")
            .create_async()
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-custom", "1".parse().unwrap());
        headers.insert(header::HOST, "storefront.local".parse().unwrap());

        let client = UpstreamClient::new(server.url());
        let response = client
            .forward(
                Method::POST,
                "/api/products?page=2",
                headers,
                Bytes::from_static(b"payload"),
            )
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::IM_A_TEAPOT);
        assert_eq!(response.content_type, "text/plain");
        assert_eq!(&response.body[..], b"teapot");
    }
}
