//! Common test utilities for API testing with a mock transport.
//!
//! This module provides a test fixture that builds the router in-process
//! with a `MockTransport` behind the ModernGov client, so every route can be
//! exercised without reaching a council server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use moderngov_core::{
    testing::MockTransport, Config, CouncilMatcher, ModernGovClient,
};
use moderngov_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use moderngov_core::testing::fixtures;

/// Test fixture for API testing with a mock transport.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_committees() {
///     let fixture = TestFixture::new();
///     fixture.transport.push_body(fixtures::COMMITTEES_XML).await;
///
///     let response = fixture
///         .get("/api/v1/moderngov/committees?site_url=https://democracy.example.gov.uk")
///         .await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock transport - queue upstream bodies and inspect requests
    pub transport: Arc<MockTransport>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

fn june_2024() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

impl TestFixture {
    /// Create a new test fixture with the builtin council list.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.client = fixtures::fast_client_config();

        let transport = Arc::new(MockTransport::new());
        let client = ModernGovClient::with_transport(
            transport.clone(),
            &config.client,
            config.resolver.clone(),
        )
        .with_clock(june_2024);
        let matcher = CouncilMatcher::builtin().expect("Failed to load council data");

        let state = Arc::new(AppState::new(config, Arc::new(client), Arc::new(matcher)));
        let router = create_router(state);

        Self { router, transport }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
