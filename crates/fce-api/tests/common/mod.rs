#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use chrono::{DateTime, TimeZone, Utc};
use fce_api::{ApiState, Clock, Collection, config::Environment, router};
use fce_db::AppState;
use fce_srs::Scheduler;
use http_body_util::BodyExt;
use serde::Deserialize;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// 2024-03-10 09:00 UTC, the starting point of every manual test clock
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
}

/// Test state builder backed by an in-memory SQLite database
pub struct TestStateBuilder {
    scheduler: Scheduler,
    start: DateTime<Utc>,
    saved: Option<AppState>,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            scheduler: Scheduler::default(),
            start: start_time(),
            saved: None,
        }
    }

    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Pretend the store already holds this state when the service starts
    pub fn saved_state(mut self, state: AppState) -> Self {
        self.saved = Some(state);
        self
    }

    pub async fn build(self) -> anyhow::Result<ApiState> {
        // Each connection to :memory: is its own database, keep exactly one
        let pool = fce_db::create_pool("sqlite::memory:", 1).await?;
        fce_db::migrate(&pool).await?;

        if let Some(saved) = &self.saved {
            fce_db::save_state(&pool, saved).await?;
        }
        let loaded = fce_db::load_state(&pool).await;

        Ok(ApiState::from_parts(
            pool,
            Collection::new(loaded, self.scheduler),
            Environment::Development,
            Clock::manual(self.start),
        ))
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a state and a client over the full router
pub async fn setup() -> (ApiState, TestClient) {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let client = TestClient::new(router::router().with_state(state.clone()));
    (state, client)
}

/// What the store holds right now
pub async fn stored_state(pool: &SqlitePool) -> AppState {
    fce_db::load_state(pool).await
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send_empty("GET", uri).await
    }

    pub async fn post(&self, uri: &str) -> TestResponse {
        self.send_empty("POST", uri).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send_empty("DELETE", uri).await
    }

    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send_json("POST", uri, body).await
    }

    pub async fn put_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        self.send_json("PUT", uri, body).await
    }

    async fn send_empty(&self, method: &str, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        method: &str,
        uri: &str,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}
