use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    Router,
};
use food_ordering::{config::AppConfig, db, AppState};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Helper harness for spinning up an application backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a fresh, seeded database.
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Construct a test application from a caller-tuned configuration.
    pub async fn with_config(cfg: AppConfig) -> Self {
        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::initialize(&pool, cfg.seed_sample_data)
            .await
            .expect("failed to initialize test database");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = food_ordering::app_router(state.clone());

        Self { router, state }
    }

    #[allow(dead_code)]
    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    /// Send a request against the router, encoding `body` as JSON when present.
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

/// Minimal configuration suitable for tests.
///
/// An in-memory SQLite database lives only as long as its connection, so the pool
/// is pinned to a single one.
pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "test".to_string(),
    );
    cfg.db_max_connections = 1;
    cfg.db_min_connections = 1;
    cfg.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string();
    cfg
}

#[allow(dead_code)]
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

#[allow(dead_code)]
pub async fn response_text(response: Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    String::from_utf8(bytes.to_vec()).expect("utf-8 response")
}
