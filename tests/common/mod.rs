use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request},
    response::Response,
    routing::get,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use stockroom_api::{config::AppConfig, db, events, AppState};

/// Helper harness for spinning up an application state backed by an
/// in-memory SQLite database.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // Minimal configuration suitable for tests. A single pooled
        // connection keeps the in-memory database alive and shared.
        let mut cfg = AppConfig::new("sqlite::memory:", "127.0.0.1", 0, "test");
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_sender, event_rx) = events::channel();
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(db_arc, cfg, event_sender);

        let router = Router::new()
            .route(
                "/health",
                get(stockroom_api::handlers::health::health_check),
            )
            .nest("/api", stockroom_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
        }
    }

    /// Send a JSON request against the router.
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

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Decode a response body as JSON.
pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

/// Decimal fields serialize as strings; numeric columns may come back as
/// plain numbers depending on the backend. Normalize both for asserts.
#[allow(dead_code)]
pub fn decimal_as_f64(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("decimal string"),
        Value::Number(n) => n.as_f64().expect("numeric value"),
        other => panic!("not a numeric value: {other:?}"),
    }
}
