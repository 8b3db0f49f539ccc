use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use redraft_api::config::ServerConfig;
use redraft_api::router::build_app_router;
use redraft_api::state::AppState;
use redraft_db::DbPool;
use redraft_llm::{LlmError, TextGenerator};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Create an in-memory database with migrations (and seeds) applied.
pub async fn setup_db() -> DbPool {
    let pool = redraft_db::create_memory_pool()
        .await
        .expect("Failed to create in-memory pool");
    redraft_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// What the stub generator replies with.
enum StubReply {
    Success(String),
    Unreachable,
    Upstream { status: u16, message: String },
}

/// Canned in-process stand-in for the generation API.
///
/// Records every prompt it receives so tests can assert on prompt
/// assembly and on how many upstream calls a handler made.
pub struct StubGenerator {
    reply: StubReply,
    prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn success(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Success(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Unreachable,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn upstream_error(status: u16, message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: StubReply::Upstream {
                status,
                message: message.to_string(),
            },
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Number of generation calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// The most recent prompt sent to the generator.
    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            StubReply::Success(text) => Ok(text.clone()),
            StubReply::Unreachable => {
                Err(LlmError::Unreachable("connection refused".to_string()))
            }
            StubReply::Upstream { status, message } => Err(LlmError::Upstream {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool and generator stub.
///
/// Uses the same `build_app_router` as `main.rs`, so integration tests
/// exercise the exact middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: DbPool, generator: Arc<dyn TextGenerator>) -> Router {
    let config = test_config();
    let state = AppState { pool, generator };
    build_app_router(state, &config)
}

/// Send a request through the router and return `(status, parsed JSON body)`.
///
/// `Router` is cheap to clone, so callers pass it by value per request.
pub async fn request(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
