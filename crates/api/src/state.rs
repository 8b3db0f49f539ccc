use std::sync::Arc;

use redraft_llm::TextGenerator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Server configuration is consumed by the router builder, not at request
/// time, so it lives outside the state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: redraft_db::DbPool,
    /// Text generation client (HTTP in production, stub in tests).
    pub generator: Arc<dyn TextGenerator>,
}
