pub mod health;

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /rewrite                      rewrite an email (POST)
/// /history                      rewrite history (GET)
/// /analyse_prompt               prompt review (POST)
///
/// /prompts/base                 active base prompt (GET, PUT)
/// /prompts/tones                tone list (GET), create tone (POST)
/// /prompts/tones/{keyword}      update tone instructions (PUT)
/// /prompts/history              prompt change history (GET)
/// /prompts/apply-suggestion     apply a review suggestion (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/rewrite", post(handlers::rewrite::rewrite_email))
        .route("/history", get(handlers::history::list_history))
        .route("/analyse_prompt", post(handlers::analysis::analyse_prompt))
        .route(
            "/prompts/base",
            get(handlers::prompts::get_base_prompt).put(handlers::prompts::update_base_prompt),
        )
        .route(
            "/prompts/tones",
            get(handlers::prompts::list_tones).post(handlers::prompts::create_tone),
        )
        .route(
            "/prompts/tones/{keyword}",
            put(handlers::prompts::update_tone),
        )
        .route(
            "/prompts/history",
            get(handlers::prompts::list_prompt_history),
        )
        .route(
            "/prompts/apply-suggestion",
            post(handlers::prompts::apply_suggestion),
        )
}
