//! Handler for the prompt review flow.
//!
//! Sends the full rewrite history plus the current prompt-store content
//! to the LLM and returns the parsed analysis. Suggestions are never
//! applied here; applying goes through the explicit apply-suggestion
//! endpoint.

use axum::extract::State;
use axum::Json;

use redraft_core::analysis::{
    build_review_prompt, parse_analysis, PromptAnalysis, ReviewContext, ReviewRecord,
};
use redraft_core::prompts::DEFAULT_BASE_PROMPT;
use redraft_db::repositories::{BasePromptRepo, RewriteHistoryRepo, ToneRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Analyse the rewrite history and current prompts.
///
/// Legacy LLM replies (a single opaque string) are normalized into the
/// structured shape by `parse_analysis`, so the client always receives
/// the same response schema.
pub async fn analyse_prompt(State(state): State<AppState>) -> AppResult<Json<PromptAnalysis>> {
    let base = BasePromptRepo::find_active(&state.pool).await?;
    let tones = ToneRepo::list(&state.pool).await?;
    let records = RewriteHistoryRepo::list_all(&state.pool).await?;

    let tone_pairs: Vec<(String, String)> = tones
        .iter()
        .map(|t| (t.keyword.clone(), t.instructions.clone()))
        .collect();

    let context = ReviewContext {
        base_prompt: base
            .as_ref()
            .map(|b| b.content.as_str())
            .unwrap_or(DEFAULT_BASE_PROMPT),
        tones: &tone_pairs,
    };

    let review_records: Vec<ReviewRecord<'_>> = records
        .iter()
        .map(|r| ReviewRecord {
            tone: &r.tone,
            original_email: &r.original_email,
            generated_response: &r.generated_response,
        })
        .collect();

    let review_prompt = build_review_prompt(&context, &review_records);
    let reply = state.generator.generate(&review_prompt).await?;
    let analysis = parse_analysis(&reply);

    tracing::info!(
        records = records.len(),
        suggestions = analysis.improvement_suggestions.len(),
        "Prompt analysis completed"
    );

    Ok(Json(analysis))
}
