//! Handler for the rewrite gateway.
//!
//! Stateless request/response forwarding: assemble the final prompt from
//! the prompt store, call the generation API once (no retries), and
//! append the audit record.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use redraft_core::prompts::{self, ToneGuidance};
use redraft_db::models::rewrite_record::CreateRewriteRecord;
use redraft_db::repositories::{BasePromptRepo, RewriteHistoryRepo, ToneRepo};

use crate::error::AppResult;
use crate::state::AppState;

/// Request body for `POST /rewrite`.
#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub email: String,
    #[serde(default = "default_tone")]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

/// Response body for `POST /rewrite`.
#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub original: String,
    pub tone: String,
    pub rewritten: String,
}

/// Rewrite an email in the requested tone.
///
/// Validation happens before any network call. On success the rewrite is
/// appended to the audit log fire-and-forget: a failed insert is logged
/// and never fails the user-visible response.
pub async fn rewrite_email(
    State(state): State<AppState>,
    Json(body): Json<RewriteRequest>,
) -> AppResult<Json<RewriteResponse>> {
    prompts::validate_email(&body.email)?;

    let base = BasePromptRepo::find_active(&state.pool).await?;
    let tone = ToneRepo::find_by_keyword(&state.pool, &body.tone).await?;

    let guidance = tone.as_ref().map(|t| ToneGuidance {
        label: &t.label,
        instructions: &t.instructions,
    });

    let final_prompt = prompts::build_final_prompt(
        base.as_ref().map(|b| b.content.as_str()),
        guidance.as_ref(),
        &body.email,
    );

    let rewritten = state.generator.generate(&final_prompt).await?;

    tracing::info!(
        tone = %body.tone,
        email_chars = body.email.len(),
        rewritten_chars = rewritten.len(),
        "Email rewritten"
    );

    let record = CreateRewriteRecord {
        original_email: body.email.clone(),
        tone: body.tone.clone(),
        final_prompt,
        generated_response: rewritten.clone(),
    };
    if let Err(err) = RewriteHistoryRepo::insert(&state.pool, &record).await {
        tracing::warn!(error = %err, "Failed to append rewrite record");
    }

    Ok(Json(RewriteResponse {
        original: body.email,
        tone: body.tone,
        rewritten,
    }))
}
