//! Handlers for the prompt store: base prompt, tones, change history, and
//! the apply-suggestion flow.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use redraft_core::error::CoreError;
use redraft_core::prompts::{self, MAX_PROMPT_LENGTH};
use redraft_core::query::{clamp_limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use redraft_db::models::prompt::{CreateTone, PromptHistoryEntry, ToneDefinition};
use redraft_db::repositories::{BasePromptRepo, PromptHistoryRepo, ToneRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fixed component identifier for the single active base prompt.
const BASE_COMPONENT_ID: &str = "base";

// ---------------------------------------------------------------------------
// API request/response types
// ---------------------------------------------------------------------------

/// Response body for `GET /prompts/base`.
#[derive(Debug, Serialize)]
pub struct BasePromptResponse {
    pub content: String,
}

/// Request body for `PUT /prompts/base`.
#[derive(Debug, Deserialize)]
pub struct UpdateBasePromptRequest {
    pub content: String,
    pub reason: String,
}

/// Request body for `PUT /prompts/tones/{keyword}`.
#[derive(Debug, Deserialize)]
pub struct UpdateToneRequest {
    pub instructions: String,
    pub reason: String,
}

/// Pagination parameters for `GET /prompts/history`.
#[derive(Debug, Deserialize)]
pub struct PromptHistoryParams {
    pub limit: Option<i64>,
}

/// Request body for `POST /prompts/apply-suggestion`.
#[derive(Debug, Deserialize)]
pub struct ApplySuggestionRequest {
    pub component_type: String,
    pub component_id: String,
    pub new_content: String,
    pub reason: String,
}

/// Response body for `POST /prompts/apply-suggestion`.
#[derive(Debug, Serialize)]
pub struct ApplySuggestionResponse {
    pub applied: bool,
    pub component_type: String,
    pub component_id: String,
}

// ---------------------------------------------------------------------------
// GET /prompts/base
// ---------------------------------------------------------------------------

/// Return the active base prompt content.
pub async fn get_base_prompt(State(state): State<AppState>) -> AppResult<Json<BasePromptResponse>> {
    let base = BasePromptRepo::find_active(&state.pool).await?;

    let content = base
        .map(|b| b.content)
        .unwrap_or_else(|| prompts::DEFAULT_BASE_PROMPT.to_string());

    Ok(Json(BasePromptResponse { content }))
}

// ---------------------------------------------------------------------------
// PUT /prompts/base
// ---------------------------------------------------------------------------

/// Replace the active base prompt. Reason is mandatory; the content swap
/// and its history entry commit in one transaction.
pub async fn update_base_prompt(
    State(state): State<AppState>,
    Json(body): Json<UpdateBasePromptRequest>,
) -> AppResult<Json<BasePromptResponse>> {
    prompts::validate_prompt_content(&body.content)?;
    prompts::validate_reason(&body.reason)?;

    let created = BasePromptRepo::replace(&state.pool, &body.content, &body.reason).await?;

    tracing::info!(base_prompt_id = created.id, "Base prompt updated");

    Ok(Json(BasePromptResponse {
        content: created.content,
    }))
}

// ---------------------------------------------------------------------------
// GET /prompts/tones
// ---------------------------------------------------------------------------

/// List all tone definitions.
pub async fn list_tones(State(state): State<AppState>) -> AppResult<Json<Vec<ToneDefinition>>> {
    let tones = ToneRepo::list(&state.pool).await?;
    Ok(Json(tones))
}

// ---------------------------------------------------------------------------
// POST /prompts/tones
// ---------------------------------------------------------------------------

/// Create a new tone.
///
/// Instructions may start empty; keyword and label are mandatory and the
/// keyword must be unique.
pub async fn create_tone(
    State(state): State<AppState>,
    Json(body): Json<CreateTone>,
) -> AppResult<impl IntoResponse> {
    prompts::validate_tone_keyword(&body.keyword)?;
    prompts::validate_tone_label(&body.label)?;
    if body.instructions.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tone instructions exceed maximum length of {MAX_PROMPT_LENGTH} characters"
        ))
        .into());
    }

    // Friendly duplicate message up front; the unique constraint still
    // guards the race and maps to 409.
    if ToneRepo::find_by_keyword(&state.pool, &body.keyword)
        .await?
        .is_some()
    {
        return Err(CoreError::Conflict(format!(
            "Tone with keyword '{}' already exists",
            body.keyword
        ))
        .into());
    }

    let created = ToneRepo::create(&state.pool, &body).await?;

    tracing::info!(tone_id = created.id, keyword = %created.keyword, "Tone created");

    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// PUT /prompts/tones/{keyword}
// ---------------------------------------------------------------------------

/// Replace a tone's instructions. Reason is mandatory; the update and its
/// history entry commit in one transaction.
pub async fn update_tone(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
    Json(body): Json<UpdateToneRequest>,
) -> AppResult<Json<ToneDefinition>> {
    prompts::validate_reason(&body.reason)?;
    if body.instructions.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tone instructions exceed maximum length of {MAX_PROMPT_LENGTH} characters"
        ))
        .into());
    }

    let updated =
        ToneRepo::update_instructions(&state.pool, &keyword, &body.instructions, &body.reason)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Tone",
                    key: keyword.clone(),
                })
            })?;

    tracing::info!(tone_id = updated.id, keyword = %updated.keyword, "Tone instructions updated");

    Ok(Json(updated))
}

// ---------------------------------------------------------------------------
// GET /prompts/history
// ---------------------------------------------------------------------------

/// List prompt change history, newest first.
pub async fn list_prompt_history(
    State(state): State<AppState>,
    Query(params): Query<PromptHistoryParams>,
) -> AppResult<Json<Vec<PromptHistoryEntry>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);

    let entries = PromptHistoryRepo::list(&state.pool, limit).await?;

    tracing::debug!(count = entries.len(), "Listed prompt history");

    Ok(Json(entries))
}

// ---------------------------------------------------------------------------
// POST /prompts/apply-suggestion
// ---------------------------------------------------------------------------

/// Apply an accepted review suggestion to the prompt store.
///
/// Routes `base` to the base-prompt update and `tone` to the
/// tone-instructions update; each path appends its own history entry.
/// This endpoint only ever runs on an explicit client call -- suggestions
/// are never auto-applied.
pub async fn apply_suggestion(
    State(state): State<AppState>,
    Json(body): Json<ApplySuggestionRequest>,
) -> AppResult<Json<ApplySuggestionResponse>> {
    prompts::validate_reason(&body.reason)?;

    match body.component_type.as_str() {
        "base" => {
            if body.component_id != BASE_COMPONENT_ID {
                return Err(CoreError::Validation(format!(
                    "Component id for the base prompt must be '{BASE_COMPONENT_ID}' (got '{}')",
                    body.component_id
                ))
                .into());
            }
            prompts::validate_prompt_content(&body.new_content)?;
            let created =
                BasePromptRepo::replace(&state.pool, &body.new_content, &body.reason).await?;

            tracing::info!(base_prompt_id = created.id, "Suggestion applied to base prompt");

            Ok(Json(ApplySuggestionResponse {
                applied: true,
                component_type: body.component_type,
                component_id: BASE_COMPONENT_ID.to_string(),
            }))
        }
        "tone" => {
            let updated = ToneRepo::update_instructions(
                &state.pool,
                &body.component_id,
                &body.new_content,
                &body.reason,
            )
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::NotFound {
                    entity: "Tone",
                    key: body.component_id.clone(),
                })
            })?;

            tracing::info!(
                tone_id = updated.id,
                keyword = %updated.keyword,
                "Suggestion applied to tone"
            );

            Ok(Json(ApplySuggestionResponse {
                applied: true,
                component_type: body.component_type,
                component_id: updated.keyword,
            }))
        }
        other => Err(CoreError::Validation(format!(
            "Unknown component type '{other}' (expected 'base' or 'tone')"
        ))
        .into()),
    }
}
