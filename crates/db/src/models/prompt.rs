//! Prompt store models: base prompt, tones, and the change history.

use redraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Base prompt
// ---------------------------------------------------------------------------

/// A row from the `base_prompts` table. Exactly one row is active.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BasePrompt {
    pub id: DbId,
    pub content: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Tones
// ---------------------------------------------------------------------------

/// A row from the `tones` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ToneDefinition {
    pub id: DbId,
    pub keyword: String,
    pub label: String,
    pub instructions: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a tone.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTone {
    pub keyword: String,
    pub label: String,
    #[serde(default)]
    pub instructions: String,
}

// ---------------------------------------------------------------------------
// Change history
// ---------------------------------------------------------------------------

/// A row from the append-only `prompt_history` table.
///
/// `component_type` is `"base"` or `"tone"`; `component_name` is the tone
/// label, or a snippet of the base prompt content.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PromptHistoryEntry {
    pub id: DbId,
    pub component_type: String,
    pub component_id: DbId,
    pub component_name: String,
    pub old_content: Option<String>,
    pub new_content: String,
    pub change_reason: String,
    pub created_at: Timestamp,
}
