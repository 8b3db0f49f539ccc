//! Rewrite audit log models.

use redraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the append-only `rewrite_history` table.
///
/// Immutable once written; never updated or deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RewriteRecord {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub original_email: String,
    pub tone: String,
    pub final_prompt: String,
    pub generated_response: String,
}

/// Input for appending a rewrite record.
#[derive(Debug, Clone)]
pub struct CreateRewriteRecord {
    pub original_email: String,
    pub tone: String,
    pub final_prompt: String,
    pub generated_response: String,
}
