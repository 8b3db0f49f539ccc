//! Repositories for the prompt store: `base_prompts`, `tones`, and the
//! append-only `prompt_history` audit table.
//!
//! Every edit writes the new content and its history entry in a single
//! transaction, so a stored change is never missing its audit record.

use sqlx::{Sqlite, SqlitePool, Transaction};

use redraft_core::types::DbId;

use crate::models::prompt::{BasePrompt, CreateTone, PromptHistoryEntry, ToneDefinition};

/// Column list for `base_prompts` SELECT queries.
const BASE_COLUMNS: &str = "id, content, is_active, created_at";

/// Column list for `tones` SELECT queries.
const TONE_COLUMNS: &str = "id, keyword, label, instructions, created_at, updated_at";

/// Column list for `prompt_history` SELECT queries.
const HISTORY_COLUMNS: &str = "\
    id, component_type, component_id, component_name, \
    old_content, new_content, change_reason, created_at";

/// Length of the base prompt snippet used as `component_name` in history.
const SNIPPET_LENGTH: usize = 50;

// ---------------------------------------------------------------------------
// BasePromptRepo
// ---------------------------------------------------------------------------

/// Operations on the single active base prompt.
pub struct BasePromptRepo;

impl BasePromptRepo {
    /// Find the currently active base prompt, if one exists.
    pub async fn find_active(pool: &SqlitePool) -> Result<Option<BasePrompt>, sqlx::Error> {
        let query = format!(
            "SELECT {BASE_COLUMNS} FROM base_prompts
             WHERE is_active = 1
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, BasePrompt>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Replace the active base prompt and append the history entry, in one
    /// transaction. Returns the new active row.
    pub async fn replace(
        pool: &SqlitePool,
        content: &str,
        reason: &str,
    ) -> Result<BasePrompt, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let old: Option<BasePrompt> = {
            let query = format!(
                "SELECT {BASE_COLUMNS} FROM base_prompts
                 WHERE is_active = 1
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1"
            );
            sqlx::query_as::<_, BasePrompt>(&query)
                .fetch_optional(&mut *tx)
                .await?
        };

        sqlx::query("UPDATE base_prompts SET is_active = 0 WHERE is_active = 1")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO base_prompts (content, is_active) VALUES (?, 1)
             RETURNING {BASE_COLUMNS}"
        );
        let created: BasePrompt = sqlx::query_as::<_, BasePrompt>(&query)
            .bind(content)
            .fetch_one(&mut *tx)
            .await?;

        insert_history(
            &mut tx,
            "base",
            created.id,
            &content_snippet(content),
            old.as_ref().map(|p| p.content.as_str()),
            content,
            reason,
        )
        .await?;

        tx.commit().await?;
        Ok(created)
    }
}

// ---------------------------------------------------------------------------
// ToneRepo
// ---------------------------------------------------------------------------

/// CRUD operations for tone definitions.
pub struct ToneRepo;

impl ToneRepo {
    /// List all tones ordered by keyword.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<ToneDefinition>, sqlx::Error> {
        let query = format!("SELECT {TONE_COLUMNS} FROM tones ORDER BY keyword");
        sqlx::query_as::<_, ToneDefinition>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a tone by its unique keyword.
    pub async fn find_by_keyword(
        pool: &SqlitePool,
        keyword: &str,
    ) -> Result<Option<ToneDefinition>, sqlx::Error> {
        let query = format!("SELECT {TONE_COLUMNS} FROM tones WHERE keyword = ?");
        sqlx::query_as::<_, ToneDefinition>(&query)
            .bind(keyword)
            .fetch_optional(pool)
            .await
    }

    /// Create a tone and append its history entry, in one transaction.
    ///
    /// A duplicate keyword surfaces as a unique-violation `sqlx::Error`
    /// and rolls the whole transaction back, so no history entry is left
    /// behind.
    pub async fn create(
        pool: &SqlitePool,
        input: &CreateTone,
    ) -> Result<ToneDefinition, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tones (keyword, label, instructions) VALUES (?, ?, ?)
             RETURNING {TONE_COLUMNS}"
        );
        let created: ToneDefinition = sqlx::query_as::<_, ToneDefinition>(&query)
            .bind(&input.keyword)
            .bind(&input.label)
            .bind(&input.instructions)
            .fetch_one(&mut *tx)
            .await?;

        insert_history(
            &mut tx,
            "tone",
            created.id,
            &created.label,
            None,
            &created.instructions,
            &format!("Created new tone: {}", created.label),
        )
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Replace a tone's instructions and append the history entry, in one
    /// transaction. Returns `None` if the keyword is unknown (no writes).
    pub async fn update_instructions(
        pool: &SqlitePool,
        keyword: &str,
        instructions: &str,
        reason: &str,
    ) -> Result<Option<ToneDefinition>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing: Option<ToneDefinition> = {
            let query = format!("SELECT {TONE_COLUMNS} FROM tones WHERE keyword = ?");
            sqlx::query_as::<_, ToneDefinition>(&query)
                .bind(keyword)
                .fetch_optional(&mut *tx)
                .await?
        };
        let Some(existing) = existing else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE tones SET instructions = ?, updated_at = ? WHERE keyword = ?
             RETURNING {TONE_COLUMNS}"
        );
        let updated: ToneDefinition = sqlx::query_as::<_, ToneDefinition>(&query)
            .bind(instructions)
            .bind(chrono::Utc::now())
            .bind(keyword)
            .fetch_one(&mut *tx)
            .await?;

        insert_history(
            &mut tx,
            "tone",
            updated.id,
            &updated.label,
            Some(&existing.instructions),
            instructions,
            reason,
        )
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}

// ---------------------------------------------------------------------------
// PromptHistoryRepo
// ---------------------------------------------------------------------------

/// Query operations for the prompt change history.
pub struct PromptHistoryRepo;

impl PromptHistoryRepo {
    /// List prompt change entries, newest first.
    pub async fn list(
        pool: &SqlitePool,
        limit: i64,
    ) -> Result<Vec<PromptHistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM prompt_history
             ORDER BY created_at DESC, id DESC
             LIMIT ?"
        );
        sqlx::query_as::<_, PromptHistoryEntry>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count all prompt change entries.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM prompt_history")
            .fetch_one(pool)
            .await
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Append a `prompt_history` entry inside an open transaction.
async fn insert_history(
    tx: &mut Transaction<'_, Sqlite>,
    component_type: &str,
    component_id: DbId,
    component_name: &str,
    old_content: Option<&str>,
    new_content: &str,
    change_reason: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO prompt_history
            (component_type, component_id, component_name,
             old_content, new_content, change_reason, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(component_type)
    .bind(component_id)
    .bind(component_name)
    .bind(old_content)
    .bind(new_content)
    .bind(change_reason)
    .bind(chrono::Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// First `SNIPPET_LENGTH` characters of the content, with an ellipsis when
/// truncated. Used as the history `component_name` for base prompt edits.
fn content_snippet(content: &str) -> String {
    let mut snippet: String = content.chars().take(SNIPPET_LENGTH).collect();
    if content.chars().count() > SNIPPET_LENGTH {
        snippet.push_str("...");
    }
    snippet
}
