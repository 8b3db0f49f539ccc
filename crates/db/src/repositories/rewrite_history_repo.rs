//! Repository for the append-only `rewrite_history` table.

use sqlx::SqlitePool;

use crate::models::rewrite_record::{CreateRewriteRecord, RewriteRecord};

/// Column list for `rewrite_history` SELECT queries.
const COLUMNS: &str =
    "id, timestamp, original_email, tone, final_prompt, generated_response";

/// Provides append and query operations for rewrite records.
///
/// Records are immutable: there is no update or delete.
pub struct RewriteHistoryRepo;

impl RewriteHistoryRepo {
    /// Append a rewrite record. Returns the created row.
    pub async fn insert(
        pool: &SqlitePool,
        input: &CreateRewriteRecord,
    ) -> Result<RewriteRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO rewrite_history
                (timestamp, original_email, tone, final_prompt, generated_response)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RewriteRecord>(&query)
            .bind(chrono::Utc::now())
            .bind(&input.original_email)
            .bind(&input.tone)
            .bind(&input.final_prompt)
            .bind(&input.generated_response)
            .fetch_one(pool)
            .await
    }

    /// List rewrite records, newest first, with pagination.
    ///
    /// `id DESC` breaks ties between records written within the same
    /// timestamp granularity.
    pub async fn list(
        pool: &SqlitePool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RewriteRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rewrite_history
             ORDER BY timestamp DESC, id DESC
             LIMIT ? OFFSET ?"
        );
        sqlx::query_as::<_, RewriteRecord>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List every rewrite record, oldest first (review-flow input).
    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<RewriteRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM rewrite_history ORDER BY timestamp ASC, id ASC"
        );
        sqlx::query_as::<_, RewriteRecord>(&query).fetch_all(pool).await
    }

    /// Count all rewrite records.
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rewrite_history")
            .fetch_one(pool)
            .await
    }
}
