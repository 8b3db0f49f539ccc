//! Handler for the rewrite history listing.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use redraft_core::query::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use redraft_db::models::rewrite_record::RewriteRecord;
use redraft_db::repositories::RewriteHistoryRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Pagination parameters for `GET /history`.
#[derive(Debug, Deserialize)]
pub struct HistoryListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// List rewrite records, newest first.
///
/// Filtering by tone, date, or content is a presentation concern and
/// happens client-side.
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryListParams>,
) -> AppResult<Json<Vec<RewriteRecord>>> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let records = RewriteHistoryRepo::list(&state.pool, limit, offset).await?;

    tracing::debug!(count = records.len(), "Listed rewrite history");

    Ok(Json(records))
}
