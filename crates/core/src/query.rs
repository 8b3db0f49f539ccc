//! Pagination parameter clamping shared by list endpoints.

/// Default page size for history listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Maximum page size a client may request.
pub const MAX_LIST_LIMIT: i64 = 500;

/// Clamp an optional client-supplied limit into `[1, max]`, falling back
/// to `default` when absent or non-positive.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(value) if value > 0 => value.min(max),
        _ => default,
    }
}

/// Clamp an optional client-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
