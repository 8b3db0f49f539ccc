//! Domain error taxonomy shared by every crate in the workspace.

/// A domain-level error.
///
/// The `api` crate maps each variant to an HTTP status and error code;
/// nothing in this crate knows about HTTP.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A required field is blank or a value fails validation.
    #[error("{0}")]
    Validation(String),

    /// An entity referenced by key does not exist.
    #[error("{entity} '{key}' not found")]
    NotFound {
        entity: &'static str,
        key: String,
    },

    /// A unique key already exists (e.g. duplicate tone keyword).
    #[error("{0}")]
    Conflict(String),

    /// The requested operation is a known stub, not a failure.
    #[error("{0}")]
    NotImplemented(String),

    /// An unexpected internal error.
    #[error("{0}")]
    Internal(String),
}
