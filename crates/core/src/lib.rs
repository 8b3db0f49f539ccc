//! Domain logic for the redraft email-rewriting service.
//!
//! Pure types and functions only -- no I/O. The `db`, `llm`, and `api`
//! crates build on the validation, prompt-assembly, and analysis-parsing
//! helpers defined here.

pub mod analysis;
pub mod error;
pub mod prompts;
pub mod query;
pub mod types;
