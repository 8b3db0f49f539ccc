//! Client for the external text-generation API.
//!
//! The rest of the workspace depends on the [`TextGenerator`] trait, not
//! the HTTP implementation, so tests can substitute a stub generator.

pub mod client;
pub mod config;

pub use client::{HttpTextGenerator, LlmError, TextGenerator};
pub use config::LlmConfig;
