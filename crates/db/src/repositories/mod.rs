pub mod prompt_repo;
pub mod rewrite_history_repo;

pub use prompt_repo::{BasePromptRepo, PromptHistoryRepo, ToneRepo};
pub use rewrite_history_repo::RewriteHistoryRepo;
