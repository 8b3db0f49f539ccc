pub mod analysis;
pub mod history;
pub mod prompts;
pub mod rewrite;
