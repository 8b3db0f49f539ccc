pub mod prompt;
pub mod rewrite_record;
