/// Generation API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Base URL of the generation API.
    pub api_url: String,
    /// API key sent with every request.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Per-request timeout in seconds (no retries; a single failed call
    /// surfaces to the caller immediately).
    pub timeout_secs: u64,
}

impl LlmConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var            | Default                                        |
    /// |--------------------|------------------------------------------------|
    /// | `LLM_API_URL`      | `https://generativelanguage.googleapis.com`    |
    /// | `LLM_API_KEY`      | (required)                                     |
    /// | `LLM_MODEL`        | `gemini-2.0-flash`                             |
    /// | `LLM_TIMEOUT_SECS` | `60`                                           |
    pub fn from_env() -> Self {
        let api_url = std::env::var("LLM_API_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into());

        let api_key = std::env::var("LLM_API_KEY").expect("LLM_API_KEY must be set");

        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into());

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            api_key,
            model,
            timeout_secs,
        }
    }
}
