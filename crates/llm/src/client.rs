//! HTTP client for the generation API's `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from a generation call.
///
/// Calls are never retried; each variant surfaces to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// No response was received (connect failure, timeout, DNS, ...).
    #[error("Generation service unreachable: {0}")]
    Unreachable(String),

    /// The service responded with a non-2xx status.
    #[error("Generation failed ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// A 2xx response whose body doesn't contain generated text.
    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// Trait seam
// ---------------------------------------------------------------------------

/// A source of generated text.
///
/// The API handlers hold an `Arc<dyn TextGenerator>`; production wires in
/// [`HttpTextGenerator`], tests wire in a stub.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// Wire types (generateContent request/response)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// [`TextGenerator`] backed by the HTTP generation API.
pub struct HttpTextGenerator {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl HttpTextGenerator {
    /// Build a client from configuration.
    ///
    /// The reqwest client carries the fixed per-request timeout; there is
    /// no other cancellation mechanism.
    pub fn new(config: &LlmConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for HttpTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, prompt_chars = prompt.len(), "Sending generation request");

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let text = extract_text(&parsed)?;
        tracing::debug!(response_chars = text.len(), "Generation request succeeded");
        Ok(text)
    }
}

/// Join the text parts of the first candidate.
fn extract_text(response: &GenerateResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| LlmError::InvalidResponse("response contains no candidates".into()))?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::InvalidResponse(
            "candidate contains no text".into(),
        ));
    }
    Ok(text.trim().to_string())
}

/// Pull a human-readable message out of an upstream error body.
///
/// Understands `{"error": {"message": ...}}`, `{"error": "..."}`, and
/// `{"detail": "..."}`; anything else is passed through verbatim.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.get("detail").and_then(|d| d.as_str()) {
            return message.to_string();
        }
    }
    if body.trim().is_empty() {
        "upstream returned no error details".to_string()
    } else {
        body.trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
