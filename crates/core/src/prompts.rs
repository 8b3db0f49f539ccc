//! Prompt template validation and final-prompt assembly.
//!
//! The store keeps one active base prompt plus a set of named tones; the
//! rewrite gateway combines them with the submitted email into the final
//! prompt sent to the generation API.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length for the base prompt and tone instructions in characters.
pub const MAX_PROMPT_LENGTH: usize = 10_000;

/// Maximum length for a submitted email in characters.
pub const MAX_EMAIL_LENGTH: usize = 50_000;

/// Maximum length for a change reason in characters.
pub const MAX_REASON_LENGTH: usize = 1_000;

/// Maximum length for a tone keyword or label.
pub const MAX_TONE_NAME_LENGTH: usize = 100;

/// Fallback base prompt used when no active base prompt exists.
pub const DEFAULT_BASE_PROMPT: &str =
    "Please rewrite the following email to enhance its clarity and impact:";

/// Regex pattern a tone keyword must match: lowercase, digits, hyphens.
pub const TONE_KEYWORD_PATTERN: &str = r"^[a-z0-9][a-z0-9-]*$";

/// Compiled keyword regex. Compiled once, reused forever.
static TONE_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TONE_KEYWORD_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a submitted email: must be non-blank and within length limit.
pub fn validate_email(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Email content is required".to_string(),
        ));
    }
    if text.len() > MAX_EMAIL_LENGTH {
        return Err(CoreError::Validation(format!(
            "Email exceeds maximum length of {MAX_EMAIL_LENGTH} characters (got {})",
            text.len()
        )));
    }
    Ok(())
}

/// Validate prompt content (base prompt or tone instructions).
pub fn validate_prompt_content(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation(
            "Prompt content must not be empty".to_string(),
        ));
    }
    if text.len() > MAX_PROMPT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Prompt content exceeds maximum length of {MAX_PROMPT_LENGTH} characters (got {})",
            text.len()
        )));
    }
    Ok(())
}

/// Validate a change reason: mandatory for every prompt edit.
pub fn validate_reason(reason: &str) -> Result<(), CoreError> {
    if reason.trim().is_empty() {
        return Err(CoreError::Validation(
            "A reason for the change is required".to_string(),
        ));
    }
    if reason.len() > MAX_REASON_LENGTH {
        return Err(CoreError::Validation(format!(
            "Change reason exceeds maximum length of {MAX_REASON_LENGTH} characters (got {})",
            reason.len()
        )));
    }
    Ok(())
}

/// Validate a tone keyword: non-blank, limited length, keyword pattern.
pub fn validate_tone_keyword(keyword: &str) -> Result<(), CoreError> {
    if keyword.trim().is_empty() {
        return Err(CoreError::Validation(
            "Tone keyword is required".to_string(),
        ));
    }
    if keyword.len() > MAX_TONE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tone keyword exceeds maximum length of {MAX_TONE_NAME_LENGTH} characters"
        )));
    }
    if !TONE_KEYWORD_RE.is_match(keyword) {
        return Err(CoreError::Validation(format!(
            "Tone keyword '{keyword}' must contain only lowercase letters, digits, and hyphens"
        )));
    }
    Ok(())
}

/// Validate a tone label: non-blank, limited length.
pub fn validate_tone_label(label: &str) -> Result<(), CoreError> {
    if label.trim().is_empty() {
        return Err(CoreError::Validation("Tone label is required".to_string()));
    }
    if label.len() > MAX_TONE_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Tone label exceeds maximum length of {MAX_TONE_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Final prompt assembly
// ---------------------------------------------------------------------------

/// Tone guidance used when assembling the final prompt.
#[derive(Debug, Clone)]
pub struct ToneGuidance<'a> {
    pub label: &'a str,
    pub instructions: &'a str,
}

/// Assemble the final prompt sent to the generation API.
///
/// Layout: base prompt, then a tone-guidance block when the tone is known
/// and has instructions, then the email body between `---` markers. An
/// unknown tone keyword degrades to the base prompt alone.
pub fn build_final_prompt(
    base_prompt: Option<&str>,
    tone: Option<&ToneGuidance<'_>>,
    email: &str,
) -> String {
    let base = base_prompt.unwrap_or(DEFAULT_BASE_PROMPT);

    let mut prompt = String::from(base);

    if let Some(tone) = tone {
        if !tone.instructions.trim().is_empty() {
            prompt.push_str(&format!(
                "\n\nTone Guidance ({}):\n{}",
                tone.label, tone.instructions
            ));
        }
    }

    prompt.push_str(&format!("\n\nEmail to rewrite:\n---\n{email}\n---"));
    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    // -- validate_email --

    #[test]
    fn valid_email_passes() {
        assert!(validate_email("hey can u send the report").is_ok());
    }

    #[test]
    fn empty_email_rejected() {
        assert_matches!(validate_email(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn whitespace_email_rejected() {
        assert_matches!(validate_email("   \n\t "), Err(CoreError::Validation(_)));
    }

    #[test]
    fn too_long_email_rejected() {
        let long = "x".repeat(MAX_EMAIL_LENGTH + 1);
        let err = validate_email(&long).unwrap_err();
        assert!(err.to_string().contains("exceeds maximum length"));
    }

    // -- validate_reason --

    #[test]
    fn valid_reason_passes() {
        assert!(validate_reason("Annual review of base prompt effectiveness.").is_ok());
    }

    #[test]
    fn blank_reason_rejected() {
        assert_matches!(validate_reason("  "), Err(CoreError::Validation(_)));
    }

    // -- validate_tone_keyword / validate_tone_label --

    #[test]
    fn valid_keyword_passes() {
        assert!(validate_tone_keyword("action-oriented").is_ok());
        assert!(validate_tone_keyword("pirate").is_ok());
    }

    #[test]
    fn blank_keyword_rejected() {
        assert_matches!(validate_tone_keyword(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn uppercase_keyword_rejected() {
        let err = validate_tone_keyword("Professional").unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn keyword_with_spaces_rejected() {
        assert_matches!(
            validate_tone_keyword("very formal"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn blank_label_rejected() {
        assert_matches!(validate_tone_label(" "), Err(CoreError::Validation(_)));
    }

    // -- build_final_prompt --

    #[test]
    fn final_prompt_includes_base_tone_and_email() {
        let tone = ToneGuidance {
            label: "Friendly",
            instructions: "Use a warm, approachable tone.",
        };
        let prompt = build_final_prompt(Some("Base guidance."), Some(&tone), "Hello there");

        assert!(prompt.starts_with("Base guidance."));
        assert!(prompt.contains("Tone Guidance (Friendly):"));
        assert!(prompt.contains("Use a warm, approachable tone."));
        assert!(prompt.contains("Email to rewrite:\n---\nHello there\n---"));
    }

    #[test]
    fn missing_base_prompt_uses_default() {
        let prompt = build_final_prompt(None, None, "body");
        assert!(prompt.starts_with(DEFAULT_BASE_PROMPT));
    }

    #[test]
    fn unknown_tone_omits_guidance_block() {
        let prompt = build_final_prompt(Some("Base."), None, "body");
        assert!(!prompt.contains("Tone Guidance"));
        assert!(prompt.contains("Base."));
        assert!(prompt.contains("body"));
    }

    #[test]
    fn tone_with_blank_instructions_omits_guidance_block() {
        let tone = ToneGuidance {
            label: "Empty",
            instructions: "   ",
        };
        let prompt = build_final_prompt(Some("Base."), Some(&tone), "body");
        assert!(!prompt.contains("Tone Guidance"));
    }
}
