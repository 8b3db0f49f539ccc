//! Prompt review analysis: review-prompt construction and response parsing.
//!
//! The review flow sends the rewrite history and the current prompt
//! templates to the LLM and expects a structured JSON reply. Older
//! deployments returned a single opaque `{"output": "..."}` string; that
//! legacy shape is still accepted and normalized into the structured form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Analysis result types
// ---------------------------------------------------------------------------

/// Priority of an improvement suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionPriority {
    Low,
    Medium,
    High,
}

/// Which prompt component a suggestion targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Base,
    Tone,
}

/// A single LLM-proposed edit to the base prompt or a tone's instructions.
///
/// Transient: never persisted. Applying one goes through the regular
/// prompt-store update path and produces a history entry there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub id: String,
    pub description: String,
    pub priority: SuggestionPriority,
    pub component_type: ComponentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_replacement_text: Option<String>,
}

/// Structured result of a prompt review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptAnalysis {
    pub overall_summary: String,
    #[serde(default)]
    pub tone_effectiveness: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revised_base_prompt: Option<String>,
    #[serde(default)]
    pub improvement_suggestions: Vec<SuggestionItem>,
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parse the raw LLM reply into a [`PromptAnalysis`].
///
/// Accepted shapes, tried in order:
/// 1. structured JSON with an `overall_summary` field;
/// 2. legacy JSON `{"output": "..."}`;
/// 3. anything else: the verbatim text becomes `overall_summary`.
///
/// Markdown code fences around the JSON are stripped first (models often
/// wrap their reply in ```json ... ```).
pub fn parse_analysis(raw: &str) -> PromptAnalysis {
    let text = strip_code_fences(raw);

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
        if value.get("overall_summary").is_some() {
            if let Ok(analysis) = serde_json::from_value::<PromptAnalysis>(value.clone()) {
                return analysis;
            }
        }
        if let Some(output) = value.get("output").and_then(|v| v.as_str()) {
            return legacy_analysis(output);
        }
    }

    legacy_analysis(text)
}

/// Wrap opaque legacy output in the structured shape.
fn legacy_analysis(output: &str) -> PromptAnalysis {
    PromptAnalysis {
        overall_summary: output.to_string(),
        ..PromptAnalysis::default()
    }
}

/// Strip a single surrounding markdown code fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    match body.split_once('\n') {
        Some((first_line, remainder)) if !first_line.trim().contains(' ') => remainder.trim(),
        _ => body.trim(),
    }
}

// ---------------------------------------------------------------------------
// Review prompt construction
// ---------------------------------------------------------------------------

/// One rewrite record as fed into the review prompt.
#[derive(Debug, Clone)]
pub struct ReviewRecord<'a> {
    pub tone: &'a str,
    pub original_email: &'a str,
    pub generated_response: &'a str,
}

/// Current prompt-store content as fed into the review prompt.
#[derive(Debug, Clone)]
pub struct ReviewContext<'a> {
    pub base_prompt: &'a str,
    /// `(keyword, instructions)` pairs for every tone.
    pub tones: &'a [(String, String)],
}

/// Build the review prompt sent to the LLM.
///
/// Includes the current base prompt, every tone's instructions, and the
/// rewrite history grouped by tone, then asks for the structured JSON
/// shape that [`parse_analysis`] understands.
pub fn build_review_prompt(context: &ReviewContext<'_>, records: &[ReviewRecord<'_>]) -> String {
    let mut prompt = String::from(
        "You are a prompt engineer reviewing the behaviour of an email-rewriting assistant.\n\n",
    );

    prompt.push_str("CURRENT BASE PROMPT:\n");
    prompt.push_str(context.base_prompt);
    prompt.push_str("\n\nCURRENT TONES:\n");
    for (keyword, instructions) in context.tones {
        prompt.push_str(&format!("- {keyword}: {instructions}\n"));
    }

    prompt.push_str("\nREWRITE HISTORY (grouped by tone):\n");
    let mut by_tone: BTreeMap<&str, Vec<&ReviewRecord<'_>>> = BTreeMap::new();
    for record in records {
        by_tone.entry(record.tone).or_default().push(record);
    }
    for (tone, entries) in &by_tone {
        prompt.push_str(&format!("\n## Tone: {tone}\n"));
        for entry in entries {
            prompt.push_str(&format!(
                "ORIGINAL:\n{}\nREWRITTEN:\n{}\n\n",
                entry.original_email, entry.generated_response
            ));
        }
    }

    prompt.push_str(
        "\nReview how well the prompts produce rewrites matching each tone. \
         Respond with a single JSON object, no surrounding prose, with fields: \
         \"overall_summary\" (string), \
         \"tone_effectiveness\" (object mapping tone keyword to assessment), \
         \"revised_base_prompt\" (string, optional), and \
         \"improvement_suggestions\" (array of objects with \"id\", \
         \"description\", \"priority\" [low|medium|high], \"component_type\" \
         [base|tone], \"component_keyword\" [tone keyword, when applicable], \
         and \"suggested_replacement_text\").",
    );

    prompt
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_structured_analysis() {
        let raw = r#"{
            "overall_summary": "Prompts perform well.",
            "tone_effectiveness": {"professional": "strong", "friendly": "weak"},
            "revised_base_prompt": "New base prompt.",
            "improvement_suggestions": [{
                "id": "s1",
                "description": "Tighten friendly tone",
                "priority": "high",
                "component_type": "tone",
                "component_keyword": "friendly",
                "suggested_replacement_text": "Be warmer."
            }]
        }"#;

        let analysis = parse_analysis(raw);
        assert_eq!(analysis.overall_summary, "Prompts perform well.");
        assert_eq!(analysis.tone_effectiveness.len(), 2);
        assert_eq!(analysis.revised_base_prompt.as_deref(), Some("New base prompt."));
        assert_eq!(analysis.improvement_suggestions.len(), 1);

        let suggestion = &analysis.improvement_suggestions[0];
        assert_eq!(suggestion.priority, SuggestionPriority::High);
        assert_eq!(suggestion.component_type, ComponentType::Tone);
        assert_eq!(suggestion.component_keyword.as_deref(), Some("friendly"));
    }

    #[test]
    fn parses_legacy_output_shape() {
        let analysis = parse_analysis(r#"{"output": "legacy text"}"#);
        assert_eq!(analysis.overall_summary, "legacy text");
        assert!(analysis.tone_effectiveness.is_empty());
        assert!(analysis.improvement_suggestions.is_empty());
        assert!(analysis.revised_base_prompt.is_none());
    }

    #[test]
    fn plain_text_becomes_summary() {
        let analysis = parse_analysis("The prompts look fine overall.");
        assert_eq!(analysis.overall_summary, "The prompts look fine overall.");
        assert!(analysis.tone_effectiveness.is_empty());
    }

    #[test]
    fn strips_json_code_fence() {
        let raw = "```json\n{\"overall_summary\": \"fenced\"}\n```";
        let analysis = parse_analysis(raw);
        assert_eq!(analysis.overall_summary, "fenced");
    }

    #[test]
    fn strips_bare_code_fence() {
        let raw = "```\n{\"overall_summary\": \"bare\"}\n```";
        let analysis = parse_analysis(raw);
        assert_eq!(analysis.overall_summary, "bare");
    }

    #[test]
    fn malformed_structured_json_degrades_to_text() {
        // `overall_summary` present but the suggestion list is malformed:
        // fall back to treating the whole reply as opaque text.
        let raw = r#"{"overall_summary": "x", "improvement_suggestions": [{"id": 1}]}"#;
        let analysis = parse_analysis(raw);
        assert_eq!(analysis.overall_summary, raw);
    }

    #[test]
    fn review_prompt_groups_records_by_tone() {
        let tones = vec![
            ("professional".to_string(), "Be formal.".to_string()),
            ("friendly".to_string(), "Be warm.".to_string()),
        ];
        let context = ReviewContext {
            base_prompt: "Base guidance.",
            tones: &tones,
        };
        let records = vec![
            ReviewRecord {
                tone: "friendly",
                original_email: "hi",
                generated_response: "Hello!",
            },
            ReviewRecord {
                tone: "professional",
                original_email: "yo",
                generated_response: "Dear Sir,",
            },
            ReviewRecord {
                tone: "friendly",
                original_email: "sup",
                generated_response: "Hi there!",
            },
        ];

        let prompt = build_review_prompt(&context, &records);

        assert!(prompt.contains("CURRENT BASE PROMPT:\nBase guidance."));
        assert!(prompt.contains("- professional: Be formal."));
        assert!(prompt.contains("## Tone: friendly"));
        assert!(prompt.contains("## Tone: professional"));
        // Both friendly records land under the same heading.
        let friendly_section = prompt.split("## Tone: friendly").nth(1).unwrap();
        let friendly_before_next = friendly_section.split("## Tone:").next().unwrap();
        assert!(friendly_before_next.contains("hi"));
        assert!(friendly_before_next.contains("sup"));
    }
}
