//! Lenient extraction of the feedback JSON from free-form model output

use crate::error::{FeedbackError, Result};
use crate::feedback::Feedback;
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

fn json_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[\s\S]*\}").expect("Invalid JSON object regex"))
}

/// Greedy span from the first `{` to the last `}`.
///
/// Models often wrap the object in prose or Markdown code fences; the span
/// skips both.
pub fn extract_json_object(text: &str) -> Option<&str> {
    json_object_regex().find(text).map(|m| m.as_str())
}

pub fn parse_feedback(text: &str) -> Result<Feedback> {
    let object = extract_json_object(text).ok_or_else(|| {
        FeedbackError::MalformedFeedback("AI response was not in expected JSON format".to_string())
    })?;

    let feedback = serde_json::from_str::<Feedback>(object)
        .map_err(|e| FeedbackError::MalformedFeedback(format!("JSON parse error: {}", e)))?;

    debug!("Successfully parsed AI response as JSON");
    Ok(feedback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_code_fence() {
        let text = "Here is the analysis:\n```json\n{\"overall_score\": 70, \"ATS\": {\"score\": 60}}\n```\nGood luck!";
        assert_eq!(
            extract_json_object(text),
            Some("{\"overall_score\": 70, \"ATS\": {\"score\": 60}}")
        );
    }

    #[test]
    fn test_extract_is_greedy() {
        assert_eq!(extract_json_object("a {1} b {2} c"), Some("{1} b {2}"));
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} backwards {"), None);
    }

    #[test]
    fn test_parse_feedback() {
        let text = "```json\n{\"overall_score\": 64, \"recommendations\": [\"Quantify impact\"]}\n```";
        let feedback = parse_feedback(text).unwrap();
        assert_eq!(feedback.overall_score, 64);
        assert_eq!(feedback.recommendations, vec!["Quantify impact"]);
    }

    #[test]
    fn test_parse_errors_are_format_errors() {
        let err = parse_feedback("I cannot help with that.").unwrap_err();
        assert!(err.is_response_format());

        let err = parse_feedback("{\"overall_score\": 80, \"ATS\": }").unwrap_err();
        assert!(err.is_response_format());
        assert!(err.to_string().contains("JSON parse error"));
    }
}
