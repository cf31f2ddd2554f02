//! Validation of raw model replies.
//!
//! Strips Markdown code fences, then parses strict JSON into the typed
//! payload. Malformed output is reported, never repaired in place;
//! recovery is the circuit breaker's job.

use thiserror::Error;

use crate::models::{AnalysisResult, ComparisonResult};

/// A reply that cannot be turned into the expected payload.
#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("reply is empty")]
    Empty,
}

/// Remove a leading ``` or ```json fence and a trailing ``` fence, plus
/// surrounding whitespace. Text without fences passes through untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the fence line, including an optional language tag.
        text = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
    }
    if let Some(body) = text.trim_end().strip_suffix("```") {
        text = body;
    }
    text.trim()
}

/// Parse a raw reply as an [`AnalysisResult`].
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, SanitizeError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(SanitizeError::Empty);
    }
    Ok(serde_json::from_str(cleaned)?)
}

/// Parse a raw reply as a [`ComparisonResult`].
pub fn parse_comparison(raw: &str) -> Result<ComparisonResult, SanitizeError> {
    let cleaned = strip_code_fences(raw);
    if cleaned.is_empty() {
        return Err(SanitizeError::Empty);
    }
    Ok(serde_json::from_str(cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = r#"{"summary": "s", "key_clauses": ["k"], "obligations": [], "actions": []}"#;

    #[test]
    fn unfenced_json_passes_through() {
        let parsed = parse_analysis(PLAIN).unwrap();
        assert_eq!(parsed.summary, "s");
        assert_eq!(parsed.key_clauses, vec!["k"]);
    }

    #[test]
    fn fence_with_language_tag_is_stripped() {
        let raw = format!("```json\n{PLAIN}\n```");
        assert_eq!(parse_analysis(&raw).unwrap().summary, "s");
    }

    #[test]
    fn fence_without_language_tag_is_stripped() {
        let raw = format!("```\n{PLAIN}\n```");
        assert_eq!(parse_analysis(&raw).unwrap().summary, "s");
    }

    #[test]
    fn windows_line_endings_do_not_break_fence_stripping() {
        let raw = format!("```json\r\n{PLAIN}\r\n```");
        assert_eq!(parse_analysis(&raw).unwrap().summary, "s");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let raw = format!("\n\n  ```json\n{PLAIN}\n```  \n");
        assert_eq!(parse_analysis(&raw).unwrap().summary, "s");
    }

    #[test]
    fn prose_reply_is_an_error() {
        assert!(parse_analysis("I could not analyze this document.").is_err());
    }

    #[test]
    fn empty_reply_is_an_error() {
        assert!(matches!(parse_analysis("```\n```"), Err(SanitizeError::Empty)));
    }

    #[test]
    fn missing_keys_default_instead_of_failing() {
        let parsed = parse_analysis(r#"{"summary": "only a summary"}"#).unwrap();
        assert!(parsed.actions.is_empty());
        assert!(parsed.obligations.is_empty());
    }

    #[test]
    fn wrong_field_type_is_an_error_not_a_partial_object() {
        let raw = r#"{"summary": "s", "key_clauses": "should be an array"}"#;
        assert!(parse_analysis(raw).is_err());
    }

    #[test]
    fn malformed_action_date_is_an_error() {
        let raw = r#"{"summary": "s", "actions": [{"title": "t", "date": "soonish", "description": "d"}]}"#;
        assert!(parse_analysis(raw).is_err());
    }

    #[test]
    fn comparison_reply_parses() {
        let raw = r#"```json
{"differences": ["notice period"], "similarities": ["parties"], "verdict": "Close."}
```"#;
        let parsed = parse_comparison(raw).unwrap();
        assert_eq!(parsed.differences, vec!["notice period"]);
        assert_eq!(parsed.verdict, "Close.");
    }
}
