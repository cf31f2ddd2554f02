//! Prompt construction for the analysis backend.
//!
//! Pure functions, no side effects. The templates demand strict JSON so
//! replies can be parsed without repair. Truncation limits are exact
//! character counts, deliberately not token-aware: the cutoffs bound the
//! worst-case request cost and stay reproducible across tokenizers.

use crate::llm::ChatMessage;

/// Maximum characters of document text embedded in an analysis prompt.
pub const ANALYSIS_CONTEXT_CHARS: usize = 15_000;
/// Maximum characters of each document embedded in a comparison prompt.
pub const COMPARISON_CONTEXT_CHARS: usize = 7_000;
/// Maximum characters of document context embedded in a chat prompt.
pub const CHAT_CONTEXT_CHARS: usize = 10_000;

/// Cut `text` to at most `max` characters, exactly.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Build the single-document analysis instruction.
pub fn analysis_prompt(text: &str) -> String {
    format!(
        r#"You are a legal document analyst. Read the document below and respond with ONLY a JSON object: no markdown fences, no commentary, no preamble.

The JSON object must have exactly these keys:
- "summary": a concise plain-English summary of the document
- "key_clauses": an array of strings, the most important clauses in the document
- "obligations": an array of strings, the obligations each party takes on
- "actions": an array of objects with keys "title", "date" and "description", one per deadline-driven item

Formatting rules:
1. Every "date" must be a calendar date in YYYY-MM-DD format.
2. If no concrete date can be identified, return an empty "actions" array instead of guessing a date.

Document:
{content}"#,
        content = truncate_chars(text, ANALYSIS_CONTEXT_CHARS)
    )
}

/// Build the two-document comparison instruction.
pub fn comparison_prompt(text_a: &str, text_b: &str) -> String {
    format!(
        r#"You are a legal document analyst. Compare the two documents below and respond with ONLY a JSON object: no markdown fences, no commentary, no preamble.

The JSON object must have exactly these keys:
- "differences": an array of strings, the material differences between the documents
- "similarities": an array of strings, what the documents have in common
- "verdict": an overall judgement of at most two sentences

Document A:
{a}

Document B:
{b}"#,
        a = truncate_chars(text_a, COMPARISON_CONTEXT_CHARS),
        b = truncate_chars(text_b, COMPARISON_CONTEXT_CHARS)
    )
}

/// Build the chat conversation: a system instruction carrying the document
/// context, paired with the user's message.
pub fn chat_messages(message: &str, context: &str) -> Vec<ChatMessage> {
    let context = truncate_chars(context, CHAT_CONTEXT_CHARS);
    let system = if context.trim().is_empty() {
        "You are a helpful assistant answering questions about legal documents. \
         Answer plainly and note when something needs review by a qualified lawyer."
            .to_string()
    } else {
        format!(
            "You are a helpful assistant answering questions about legal documents. \
             Answer plainly and note when something needs review by a qualified lawyer. \
             Base your answers on the following document:\n\n{context}"
        )
    };

    vec![ChatMessage::system(system), ChatMessage::user(message)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_embeds_exactly_the_first_15000_chars() {
        // 'z' does not occur in the template text, so counting is exact.
        let text = "z".repeat(20_000);
        let prompt = analysis_prompt(&text);
        let embedded = prompt.chars().filter(|c| *c == 'z').count();
        assert_eq!(embedded, ANALYSIS_CONTEXT_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(20_000);
        let prompt = analysis_prompt(&text);
        let embedded = prompt.chars().filter(|c| *c == 'é').count();
        assert_eq!(embedded, ANALYSIS_CONTEXT_CHARS);
    }

    #[test]
    fn short_text_is_embedded_whole() {
        let prompt = analysis_prompt("the whole document");
        assert!(prompt.contains("the whole document"));
    }

    #[test]
    fn comparison_prompt_truncates_each_side_independently() {
        let a = "a".repeat(10_000);
        let b = "b".repeat(10_000);
        let prompt = comparison_prompt(&a, &b);
        assert_eq!(
            prompt.chars().filter(|c| *c == 'a').count(),
            COMPARISON_CONTEXT_CHARS + prompt_template_a_count()
        );
        assert_eq!(
            prompt.chars().filter(|c| *c == 'b').count(),
            COMPARISON_CONTEXT_CHARS + prompt_template_b_count()
        );
    }

    // Template text itself contains letters; count them once so the
    // assertions above stay exact.
    fn prompt_template_a_count() -> usize {
        comparison_prompt("", "").chars().filter(|c| *c == 'a').count()
    }

    fn prompt_template_b_count() -> usize {
        comparison_prompt("", "").chars().filter(|c| *c == 'b').count()
    }

    #[test]
    fn chat_context_becomes_a_system_message() {
        let messages = chat_messages("What is the notice period?", "Sixty days notice.");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("Sixty days notice."));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "What is the notice period?");
    }

    #[test]
    fn chat_without_context_still_has_a_system_instruction() {
        let messages = chat_messages("Hello", "   ");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(!messages[0].content.contains("Base your answers"));
    }
}
