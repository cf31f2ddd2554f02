//! Request orchestration for the analysis endpoints.
//!
//! Composes extraction, prompt construction, the backend client, reply
//! sanitization and the fallback policy. Input validation lives here;
//! everything downstream of a valid input is absorbed, never surfaced.

mod breaker;
pub mod sanitizer;

pub use breaker::{CircuitBreaker, PayloadSource};

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::extract::{ExtractionError, TextExtractor};
use crate::llm::{prompts, LlmClient};
use crate::llm::ChatMessage;
use crate::models::{AnalysisResult, ComparisonResult, FALLBACK_ANALYSIS, FALLBACK_COMPARISON};

/// Temperature for structured-extraction calls. Low, to favor
/// deterministic JSON formatting over creativity.
const STRUCTURED_TEMPERATURE: f32 = 0.1;

/// Served verbatim, with HTTP 200, when the chat backend is unavailable.
pub const CHAT_APOLOGY: &str =
    "Sorry, I am unable to answer right now. Please try again in a moment.";

/// Caller-input problems the caller must fix before retrying. Never
/// absorbed by the fallback policy.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No text provided")]
    NoText,

    #[error("Both documents must be provided.")]
    MissingComparisonInput,
}

/// Composes the pipeline per endpoint. Built once at startup and shared.
pub struct AnalysisOrchestrator {
    client: Arc<LlmClient>,
    breaker: CircuitBreaker,
    extractor: TextExtractor,
}

impl AnalysisOrchestrator {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self {
            breaker: CircuitBreaker::new(client.clone()),
            client,
            extractor: TextExtractor::new(),
        }
    }

    /// Analyze one document. Live result when the backend cooperates,
    /// the constant fallback otherwise.
    pub async fn analyze_document(&self, text: &str) -> Result<AnalysisResult, InputError> {
        if text.trim().is_empty() {
            return Err(InputError::NoText);
        }

        let request_id = Uuid::new_v4();
        let messages = [ChatMessage::user(prompts::analysis_prompt(text))];
        let (payload, source) = self
            .breaker
            .guard(
                "analyze_document",
                &messages,
                STRUCTURED_TEMPERATURE,
                sanitizer::parse_analysis,
                &*FALLBACK_ANALYSIS,
            )
            .await;

        info!(%request_id, ?source, chars = text.chars().count(), "document analysis served");
        Ok(payload)
    }

    /// Compare two documents.
    pub async fn compare_documents(
        &self,
        text_a: &str,
        text_b: &str,
    ) -> Result<ComparisonResult, InputError> {
        if text_a.trim().is_empty() || text_b.trim().is_empty() {
            return Err(InputError::MissingComparisonInput);
        }

        let request_id = Uuid::new_v4();
        let messages = [ChatMessage::user(prompts::comparison_prompt(text_a, text_b))];
        let (payload, source) = self
            .breaker
            .guard(
                "compare_documents",
                &messages,
                STRUCTURED_TEMPERATURE,
                sanitizer::parse_comparison,
                &*FALLBACK_COMPARISON,
            )
            .await;

        info!(%request_id, ?source, "document comparison served");
        Ok(payload)
    }

    /// Freeform chat over optional document context. The raw reply text is
    /// the payload; there is no structured parsing and no fallback payload,
    /// only the apology string.
    pub async fn chat(&self, message: &str, context: &str) -> String {
        let request_id = Uuid::new_v4();
        let messages = prompts::chat_messages(message, context);
        match self
            .client
            .complete(&messages, self.client.config().temperature)
            .await
        {
            Ok(reply) => {
                info!(%request_id, source = "live", "chat reply served");
                reply.trim().to_string()
            }
            Err(error) => {
                warn!(%request_id, source = "fallback", error = %error, "chat backend failed");
                CHAT_APOLOGY.to_string()
            }
        }
    }

    /// Extract text from an uploaded document.
    pub fn extract_text(&self, file_name: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
        self.extractor.extract(file_name, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmConfig, LlmProvider};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn orchestrator_for(endpoint: &str) -> AnalysisOrchestrator {
        let config = LlmConfig {
            provider: LlmProvider::OpenAI,
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        }
        .with_endpoint(endpoint);
        AnalysisOrchestrator::new(Arc::new(LlmClient::new(config)))
    }

    async fn mount_reply(server: &MockServer, content: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn live_reply_is_parsed_and_returned() {
        let server = MockServer::start().await;
        mount_reply(
            &server,
            r#"{"summary": "lease agreement", "key_clauses": ["rent"], "obligations": ["pay rent"], "actions": []}"#,
        )
        .await;

        let result = orchestrator_for(&server.uri())
            .analyze_document("twelve month lease")
            .await
            .unwrap();
        assert_eq!(result.summary, "lease agreement");
        assert_ne!(result, *FALLBACK_ANALYSIS);
    }

    #[tokio::test]
    async fn invalid_json_reply_serves_the_fallback_unchanged() {
        let server = MockServer::start().await;
        mount_reply(&server, "I'm sorry, I can't produce JSON today.").await;

        let result = orchestrator_for(&server.uri())
            .analyze_document("twelve month lease")
            .await
            .unwrap();
        assert_eq!(result, *FALLBACK_ANALYSIS);
    }

    #[tokio::test]
    async fn missing_actions_key_yields_empty_actions_not_an_error() {
        let server = MockServer::start().await;
        mount_reply(
            &server,
            r#"{"summary": "s", "key_clauses": [], "obligations": []}"#,
        )
        .await;

        let result = orchestrator_for(&server.uri())
            .analyze_document("twelve month lease")
            .await
            .unwrap();
        assert!(result.actions.is_empty());
        assert_eq!(result.summary, "s");
    }

    #[tokio::test]
    async fn repeated_calls_with_fixed_backend_are_idempotent() {
        let server = MockServer::start().await;
        mount_reply(
            &server,
            r#"{"summary": "same", "key_clauses": ["a"], "obligations": ["b"], "actions": []}"#,
        )
        .await;

        let orchestrator = orchestrator_for(&server.uri());
        let first = orchestrator.analyze_document("fixed input").await.unwrap();
        let second = orchestrator.analyze_document("fixed input").await.unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn empty_text_is_an_input_error_not_a_fallback() {
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let err = orchestrator.analyze_document("   ").await.unwrap_err();
        assert!(matches!(err, InputError::NoText));
    }

    #[tokio::test]
    async fn comparison_requires_both_documents() {
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let err = orchestrator.compare_documents("present", "").await.unwrap_err();
        assert!(matches!(err, InputError::MissingComparisonInput));
    }

    #[tokio::test]
    async fn comparison_backend_failure_serves_comparison_fallback() {
        // Nothing is listening on this port; the call fails at transport.
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let result = orchestrator
            .compare_documents("doc a", "doc b")
            .await
            .unwrap();
        assert_eq!(result, *FALLBACK_COMPARISON);
    }

    #[tokio::test]
    async fn chat_transport_failure_serves_the_apology() {
        let orchestrator = orchestrator_for("http://127.0.0.1:1");
        let reply = orchestrator.chat("what is the notice period?", "").await;
        assert_eq!(reply, CHAT_APOLOGY);
    }

    #[tokio::test]
    async fn chat_returns_trimmed_raw_reply() {
        let server = MockServer::start().await;
        mount_reply(&server, "  The notice period is sixty days.\n").await;

        let reply = orchestrator_for(&server.uri())
            .chat("what is the notice period?", "sixty days")
            .await;
        assert_eq!(reply, "The notice period is sixty days.");
    }
}
