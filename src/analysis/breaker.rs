//! Per-request fallback policy around backend calls.
//!
//! Two logical states per call: attempt the live backend, or serve the
//! constant fallback payload. There is no cross-request memory of prior
//! failures; every request is evaluated independently.

use std::sync::Arc;

use tracing::warn;

use super::sanitizer::SanitizeError;
use crate::llm::{ChatMessage, LlmClient};

/// Where a payload came from. Invisible to API callers, visible to logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Live,
    Fallback,
}

/// Wraps backend calls so the caller always gets a well-formed payload.
pub struct CircuitBreaker {
    client: Arc<LlmClient>,
}

impl CircuitBreaker {
    pub fn new(client: Arc<LlmClient>) -> Self {
        Self { client }
    }

    /// Run one guarded backend call: complete, sanitize, or fall back.
    ///
    /// A backend failure or an unusable reply trips straight to the
    /// fallback payload; both are logged for operators and neither is
    /// surfaced to the caller.
    pub async fn guard<T, P>(
        &self,
        operation: &'static str,
        messages: &[ChatMessage],
        temperature: f32,
        parse: P,
        fallback: &T,
    ) -> (T, PayloadSource)
    where
        T: Clone,
        P: Fn(&str) -> Result<T, SanitizeError>,
    {
        match self.client.complete(messages, temperature).await {
            Ok(raw) => match parse(&raw) {
                Ok(payload) => (payload, PayloadSource::Live),
                Err(error) => {
                    warn!(operation, error = %error, "unusable model reply, serving fallback");
                    (fallback.clone(), PayloadSource::Fallback)
                }
            },
            Err(error) => {
                warn!(operation, error = %error, "backend call failed, serving fallback");
                (fallback.clone(), PayloadSource::Fallback)
            }
        }
    }
}
