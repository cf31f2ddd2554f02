//! legalens - AI-assisted legal document analysis service.
//!
//! Turns an uploaded document (PDF, image, or plain text) into structured
//! legal-analysis output via a chat-completion backend. Anything downstream
//! of successful text extraction is guarded by a fallback policy, so the
//! HTTP contract holds even when the backend or its output is unusable.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod models;
pub mod rate_limit;
pub mod server;
