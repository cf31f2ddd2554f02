//! HTTP endpoint handlers.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Multipart, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::AppState;
use crate::extract::ExtractionError;
use crate::models::ChatReply;

/// Body shape shared by every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Service banner, kept for load balancers and curious humans.
pub async fn home() -> &'static str {
    "AI-powered legal document analysis service is running"
}

/// Health check endpoint for container orchestration.
pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    text1: String,
    #[serde(default)]
    text2: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "chatInput", default)]
    chat_input: String,
    #[serde(default)]
    context: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    text: String,
}

/// POST /extract_text - multipart file upload to plain text.
pub async fn extract_text(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("file") {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    match field.bytes().await {
                        Ok(bytes) => {
                            upload = Some((file_name, bytes.to_vec()));
                            break;
                        }
                        Err(e) => {
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                format!("Failed to read file: {e}"),
                            )
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, format!("Malformed upload: {e}"))
            }
        }
    }

    let Some((file_name, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    };
    if file_name.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded");
    }

    // Extraction shells out and blocks; keep it off the async workers.
    let orchestrator = state.orchestrator.clone();
    let extracted =
        tokio::task::spawn_blocking(move || orchestrator.extract_text(&file_name, &bytes)).await;

    match extracted {
        Ok(Ok(text)) => Json(ExtractResponse { text }).into_response(),
        Ok(Err(err)) => extraction_error_response(err),
        Err(join_error) => {
            error!(error = %join_error, "extraction task failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "File processing failed")
        }
    }
}

fn extraction_error_response(err: ExtractionError) -> Response {
    match err {
        ExtractionError::UnsupportedFormat(_) | ExtractionError::EmptyDocument => {
            error_response(StatusCode::BAD_REQUEST, err.to_string())
        }
        ExtractionError::ToolNotFound(_)
        | ExtractionError::ExtractionFailed(_)
        | ExtractionError::Io(_) => {
            error!(error = %err, "text extraction failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("File processing failed: {err}"),
            )
        }
    }
}

/// POST /analyze_document - structured analysis of one document.
pub async fn analyze_document(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Response {
    match state.orchestrator.analyze_document(&request.text).await {
        Ok(result) => Json(result).into_response(),
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

/// POST /compare_documents - structured comparison of two documents.
pub async fn compare_documents(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> Response {
    match state
        .orchestrator
        .compare_documents(&request.text1, &request.text2)
        .await
    {
        Ok(result) => Json(result).into_response(),
        Err(err) => error_response(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

/// POST /chatbot - context-aware chat. Backend failures surface as a fixed
/// apology with HTTP 200, never as an error status.
pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if request.chat_input.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No chat input provided");
    }

    let reply = state
        .orchestrator
        .chat(&request.chat_input, &request.context)
        .await;
    Json(ChatReply { reply }).into_response()
}

/// Admission gate in front of the model-backed endpoints.
pub async fn admission_gate(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let caller = caller_key(&request);
    if state.rate_limiter.try_acquire(&caller).await {
        next.run(request).await
    } else {
        error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again later.",
        )
    }
}

/// Quota key: first X-Forwarded-For entry when present, else peer address.
fn caller_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
