//! Web server for the document analysis service.
//!
//! Wires the orchestrator and the admission gate into an axum router.
//! Everything in [`AppState`] is built once at startup and injected;
//! there is no teardown.

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Settings;
use crate::llm::LlmClient;
use crate::rate_limit::RateLimiter;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<AnalysisOrchestrator>,
    pub rate_limiter: Arc<RateLimiter>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        let client = Arc::new(LlmClient::new(settings.llm.clone()));
        Self {
            orchestrator: Arc::new(AnalysisOrchestrator::new(client)),
            rate_limiter: Arc::new(RateLimiter::new(settings.rate_limit.clone())),
            max_upload_bytes: settings.max_upload_mb * 1024 * 1024,
        }
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
