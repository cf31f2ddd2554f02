//! Fixed-window admission control for the model-backed endpoints.
//!
//! Each caller gets a fixed quota per time window, counted in process
//! memory. The gate sits in front of the orchestrator; nothing inside the
//! pipeline knows it exists.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

/// Quota configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Requests allowed per caller per window.
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,
    /// Window length in seconds.
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_requests() -> u32 {
    30
}

fn default_window_secs() -> u64 {
    60
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Per-caller fixed-window request counter.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    windows: RwLock<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Returns true when the caller still has quota in the current window
    /// and records the request; false means the request must be refused.
    pub async fn try_acquire(&self, caller: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let window = Duration::from_secs(self.config.window_secs);
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        // Opportunistic cleanup keeps the map bounded by active callers.
        if windows.len() > 1024 {
            windows.retain(|_, w| now.duration_since(w.started) < window);
        }

        let state = windows.entry(caller.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(state.started) >= window {
            state.started = now;
            state.count = 0;
        }

        if state.count < self.config.max_requests {
            state.count += 1;
            true
        } else {
            debug!(caller, "rate limit exceeded");
            false
        }
    }
}
