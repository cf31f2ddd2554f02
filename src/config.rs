//! Process configuration.
//!
//! Settings come from an optional TOML file; the analysis backend section
//! additionally honors environment overrides, so deployments can swap the
//! backend without touching the file.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::llm::LlmConfig;
use crate::rate_limit::RateLimitConfig;

/// Top-level service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Bind address used by `serve` when none is given on the command line.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Upload size cap, in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_max_upload_mb() -> usize {
    25
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_mb: default_max_upload_mb(),
            llm: LlmConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional TOML file, then apply environment
    /// overrides to the backend section.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut settings = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .with_context(|| format!("reading config file {}", p.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("parsing config file {}", p.display()))?
            }
            None => Self::default(),
        };
        settings.llm = settings.llm.with_env_overrides();
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let settings = Settings::default();
        assert_eq!(settings.bind, "127.0.0.1:5000");
        assert_eq!(settings.max_upload_mb, 25);
        assert!(settings.rate_limit.enabled);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            bind = "0.0.0.0:8080"

            [llm]
            model = "llama3.1:70b"
            "#,
        )
        .unwrap();
        assert_eq!(settings.bind, "0.0.0.0:8080");
        assert_eq!(settings.llm.model, "llama3.1:70b");
        assert_eq!(settings.max_upload_mb, 25);
        assert_eq!(settings.rate_limit.max_requests, 30);
    }
}
