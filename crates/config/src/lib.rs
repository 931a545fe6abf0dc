//! Configuration loading and validation for youthdesk.
//!
//! Loads configuration from a `config.toml` with environment variable
//! overrides for secrets (`YOUTHDESK_API_KEY`). Validates all settings
//! at startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure. Maps directly to `config.toml`.
#[derive(Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Gateway (HTTP) configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Ask-path configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Search-path configuration
    #[serde(default)]
    pub search: SearchConfig,

    /// Persistence configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Generation backend configuration
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("gateway", &self.gateway)
            .field("chat", &self.chat)
            .field("search", &self.search)
            .field("store", &self.store)
            .field("generator", &self.generator)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// How many recent question/answer pairs feed the prompt.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

fn default_history_window() -> usize {
    3
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of records returned per search.
    #[serde(default = "default_result_cap")]
    pub result_cap: usize,

    /// Description truncation length (characters) in projected results.
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
}

fn default_result_cap() -> usize {
    50
}
fn default_summary_chars() -> usize {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_cap: default_result_cap(),
            summary_chars: default_summary_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// "sqlite" or "memory".
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// SQLite database path (ignored by the memory backend).
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_backend() -> String {
    "sqlite".into()
}
fn default_store_path() -> String {
    "youthdesk.db".into()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// "openai_compat" or "stub".
    #[serde(default = "default_generator_provider")]
    pub provider: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_generator_provider() -> String {
    "openai_compat".into()
}
fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: default_generator_provider(),
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from a toml file, then apply environment
    /// overrides. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment overrides — secrets never have to live in the file.
    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("YOUTHDESK_API_KEY") {
            if !key.is_empty() {
                self.generator.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("YOUTHDESK_API_URL") {
            if !url.is_empty() {
                self.generator.api_url = url;
            }
        }
        if let Ok(path) = std::env::var("YOUTHDESK_DB_PATH") {
            if !path.is_empty() {
                self.store.path = path;
            }
        }
    }

    /// Validate settings that would otherwise fail deep inside a request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.backend.as_str() {
            "sqlite" | "memory" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown store backend '{other}' — use 'sqlite' or 'memory'"
                )));
            }
        }
        match self.generator.provider.as_str() {
            "openai_compat" | "stub" => {}
            other => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown generator provider '{other}' — use 'openai_compat' or 'stub'"
                )));
            }
        }
        if self.chat.history_window == 0 {
            return Err(ConfigError::Invalid(
                "chat.history_window must be at least 1".into(),
            ));
        }
        if self.search.result_cap == 0 {
            return Err(ConfigError::Invalid(
                "search.result_cap must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chat.history_window, 3);
        assert_eq!(config.search.result_cap, 50);
        assert_eq!(config.search.summary_chars, 100);
    }

    #[test]
    fn loads_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[gateway]\nport = 9001\n\n[chat]\nhistory_window = 5"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.gateway.port, 9001);
        assert_eq!(config.chat.history_window, 5);
        // Untouched sections keep their defaults
        assert_eq!(config.store.backend, "sqlite");
    }

    #[test]
    fn rejects_unknown_backend() {
        let config = AppConfig {
            store: StoreConfig {
                backend: "mongodb".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GeneratorConfig {
            api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
