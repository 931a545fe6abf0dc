//! Text generation backends for youthdesk.
//!
//! All generators implement the `youthdesk_core::Generator` trait.
//! The builder selects the backend from configuration.

pub mod openai_compat;
pub mod stub;

pub use openai_compat::OpenAiCompatGenerator;
pub use stub::StubGenerator;

use std::sync::Arc;
use youthdesk_config::AppConfig;
use youthdesk_core::Generator;

/// Build the configured generator.
///
/// Falls back to the stub when `openai_compat` is selected without an
/// API key, so a fresh checkout answers locally instead of erroring on
/// every request.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn Generator> {
    match config.generator.provider.as_str() {
        "openai_compat" => match &config.generator.api_key {
            Some(key) => Arc::new(OpenAiCompatGenerator::new(
                &config.generator.api_url,
                key,
                &config.generator.model,
                config.generator.temperature,
            )),
            None => {
                tracing::warn!(
                    "generator.provider is 'openai_compat' but no API key is set — using stub"
                );
                Arc::new(StubGenerator::default())
            }
        },
        _ => Arc::new(StubGenerator::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyless_config_builds_stub() {
        let config = AppConfig::default();
        let generator = build_from_config(&config);
        assert_eq!(generator.name(), "stub");
    }

    #[test]
    fn keyed_config_builds_http_generator() {
        let mut config = AppConfig::default();
        config.generator.api_key = Some("sk-test".into());
        let generator = build_from_config(&config);
        assert_eq!(generator.name(), "openai_compat");
    }
}
