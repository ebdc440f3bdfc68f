//! LLM provider implementations for ChatRelay.
//!
//! The only concrete backend is the OpenAI-compatible chat-completions
//! protocol, which covers OpenAI itself plus OpenRouter, Ollama, vLLM, and
//! most hosted gateways.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use chatrelay_config::AppConfig;
use chatrelay_core::Provider;
use chatrelay_core::error::ProviderError;
use std::sync::Arc;

/// Build the configured provider.
///
/// Resolves the API key (per-provider section first, then the top-level
/// key) and maps the provider name to a known base URL. Unknown names need
/// an `api_url` in their provider section.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let name = config.default_provider.as_str();
    let api_key = config.api_key_for(name);

    let provider = match name {
        "openai" => OpenAiCompatProvider::openai(require_key(name, api_key)?),
        "openrouter" => OpenAiCompatProvider::openrouter(require_key(name, api_key)?),
        "ollama" => OpenAiCompatProvider::ollama(
            config
                .providers
                .get(name)
                .and_then(|p| p.api_url.as_deref()),
        ),
        other => {
            let url = config
                .providers
                .get(other)
                .and_then(|p| p.api_url.clone())
                .ok_or_else(|| {
                    ProviderError::NotConfigured(format!(
                        "unknown provider '{other}' — set providers.{other}.api_url"
                    ))
                })?;
            OpenAiCompatProvider::new(other, url, require_key(other, api_key)?)
        }
    };

    Ok(Arc::new(provider))
}

fn require_key(provider: &str, key: Option<String>) -> Result<String, ProviderError> {
    key.ok_or_else(|| {
        ProviderError::NotConfigured(format!(
            "no API key for provider '{provider}' — set api_key in config.toml or CHATRELAY_API_KEY"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_config::ProviderConfig;

    #[test]
    fn builds_openai_from_top_level_key() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn missing_key_is_not_configured() {
        let config = AppConfig::default();
        let err = match from_config(&config) {
            Ok(_) => panic!("expected error"),
            Err(e) => e,
        };
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn ollama_needs_no_key() {
        let mut config = AppConfig::default();
        config.default_provider = "ollama".into();
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }

    #[test]
    fn custom_provider_requires_api_url() {
        let mut config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        config.default_provider = "fireworks".into();
        assert!(from_config(&config).is_err());

        config.providers.insert(
            "fireworks".into(),
            ProviderConfig {
                api_key: None,
                api_url: Some("https://api.fireworks.ai/inference/v1".into()),
                default_model: None,
            },
        );
        let provider = from_config(&config).unwrap();
        assert_eq!(provider.name(), "fireworks");
    }
}
