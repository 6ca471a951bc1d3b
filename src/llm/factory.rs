use super::compatible::OpenAiCompatibleProvider;
use super::gemini::{DEFAULT_GEMINI_BASE_URL, GeminiProvider};
use super::traits::Provider;
use crate::config::{LlmConfig, LlmProviderKind};
use crate::error::LlmError;
use std::sync::Arc;

fn explicit_key(config: &LlmConfig) -> Option<&str> {
    config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
}

/// Build the provider selected by `[llm]`. A missing Gemini key is not fatal
/// here; calls fail later and the router falls back to keyword routing.
pub fn create_provider(config: &LlmConfig) -> anyhow::Result<Arc<dyn Provider>> {
    let provider: Arc<dyn Provider> = match config.provider {
        LlmProviderKind::Gemini => {
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_GEMINI_BASE_URL);
            Arc::new(GeminiProvider::with_base_url(explicit_key(config), base_url))
        }
        LlmProviderKind::OpenaiCompatible => {
            let base_url = config
                .base_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .ok_or_else(|| LlmError::MissingBaseUrl {
                    provider: config.provider.to_string(),
                })?;
            Arc::new(OpenAiCompatibleProvider::new(
                "openai-compatible",
                base_url,
                explicit_key(config),
            ))
        }
    };

    tracing::debug!(provider = provider.name(), "LLM provider ready");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_gemini() {
        let provider = create_provider(&LlmConfig::default()).unwrap();
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn compatible_requires_base_url() {
        let config = LlmConfig {
            provider: LlmProviderKind::OpenaiCompatible,
            ..LlmConfig::default()
        };
        let err = create_provider(&config).err().unwrap();
        assert!(err.to_string().contains("openai-compatible"));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn compatible_with_base_url_builds() {
        let config = LlmConfig {
            provider: LlmProviderKind::OpenaiCompatible,
            base_url: Some("http://localhost:11434/v1".into()),
            ..LlmConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai-compatible");
    }

    #[test]
    fn blank_api_key_is_ignored() {
        let config = LlmConfig {
            api_key: Some("   ".into()),
            ..LlmConfig::default()
        };
        assert!(explicit_key(&config).is_none());
    }
}
