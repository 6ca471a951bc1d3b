//! Google Gemini `generateContent` provider (text only).

use crate::error::LlmError;
use crate::llm::{
    build_provider_client, sanitize_api_error,
    traits::Provider,
    types::{MessageRole, ProviderMessage},
};
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MAX_OUTPUT_TOKENS: u32 = 8192;

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Falls back to `GEMINI_API_KEY`, then `GOOGLE_API_KEY`, when no key is given.
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_provider_client(),
        }
    }

    fn model_path(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            LlmError::MissingApiKey {
                provider: "gemini".into(),
            }
            .into()
        })
    }

    fn build_request(
        system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        temperature: f64,
    ) -> GenerateContentRequest {
        let contents = messages
            .iter()
            .map(|message| Content {
                role: Some(
                    match message.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: vec![Part::text(message.content.clone())],
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: system_prompt.map(|system| Content {
                role: None,
                parts: vec![Part::text(system)],
            }),
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn extract_text(result: &GenerateContentResponse) -> anyhow::Result<String> {
        let text = result
            .candidates
            .as_ref()
            .and_then(|candidates| candidates.first())
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| part.thought != Some(true))
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: "gemini".into(),
            }
            .into());
        }
        Ok(text)
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> anyhow::Result<String> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/{}:generateContent?key={api_key}",
            self.base_url,
            Self::model_path(model)
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                anyhow::anyhow!(
                    "Gemini request failed: {}",
                    sanitize_api_error(&err.to_string())
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {}", sanitize_api_error(&body));
        }

        let result: GenerateContentResponse = response.json().await?;
        if let Some(err) = result.error.as_ref() {
            anyhow::bail!("Gemini API error: {}", sanitize_api_error(&err.message));
        }

        Self::extract_text(&result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn chat_with_history<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = Self::build_request(system_prompt, messages, temperature);
            self.generate(model, &request).await
        })
    }
}
