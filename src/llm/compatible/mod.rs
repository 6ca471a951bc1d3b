//! Any endpoint that speaks the OpenAI `chat/completions` dialect.

use crate::llm::{
    api_error, build_provider_client,
    traits::Provider,
    types::ProviderMessage,
};
use anyhow::Context;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

mod types;
use types::{ChatCompletion, ChatRequest, Message};

pub struct OpenAiCompatibleProvider {
    name: String,
    api_key: Option<String>,
    chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let chat_url = if base_url.ends_with("chat/completions") {
            base_url.clone()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: name.to_string(),
            api_key: api_key
                .filter(|key| !key.trim().is_empty())
                .map(ToString::to_string),
            chat_url,
            client: build_provider_client(),
        }
    }

    fn build_request(
        system_prompt: Option<&str>,
        messages: &[ProviderMessage],
        model: &str,
        temperature: f64,
    ) -> ChatRequest {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if let Some(system) = system_prompt {
            wire.push(Message {
                role: "system",
                content: system.to_string(),
            });
        }
        wire.extend(messages.iter().map(|message| Message {
            role: message.role.as_str(),
            content: message.content.clone(),
        }));

        ChatRequest {
            model: model.to_string(),
            messages: wire,
            temperature,
        }
    }

    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<String> {
        let mut builder = self.client.post(&self.chat_url).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("{} chat completions request failed", self.name))?;

        if !response.status().is_success() {
            return Err(api_error(&self.name, response).await);
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .with_context(|| format!("{} chat completions JSON decode failed", self.name))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| anyhow::anyhow!("No response from {}", self.name))
    }
}

impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn chat_with_history<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let request = Self::build_request(system_prompt, messages, model, temperature);
            self.complete(&request).await
        })
    }
}
