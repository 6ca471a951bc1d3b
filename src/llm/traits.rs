use super::types::ProviderMessage;
use std::future::Future;
use std::pin::Pin;

/// Text-in / text-out language model backend.
pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "gemini", "openai-compatible").
    fn name(&self) -> &str;

    /// One completion over `messages`, oldest first, with an optional system prompt.
    fn chat_with_history<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        messages: &'a [ProviderMessage],
        model: &'a str,
        temperature: f64,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}
