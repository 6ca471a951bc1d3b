use super::traits::Provider;
use super::types::ProviderMessage;
use crate::error::LlmError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Turns kept per context before the oldest pair is dropped.
const MAX_CONTEXT_MESSAGES: usize = 20;

/// A named instruction + model pair that remembers prior exchanges per
/// context id, so follow-up calls in the same context see earlier turns.
pub struct LlmAgent {
    name: String,
    instruction: String,
    model: String,
    temperature: f64,
    provider: Arc<dyn Provider>,
    contexts: Mutex<HashMap<String, Vec<ProviderMessage>>>,
}

impl LlmAgent {
    pub fn new(
        name: impl Into<String>,
        instruction: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        provider: Arc<dyn Provider>,
    ) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            model: model.into(),
            temperature,
            provider,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Send `text` in `context_id` and return the model's reply.
    /// Failed calls leave the context untouched.
    pub async fn run(&self, context_id: &str, text: &str) -> anyhow::Result<String> {
        let mut messages = self
            .contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(context_id)
            .cloned()
            .unwrap_or_default();
        messages.push(ProviderMessage::user(text));

        let reply = self
            .provider
            .chat_with_history(
                Some(&self.instruction),
                &messages,
                &self.model,
                self.temperature,
            )
            .await
            .map_err(|err| LlmError::Request {
                provider: self.provider.name().to_string(),
                message: format!("{err:#}"),
            })?;

        if reply.trim().is_empty() {
            return Err(LlmError::EmptyResponse {
                provider: self.provider.name().to_string(),
            }
            .into());
        }

        tracing::debug!(
            agent = %self.name,
            context = context_id,
            reply_chars = reply.len(),
            "agent reply"
        );

        messages.push(ProviderMessage::assistant(reply.clone()));
        if messages.len() > MAX_CONTEXT_MESSAGES {
            let excess = messages.len() - MAX_CONTEXT_MESSAGES;
            messages.drain(..excess);
        }
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(context_id.to_string(), messages);

        Ok(reply)
    }

    pub fn forget(&self, context_id: &str) {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(context_id);
    }

    #[cfg(test)]
    pub(crate) fn context_len(&self, context_id: &str) -> usize {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(context_id)
            .map_or(0, Vec::len)
    }
}
