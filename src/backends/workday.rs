use super::ChatBackend;
use crate::chat::{ChatResponse, Citation};
use crate::error::BackendError;
use crate::llm::{build_provider_client_with_timeout, sanitize_api_error};
use reqwest::Client;
use serde_json::{Map, Value};
use std::future::Future;
use std::pin::Pin;

const UNAVAILABLE_REPLY: &str = "Workday service is unavailable right now. Please try again.";
const EMPTY_REPLY: &str = "I couldn't complete that Workday request. Please try again.";
const AGENT: &str = "workday";

/// Client for the Workday tools service (`POST /chat {"message"}`).
pub struct WorkdayClient {
    chat_url: String,
    client: Client,
}

impl WorkdayClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        Self {
            chat_url: format!("{}/chat", base_url.trim_end_matches('/')),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    pub async fn chat(&self, query: &str) -> ChatResponse {
        match self.send(query).await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(error = %err, "Workday tools call failed");
                let kind = match err {
                    BackendError::Status { .. } => "service_error",
                    BackendError::Transport { .. } => "exception",
                };
                ChatResponse::from_agent(AGENT, UNAVAILABLE_REPLY).with_error(kind)
            }
        }
    }

    async fn send(&self, query: &str) -> Result<ChatResponse, BackendError> {
        let transport = |err: reqwest::Error| BackendError::Transport {
            service: AGENT,
            message: sanitize_api_error(&err.to_string()),
        };

        let response = self
            .client
            .post(&self.chat_url)
            .json(&serde_json::json!({ "message": query }))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %sanitize_api_error(&body),
                "Workday tools error response"
            );
            return Err(BackendError::Status {
                service: AGENT,
                status: status.as_u16(),
            });
        }

        let body: Value = response.json().await.map_err(transport)?;
        Ok(parse_reply(&body))
    }
}

impl ChatBackend for WorkdayClient {
    fn name(&self) -> &str {
        AGENT
    }

    fn handle<'a>(
        &'a self,
        query: &'a str,
        _session_id: &'a str,
        _user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ChatResponse> + Send + 'a>> {
        Box::pin(self.chat(query))
    }
}

/// Accept either the tools-server shape `{"response": "..."}` or a
/// `ChatResponse`-shaped object. `agent` is always forced to `workday`.
fn parse_reply(body: &Value) -> ChatResponse {
    let text = body
        .get("reply_text")
        .or_else(|| body.get("response"))
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    let citations = body
        .get("citations")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(Citation::from_record)
                .collect()
        })
        .unwrap_or_default();

    let mut metadata = body
        .get("metadata")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    metadata.insert("agent".into(), Value::String(AGENT.into()));

    ChatResponse {
        reply_text: if text.is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            text.to_string()
        },
        citations,
        metadata,
    }
}
