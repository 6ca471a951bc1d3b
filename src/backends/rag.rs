use super::ChatBackend;
use crate::chat::{ChatResponse, Citation};
use crate::error::BackendError;
use crate::llm::{LlmAgent, build_provider_client_with_timeout, sanitize_api_error};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;

pub const RAG_ANSWER_INSTRUCTION: &str = r#"You are the AskHR agent for Michaels.

Use only the provided context to answer the question.
If the context does not contain the answer, say: "I cannot find the information in the provided documents."
"#;

pub const NOT_FOUND_REPLY: &str = "I cannot find the information in the provided documents.";
const UNAVAILABLE_REPLY: &str = "RAG service is unavailable right now. Please try again.";
const AGENT: &str = "rag";

struct Retrieved {
    contexts: Vec<String>,
    citations: Vec<Citation>,
}

/// Client for the retrieval service plus the grounded-answer model call.
pub struct RagClient {
    retrieve_url: String,
    client: Client,
    answer_agent: LlmAgent,
}

impl RagClient {
    pub fn new(base_url: &str, timeout_secs: u64, answer_agent: LlmAgent) -> Self {
        Self {
            retrieve_url: format!("{}/api/v1/rag/retrieve", base_url.trim_end_matches('/')),
            client: build_provider_client_with_timeout(timeout_secs),
            answer_agent,
        }
    }

    pub async fn query(&self, text: &str, session_id: &str, user_id: &str) -> ChatResponse {
        let retrieved = match self.retrieve(text).await {
            Ok(retrieved) => retrieved,
            Err(err) => {
                let kind = match err {
                    BackendError::Status { .. } => "service_error",
                    BackendError::Transport { .. } => "exception",
                };
                tracing::error!(session_id, error = %err, "RAG retrieval failed");
                return ChatResponse::from_agent(AGENT, UNAVAILABLE_REPLY).with_error(kind);
            }
        };

        if retrieved.contexts.is_empty() {
            tracing::info!(session_id, "RAG retrieval returned no context");
            return ChatResponse::from_agent(AGENT, NOT_FOUND_REPLY)
                .with_citations(retrieved.citations);
        }

        let prompt = build_answer_prompt(text, &retrieved.contexts);
        let reply = match self.answer_agent.run(session_id, &prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    session_id,
                    user_id,
                    error = %format!("{err:#}"),
                    "RAG answer model call failed"
                );
                String::new()
            }
        };
        let reply = if reply.trim().is_empty() {
            NOT_FOUND_REPLY.to_string()
        } else {
            reply
        };

        ChatResponse::from_agent(AGENT, reply).with_citations(retrieved.citations)
    }

    async fn retrieve(&self, text: &str) -> Result<Retrieved, BackendError> {
        let transport = |err: reqwest::Error| BackendError::Transport {
            service: AGENT,
            message: sanitize_api_error(&err.to_string()),
        };

        let response = self
            .client
            .post(&self.retrieve_url)
            .json(&serde_json::json!({ "query": text }))
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %sanitize_api_error(&body),
                "RAG service error"
            );
            return Err(BackendError::Status {
                service: AGENT,
                status: status.as_u16(),
            });
        }

        let data: Value = response.json().await.map_err(transport)?;
        Ok(Retrieved {
            contexts: normalize_contexts(data.get("contexts")),
            citations: normalize_citations(data.get("citations")),
        })
    }
}

impl ChatBackend for RagClient {
    fn name(&self) -> &str {
        AGENT
    }

    fn handle<'a>(
        &'a self,
        query: &'a str,
        session_id: &'a str,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ChatResponse> + Send + 'a>> {
        Box::pin(self.query(query, session_id, user_id))
    }
}

pub fn build_answer_prompt(query: &str, contexts: &[String]) -> String {
    format!(
        "Question:\n{query}\n\nContext:\n{}",
        contexts.join("\n\n")
    )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn context_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Flatten the retrieval `contexts` field, which arrives as a list, a map
/// of id to passage, or a single string.
pub fn normalize_contexts(contexts: Option<&Value>) -> Vec<String> {
    match contexts {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| is_truthy(item))
            .map(context_text)
            .collect(),
        Some(Value::Object(map)) => map
            .values()
            .filter(|item| is_truthy(item))
            .map(context_text)
            .collect(),
        Some(Value::String(text)) if !text.is_empty() => vec![text.clone()],
        _ => Vec::new(),
    }
}

pub fn normalize_citations(citations: Option<&Value>) -> Vec<Citation> {
    match citations {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(Citation::from_record)
            .collect(),
        Some(Value::Object(record)) if !record.is_empty() => vec![Citation::from_record(record)],
        _ => Vec::new(),
    }
}
