use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ANONYMOUS_USER: &str = "anonymous";

/// Caller identity as seen by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USER)
    }

    /// The user id, or `anonymous` when it is blank.
    pub fn effective_id(&self) -> &str {
        let id = self.user_id.trim();
        if id.is_empty() { ANONYMOUS_USER } else { id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl Citation {
    /// Lenient conversion from a backend citation record. Missing or
    /// non-string fields are dropped; the title falls back to "Document".
    pub fn from_record(record: &Map<String, Value>) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        Self {
            title: text("title")
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| "Document".to_string()),
            url: text("url"),
            snippet: text("snippet"),
            confidence: record.get("confidence").and_then(Value::as_f64),
        }
    }
}

/// One assistant reply as returned to the HTTP caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply_text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ChatResponse {
    /// Reply with no citations whose metadata names the answering agent.
    pub fn from_agent(agent: &str, reply_text: impl Into<String>) -> Self {
        let mut metadata = Map::new();
        metadata.insert("agent".into(), Value::String(agent.to_string()));
        Self {
            reply_text: reply_text.into(),
            citations: Vec::new(),
            metadata,
        }
    }

    #[must_use]
    pub fn with_error(mut self, kind: &str) -> Self {
        self.metadata
            .insert("error".into(), Value::String(kind.to_string()));
        self
    }

    #[must_use]
    pub fn with_citations(mut self, citations: Vec<Citation>) -> Self {
        self.citations = citations;
        self
    }

    pub fn agent(&self) -> Option<&str> {
        self.metadata.get("agent").and_then(Value::as_str)
    }

    pub fn route(&self) -> Option<&str> {
        self.metadata.get("route").and_then(Value::as_str)
    }
}
