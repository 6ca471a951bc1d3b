use super::{Route, RouteDecision};
use crate::llm::LlmAgent;
use crate::session::Turn;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use uuid::Uuid;

pub const ROUTER_INSTRUCTION: &str = r#"You are the AskHR router for Michaels.

Decide which backend should handle the request:
- route "workday" for time off, leave balances, employment verification letters, or any Workday data/actions.
- route "rag" for policy, benefits, and general HR questions that don't require Workday actions.

Return ONLY JSON:
{"route": "rag" | "workday", "confidence": 0.0-1.0, "reason": "short reason"}
"#;

const FALLBACK_CONFIDENCE: f64 = 0.2;
const FALLBACK_REASON: &str = "Fallback routing";

const WORKDAY_KEYWORDS: [&str; 9] = [
    "leave",
    "time off",
    "pto",
    "sick",
    "vacation",
    "balance",
    "verification",
    "employment letter",
    "workday",
];

static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid json object regex"));

/// Classifies queries as `rag` or `workday` with one model call, degrading
/// to keyword matching whenever the model is unavailable or unparseable.
pub struct LlmRouter {
    agent: LlmAgent,
    history_window: usize,
}

impl LlmRouter {
    pub fn new(agent: LlmAgent, history_window: usize) -> Self {
        Self {
            agent,
            history_window: history_window.max(1),
        }
    }

    pub async fn decide_route(
        &self,
        query: &str,
        user_id: &str,
        session_id: &str,
        history: &[Turn],
    ) -> RouteDecision {
        let context_id = format!("route-{session_id}-{}", Uuid::new_v4());
        let prompt = build_prompt(query, history, self.history_window);

        let reply = match self.agent.run(&context_id, &prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(
                    session_id,
                    user_id,
                    error = %format!("{err:#}"),
                    "router model call failed; using keyword fallback"
                );
                String::new()
            }
        };
        self.agent.forget(&context_id);

        let decision = parse_decision(&reply, query);
        tracing::info!(
            session_id,
            user_id,
            route = %decision.route,
            confidence = ?decision.confidence,
            reason = decision.reason.as_deref().unwrap_or(""),
            "routing decision"
        );
        decision
    }
}

/// The raw query when there is no history, otherwise the last `limit` turns
/// as `role: text` lines followed by the query.
pub fn build_prompt(query: &str, history: &[Turn], limit: usize) -> String {
    if history.is_empty() {
        return query.to_string();
    }

    let start = history.len().saturating_sub(limit);
    let context = history[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.text))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Conversation context:\n{context}\nUser: {query}")
}

fn parse_payload(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<Value>(text).ok().or_else(|| {
        JSON_OBJECT_RE
            .find(text)
            .and_then(|found| serde_json::from_str::<Value>(found.as_str()).ok())
    })
}

/// Parse the model reply into a decision, falling back to keywords from
/// `query` when no valid route can be read.
pub fn parse_decision(text: &str, query: &str) -> RouteDecision {
    if let Some(Value::Object(payload)) = parse_payload(text)
        && let Some(route) = payload
            .get("route")
            .and_then(Value::as_str)
            .and_then(|raw| raw.trim().to_lowercase().parse::<Route>().ok())
    {
        return RouteDecision {
            route,
            reason: payload
                .get("reason")
                .and_then(Value::as_str)
                .map(str::to_string),
            confidence: payload.get("confidence").and_then(Value::as_f64),
        };
    }

    RouteDecision::new(fallback_route(query), FALLBACK_REASON, FALLBACK_CONFIDENCE)
}

pub fn fallback_route(query: &str) -> Route {
    let text = query.to_lowercase();
    if WORKDAY_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        Route::Workday
    } else {
        Route::Rag
    }
}
