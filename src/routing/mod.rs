pub mod intent;
pub mod router;

pub use intent::{is_greeting, looks_like_workday_followup};
pub use router::{LlmRouter, ROUTER_INSTRUCTION, build_prompt, fallback_route, parse_decision};

use serde::{Deserialize, Serialize};

/// Backend a resolved message is dispatched to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Route {
    Rag,
    Workday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub route: Route,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl RouteDecision {
    pub fn new(route: Route, reason: impl Into<String>, confidence: f64) -> Self {
        Self {
            route,
            reason: Some(reason.into()),
            confidence: Some(confidence),
        }
    }

    /// Forced decision for a short answer to a pending Workday question.
    pub fn workday_followup() -> Self {
        Self::new(Route::Workday, "Follow-up to Workday prompt", 1.0)
    }
}
