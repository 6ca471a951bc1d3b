use crate::routing::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reply seeded into every new session and returned for a first-turn greeting.
pub const GREETING: &str = "Hello! I'm the AskHR agent for Michaels.";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One history entry. Assistant turns carry the route that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
            route: None,
        }
    }

    pub fn assistant(text: impl Into<String>, route: Option<Route>) -> Self {
        Self {
            role: TurnRole::Assistant,
            text: text.into(),
            route,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub history: Vec<Turn>,
    pub last_route: Option<Route>,
    pub awaiting_workday: bool,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Fresh session seeded with the assistant greeting.
    pub fn seeded(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            history: vec![Turn::assistant(GREETING, None)],
            last_route: None,
            awaiting_workday: false,
            created_at: Utc::now(),
        }
    }

    /// True once the user has said anything; the seeded greeting does not count.
    pub fn has_user_turns(&self) -> bool {
        self.history.iter().any(|turn| turn.role == TurnRole::User)
    }
}
