use super::types::{ChatResponse, UserContext};
use crate::backends::ChatBackend;
use crate::error::{Result, SessionError};
use crate::routing::{LlmRouter, Route, RouteDecision, is_greeting, looks_like_workday_followup};
use crate::session::{GREETING, Session, SessionStore, Turn};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

const RETURNING_GREETING: &str = "How can I help you today?";

/// Per-message decision flow: greeting short-circuit, forced Workday
/// follow-up, LLM routing, backend dispatch and session bookkeeping.
pub struct TurnOrchestrator {
    store: Arc<dyn SessionStore>,
    router: LlmRouter,
    rag: Arc<dyn ChatBackend>,
    workday: Arc<dyn ChatBackend>,
    turn_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl TurnOrchestrator {
    pub fn new(
        store: Arc<dyn SessionStore>,
        router: LlmRouter,
        rag: Arc<dyn ChatBackend>,
        workday: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            store,
            router,
            rag,
            workday,
            turn_locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn create_session(
        &self,
        user: &UserContext,
        initial_message: Option<&str>,
    ) -> Result<Session> {
        let session = self.store.create_session(user.effective_id()).await?;
        tracing::info!(
            session_id = %session.id,
            user_id = user.effective_id(),
            has_initial_message = initial_message.is_some(),
            "session created"
        );
        Ok(session)
    }

    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()).into())
    }

    /// Produce the reply for one message without touching stored state.
    pub async fn route_and_process(
        &self,
        query: &str,
        user: &UserContext,
        session: &Session,
    ) -> ChatResponse {
        if is_greeting(query) {
            let reply = if session.has_user_turns() {
                RETURNING_GREETING
            } else {
                GREETING
            };
            return ChatResponse::from_agent("system", reply);
        }

        let user_id = user.effective_id();
        let decision = if session.awaiting_workday && looks_like_workday_followup(query) {
            tracing::info!(session_id = %session.id, "forcing workday route for follow-up");
            RouteDecision::workday_followup()
        } else {
            self.router
                .decide_route(query, user_id, &session.id, &session.history)
                .await
        };

        let backend = match decision.route {
            Route::Workday => &self.workday,
            Route::Rag => &self.rag,
        };
        tracing::debug!(session_id = %session.id, backend = backend.name(), "dispatching turn");
        let mut response = backend.handle(query, &session.id, user_id).await;
        merge_route_metadata(&mut response, &decision);
        response
    }

    /// Run one turn against a stored session and record it.
    ///
    /// Every exchange is appended to history, greetings included. Route state
    /// only changes when the reply carries a route.
    pub async fn handle_message(
        &self,
        session_id: &str,
        content: &str,
        user: &UserContext,
    ) -> Result<ChatResponse> {
        self.get_session(session_id).await?;

        let lock = self.turn_lock(session_id);
        let result = {
            let _turn = lock.lock().await;
            self.run_turn(session_id, content, user).await
        };
        self.release_turn_lock(session_id, &lock);
        result
    }

    async fn run_turn(
        &self,
        session_id: &str,
        content: &str,
        user: &UserContext,
    ) -> Result<ChatResponse> {
        let session = self.get_session(session_id).await?;
        let response = self.route_and_process(content, user, &session).await;
        let route = response.route().and_then(|raw| raw.parse::<Route>().ok());

        self.store
            .append_turn(session_id, Turn::user(content))
            .await?;
        self.store
            .append_turn(session_id, Turn::assistant(response.reply_text.clone(), route))
            .await?;

        if let Some(route) = route {
            let awaiting = route == Route::Workday && response.reply_text.contains('?');
            self.store
                .update_route_state(session_id, Some(route), awaiting)
                .await?;
            tracing::debug!(session_id, %route, awaiting_workday = awaiting, "route state updated");
        }

        Ok(response)
    }

    fn turn_lock(&self, session_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.turn_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(session_id.to_string())
            .or_default()
            .clone()
    }

    /// Drop the map entry once no other turn holds or waits on it.
    fn release_turn_lock(&self, session_id: &str, lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut locks = self
            .turn_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(lock) == 2
            && locks
                .get(session_id)
                .is_some_and(|entry| Arc::ptr_eq(entry, lock))
        {
            locks.remove(session_id);
        }
    }
}

/// Shallow-merge routing keys into the backend metadata; routing keys win.
fn merge_route_metadata(response: &mut ChatResponse, decision: &RouteDecision) {
    let metadata = &mut response.metadata;
    metadata.insert("route".into(), Value::String(decision.route.to_string()));
    metadata.insert(
        "route_reason".into(),
        decision
            .reason
            .clone()
            .map_or(Value::Null, Value::String),
    );
    metadata.insert(
        "route_confidence".into(),
        decision
            .confidence
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
    );
}
