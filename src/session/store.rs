use super::types::{Session, Turn};
use crate::error::SessionError;
use crate::routing::Route;
use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Async session persistence contract.
///
/// `get_session` reports a missing id as `Ok(None)`; mutating calls on a
/// missing id fail with [`SessionError::NotFound`].
pub trait SessionStore: Send + Sync {
    fn create_session<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>>;

    fn get_session<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Session>>> + Send + 'a>>;

    fn append_turn<'a>(
        &'a self,
        id: &'a str,
        turn: Turn,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    fn update_route_state<'a>(
        &'a self,
        id: &'a str,
        last_route: Option<Route>,
        awaiting_workday: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Process-lifetime store. Nothing is evicted.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_found(id: &str) -> anyhow::Error {
    SessionError::NotFound(id.to_string()).into()
}

impl SessionStore for InMemorySessionStore {
    fn create_session<'a>(
        &'a self,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Session>> + Send + 'a>> {
        Box::pin(async move {
            let session = Session::seeded(Uuid::new_v4().to_string(), user_id);
            self.sessions
                .write()
                .await
                .insert(session.id.clone(), session.clone());
            Ok(session)
        })
    }

    fn get_session<'a>(
        &'a self,
        id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Session>>> + Send + 'a>> {
        Box::pin(async move { Ok(self.sessions.read().await.get(id).cloned()) })
    }

    fn append_turn<'a>(
        &'a self,
        id: &'a str,
        turn: Turn,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
            session.history.push(turn);
            Ok(())
        })
    }

    fn update_route_state<'a>(
        &'a self,
        id: &'a str,
        last_route: Option<Route>,
        awaiting_workday: bool,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut sessions = self.sessions.write().await;
            let session = sessions.get_mut(id).ok_or_else(|| not_found(id))?;
            session.last_route = last_route;
            session.awaiting_workday = awaiting_workday;
            Ok(())
        })
    }
}
