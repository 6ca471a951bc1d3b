pub mod rag;
pub mod workday;

pub use rag::{NOT_FOUND_REPLY, RAG_ANSWER_INSTRUCTION, RagClient};
pub use workday::WorkdayClient;

use crate::chat::ChatResponse;
use std::future::Future;
use std::pin::Pin;

/// A downstream service that turns one user query into a reply.
///
/// Implementations never fail: upstream errors are folded into a degraded
/// `ChatResponse` whose metadata carries an `error` tag.
pub trait ChatBackend: Send + Sync {
    fn name(&self) -> &str;

    fn handle<'a>(
        &'a self,
        query: &'a str,
        session_id: &'a str,
        user_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = ChatResponse> + Send + 'a>>;
}
