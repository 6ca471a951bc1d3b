pub mod dispatch;

use crate::backends::{RAG_ANSWER_INSTRUCTION, RagClient, WorkdayClient};
use crate::chat::TurnOrchestrator;
use crate::config::Config;
use crate::llm::{LlmAgent, Provider, create_provider};
use crate::routing::{LlmRouter, ROUTER_INSTRUCTION};
use crate::session::open_store;
use anyhow::Result;
use std::sync::Arc;

pub const ROUTER_AGENT_NAME: &str = "askhr_router";
pub const ANSWER_AGENT_NAME: &str = "askhr_rag_answer";

/// Router agent over `provider` using the `[llm]` router settings.
pub fn build_llm_router(config: &Config, provider: Arc<dyn Provider>) -> LlmRouter {
    let agent = LlmAgent::new(
        ROUTER_AGENT_NAME,
        ROUTER_INSTRUCTION,
        config.llm.router_model.clone(),
        config.llm.router_temperature,
        provider,
    );
    LlmRouter::new(agent, config.llm.history_window)
}

/// Wire provider, session store, router and both backends from config.
pub async fn build_orchestrator(config: &Config) -> Result<Arc<TurnOrchestrator>> {
    let provider = create_provider(&config.llm)?;
    let store = open_store(config).await?;

    let answer_agent = LlmAgent::new(
        ANSWER_AGENT_NAME,
        RAG_ANSWER_INSTRUCTION,
        config.llm.answer_model.clone(),
        config.llm.answer_temperature,
        Arc::clone(&provider),
    );
    let rag = RagClient::new(
        &config.backends.rag_service_url,
        config.backends.rag_timeout_secs,
        answer_agent,
    );
    let workday = WorkdayClient::new(
        &config.backends.workday_tools_url,
        config.backends.workday_timeout_secs,
    );

    tracing::debug!(
        provider = provider.name(),
        router_model = %config.llm.router_model,
        answer_model = %config.llm.answer_model,
        "orchestrator assembled"
    );

    Ok(Arc::new(TurnOrchestrator::new(
        store,
        build_llm_router(config, provider),
        Arc::new(rag),
        Arc::new(workday),
    )))
}
