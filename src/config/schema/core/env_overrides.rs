use super::Config;
use crate::config::{LlmProviderKind, SessionBackend};

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("ASKHR_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
            && !key.is_empty()
        {
            self.llm.api_key = Some(key);
        }

        if let Ok(provider) = std::env::var("ASKHR_LLM_PROVIDER") {
            match provider.trim() {
                "gemini" => self.llm.provider = LlmProviderKind::Gemini,
                "openai-compatible" => self.llm.provider = LlmProviderKind::OpenaiCompatible,
                "" => {}
                other => tracing::warn!("Ignoring unknown ASKHR_LLM_PROVIDER '{other}'"),
            }
        }

        if let Ok(model) = std::env::var("ASKHR_ROUTER_MODEL")
            && !model.is_empty()
        {
            self.llm.router_model = model;
        }

        if let Ok(model) = std::env::var("ASKHR_ANSWER_MODEL")
            && !model.is_empty()
        {
            self.llm.answer_model = model;
        }

        if let Ok(url) = std::env::var("RAG_SERVICE_URL")
            && !url.is_empty()
        {
            self.backends.rag_service_url = url;
        }

        if let Ok(url) = std::env::var("WORKDAY_TOOLS_URL")
            && !url.is_empty()
        {
            self.backends.workday_tools_url = url;
        }

        if let Ok(secs) = std::env::var("WORKDAY_TOOLS_TIMEOUT_SECONDS")
            && let Ok(secs) = secs.parse::<u64>()
        {
            self.backends.workday_timeout_secs = secs;
        }

        if let Ok(port_str) =
            std::env::var("ASKHR_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Ok(host) = std::env::var("ASKHR_GATEWAY_HOST").or_else(|_| std::env::var("HOST"))
            && !host.is_empty()
        {
            self.gateway.host = host;
        }

        if let Ok(backend) = std::env::var("ASKHR_SESSION_BACKEND") {
            match backend.trim() {
                "memory" => self.session.backend = SessionBackend::Memory,
                "sqlite" => self.session.backend = SessionBackend::Sqlite,
                "" => {}
                other => tracing::warn!("Ignoring unknown ASKHR_SESSION_BACKEND '{other}'"),
            }
        }

        if let Ok(level) = std::env::var("ASKHR_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }
    }
}
