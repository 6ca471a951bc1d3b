use askhr_router::config::{Config, SessionBackend};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ROUTER_MODEL: &str = "router-model";
pub const ANSWER_MODEL: &str = "answer-model";

/// Mock Gemini, retrieval and Workday services for one test.
pub struct Upstream {
    pub gemini: MockServer,
    pub rag: MockServer,
    pub workday: MockServer,
}

impl Upstream {
    pub async fn start() -> Self {
        Self {
            gemini: MockServer::start().await,
            rag: MockServer::start().await,
            workday: MockServer::start().await,
        }
    }

    /// Config pointing every upstream at the mocks, with an in-memory store.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.llm.api_key = Some("test-gemini-key".into());
        config.llm.base_url = Some(self.gemini.uri());
        config.llm.router_model = ROUTER_MODEL.into();
        config.llm.answer_model = ANSWER_MODEL.into();
        config.backends.rag_service_url = self.rag.uri();
        config.backends.workday_tools_url = self.workday.uri();
        config.backends.rag_timeout_secs = 5;
        config.backends.workday_timeout_secs = 5;
        config.session.backend = SessionBackend::Memory;
        config
    }

    pub async fn router_replies(&self, text: &str, expected_calls: u64) {
        mount_model(&self.gemini, ROUTER_MODEL, text, expected_calls).await;
    }

    pub async fn answer_replies(&self, text: &str, expected_calls: u64) {
        mount_model(&self.gemini, ANSWER_MODEL, text, expected_calls).await;
    }

    pub async fn retrieval_returns(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/api/v1/rag/retrieve"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.rag)
            .await;
    }

    pub async fn retrieval_fails(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/api/v1/rag/retrieve"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream down"))
            .mount(&self.rag)
            .await;
    }

    pub async fn workday_replies(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": text})))
            .mount(&self.workday)
            .await;
    }

    /// Number of requests the Gemini mock saw for `model`.
    pub async fn model_calls(&self, model: &str) -> usize {
        let suffix = format!("/v1beta/models/{model}:generateContent");
        self.gemini
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == suffix)
            .count()
    }
}

async fn mount_model(server: &MockServer, model: &str, text: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}
