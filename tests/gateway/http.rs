use super::upstream::Upstream;
use askhr_router::config::Config;
use askhr_router::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;

struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

impl GatewayTestServer {
    async fn start(config: Config) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let host = "127.0.0.1".to_string();
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self { port, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn create_session(&self, client: &reqwest::Client) -> String {
        let body: Value = client
            .post(self.url("/session"))
            .json(&json!({}))
            .send()
            .await
            .expect("session request should succeed")
            .json()
            .await
            .expect("session response should be JSON");
        body["session_id"]
            .as_str()
            .expect("session id should be a string")
            .to_string()
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if health.is_ok_and(|response| response.status().is_success()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }

    panic!("gateway did not become ready on port {port}");
}

#[tokio::test]
async fn health_reports_ok() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;

    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn session_creation_returns_id_and_timestamp() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/session"))
        .header("X-User-Id", "emp-9")
        .json(&json!({"initial_message": "ignored"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let session_id = body["session_id"].as_str().unwrap();
    assert!(body["created_at"].is_string());

    let stored: Value = client
        .get(server.url(&format!("/session/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored["user_id"], "emp-9");
    assert_eq!(stored["awaiting_workday"], false);
    assert_eq!(stored["history"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn session_creation_accepts_empty_body() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;

    let response = reqwest::Client::new()
        .post(server.url("/session"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/message"))
        .json(&json!({"session_id": "nope", "content": "What is the dress code?"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"detail": "Session not found"}));

    let response = client
        .get(server.url("/session/nope"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_message_body_is_400() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;

    let response = reqwest::Client::new()
        .post(server.url("/message"))
        .json(&json!({"session_id": "s-1"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Invalid JSON"));
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let upstream = Upstream::start().await;
    let server = GatewayTestServer::start(upstream.config()).await;

    let response = reqwest::Client::new()
        .post(server.url("/message"))
        .json(&json!({"session_id": "s-1", "content": "x".repeat(70_000)}))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn policy_question_is_answered_from_retrieval() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies(r#"{"route":"rag","confidence":0.9,"reason":"policy question"}"#, 1)
        .await;
    upstream
        .retrieval_returns(json!({
            "contexts": ["Business casual attire is expected Monday through Thursday."],
            "citations": [{"title": "Dress Code", "url": "https://hr.example/dress"}]
        }))
        .await;
    upstream
        .answer_replies("Business casual, Monday through Thursday.", 1)
        .await;
    let server = GatewayTestServer::start(upstream.config()).await;
    let client = reqwest::Client::new();
    let session_id = server.create_session(&client).await;

    let body: Value = client
        .post(server.url("/message"))
        .json(&json!({"session_id": session_id, "content": "What is the dress code?"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["reply_text"], "Business casual, Monday through Thursday.");
    assert_eq!(body["citations"][0]["title"], "Dress Code");
    assert_eq!(body["metadata"]["agent"], "rag");
    assert_eq!(body["metadata"]["route"], "rag");
    assert_eq!(body["metadata"]["route_reason"], "policy question");
    assert_eq!(body["metadata"]["route_confidence"], 0.9);
}

#[tokio::test]
async fn workday_question_then_followup_skips_router() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies(r#"{"route":"workday","confidence":0.95,"reason":"time off"}"#, 1)
        .await;
    upstream
        .workday_replies("Which date would you like to take off?")
        .await;
    let server = GatewayTestServer::start(upstream.config()).await;
    let client = reqwest::Client::new();
    let session_id = server.create_session(&client).await;

    let first: Value = client
        .post(server.url("/message"))
        .json(&json!({"session_id": session_id, "content": "I want to request time off"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first["metadata"]["agent"], "workday");

    let session: Value = client
        .get(server.url(&format!("/session/{session_id}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(session["awaiting_workday"], true);
    assert_eq!(session["last_route"], "workday");

    let second: Value = client
        .post(server.url("/message"))
        .json(&json!({"session_id": session_id, "content": "tomorrow"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(second["metadata"]["route"], "workday");
    assert_eq!(second["metadata"]["route_reason"], "Follow-up to Workday prompt");
    assert_eq!(second["metadata"]["route_confidence"], 1.0);
}
