use super::upstream::{ANSWER_MODEL, ROUTER_MODEL, Upstream};
use askhr_router::UserContext;
use askhr_router::app::build_orchestrator;
use askhr_router::backends::NOT_FOUND_REPLY;
use askhr_router::session::GREETING;
use serde_json::json;

fn employee() -> UserContext {
    UserContext::new("emp-100")
}

#[tokio::test]
async fn new_session_greeting_is_answered_locally() {
    let upstream = Upstream::start().await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    let response = orchestrator
        .handle_message(&session.id, "hello", &employee())
        .await
        .unwrap();

    assert_eq!(response.reply_text, GREETING);
    assert_eq!(response.agent(), Some("system"));
    let stored = orchestrator.get_session(&session.id).await.unwrap();
    assert!(!stored.awaiting_workday);
    assert_eq!(upstream.model_calls(ROUTER_MODEL).await, 0);
}

#[tokio::test]
async fn awaiting_followup_is_forced_to_workday_without_router_call() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies(r#"{"route":"workday","confidence":0.9,"reason":"leave request"}"#, 1)
        .await;
    upstream.workday_replies("Is this for sick leave?").await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    orchestrator
        .handle_message(&session.id, "I need to take leave", &employee())
        .await
        .unwrap();
    assert!(orchestrator.get_session(&session.id).await.unwrap().awaiting_workday);

    let response = orchestrator
        .handle_message(&session.id, "yes", &employee())
        .await
        .unwrap();

    assert_eq!(response.route(), Some("workday"));
    assert_eq!(response.metadata["route_confidence"], 1.0);
    assert_eq!(response.metadata["route_reason"], "Follow-up to Workday prompt");
    assert_eq!(upstream.model_calls(ROUTER_MODEL).await, 1);
}

#[tokio::test]
async fn empty_retrieval_skips_answer_model() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies(r#"{"route":"rag","confidence":0.8,"reason":"policy"}"#, 1)
        .await;
    upstream
        .retrieval_returns(json!({"contexts": [], "citations": []}))
        .await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    let response = orchestrator
        .handle_message(&session.id, "What is the parental leave policy in Mars?", &employee())
        .await
        .unwrap();

    assert_eq!(response.reply_text, NOT_FOUND_REPLY);
    assert_eq!(upstream.model_calls(ANSWER_MODEL).await, 0);
}

#[tokio::test]
async fn retrieval_outage_degrades_to_service_error() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies(r#"{"route":"rag","confidence":0.8,"reason":"policy"}"#, 1)
        .await;
    upstream.retrieval_fails(503).await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    let response = orchestrator
        .handle_message(&session.id, "What is the dress code?", &employee())
        .await
        .unwrap();

    assert_eq!(
        response.reply_text,
        "RAG service is unavailable right now. Please try again."
    );
    assert_eq!(response.metadata["error"], "service_error");
    assert_eq!(response.route(), Some("rag"));
}

#[tokio::test]
async fn unparseable_router_output_falls_back_to_keywords() {
    let upstream = Upstream::start().await;
    upstream
        .router_replies("I think this belongs to Workday.", 1)
        .await;
    upstream.workday_replies("You have 40 hours of PTO.").await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    let response = orchestrator
        .handle_message(&session.id, "What is my PTO balance?", &employee())
        .await
        .unwrap();

    assert_eq!(response.route(), Some("workday"));
    assert_eq!(response.metadata["route_confidence"], 0.2);
    assert_eq!(response.metadata["route_reason"], "Fallback routing");
    assert_eq!(response.reply_text, "You have 40 hours of PTO.");

    let stored = orchestrator.get_session(&session.id).await.unwrap();
    assert!(!stored.awaiting_workday);
    assert_eq!(stored.history.len(), 3);
}

#[tokio::test]
async fn router_outage_still_routes() {
    let upstream = Upstream::start().await;
    upstream
        .retrieval_returns(json!({"contexts": {"a": "Dress code is business casual."}}))
        .await;
    upstream.answer_replies("Business casual.", 1).await;
    let orchestrator = build_orchestrator(&upstream.config()).await.unwrap();
    let session = orchestrator.create_session(&employee(), None).await.unwrap();

    let response = orchestrator
        .handle_message(&session.id, "What should I wear to the office?", &employee())
        .await
        .unwrap();

    assert_eq!(response.route(), Some("rag"));
    assert_eq!(response.metadata["route_reason"], "Fallback routing");
    assert_eq!(response.reply_text, "Business casual.");
}
