//! Planner and fallback behavior against a mocked provider endpoint.

use reportforge::error::ToolError;
use reportforge::llm::OpenAiCompatProvider;
use reportforge::planner::{LlmPlanner, Planner};
use reportforge::state::RunState;
use reportforge::tools::{Fallback, LlmFallback};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mock_provider(server: &MockServer) -> Arc<OpenAiCompatProvider> {
    Arc::new(OpenAiCompatProvider::new(
        server.uri(),
        Some("test-key"),
        "test-model",
        0.2,
    ))
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [ { "message": { "content": content } } ]
    }))
}

#[tokio::test]
async fn planner_parses_a_well_formed_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(
            r#"{ "steps": [ { "id": 1, "action": "load_table", "args": [] },
                             { "id": 2, "action": "analyze_data", "args": [] } ] }"#,
        ))
        .mount(&server)
        .await;

    let planner = LlmPlanner::new(mock_provider(&server).await);
    let plan = planner.plan("analyze my spreadsheet").await.unwrap();

    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].action, "load_table");
    assert_eq!(plan.steps[1].action, "analyze_data");
}

#[tokio::test]
async fn planner_tolerates_fenced_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(
            "```json\n{ \"steps\": [ { \"id\": 1, \"action\": \"compile_report\" } ] }\n```",
        ))
        .mount(&server)
        .await;

    let planner = LlmPlanner::new(mock_provider(&server).await);
    let plan = planner.plan("make me a report").await.unwrap();
    assert_eq!(plan.steps[0].action, "compile_report");
}

#[tokio::test]
async fn malformed_planner_output_yields_the_error_plan() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("Sure! First I would open the file, then..."))
        .mount(&server)
        .await;

    let planner = LlmPlanner::new(mock_provider(&server).await);
    let plan = planner.plan("make me a report").await.unwrap();

    assert_eq!(plan.steps.len(), 1);
    assert_eq!(plan.steps[0].action, "error");
    assert!(plan.steps[0]
        .message
        .as_deref()
        .unwrap()
        .contains("I would open the file"));
}

#[tokio::test]
async fn provider_transport_failure_is_a_hard_planning_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let planner = LlmPlanner::new(mock_provider(&server).await);
    assert!(planner.plan("make me a report").await.is_err());
}

#[tokio::test]
async fn fallback_unwraps_structured_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion(r#"{ "result": { "summary": "two regions grew" } }"#))
        .mount(&server)
        .await;

    let fallback = LlmFallback::new(mock_provider(&server).await);
    let value = fallback
        .fulfill("summarize_growth", &RunState::new(), &[])
        .await
        .unwrap();
    assert_eq!(value, json!({ "summary": "two regions grew" }));
}

#[tokio::test]
async fn fallback_degrades_prose_to_text_wrapper() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(completion("The growth looks healthy overall."))
        .mount(&server)
        .await;

    let fallback = LlmFallback::new(mock_provider(&server).await);
    let value = fallback
        .fulfill("summarize_growth", &RunState::new(), &[])
        .await
        .unwrap();
    assert_eq!(value, json!({ "text": "The growth looks healthy overall." }));
}

#[tokio::test]
async fn fallback_service_failure_is_a_fallback_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fallback = LlmFallback::new(mock_provider(&server).await);
    let err = fallback
        .fulfill("summarize_growth", &RunState::new(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Fallback(_)));
}
