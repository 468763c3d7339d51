// Integration tests for the /api/chat endpoint, driving the real router
// against a mocked completion API.

use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mull::classify::Importance;
use mull::config::LlmConfig;
use mull::prompts::prompt_sets_for;
use mull::web_server::build_router;

fn completion_json(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

/// Mock for the main assistant completion, matched on its system prompt.
fn assistant_mock(reply: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("thoughtful decision-making assistant"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(reply)))
}

/// Mock for the classification call, matched on its system prompt.
fn classifier_mock(raw_output: &str) -> Mock {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Analyze the conversation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(raw_output)))
}

async fn test_server(mock: &MockServer) -> TestServer {
    let app = build_router(LlmConfig::for_endpoint(mock.uri()));
    TestServer::new(app).unwrap()
}

fn post_body() -> serde_json::Value {
    json!({
        "messages": [
            { "role": "user", "content": "Should I take the startup job offer?" }
        ]
    })
}

#[tokio::test]
async fn test_chat_returns_reply_with_timer_headers() {
    let mock_server = MockServer::start().await;
    assistant_mock("Understanding the startup's business model would be an important factor to consider.")
        .mount(&mock_server)
        .await;
    classifier_mock("importance: complex\nduration: 25")
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "Understanding the startup's business model would be an important factor to consider."
    );
    assert_eq!(response.header("X-Timer-Duration"), "25");
    assert_eq!(response.header("X-Decision-Importance"), "complex");

    // Both reflection prompts must come from the same complex prompt pair
    let p1 = response.header("X-Reflection-Prompt-1");
    let p2 = response.header("X-Reflection-Prompt-2");
    let pair = [p1.to_str().unwrap().to_string(), p2.to_str().unwrap().to_string()];
    let known = prompt_sets_for(Importance::Complex);
    assert!(
        known.iter().any(|set| set[0] == pair[0] && set[1] == pair[1]),
        "unexpected prompt pair: {:?}",
        pair
    );
}

#[tokio::test]
async fn test_duration_is_clamped_to_240() {
    let mock_server = MockServer::start().await;
    assistant_mock("Take a moment to weigh this.")
        .mount(&mock_server)
        .await;
    classifier_mock("importance: life-altering\nduration: 9999")
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    response.assert_status_ok();
    assert_eq!(response.header("X-Timer-Duration"), "240");
    assert_eq!(response.header("X-Decision-Importance"), "life-altering");
}

#[tokio::test]
async fn test_unknown_importance_defaults_to_routine() {
    let mock_server = MockServer::start().await;
    assistant_mock("A few things to consider here.")
        .mount(&mock_server)
        .await;
    classifier_mock("importance: cosmic\nduration: 15")
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    response.assert_status_ok();
    assert_eq!(response.header("X-Decision-Importance"), "routine");
    assert_eq!(response.header("X-Timer-Duration"), "15");
}

#[tokio::test]
async fn test_classifier_failure_falls_back_to_defaults() {
    let mock_server = MockServer::start().await;
    assistant_mock("It might help to think about your budget constraints here.")
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Analyze the conversation"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    // The reply still goes out; the classification falls back to routine/60s
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "It might help to think about your budget constraints here."
    );
    assert_eq!(response.header("X-Timer-Duration"), "60");
    assert_eq!(response.header("X-Decision-Importance"), "routine");
}

#[tokio::test]
async fn test_completion_failure_returns_500_with_generic_message() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model on fire"))
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text(),
        "Sorry, there was an error processing your request."
    );
    // No internal detail leaks into the body
    assert!(!response.text().contains("model on fire"));
}

#[tokio::test]
async fn test_zero_duration_returned_as_is() {
    let mock_server = MockServer::start().await;
    assistant_mock("Sounds like you already know what to do.")
        .mount(&mock_server)
        .await;
    classifier_mock("importance: trivial\nduration: 0")
        .mount(&mock_server)
        .await;

    let server = test_server(&mock_server).await;
    let response = server.post("/api/chat").json(&post_body()).await;

    response.assert_status_ok();
    assert_eq!(response.header("X-Timer-Duration"), "0");
    assert_eq!(response.header("X-Decision-Importance"), "trivial");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let mock_server = MockServer::start().await;
    let server = test_server(&mock_server).await;

    let response = server
        .post("/api/chat")
        .json(&json!({ "messages": "not a list" }))
        .await;

    assert!(response.status_code().is_client_error());
}
