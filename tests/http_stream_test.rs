//! End-to-end tests of the reqwest transport against a local HTTP server.
//!
//! These tests verify that ChatSession drives a real HTTP exchange: the
//! request shape, headers, SSE body decoding and status handling.

mod common;

use common::{data_line, hello_body};
use interview_chat::adapters::ReqwestHttpClient;
use interview_chat::config::ChatConfig;
use interview_chat::error::{ExchangeError, TransportError};
use interview_chat::models::{InterviewMode, Message};
use interview_chat::session::{ChatSession, ExchangeOutcome, APOLOGY_MESSAGE};
use interview_chat::traits::{Headers, HttpClient};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/functions/v1/interview-chat";

fn sse_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/event-stream")
}

fn session_for(server: &MockServer) -> ChatSession<ReqwestHttpClient> {
    ChatSession::new(
        ReqwestHttpClient::new(),
        ChatConfig::new(format!("{}{}", server.uri(), CHAT_PATH))
            .with_api_key("test-key")
            .with_mode(InterviewMode::Technical),
    )
}

#[tokio::test]
async fn test_streams_reply_from_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({
            "messages": [{"role": "user", "content": "Hi"}],
            "mode": "technical"
        })))
        .respond_with(sse_response(format!(": ok\n\n{}", hello_body())))
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let outcome = session.send_message("Hi").await;

    assert_eq!(outcome, ExchangeOutcome::Completed);
    assert_eq!(
        session.messages(),
        vec![Message::user("Hi"), Message::assistant("Hello!")]
    );
}

#[tokio::test]
async fn test_server_error_records_apology() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let outcome = session.send_message("Hi").await;

    match outcome {
        ExchangeOutcome::Failed(ExchangeError::Request(TransportError::ServerError {
            status,
            message,
        })) => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("Expected request failure, got {:?}", other),
    }
    assert_eq!(
        session.snapshot().last(),
        Some(&Message::assistant(APOLOGY_MESSAGE))
    );
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_no_content_is_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = ReqwestHttpClient::new();
    let result = client
        .post_stream(&format!("{}{}", server.uri(), CHAT_PATH), "{}", &Headers::new())
        .await;

    assert!(matches!(result, Err(TransportError::EmptyBody)));
}

#[tokio::test]
async fn test_stream_without_sentinel_completes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(sse_response(format!(
            "{}{}",
            data_line("No "),
            data_line("sentinel")
        )))
        .mount(&server)
        .await;

    let session = session_for(&server);

    assert!(session.send_message("Hi").await.is_completed());
    assert_eq!(session.snapshot().trailing_assistant(), Some("No sentinel"));
}

#[tokio::test]
async fn test_connection_refused_records_apology() {
    let session = ChatSession::new(
        ReqwestHttpClient::new(),
        ChatConfig::new("http://127.0.0.1:59999/functions/v1/interview-chat"),
    );

    let outcome = session.send_message("Hi").await;

    assert!(matches!(
        outcome,
        ExchangeOutcome::Failed(ExchangeError::Request(_))
    ));
    assert_eq!(
        session.messages(),
        vec![Message::user("Hi"), Message::assistant(APOLOGY_MESSAGE)]
    );
}
