//! End-to-end chat session tests: dataset store, request assembly and the
//! provider talking to a mock chat completion service.

use std::sync::Arc;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scoremate::chat::{ChatSession, ChatSettings, ContextAssembler, Sender};
use scoremate::config::ProviderConfig;
use scoremate::dataset::{parse_dataset, DatasetStore};
use scoremate::error::ServiceError;
use scoremate::providers::{ChatProvider, OpenAiCompatibleProvider};

mod common;

fn session_for(server: &MockServer) -> ChatSession {
    let config = ProviderConfig {
        api_base: Some(server.uri()),
        timeout_seconds: 5,
        ..ProviderConfig::default()
    };
    let provider: Arc<dyn ChatProvider> =
        Arc::new(OpenAiCompatibleProvider::new(config, "test-key").unwrap());
    let store = DatasetStore::from_dataset(parse_dataset(common::SAMPLE_CSV, "sample"));
    let assembler = ContextAssembler::new(Arc::new(store), ChatSettings::default());
    ChatSession::new(assembler, provider)
}

async fn sent_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

#[tokio::test]
async fn test_customer_record_reaches_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::completion_body("Their score is 600.")),
        )
        .mount(&server)
        .await;

    let session = session_for(&server);
    let reply = session
        .submit("What is the credit score of customer C03PVPPHOY?")
        .await
        .unwrap();
    assert_eq!(reply.text, "Their score is 600.");

    let bodies = sent_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    let messages = bodies[0]["messages"].as_array().unwrap();

    // system, greeting, new user message
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["role"], "system");
    let system = messages[0]["content"].as_str().unwrap();
    assert!(system.contains("USER DATA FOR CUST_ID: C03PVPPHOY"));
    assert!(system.contains("- Income: 45000"));
    assert!(system.contains("- Default Rate: 33.33%"));
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[2], json!({
        "role": "user",
        "content": "What is the credit score of customer C03PVPPHOY?"
    }));
}

#[tokio::test]
async fn test_failure_is_shown_and_session_continues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::completion_body("Back.")))
        .mount(&server)
        .await;

    let session = session_for(&server);

    let first = session.submit("hello").await.unwrap();
    assert_eq!(first.error, Some(ServiceError::RateLimited));

    let second = session.submit("hello again").await.unwrap();
    assert!(second.is_success());
    assert_eq!(second.text, "Back.");

    let transcript = session.transcript().await;
    let texts: Vec<(Sender, &str)> = transcript
        .turns()
        .iter()
        .map(|t| (t.sender, t.text.as_str()))
        .collect();
    assert_eq!(texts.len(), 5);
    assert_eq!(texts[2], (Sender::Assistant, first.text.as_str()));
    assert_eq!(texts[4], (Sender::Assistant, "Back."));

    // The failure notice is part of the history sent with the retry
    let bodies = sent_bodies(&server).await;
    let retry = bodies[1]["messages"].as_array().unwrap();
    assert_eq!(retry.len(), 5);
    assert_eq!(retry[3]["content"], first.text.as_str());
}

#[tokio::test]
async fn test_unknown_customer_note_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::completion_body("Not found.")))
        .mount(&server)
        .await;

    let session = session_for(&server);
    session.submit("customer ZZZZZZZZZZ").await.unwrap();

    let bodies = sent_bodies(&server).await;
    let system = bodies[0]["messages"][0]["content"].as_str().unwrap();
    assert!(system.contains("\"ZZZZZZZZZZ\" was not found"));
    assert!(!system.contains("USER DATA FOR"));
}
