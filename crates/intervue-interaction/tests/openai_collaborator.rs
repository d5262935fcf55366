//! HTTP-level tests for the OpenAI-compatible collaborator.

use intervue_core::collaborator::{
    CollaboratorError, GenerationOutput, GenerationRequest, PromptMessage, ReasoningCollaborator,
};
use intervue_core::schema;
use intervue_core::session::{InterviewPhase, MessageRole};
use intervue_interaction::OpenAiCollaborator;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn collaborator(server: &MockServer) -> OpenAiCollaborator {
    OpenAiCollaborator::new("sk-test", "gpt-4o-mini").with_base_url(format!("{}/v1/", server.uri()))
}

fn intro_request() -> GenerationRequest {
    GenerationRequest::structured(
        vec![
            PromptMessage::new(MessageRole::System, "You are an interviewer"),
            PromptMessage::new(MessageRole::User, "Hi, I'm ready"),
        ],
        schema::turn_schema(InterviewPhase::Intro).unwrap(),
        0.2,
    )
}

#[tokio::test]
async fn test_structured_reply_is_decoded_from_tool_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "tool_choice": {"type": "function", "function": {"name": "intro_turn"}}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "intro_turn",
                            "arguments": "{\"text\":\"Nice to meet you\",\"nextStage\":true}"
                        }
                    }]
                }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = collaborator(&server).generate(intro_request()).await.unwrap();
    match output {
        GenerationOutput::Structured { name, fields } => {
            assert_eq!(name, "intro_turn");
            assert_eq!(fields["text"], "Nice to meet you");
            assert_eq!(fields["nextStage"], true);
        }
        other => panic!("expected structured output, got {other:?}"),
    }
}

#[tokio::test]
async fn test_text_only_reply_is_returned_as_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Just text"}}]
        })))
        .mount(&server)
        .await;

    let output = collaborator(&server).generate(intro_request()).await.unwrap();
    assert_eq!(output, GenerationOutput::Text("Just text".into()));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}
        })))
        .mount(&server)
        .await;

    let err = collaborator(&server).generate(intro_request()).await.unwrap_err();
    assert_eq!(err, CollaboratorError::Auth("Incorrect API key provided".into()));
}

#[tokio::test]
async fn test_rate_limit_is_retryable_service_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .mount(&server)
        .await;

    let err = collaborator(&server).generate(intro_request()).await.unwrap_err();
    assert_eq!(
        err,
        CollaboratorError::Service {
            status: Some(429),
            message: "slow down".into(),
            retryable: true,
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = OpenAiCollaborator::new("sk-test", "gpt-4o-mini")
        .with_base_url(uri)
        .generate(intro_request())
        .await
        .unwrap_err();
    assert!(matches!(err, CollaboratorError::Transport(_)), "got {err:?}");
}
