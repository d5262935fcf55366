//! Deadline-bounded structured calls to the reasoning collaborator.

use intervue_core::collaborator::{
    CollaboratorError, GenerationOutput, GenerationRequest, PromptMessage, ReasoningCollaborator,
    ResponseSchema,
};
use intervue_core::config::InterviewSettings;
use intervue_core::{IntervueError, Result};
use serde_json::Value;
use std::time::Duration;

/// Sampling and deadline parameters shared by every collaborator call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CallOptions {
    pub timeout: Duration,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl CallOptions {
    pub fn from_settings(settings: &InterviewSettings) -> Self {
        Self {
            timeout: settings.collaborator_timeout(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
        }
    }

    /// A request forcing `schema`, with these sampling parameters.
    pub fn request(&self, messages: Vec<PromptMessage>, schema: ResponseSchema) -> GenerationRequest {
        GenerationRequest::structured(messages, schema, self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
    }
}

/// Sends `request` and returns the structured fields for its forced schema.
///
/// A call that outlives `timeout` is abandoned and reported as a collaborator
/// timeout. Plain text, fields for another schema and undecodable arguments
/// are all malformed responses.
pub(crate) async fn request_fields(
    collaborator: &dyn ReasoningCollaborator,
    request: GenerationRequest,
    timeout: Duration,
) -> Result<Value> {
    let expected = request
        .schema
        .as_ref()
        .map(|schema| schema.name.clone())
        .ok_or_else(|| IntervueError::internal("structured request without a schema"))?;

    let output = match tokio::time::timeout(timeout, collaborator.generate(request)).await {
        Ok(Ok(output)) => output,
        Ok(Err(CollaboratorError::InvalidOutput(message))) => {
            return Err(IntervueError::malformed(expected, message));
        }
        Ok(Err(err)) => return Err(err.into()),
        Err(_) => return Err(CollaboratorError::Timeout(timeout).into()),
    };

    match output {
        GenerationOutput::Structured { name, fields } if name == expected => Ok(fields),
        GenerationOutput::Structured { name, .. } => Err(IntervueError::malformed(
            expected,
            format!("fields were produced for '{name}'"),
        )),
        GenerationOutput::Text(_) => Err(IntervueError::malformed(
            expected,
            "text reply without structured fields",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use intervue_core::session::MessageRole;
    use serde_json::json;

    struct Fixed(std::result::Result<GenerationOutput, CollaboratorError>, Duration);

    #[async_trait]
    impl ReasoningCollaborator for Fixed {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> std::result::Result<GenerationOutput, CollaboratorError> {
            tokio::time::sleep(self.1).await;
            self.0.clone()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::structured(
            vec![PromptMessage::new(MessageRole::User, "hi")],
            ResponseSchema {
                name: "intro_turn".into(),
                description: String::new(),
                parameters: json!({"type": "object"}),
            },
            0.0,
        )
    }

    #[tokio::test]
    async fn test_matching_fields_are_returned() {
        let collaborator = Fixed(
            Ok(GenerationOutput::Structured {
                name: "intro_turn".into(),
                fields: json!({"text": "hello"}),
            }),
            Duration::ZERO,
        );
        let fields = request_fields(&collaborator, request(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(fields["text"], "hello");
    }

    #[tokio::test]
    async fn test_text_reply_is_malformed() {
        let collaborator = Fixed(Ok(GenerationOutput::Text("hello".into())), Duration::ZERO);
        let err = request_fields(&collaborator, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_other_schema_is_malformed() {
        let collaborator = Fixed(
            Ok(GenerationOutput::Structured {
                name: "warmup_turn".into(),
                fields: json!({}),
            }),
            Duration::ZERO,
        );
        let err = request_fields(&collaborator, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test]
    async fn test_invalid_output_is_malformed() {
        let collaborator = Fixed(
            Err(CollaboratorError::InvalidOutput("not json".into())),
            Duration::ZERO,
        );
        let err = request_fields(&collaborator, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(err.is_malformed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_collaborator_times_out() {
        let collaborator = Fixed(
            Ok(GenerationOutput::Text("late".into())),
            Duration::from_secs(60),
        );
        let err = request_fields(&collaborator, request(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            IntervueError::Collaborator(CollaboratorError::Timeout(Duration::from_secs(5)))
        );
    }
}
