//! Contract for the reasoning collaborator.
//!
//! The collaborator turns an ordered list of role-tagged prompt messages plus
//! an optional response schema into either structured fields or free text.
//! Concrete implementations (HTTP APIs, local models, test doubles) live
//! outside this crate.

use crate::session::{ConversationMessage, MessageRole};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a collaborator implementation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// The service answered with a non-success status.
    #[error("service error{}: {message}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Service {
        status: Option<u16>,
        message: String,
        retryable: bool,
    },

    /// Credentials were missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request never produced a response (connect/reset/decode).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The call did not finish within the caller's deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The collaborator is not configured.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// A response arrived but its structured payload could not be decoded.
    #[error("invalid output: {0}")]
    InvalidOutput(String),
}

/// A single prompt message sent to the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

impl From<&ConversationMessage> for PromptMessage {
    fn from(message: &ConversationMessage) -> Self {
        Self {
            role: message.role.clone(),
            content: message.content.clone(),
        }
    }
}

/// A named structured-field specification (JSON Schema object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// How the collaborator should pick among the offered schemas.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaSelection {
    /// The collaborator decides whether to produce structured fields.
    #[default]
    Auto,
    /// The collaborator must produce fields for the named schema.
    Forced(String),
}

/// Everything a single `generate` call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<PromptMessage>,
    pub schema: Option<ResponseSchema>,
    pub selection: SchemaSelection,
    pub temperature: f32,
    pub max_output_tokens: Option<u32>,
}

impl GenerationRequest {
    /// Builds a request that forces structured output for `schema`.
    pub fn structured(messages: Vec<PromptMessage>, schema: ResponseSchema, temperature: f32) -> Self {
        let selection = SchemaSelection::Forced(schema.name.clone());
        Self {
            messages,
            schema: Some(schema),
            selection,
            temperature,
            max_output_tokens: None,
        }
    }

    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

/// Result of a `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutput {
    /// Fields produced for the schema called `name`.
    Structured { name: String, fields: Value },
    /// Plain text; a malformed result when structured fields were requested.
    Text(String),
}

impl GenerationOutput {
    /// Returns the structured fields or `None` for a text-only reply.
    pub fn into_fields(self) -> Option<Value> {
        match self {
            Self::Structured { fields, .. } => Some(fields),
            Self::Text(_) => None,
        }
    }
}

/// A schema-constrained text generation capability.
#[async_trait]
pub trait ReasoningCollaborator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationOutput, CollaboratorError>;
}
