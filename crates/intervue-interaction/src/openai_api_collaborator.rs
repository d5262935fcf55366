//! OpenAiCollaborator - REST implementation for OpenAI-compatible chat APIs.
//!
//! Structured fields are obtained through function calling: the response
//! schema is offered as a single tool and `tool_choice` either forces it or
//! leaves the choice to the model.

use crate::config::ConfigStorage;
use async_trait::async_trait;
use intervue_core::collaborator::{
    CollaboratorError, GenerationOutput, GenerationRequest, PromptMessage, ReasoningCollaborator,
    ResponseSchema, SchemaSelection,
};
use intervue_core::config::OpenAIConfig;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Collaborator that talks to an OpenAI-compatible HTTP API.
#[derive(Clone)]
pub struct OpenAiCollaborator {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiCollaborator {
    /// Creates a new collaborator with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn from_config(config: OpenAIConfig) -> Self {
        let model = config
            .model_name
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
        let collaborator = Self::new(config.api_key, model);
        match config.base_url {
            Some(base_url) => collaborator.with_base_url(base_url),
            None => collaborator,
        }
    }

    /// Loads credentials from `~/.config/intervue/secret.json` or the environment.
    pub fn try_from_storage(storage: &ConfigStorage) -> Result<Self, CollaboratorError> {
        let config = storage
            .resolve_openai()
            .map_err(|e| CollaboratorError::NotConfigured(e.to_string()))?
            .ok_or_else(|| {
                CollaboratorError::NotConfigured(
                    "OPENAI_API_KEY not found in secret.json or environment variables".into(),
                )
            })?;
        Ok(Self::from_config(config))
    }

    /// Overrides the API base URL (e.g. a self-hosted gateway).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: &GenerationRequest) -> ChatCompletionRequest {
        let tools = request.schema.as_ref().map(|schema| vec![ToolSpec::from(schema)]);
        let tool_choice = tools.as_ref().map(|_| match &request.selection {
            SchemaSelection::Auto => ToolChoice::Mode("auto"),
            SchemaSelection::Forced(name) => ToolChoice::Function {
                kind: "function",
                function: FunctionName { name: name.clone() },
            },
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
            tools,
            tool_choice,
        }
    }

    async fn send_request(
        &self,
        body: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, CollaboratorError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                CollaboratorError::Transport(format!("OpenAI API request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response.json().await.map_err(|err| {
            CollaboratorError::InvalidOutput(format!("Failed to parse OpenAI response: {err}"))
        })
    }
}

#[async_trait]
impl ReasoningCollaborator for OpenAiCollaborator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, CollaboratorError> {
        let body = self.build_request(&request);
        tracing::debug!(
            model = %self.model,
            messages = body.messages.len(),
            schema = request.schema.as_ref().map(|s| s.name.as_str()),
            "sending chat completion"
        );

        let response = self.send_request(&body).await?;
        let wanted = match &request.selection {
            SchemaSelection::Forced(name) => Some(name.as_str()),
            SchemaSelection::Auto => request.schema.as_ref().map(|s| s.name.as_str()),
        };
        extract_output(response, wanted)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<ToolSpec>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

impl From<&PromptMessage> for ChatMessage {
    fn from(message: &PromptMessage) -> Self {
        Self {
            role: message.role.to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSpec,
}

#[derive(Serialize)]
struct FunctionSpec {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ResponseSchema> for ToolSpec {
    fn from(schema: &ResponseSchema) -> Self {
        Self {
            kind: "function",
            function: FunctionSpec {
                name: schema.name.clone(),
                description: schema.description.clone(),
                parameters: schema.parameters.clone(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum ToolChoice {
    Mode(&'static str),
    Function {
        #[serde(rename = "type")]
        kind: &'static str,
        function: FunctionName,
    },
}

#[derive(Serialize)]
struct FunctionName {
    name: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Picks the tool call for `wanted` (or the first one) and decodes its arguments.
fn extract_output(
    response: ChatCompletionResponse,
    wanted: Option<&str>,
) -> Result<GenerationOutput, CollaboratorError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or_else(|| {
            CollaboratorError::InvalidOutput("OpenAI API returned no choices".into())
        })?;

    let mut calls = message.tool_calls.unwrap_or_default();
    if !calls.is_empty() {
        let index = wanted
            .and_then(|name| calls.iter().position(|c| c.function.name == name))
            .unwrap_or(0);
        let call = calls.swap_remove(index);
        let fields: Value = serde_json::from_str(&call.function.arguments).map_err(|err| {
            CollaboratorError::InvalidOutput(format!(
                "arguments of '{}' are not valid JSON: {err}",
                call.function.name
            ))
        })?;
        return Ok(GenerationOutput::Structured {
            name: call.function.name,
            fields,
        });
    }

    Ok(GenerationOutput::Text(
        message.content.map(|c| c.trim().to_string()).unwrap_or_default(),
    ))
}

fn map_http_error(status: StatusCode, body: String) -> CollaboratorError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        return CollaboratorError::Auth(message);
    }

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    CollaboratorError::Service {
        status: Some(status.as_u16()),
        message,
        retryable,
    }
}
