// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for an OpenAI-compatible chat completions service (Groq by default).
//!
//! Responses are interpreted into a [`ModelTurn`]. A tool invocation the
//! provider could not parse is reported as `ModelTurn::Unparsable`, not as an
//! error, so the caller can decide how to recover.

use crate::error::AppError;
use crate::models::{ConversationMessage, ModelTurn, ToolCall, ToolSchema};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code Groq returns when the model emitted a malformed tool call.
const TOOL_USE_FAILED: &str = "tool_use_failed";

/// Longest error body excerpt kept in error messages.
const MAX_ERROR_BODY_LEN: usize = 200;

/// A chat model that may request tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation. `tools: None` makes a tool-free request.
    async fn complete(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ModelTurn, AppError>;
}

// ─── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl<'a> From<&'a ConversationMessage> for WireMessage<'a> {
    fn from(msg: &'a ConversationMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
            tool_calls: msg
                .tool_calls
                .iter()
                .map(|call| WireToolCall {
                    id: call.id.clone(),
                    call_type: "function".to_string(),
                    function: WireFunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect(),
            tool_call_id: msg.tool_call_id.as_deref(),
            name: msg.name.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: &'a ToolSchema,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    /// JSON-encoded argument object
    arguments: String,
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
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

// ─── Client ──────────────────────────────────────────────────

/// Chat completions client.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>, api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model,
        }
    }

    /// Map a non-success response to a turn or an error.
    fn interpret_error(status: reqwest::StatusCode, body: &str) -> Result<ModelTurn, AppError> {
        if let Ok(error) = serde_json::from_str::<ErrorResponse>(body) {
            if status == reqwest::StatusCode::BAD_REQUEST
                && error.error.code.as_deref() == Some(TOOL_USE_FAILED)
            {
                return Ok(ModelTurn::Unparsable(error.error.message));
            }
            return Err(AppError::Llm(format!(
                "HTTP {}: {}",
                status, error.error.message
            )));
        }

        let excerpt: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        Err(AppError::Llm(format!("HTTP {}: {}", status, excerpt)))
    }
}

/// Interpret a successful response body.
fn interpret_message(message: ResponseMessage) -> ModelTurn {
    let wire_calls = message.tool_calls.unwrap_or_default();
    if wire_calls.is_empty() {
        return ModelTurn::PlainText(message.content.unwrap_or_default());
    }

    let mut calls = Vec::with_capacity(wire_calls.len());
    for call in wire_calls {
        match parse_arguments(&call.function.arguments) {
            Some(arguments) => calls.push(ToolCall {
                id: call.id,
                name: call.function.name,
                arguments,
            }),
            None => {
                return ModelTurn::Unparsable(format!(
                    "Invalid arguments for tool {}: {}",
                    call.function.name, call.function.arguments
                ))
            }
        }
    }

    ModelTurn::ToolCalls {
        content: message.content.filter(|c| !c.is_empty()),
        calls,
    }
}

/// Arguments must decode to a JSON object. Empty or `null` means no arguments.
fn parse_arguments(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(Value::Object(Default::default()));
    }

    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Null => Some(Value::Object(Default::default())),
        object @ Value::Object(_) => Some(object),
        _ => None,
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn complete(
        &self,
        messages: &[ConversationMessage],
        tools: Option<&[ToolSchema]>,
    ) -> Result<ModelTurn, AppError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: messages.iter().map(WireMessage::from).collect(),
            tools: tools.map(|schemas| {
                schemas
                    .iter()
                    .map(|schema| WireTool {
                        tool_type: "function",
                        function: schema,
                    })
                    .collect()
            }),
            tool_choice: tools.map(|_| "auto"),
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            with_tools = tools.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Self::interpret_error(status, &body);
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Llm(format!("Failed to parse response: {}", e)))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Llm("Response contained no choices".to_string()))?;

        Ok(interpret_message(choice.message))
    }
}
