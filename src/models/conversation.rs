// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Conversation messages exchanged with the model service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message sender role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Provider-assigned call ID, echoed back on the tool result
    pub id: String,
    pub name: String,
    /// Argument object (always a JSON object once parsed)
    pub arguments: Value,
}

/// One entry of the append-only conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: Role,
    pub content: String,
    /// Tool calls requested by an assistant message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// For tool messages: the call this result answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// For tool messages: the tool that produced the result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConversationMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(Role::Assistant, content)
        }
    }

    /// Tool result message carrying the serialized result.
    pub fn tool_result(call: &ToolCall, result: &Value) -> Self {
        Self {
            tool_call_id: Some(call.id.clone()),
            name: Some(call.name.clone()),
            ..Self::new(Role::Tool, result.to_string())
        }
    }
}

/// Interpreted model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelTurn {
    /// The model asked for one or more tools (content may accompany them).
    ToolCalls {
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
    /// Final free-text answer.
    PlainText(String),
    /// The model tried to call a tool but the invocation could not be parsed.
    Unparsable(String),
}

impl ModelTurn {
    /// Whatever text the turn carries. Tool calls are dropped.
    pub fn into_text(self) -> String {
        match self {
            ModelTurn::ToolCalls { content, .. } => content.unwrap_or_default(),
            ModelTurn::PlainText(text) => text,
            ModelTurn::Unparsable(_) => String::new(),
        }
    }
}
