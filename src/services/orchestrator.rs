// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bounded conversation loop between the model and the analytic tools.
//!
//! Each round trip sends the full conversation plus the tool catalogue.
//! Tool calls run in listed order and their results are appended before the
//! next round trip. The loop ends when:
//! 1. the model answers in plain text,
//! 2. the model emits a tool call that cannot be parsed (one tool-free
//!    fallback request supplies the answer), or
//! 3. the iteration limit is reached (canned text, partial results kept).

use crate::error::Result;
use crate::models::{AnalysisOutcome, ConversationMessage, ModelTurn};
use crate::services::{ChatModel, ToolRegistry};
use std::sync::Arc;

/// Maximum model round trips per query.
pub const MAX_ITERATIONS: usize = 10;

/// Analysis text returned when the loop runs out of iterations.
pub const INCOMPLETE_ANALYSIS: &str = "Analysis could not be completed.";

const SYSTEM_PROMPT: &str = "You are a fitness data assistant with access to the user's \
Strava activity history through tools. To answer a question: select the tool that \
provides the data, read its result, and report back in 1-3 sentences. Only use numbers \
that appear in tool results; never invent data. Do not write code.";

/// Drives the model through tool selection and execution.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
}

impl AnalysisOrchestrator {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry) -> Self {
        Self { model, tools }
    }

    /// Answer a natural-language question about the activity history.
    ///
    /// Running out of iterations is not an error; only model-service and
    /// Strava failures are returned as `Err`.
    pub async fn run_analysis(&self, query: &str) -> Result<AnalysisOutcome> {
        let mut conversation = vec![
            ConversationMessage::system(SYSTEM_PROMPT),
            ConversationMessage::user(query),
        ];
        let mut outcome = AnalysisOutcome::default();

        for iteration in 1..=MAX_ITERATIONS {
            tracing::debug!(iteration, messages = conversation.len(), "Model round trip");

            let turn = self
                .model
                .complete(&conversation, Some(self.tools.schemas()))
                .await?;

            let (content, calls) = match turn {
                ModelTurn::Unparsable(reason) => {
                    tracing::warn!(
                        iteration,
                        reason = %reason,
                        "Unparsable tool call, retrying without tools"
                    );
                    let fallback = self.model.complete(&conversation, None).await?;
                    outcome.analysis = fallback.into_text();
                    return Ok(outcome);
                }
                ModelTurn::PlainText(text) => {
                    conversation.push(ConversationMessage::assistant(text.clone(), Vec::new()));
                    tracing::info!(
                        iterations = iteration,
                        tools = outcome.tools_used.len(),
                        "Analysis complete"
                    );
                    outcome.analysis = text;
                    return Ok(outcome);
                }
                ModelTurn::ToolCalls { content, calls } => (content, calls),
            };

            conversation.push(ConversationMessage::assistant(
                content.unwrap_or_default(),
                calls.clone(),
            ));

            for call in &calls {
                outcome.tools_used.push(call.name.clone());
                let result = self.tools.execute(&call.name, &call.arguments).await?;
                conversation.push(ConversationMessage::tool_result(call, &result));
                outcome.strava_data.insert(call.name.clone(), result);
            }
        }

        tracing::warn!(
            iterations = MAX_ITERATIONS,
            tools = outcome.tools_used.len(),
            "Iteration limit reached without a final answer"
        );
        outcome.analysis = INCOMPLETE_ANALYSIS.to_string();
        Ok(outcome)
    }
}
