// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod conversation;
pub mod insight;
pub mod tool;

pub use activity::{Activity, ActivityCollection, ActivityType};
pub use conversation::{ConversationMessage, ModelTurn, Role, ToolCall};
pub use insight::{AnalysisOutcome, Insight};
pub use tool::{ToolKind, ToolSchema};
