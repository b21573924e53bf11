// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity_cache;
pub mod llm;
pub mod orchestrator;
pub mod strava;
pub mod tools;

pub use activity_cache::{ActivityCache, ActivitySource};
pub use llm::{ChatModel, LlmClient};
pub use orchestrator::AnalysisOrchestrator;
pub use strava::{StravaClient, StravaCredentials};
pub use tools::ToolRegistry;
