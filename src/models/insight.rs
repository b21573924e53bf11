// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analysis results and their stored form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// Result of answering one user query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    /// Final text shown to the user
    pub analysis: String,
    /// Tool names in invocation order (duplicates kept)
    pub tools_used: Vec<String>,
    /// Last result per tool name
    pub strava_data: Map<String, Value>,
}

/// Stored analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Insight {
    pub id: Uuid,
    pub query: String,
    pub analysis: String,
    pub tools_used: Vec<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, unknown>"))]
    pub strava_data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Insight {
    pub fn new(query: String, outcome: AnalysisOutcome) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            query,
            analysis: outcome.analysis,
            tools_used: outcome.tools_used,
            strava_data: outcome.strava_data,
            created_at: now,
            updated_at: now,
        }
    }
}
