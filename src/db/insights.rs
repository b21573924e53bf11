// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store of analysis results.
//!
//! Records live for the lifetime of the process and are not persisted.

use crate::models::{AnalysisOutcome, Insight};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Insight store shared across requests.
#[derive(Clone, Default)]
pub struct InsightStore {
    insights: Arc<DashMap<Uuid, Insight>>,
}

impl InsightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the outcome of a query and return the record with its ID.
    pub fn save(&self, query: &str, outcome: AnalysisOutcome) -> Insight {
        let insight = Insight::new(query.to_string(), outcome);
        self.insights.insert(insight.id, insight.clone());
        tracing::debug!(id = %insight.id, "Insight stored");
        insight
    }

    pub fn get(&self, id: Uuid) -> Option<Insight> {
        self.insights.get(&id).map(|entry| entry.value().clone())
    }

    /// All insights, newest first.
    pub fn list(&self) -> Vec<Insight> {
        let mut insights: Vec<Insight> = self
            .insights
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        insights
    }
}
