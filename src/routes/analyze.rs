// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Query submission route.

use crate::error::{AppError, Result};
use crate::models::Insight;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Longest accepted query, in characters.
const MAX_QUERY_LEN: usize = 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/analyze", post(analyze))
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    query: Option<String>,
}

/// Run an analysis and store the result.
async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Insight>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let query = request
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::BadRequest("Query is required".to_string()))?;

    if query.chars().count() > MAX_QUERY_LEN {
        return Err(AppError::BadRequest(format!(
            "Query must be at most {} characters",
            MAX_QUERY_LEN
        )));
    }

    tracing::info!(query_len = query.len(), "Analyzing query");

    let outcome = state.orchestrator.run_analysis(query).await?;
    let insight = state.insights.save(query, outcome);

    tracing::info!(
        id = %insight.id,
        tools = ?insight.tools_used,
        "Analysis stored"
    );

    Ok(Json(insight))
}
