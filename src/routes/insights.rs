// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read access to stored insights.

use crate::error::{AppError, Result};
use crate::models::Insight;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/insights", get(list_insights))
        .route("/insights/{id}", get(get_insight))
}

/// All insights, newest first.
async fn list_insights(State(state): State<Arc<AppState>>) -> Json<Vec<Insight>> {
    Json(state.insights.list())
}

async fn get_insight(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Insight>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::BadRequest("Invalid insight ID".to_string()))?;

    state
        .insights
        .get(id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Insight {}", id)))
}
