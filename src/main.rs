// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava Insights API Server
//!
//! Answers natural-language questions about the athlete's Strava history
//! by letting a language model call analytic tools over cached activities.

use std::sync::Arc;
use strava_insights::{
    config::Config,
    db::InsightStore,
    services::{
        ActivityCache, AnalysisOrchestrator, LlmClient, StravaClient, StravaCredentials,
        ToolRegistry,
    },
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Strava Insights API");

    let strava = StravaClient::new(
        config.strava_api_url.clone(),
        config.strava_token_url.clone(),
        config.strava_client_id.clone(),
        config.strava_client_secret.clone(),
        StravaCredentials {
            access_token: config.strava_access_token.clone(),
            refresh_token: config.strava_refresh_token.clone(),
        },
    );

    // One cache per process, shared by every request
    let cache = ActivityCache::new(Arc::new(strava), config.activity_cache_ttl);
    tracing::info!(
        ttl_secs = config.activity_cache_ttl.as_secs(),
        "Activity cache initialized"
    );

    let model = LlmClient::new(
        config.llm_base_url.clone(),
        config.llm_api_key.clone(),
        config.llm_model.clone(),
    );
    tracing::info!(model = %config.llm_model, "Model client initialized");

    let orchestrator = AnalysisOrchestrator::new(Arc::new(model), ToolRegistry::new(cache));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        orchestrator,
        insights: InsightStore::new(),
    });

    // Build router
    let app = strava_insights::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("strava_insights=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
