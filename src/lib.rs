// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava Insights: answer questions about your training history
//!
//! This crate provides the backend API that lets a language model pick
//! analytic tools over the athlete's cached Strava activities and
//! summarize what they return.

pub mod config;
pub mod db;
pub mod error;
pub mod format_utils;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::InsightStore;
use services::AnalysisOrchestrator;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub orchestrator: AnalysisOrchestrator,
    pub insights: InsightStore,
}
