// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity model as fetched from the athlete activity list.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of the athlete's full history.
///
/// Shared by reference so every tool in a conversation reads the same data.
pub type ActivityCollection = Arc<Vec<Activity>>;

/// One recorded exercise session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    /// Strava activity ID
    pub id: u64,
    /// Activity name/title
    #[serde(default)]
    pub name: String,
    /// Activity type (Ride, Run, Swim, ...)
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    /// Distance in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: f64,
    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: f64,
    /// Max speed in m/s
    #[serde(default)]
    pub max_speed: f64,
    /// Elevation gain in meters
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Local start time (ISO 8601, as Strava reports it)
    pub start_date_local: String,
}

/// Activity type. Anything that is not a ride, run or swim keeps its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityType {
    Ride,
    Run,
    Swim,
    Other(String),
}

impl ActivityType {
    pub fn as_str(&self) -> &str {
        match self {
            ActivityType::Ride => "Ride",
            ActivityType::Run => "Run",
            ActivityType::Swim => "Swim",
            ActivityType::Other(name) => name,
        }
    }
}

impl From<String> for ActivityType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Ride" => ActivityType::Ride,
            "Run" => ActivityType::Run,
            "Swim" => ActivityType::Swim,
            _ => ActivityType::Other(value),
        }
    }
}

impl From<ActivityType> for String {
    fn from(value: ActivityType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
