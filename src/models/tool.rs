// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The fixed catalogue of analytic tools the model may call.

use serde::Serialize;
use serde_json::{json, Value};

/// Every tool the model may request. Adding one means extending this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    LongestRide,
    FastestRide,
    LongestRun,
    FastestRun,
    LongestSwim,
    FastestSwim,
    ActivitySummary,
    RecentActivities,
}

impl ToolKind {
    pub const ALL: [ToolKind; 8] = [
        ToolKind::LongestRide,
        ToolKind::FastestRide,
        ToolKind::LongestRun,
        ToolKind::FastestRun,
        ToolKind::LongestSwim,
        ToolKind::FastestSwim,
        ToolKind::ActivitySummary,
        ToolKind::RecentActivities,
    ];

    /// Map a model-reported tool name to a tool. `None` means unknown tool.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "get_longest_ride" => Some(ToolKind::LongestRide),
            "get_fastest_ride" => Some(ToolKind::FastestRide),
            "get_longest_run" => Some(ToolKind::LongestRun),
            "get_fastest_run" => Some(ToolKind::FastestRun),
            "get_longest_swim" => Some(ToolKind::LongestSwim),
            "get_fastest_swim" => Some(ToolKind::FastestSwim),
            "get_activity_summary" => Some(ToolKind::ActivitySummary),
            "get_recent_activities" => Some(ToolKind::RecentActivities),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::LongestRide => "get_longest_ride",
            ToolKind::FastestRide => "get_fastest_ride",
            ToolKind::LongestRun => "get_longest_run",
            ToolKind::FastestRun => "get_fastest_run",
            ToolKind::LongestSwim => "get_longest_swim",
            ToolKind::FastestSwim => "get_fastest_swim",
            ToolKind::ActivitySummary => "get_activity_summary",
            ToolKind::RecentActivities => "get_recent_activities",
        }
    }

    fn description(self) -> &'static str {
        match self {
            ToolKind::LongestRide => "Get the longest bike ride by distance",
            ToolKind::FastestRide => "Get the fastest bike ride by average speed",
            ToolKind::LongestRun => "Get the longest run by distance",
            ToolKind::FastestRun => "Get the fastest run by average speed",
            ToolKind::LongestSwim => "Get the longest swim by distance",
            ToolKind::FastestSwim => "Get the fastest swim by average speed",
            ToolKind::ActivitySummary => {
                "Get overall statistics: total activities, counts by type, total distance, \
                 total moving time and the date range covered"
            }
            ToolKind::RecentActivities => "Get the most recent activities, newest first",
        }
    }

    /// Wire schema for this tool.
    pub fn schema(self) -> ToolSchema {
        let parameters = match self {
            ToolKind::RecentActivities => json!({
                "type": "object",
                "properties": {
                    "count": {
                        "type": "integer",
                        "description": "Number of activities to return (default 5, max 10)"
                    }
                },
                "required": []
            }),
            _ => json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        };

        ToolSchema {
            name: self.name(),
            description: self.description(),
            parameters,
        }
    }
}

/// Tool definition advertised to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSchema {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON Schema object: `{type: "object", properties, required}`
    pub parameters: Value,
}
