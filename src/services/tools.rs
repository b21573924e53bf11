// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Analytic tools the model can call over the cached activity history.
//!
//! Every tool reads the same cached snapshot and returns plain JSON.
//! Unknown tool names produce an `{error}` object rather than a failure,
//! so the model can correct itself on the next turn.

use crate::error::AppError;
use crate::format_utils::{hours, km, kmh, minutes};
use crate::models::{Activity, ActivityType, ToolKind, ToolSchema};
use crate::services::ActivityCache;
use serde_json::{json, Value};
use std::collections::BTreeMap;

const DEFAULT_RECENT_COUNT: i64 = 5;
const MAX_RECENT_COUNT: i64 = 10;

/// Registry of the fixed tool catalogue.
#[derive(Clone)]
pub struct ToolRegistry {
    cache: ActivityCache,
    schemas: Vec<ToolSchema>,
}

impl ToolRegistry {
    pub fn new(cache: ActivityCache) -> Self {
        Self {
            cache,
            schemas: ToolKind::ALL.iter().map(|kind| kind.schema()).collect(),
        }
    }

    /// Schemas advertised to the model, in catalogue order.
    pub fn schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// Execute a tool by its model-reported name.
    ///
    /// Only activity fetch failures are returned as errors.
    pub async fn execute(&self, name: &str, arguments: &Value) -> Result<Value, AppError> {
        let Some(kind) = ToolKind::from_name(name) else {
            tracing::warn!(tool = name, "Model requested unknown tool");
            return Ok(json!({ "error": format!("Unknown tool: {}", name) }));
        };

        let activities = self.cache.get_activities().await?;
        tracing::info!(tool = name, activities = activities.len(), "Executing tool");

        Ok(run_tool(kind, &activities, arguments))
    }
}

/// Run a tool against a snapshot.
pub fn run_tool(kind: ToolKind, activities: &[Activity], arguments: &Value) -> Value {
    match kind {
        ToolKind::LongestRide => best_of_type(activities, ActivityType::Ride, by_distance),
        ToolKind::FastestRide => best_of_type(activities, ActivityType::Ride, by_speed),
        ToolKind::LongestRun => best_of_type(activities, ActivityType::Run, by_distance),
        ToolKind::FastestRun => best_of_type(activities, ActivityType::Run, by_speed),
        ToolKind::LongestSwim => best_of_type(activities, ActivityType::Swim, by_distance),
        ToolKind::FastestSwim => best_of_type(activities, ActivityType::Swim, by_speed),
        ToolKind::ActivitySummary => activity_summary(activities),
        ToolKind::RecentActivities => recent_activities(activities, requested_count(arguments)),
    }
}

fn by_distance(activity: &Activity) -> f64 {
    activity.distance
}

fn by_speed(activity: &Activity) -> f64 {
    activity.average_speed
}

/// Highest `key` among activities of one type.
///
/// Uses strict `>`, so on a tie the first activity seen wins.
fn best_of_type(
    activities: &[Activity],
    activity_type: ActivityType,
    key: fn(&Activity) -> f64,
) -> Value {
    let best = activities
        .iter()
        .filter(|a| a.activity_type == activity_type)
        .fold(None::<&Activity>, |best, activity| match best {
            Some(current) if key(current) >= key(activity) => Some(current),
            _ => Some(activity),
        });

    match best {
        Some(activity) => format_activity(activity),
        None => json!({ "message": format!("No {} found", plural(&activity_type)) }),
    }
}

fn plural(activity_type: &ActivityType) -> String {
    format!("{}s", activity_type.as_str().to_lowercase())
}

/// Full projection used by the longest/fastest tools.
fn format_activity(activity: &Activity) -> Value {
    json!({
        "name": activity.name,
        "date": activity.start_date_local,
        "distance_km": km(activity.distance),
        "avg_speed_kmh": kmh(activity.average_speed),
        "max_speed_kmh": kmh(activity.max_speed),
        "moving_time_min": minutes(activity.moving_time),
        "elevation_gain_m": activity.total_elevation_gain,
    })
}

fn activity_summary(activities: &[Activity]) -> Value {
    let mut by_type: BTreeMap<&str, u64> = BTreeMap::new();
    let mut total_distance = 0.0;
    let mut total_moving_time = 0.0;

    for activity in activities {
        *by_type.entry(activity.activity_type.as_str()).or_insert(0) += 1;
        total_distance += activity.distance;
        total_moving_time += activity.moving_time;
    }

    // ISO 8601 local timestamps order lexicographically.
    let earliest = activities.iter().map(|a| a.start_date_local.as_str()).min();
    let latest = activities.iter().map(|a| a.start_date_local.as_str()).max();
    let date_range = match (earliest, latest) {
        (Some(earliest), Some(latest)) => json!({ "earliest": earliest, "latest": latest }),
        _ => Value::Null,
    };

    json!({
        "total_activities": activities.len(),
        "activities_by_type": by_type,
        "total_distance_km": km(total_distance),
        "total_moving_time_hours": hours(total_moving_time),
        "date_range": date_range,
    })
}

/// `count` argument: default 5, capped at 10. Lower values pass through.
fn requested_count(arguments: &Value) -> i64 {
    let count = match arguments.get("count") {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };

    count.unwrap_or(DEFAULT_RECENT_COUNT).min(MAX_RECENT_COUNT)
}

fn recent_activities(activities: &[Activity], count: i64) -> Value {
    // Non-positive counts yield an empty list.
    let take = usize::try_from(count).unwrap_or(0);

    let mut sorted: Vec<&Activity> = activities.iter().collect();
    sorted.sort_by(|a, b| b.start_date_local.cmp(&a.start_date_local));

    let recent: Vec<Value> = sorted
        .into_iter()
        .take(take)
        .map(|activity| {
            json!({
                "name": activity.name,
                "type": activity.activity_type.as_str(),
                "date": activity.start_date_local,
                "distance_km": km(activity.distance),
                "moving_time_min": minutes(activity.moving_time),
                "elevation_gain_m": activity.total_elevation_gain,
            })
        })
        .collect();

    Value::Array(recent)
}
