// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for display formatting of tool results.
//!
//! Values are rendered as fixed-precision strings so that the model sees
//! stable numbers. Internal computation always uses the raw `f64`s.

const METERS_PER_KM: f64 = 1000.0;
const KMH_PER_MS: f64 = 3.6;
const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3600.0;

/// Format a value with a fixed number of decimals, rounding halves away
/// from zero (`format!` alone rounds them to even).
pub fn fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    format!("{:.*}", decimals, (value * scale).round() / scale)
}

/// Meters to kilometers, two decimals.
pub fn km(meters: f64) -> String {
    fixed(meters / METERS_PER_KM, 2)
}

/// Meters per second to km/h, two decimals.
pub fn kmh(meters_per_second: f64) -> String {
    fixed(meters_per_second * KMH_PER_MS, 2)
}

/// Seconds to minutes, one decimal.
pub fn minutes(seconds: f64) -> String {
    fixed(seconds / SECONDS_PER_MINUTE, 1)
}

/// Seconds to hours, one decimal.
pub fn hours(seconds: f64) -> String {
    fixed(seconds / SECONDS_PER_HOUR, 1)
}
