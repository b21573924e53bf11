//! Storage layer for analysis results.

pub mod insights;

pub use insights::InsightStore;
