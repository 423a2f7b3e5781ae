//! Daily Summary Model
//!
//! Derived financial rollup, one row per (restaurant, calendar date).
//! Regenerating a summary fully replaces the stored row; nothing is
//! incremented in place.

use serde::{Deserialize, Serialize};

/// Daily settlement summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySummary {
    pub restaurant_id: String,
    /// Business date (YYYY-MM-DD)
    pub date: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub order_count: i64,
    pub takeaway_count: i64,
    pub dine_in_count: i64,
    /// When the summary was (re)generated (Unix millis)
    pub generated_at: i64,
}

/// Weekly or monthly rollup row, aggregated read-side from stored
/// daily summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodSummary {
    /// First summarized date in the period (YYYY-MM-DD)
    pub period_start: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
    pub order_count: i64,
    pub takeaway_count: i64,
    pub dine_in_count: i64,
}
