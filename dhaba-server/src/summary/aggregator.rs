//! Daily summary aggregation
//!
//! A summary is a pure function of the stored orders and expenses for a
//! (restaurant, date): revenue from orders completed inside the local-day
//! window, expenses from expense rows dated inside the same window.
//! Regeneration fully replaces the stored row. Weekly and monthly views
//! are grouped read-side from stored daily rows and are never persisted.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use shared::models::{DailySummary, OrderStatus, OrderType, PeriodSummary};
use shared::util::now_millis;

use super::{SummaryError, SummaryResult};
use crate::db::PosStorage;
use crate::orders::money::{to_decimal, to_f64};
use crate::utils::time::{day_end_millis, day_start_millis, format_date, parse_date};

/// History grouping granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

/// History response: raw daily rows, or grouped period rows
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SummaryHistory {
    Daily(Vec<DailySummary>),
    Grouped(Vec<PeriodSummary>),
}

#[derive(Default)]
struct PeriodAcc {
    period_start: String,
    revenue: Decimal,
    expenses: Decimal,
    order_count: i64,
    takeaway_count: i64,
    dine_in_count: i64,
}

pub struct SummaryAggregator {
    storage: PosStorage,
    tz: Tz,
}

impl SummaryAggregator {
    pub fn new(storage: PosStorage, tz: Tz) -> Self {
        Self { storage, tz }
    }

    /// Generate (or regenerate) the summary for a business date and
    /// store it, replacing any previous row for the same key.
    pub fn generate_daily(
        &self,
        restaurant_id: &str,
        date: NaiveDate,
    ) -> SummaryResult<DailySummary> {
        let restaurant = self
            .storage
            .get_restaurant(restaurant_id)?
            .ok_or_else(|| {
                SummaryError::NotFound(format!("restaurant {} not found", restaurant_id))
            })?;

        let start = day_start_millis(date, self.tz);
        let end = day_end_millis(date, self.tz);

        let mut revenue = Decimal::ZERO;
        let mut order_count = 0i64;
        let mut takeaway_count = 0i64;
        let mut dine_in_count = 0i64;

        for order in self.storage.orders_for_restaurant(restaurant_id)? {
            if order.status != OrderStatus::Completed {
                continue;
            }
            let Some(completed_at) = order.completed_at else {
                continue;
            };
            if completed_at < start || completed_at >= end {
                continue;
            }
            revenue += to_decimal(order.total_amount);
            order_count += 1;
            match order.order_type {
                OrderType::Takeaway => takeaway_count += 1,
                OrderType::DineIn => dine_in_count += 1,
            }
        }

        let expenses = restaurant
            .expenses
            .iter()
            .filter(|e| e.date >= start && e.date < end)
            .fold(Decimal::ZERO, |acc, e| acc + to_decimal(e.amount));

        let summary = DailySummary {
            restaurant_id: restaurant_id.to_string(),
            date: format_date(date),
            revenue: to_f64(revenue),
            expenses: to_f64(expenses),
            profit: to_f64(revenue - expenses),
            order_count,
            takeaway_count,
            dine_in_count,
            generated_at: now_millis(),
        };
        self.storage.put_summary(&summary)?;

        info!(
            restaurant_id,
            date = %summary.date,
            revenue = summary.revenue,
            order_count,
            "daily summary generated"
        );
        Ok(summary)
    }

    /// Stored summaries grouped by period, newest period first, at most
    /// `limit` rows.
    pub fn history(
        &self,
        restaurant_id: &str,
        period: Period,
        limit: usize,
    ) -> SummaryResult<SummaryHistory> {
        let mut summaries = self.storage.summaries_for_restaurant(restaurant_id)?;

        match period {
            Period::Daily => {
                summaries.sort_by(|a, b| b.date.cmp(&a.date));
                summaries.truncate(limit);
                Ok(SummaryHistory::Daily(summaries))
            }
            Period::Weekly => Ok(SummaryHistory::Grouped(Self::group_by(
                summaries,
                limit,
                |d| {
                    let week = d.iso_week();
                    (week.year(), week.week())
                },
            ))),
            Period::Monthly => Ok(SummaryHistory::Grouped(Self::group_by(
                summaries,
                limit,
                |d| (d.year(), d.month()),
            ))),
        }
    }

    fn group_by<K>(
        summaries: Vec<DailySummary>,
        limit: usize,
        key_fn: impl Fn(NaiveDate) -> K,
    ) -> Vec<PeriodSummary>
    where
        K: Ord,
    {
        let mut groups: BTreeMap<K, PeriodAcc> = BTreeMap::new();
        for summary in summaries {
            // Rows with an unparseable date key cannot be bucketed; skip
            let Ok(date) = parse_date(&summary.date) else {
                continue;
            };
            let acc = groups.entry(key_fn(date)).or_default();
            if acc.period_start.is_empty() || summary.date < acc.period_start {
                acc.period_start = summary.date.clone();
            }
            acc.revenue += to_decimal(summary.revenue);
            acc.expenses += to_decimal(summary.expenses);
            acc.order_count += summary.order_count;
            acc.takeaway_count += summary.takeaway_count;
            acc.dine_in_count += summary.dine_in_count;
        }

        // BTreeMap iterates ascending by period key; reverse for newest first
        let rows: Vec<PeriodSummary> = groups
            .into_values()
            .rev()
            .take(limit)
            .map(|acc| PeriodSummary {
                period_start: acc.period_start,
                revenue: to_f64(acc.revenue),
                expenses: to_f64(acc.expenses),
                profit: to_f64(acc.revenue - acc.expenses),
                order_count: acc.order_count,
                takeaway_count: acc.takeaway_count,
                dine_in_count: acc.dine_in_count,
            })
            .collect();
        rows
    }
}
