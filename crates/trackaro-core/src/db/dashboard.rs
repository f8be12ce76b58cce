//! Dashboard summary

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;

use super::Database;
use crate::analysis::{aggregate, days_before, round2, CategoryAmount};
use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{DailySpending, DashboardSummary};

/// Number of most recent expenses included in the dashboard
pub const DASHBOARD_RECENT_LIMIT: i64 = 5;

impl Database {
    /// Summarize an owner's spending over the `window_days` ending at `now`
    ///
    /// The category breakdown comes from the same aggregate the
    /// recommendations pipeline uses, so both views always agree.
    pub fn get_dashboard(
        &self,
        owner: &str,
        now: DateTime<Utc>,
        window_days: u32,
    ) -> Result<DashboardSummary> {
        if window_days == 0 {
            return Err(Error::InvalidInput(
                "window_days must be greater than 0".to_string(),
            ));
        }

        let since = days_before(now, window_days)?;
        let records = self.expenses_since(owner, since)?;

        let config = AnalysisConfig {
            window_days,
            ..Default::default()
        };
        let summary = aggregate(&records, &config)?;

        let mut daily: BTreeMap<NaiveDate, DailySpending> = BTreeMap::new();
        for record in &records {
            let date = record.created_at.date_naive();
            let entry = daily.entry(date).or_insert(DailySpending {
                date,
                amount: 0.0,
                count: 0,
            });
            entry.amount += record.amount;
            entry.count += 1;
        }

        let recent = self.list_expenses(owner, DASHBOARD_RECENT_LIMIT, 0)?;

        debug!(
            owner,
            window_days,
            expenses = records.len(),
            "Built dashboard"
        );

        Ok(DashboardSummary {
            window_days,
            total_spending: round2(summary.total_spending),
            average_daily_spending: round2(summary.average_daily_spending),
            expense_count: records.len() as i64,
            by_category: summary
                .category_breakdown
                .iter()
                .map(CategoryAmount::rounded)
                .collect(),
            daily: daily
                .into_values()
                .map(|d| DailySpending {
                    amount: round2(d.amount),
                    ..d
                })
                .collect(),
            recent,
        })
    }
}
