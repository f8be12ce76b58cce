//! Savings goal sizing
//!
//! Second consumer of the aggregate: fixed-target goals expressed in days of
//! average spending, reached by saving a flat share of monthly spending.

use crate::config::AnalysisConfig;

use super::{AggregateResult, SavingsGoal};

/// Fixed goals as (name, days of average daily spending)
pub const GOAL_TARGETS: [(&str, u32); 3] = [
    ("Emergency fund (3 months)", 90),
    ("Emergency fund (6 months)", 180),
    ("Annual expenses buffer", 365),
];

/// Monthly savings assumed when sizing goals
///
/// The window is treated as one month, so total spending is the monthly figure.
pub fn monthly_savings_at_rate(aggregate: &AggregateResult, config: &AnalysisConfig) -> f64 {
    aggregate.total_spending * config.goal_savings_rate_percent / 100.0
}

/// Whole months needed to reach `target` saving `monthly` each month
///
/// `None` when nothing is being saved and the target is positive.
pub fn months_to_goal(target: f64, monthly: f64) -> Option<u32> {
    if target <= 0.0 {
        return Some(0);
    }
    if monthly <= 0.0 {
        return None;
    }
    let months = (target / monthly).ceil();
    if months > f64::from(u32::MAX) {
        return None;
    }
    Some(months as u32)
}

/// Size every fixed goal against the aggregate
pub fn savings_goals(aggregate: &AggregateResult, config: &AnalysisConfig) -> Vec<SavingsGoal> {
    let monthly = monthly_savings_at_rate(aggregate, config);

    GOAL_TARGETS
        .iter()
        .map(|&(name, days)| {
            let target = aggregate.average_daily_spending * f64::from(days);
            let months = months_to_goal(target, monthly);
            SavingsGoal {
                name: name.to_string(),
                target_amount: target,
                monthly_savings: monthly,
                months_to_goal: months,
                achievable: months.is_some_and(|m| m <= config.achievable_within_months),
            }
        })
        .collect()
}
