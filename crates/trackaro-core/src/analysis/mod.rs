//! Spending analysis and savings projections
//!
//! Pipeline: aggregate → savings scenarios → SIP projections. Each stage is a
//! pure function of the previous stage's output; nothing is cached between
//! calls.
//!
//! - `aggregate` - totals and category breakdown over the trailing window
//! - `sip` - annuity-due future value projections
//! - `goals` - fixed-target savings goals (second consumer of the aggregate)
//!
//! All arithmetic runs in full `f64` precision. Values are rounded to two
//! decimals only when the serializable reports are built.

mod aggregate;
mod goals;
mod sip;

pub use aggregate::aggregate;
pub use goals::{months_to_goal, monthly_savings_at_rate, savings_goals, GOAL_TARGETS};
pub use sip::{future_value, monthly_return_rate, project_scenarios, project_sip};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AnalysisConfig, MAX_WINDOW_DAYS};
use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

/// Data access for the analysis pipeline
///
/// Implemented by the database and by in-memory record lists, so the
/// pipeline never reaches for a shared client.
pub trait ExpenseSource {
    /// Expenses for `owner` created at or after `since`
    fn expenses_since(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>>;
}

impl ExpenseSource for [ExpenseRecord] {
    fn expenses_since(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>> {
        Ok(self
            .iter()
            .filter(|r| r.owner == owner && r.created_at >= since)
            .cloned()
            .collect())
    }
}

impl ExpenseSource for Vec<ExpenseRecord> {
    fn expenses_since(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>> {
        self.as_slice().expenses_since(owner, since)
    }
}

/// Spending within one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
}

impl CategoryAmount {
    pub fn rounded(&self) -> Self {
        Self {
            category: self.category.clone(),
            amount: round2(self.amount),
            percentage: round2(self.percentage),
        }
    }
}

/// Totals over the trailing window
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    pub total_spending: f64,
    pub average_daily_spending: f64,
    /// Sorted by amount, largest first
    pub category_breakdown: Vec<CategoryAmount>,
}

/// Hypothetical monthly savings from cutting spending by a fixed percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsScenario {
    pub reduction_percent: u32,
    pub monthly_savings: f64,
    pub description: String,
}

impl SavingsScenario {
    pub fn rounded(&self) -> Self {
        Self {
            monthly_savings: round2(self.monthly_savings),
            ..self.clone()
        }
    }
}

/// Projection of a monthly contribution over one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipProjection {
    pub years: u32,
    pub total_invested: f64,
    pub expected_value: f64,
    pub profit: f64,
    pub return_percentage: f64,
    pub description: String,
}

impl SipProjection {
    pub fn rounded(&self) -> Self {
        Self {
            years: self.years,
            total_invested: round2(self.total_invested),
            expected_value: round2(self.expected_value),
            profit: round2(self.profit),
            return_percentage: round2(self.return_percentage),
            description: self.description.clone(),
        }
    }
}

/// All horizon projections for one savings scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioProjections {
    pub reduction_percent: u32,
    pub monthly_investment: f64,
    pub projections: Vec<SipProjection>,
}

impl ScenarioProjections {
    pub fn rounded(&self) -> Self {
        Self {
            reduction_percent: self.reduction_percent,
            monthly_investment: round2(self.monthly_investment),
            projections: self.projections.iter().map(SipProjection::rounded).collect(),
        }
    }
}

/// Serialized output of the recommendations pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub total_spending: f64,
    pub estimated_monthly_spending: f64,
    pub average_daily_spending: f64,
    pub category_breakdown: Vec<CategoryAmount>,
    pub savings_scenarios: Vec<SavingsScenario>,
    pub sip_projections: Vec<ScenarioProjections>,
}

/// A fixed savings target and how long it takes to reach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub name: String,
    pub target_amount: f64,
    pub monthly_savings: f64,
    /// `None` when nothing is being saved
    pub months_to_goal: Option<u32>,
    pub achievable: bool,
}

impl SavingsGoal {
    pub fn rounded(&self) -> Self {
        Self {
            target_amount: round2(self.target_amount),
            monthly_savings: round2(self.monthly_savings),
            ..self.clone()
        }
    }
}

/// Serialized output of the goal sizing path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsReport {
    pub total_spending: f64,
    pub average_daily_spending: f64,
    pub monthly_savings_at_rate: f64,
    pub category_breakdown: Vec<CategoryAmount>,
    pub goals: Vec<SavingsGoal>,
    /// Always empty: no category-level recommendation source exists yet
    pub recommendations: Vec<String>,
    /// Always empty: expenses carry a single category level
    pub subcategory_breakdown: Vec<CategoryAmount>,
}

/// Round to two decimal places for presentation
pub fn round2(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid serializing "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0
pub(crate) fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// One scenario per configured reduction percentage
pub fn savings_scenarios(
    estimated_monthly_spending: f64,
    config: &AnalysisConfig,
) -> Vec<SavingsScenario> {
    config
        .reduction_percents
        .iter()
        .map(|&pct| SavingsScenario {
            reduction_percent: pct,
            monthly_savings: estimated_monthly_spending * f64::from(pct) / 100.0,
            description: format!("{}% reduction in monthly spending", pct),
        })
        .collect()
}

/// Run the full pipeline over pre-filtered records
pub fn recommend(records: &[ExpenseRecord], config: &AnalysisConfig) -> Result<RecommendationReport> {
    let aggregate = aggregate(records, config)?;

    // The trailing window stands in for one month
    let estimated_monthly = aggregate.total_spending;
    let scenarios = savings_scenarios(estimated_monthly, config);
    let projections = project_scenarios(&scenarios, config);

    debug!(
        records = records.len(),
        total = aggregate.total_spending,
        categories = aggregate.category_breakdown.len(),
        "Computed recommendations"
    );

    Ok(RecommendationReport {
        total_spending: round2(aggregate.total_spending),
        estimated_monthly_spending: round2(estimated_monthly),
        average_daily_spending: round2(aggregate.average_daily_spending),
        category_breakdown: aggregate
            .category_breakdown
            .iter()
            .map(CategoryAmount::rounded)
            .collect(),
        savings_scenarios: scenarios.iter().map(SavingsScenario::rounded).collect(),
        sip_projections: projections.iter().map(ScenarioProjections::rounded).collect(),
    })
}

/// Run goal sizing over pre-filtered records
pub fn goals_report(records: &[ExpenseRecord], config: &AnalysisConfig) -> Result<GoalsReport> {
    let aggregate = aggregate(records, config)?;
    let goals = savings_goals(&aggregate, config);

    Ok(GoalsReport {
        total_spending: round2(aggregate.total_spending),
        average_daily_spending: round2(aggregate.average_daily_spending),
        monthly_savings_at_rate: round2(monthly_savings_at_rate(&aggregate, config)),
        category_breakdown: aggregate
            .category_breakdown
            .iter()
            .map(CategoryAmount::rounded)
            .collect(),
        goals: goals.iter().map(SavingsGoal::rounded).collect(),
        recommendations: Vec::new(),
        subcategory_breakdown: Vec::new(),
    })
}

/// The instant `days` days before `now`
///
/// Fails with `InvalidInput` when `days` exceeds [`MAX_WINDOW_DAYS`] or the
/// result falls outside the representable range.
pub fn days_before(now: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>> {
    if days > MAX_WINDOW_DAYS {
        return Err(Error::InvalidInput(format!(
            "window of {} days exceeds the maximum of {} days",
            days, MAX_WINDOW_DAYS
        )));
    }
    Duration::try_days(i64::from(days))
        .and_then(|d| now.checked_sub_signed(d))
        .ok_or_else(|| Error::InvalidInput(format!("window of {} days is out of range", days)))
}

/// Start of the trailing window ending at `now`
pub fn window_start(now: DateTime<Utc>, config: &AnalysisConfig) -> Result<DateTime<Utc>> {
    days_before(now, config.window_days)
}

/// Fetch the owner's trailing window from `source` and run the pipeline
pub fn recommend_for_owner<S: ExpenseSource + ?Sized>(
    source: &S,
    owner: &str,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> Result<RecommendationReport> {
    let records = source.expenses_since(owner, window_start(now, config)?)?;
    recommend(&records, config)
}

/// Fetch the owner's trailing window from `source` and size savings goals
pub fn goals_for_owner<S: ExpenseSource + ?Sized>(
    source: &S,
    owner: &str,
    now: DateTime<Utc>,
    config: &AnalysisConfig,
) -> Result<GoalsReport> {
    let records = source.expenses_since(owner, window_start(now, config)?)?;
    goals_report(&records, config)
}


#[cfg(test)]
mod tests {
    use super::test_support::expense;
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;

    #[test]
    fn test_single_food_record_report() {
        let records = vec![expense(1, 1000.0, Some("food"))];
        let report = recommend(&records, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.total_spending, 1000.0);
        assert_eq!(report.estimated_monthly_spending, 1000.0);
        assert_eq!(report.average_daily_spending, 33.33);
        assert_eq!(
            report.category_breakdown,
            vec![CategoryAmount {
                category: "food".to_string(),
                amount: 1000.0,
                percentage: 100.0,
            }]
        );
        assert_eq!(report.savings_scenarios[0].reduction_percent, 5);
        assert_eq!(report.savings_scenarios[0].monthly_savings, 50.0);
        assert_eq!(
            report.savings_scenarios[0].description,
            "5% reduction in monthly spending"
        );
    }

    #[test]
    fn test_scenarios_are_five_ten_fifteen() {
        let scenarios = savings_scenarios(2000.0, &AnalysisConfig::default());
        let pcts: Vec<u32> = scenarios.iter().map(|s| s.reduction_percent).collect();
        let savings: Vec<f64> = scenarios.iter().map(|s| s.monthly_savings).collect();
        assert_eq!(pcts, vec![5, 10, 15]);
        assert_eq!(savings, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_scenarios_zero_input() {
        let scenarios = savings_scenarios(0.0, &AnalysisConfig::default());
        assert_eq!(scenarios.len(), 3);
        assert!(scenarios.iter().all(|s| s.monthly_savings == 0.0));
    }

    #[test]
    fn test_empty_input_report() {
        let report = recommend(&[], &AnalysisConfig::default()).unwrap();

        assert_eq!(report.total_spending, 0.0);
        assert_eq!(report.average_daily_spending, 0.0);
        assert!(report.category_breakdown.is_empty());
        assert_eq!(report.savings_scenarios.len(), 3);
        assert_eq!(report.sip_projections.len(), 3);
        for scenario in &report.sip_projections {
            assert_eq!(scenario.monthly_investment, 0.0);
            for p in &scenario.projections {
                assert_eq!(p.total_invested, 0.0);
                assert_eq!(p.expected_value, 0.0);
                assert_eq!(p.profit, 0.0);
                assert_eq!(p.return_percentage, 0.0);
            }
        }
    }

    #[test]
    fn test_report_projection_shape() {
        let records = vec![expense(1, 2000.0, Some("rent"))];
        let report = recommend(&records, &AnalysisConfig::default()).unwrap();

        let first = &report.sip_projections[0];
        assert_eq!(first.reduction_percent, 5);
        assert_eq!(first.monthly_investment, 100.0);
        assert_eq!(first.projections.len(), 2);
        assert_eq!(first.projections[0].years, 5);
        assert_eq!(first.projections[0].total_invested, 6000.0);
        assert_eq!(first.projections[0].expected_value, 8110.36);
        assert_eq!(first.projections[0].profit, 2110.36);
        assert_eq!(first.projections[1].years, 10);
        assert_eq!(first.projections[1].expected_value, 22403.59);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let records = vec![
            expense(1, 123.45, Some("food")),
            expense(2, 67.89, Some("travel")),
            expense(3, 10.0, None),
        ];
        let config = AnalysisConfig::default();
        let a = recommend(&records, &config).unwrap();
        let b = recommend(&records, &config).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_invalid_amount_fails_pipeline() {
        let records = vec![expense(1, 10.0, None), expense(2, f64::NAN, None)];
        assert!(matches!(
            recommend(&records, &AnalysisConfig::default()),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_report_json_field_names() {
        let records = vec![expense(1, 1000.0, Some("food"))];
        let report = recommend(&records, &AnalysisConfig::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();

        for key in [
            "totalSpending",
            "estimatedMonthlySpending",
            "averageDailySpending",
            "categoryBreakdown",
            "savingsScenarios",
            "sipProjections",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        let projection = &json["sipProjections"][0]["projections"][0];
        for key in [
            "years",
            "totalInvested",
            "expectedValue",
            "profit",
            "returnPercentage",
            "description",
        ] {
            assert!(projection.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(json["savingsScenarios"][0]["reductionPercent"], 5);
        assert_eq!(json["sipProjections"][0]["monthlyInvestment"], 50.0);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(2.675000001), 2.68);
        assert_eq!(round2(-0.001), 0.0);
        assert!(round2(-0.001).is_sign_positive());
    }

    #[test]
    fn test_recommend_for_owner_filters_window_and_owner() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let mut old = expense(1, 500.0, Some("food"));
        old.created_at = now - Duration::days(31);
        let recent = expense(2, 300.0, Some("food"));
        let mut other = expense(3, 700.0, Some("food"));
        other.owner = "bob".to_string();

        let records = vec![old, recent, other];
        let report =
            recommend_for_owner(&records, "alice", now, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.total_spending, 300.0);
    }

    #[test]
    fn test_days_before_bounds() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        assert_eq!(
            days_before(now, 30).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap()
        );
        assert!(days_before(now, MAX_WINDOW_DAYS).is_ok());
        assert!(matches!(
            days_before(now, MAX_WINDOW_DAYS + 1),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            days_before(now, u32::MAX),
            Err(Error::InvalidInput(_))
        ));
        // Near chrono's lower limit the subtraction itself overflows
        assert!(matches!(
            days_before(DateTime::<Utc>::MIN_UTC, 1),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_recommend_for_owner_rejects_oversized_window() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap();
        let config = AnalysisConfig {
            window_days: u32::MAX,
            ..Default::default()
        };
        let records = vec![expense(1, 300.0, Some("food"))];
        assert!(matches!(
            recommend_for_owner(&records, "alice", now, &config),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_goals_report_open_fields_are_empty() {
        let records = vec![expense(1, 3000.0, Some("rent"))];
        let report = goals_report(&records, &AnalysisConfig::default()).unwrap();

        assert_eq!(report.total_spending, 3000.0);
        assert_eq!(report.average_daily_spending, 100.0);
        assert_eq!(report.monthly_savings_at_rate, 300.0);
        assert_eq!(report.goals.len(), 3);
        assert!(report.recommendations.is_empty());
        assert!(report.subcategory_breakdown.is_empty());
    }
}
