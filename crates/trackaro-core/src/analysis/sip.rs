//! Systematic investment plan (SIP) projections
//!
//! Contributions are made at the start of each month (annuity-due), so each
//! one compounds for a full period before the next arrives:
//!
//! ```text
//! r  = (1 + annual)^(1/12) - 1
//! FV = P * n                              if r == 0
//! FV = P * (((1 + r)^n - 1) / r) * (1 + r) otherwise
//! ```
//!
//! The trailing `(1 + r)` factor is what separates this from an ordinary
//! annuity. Removing it changes every projected value.

use crate::config::AnalysisConfig;

use super::{percentage_of, SavingsScenario, ScenarioProjections, SipProjection};

/// Convert an annual rate into the equivalent compounded monthly rate
pub fn monthly_return_rate(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Future value of `months` start-of-month contributions of `monthly` at `rate`
pub fn future_value(monthly: f64, rate: f64, months: u32) -> f64 {
    let n = f64::from(months);
    if rate == 0.0 {
        return monthly * n;
    }
    monthly * (((1.0 + rate).powf(n) - 1.0) / rate) * (1.0 + rate)
}

/// Project a constant monthly contribution over every configured horizon
pub fn project_sip(monthly_investment: f64, config: &AnalysisConfig) -> Vec<SipProjection> {
    let rate = monthly_return_rate(config.annual_return_rate);

    config
        .horizon_years
        .iter()
        .map(|&years| {
            let months = years * 12;
            let total_invested = monthly_investment * f64::from(months);
            let expected_value = future_value(monthly_investment, rate, months);
            let profit = expected_value - total_invested;

            SipProjection {
                years,
                total_invested,
                expected_value,
                profit,
                return_percentage: percentage_of(profit, total_invested),
                description: format!(
                    "Investing {:.2} monthly for {} years",
                    monthly_investment, years
                ),
            }
        })
        .collect()
}

/// Project every savings scenario
pub fn project_scenarios(
    scenarios: &[SavingsScenario],
    config: &AnalysisConfig,
) -> Vec<ScenarioProjections> {
    scenarios
        .iter()
        .map(|scenario| ScenarioProjections {
            reduction_percent: scenario.reduction_percent,
            monthly_investment: scenario.monthly_savings,
            projections: project_sip(scenario.monthly_savings, config),
        })
        .collect()
}
