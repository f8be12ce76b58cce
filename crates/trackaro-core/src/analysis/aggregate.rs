//! Spending aggregation over the trailing window

use std::collections::HashMap;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

use super::{percentage_of, AggregateResult, CategoryAmount};

/// Compute totals and the category breakdown for a set of expenses
///
/// The records are expected to be pre-filtered to the trailing window.
/// `average_daily_spending` always divides by `config.window_days`, not by
/// the number of days that actually contain expenses.
///
/// Categories are grouped on their trimmed label (blank → "Other") and sorted
/// by amount, largest first. Ties keep first-encountered order.
///
/// Any record with a negative or non-finite amount fails the whole
/// computation.
pub fn aggregate(records: &[ExpenseRecord], config: &AnalysisConfig) -> Result<AggregateResult> {
    let mut total = 0.0;
    let mut groups: Vec<CategoryAmount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if !record.amount.is_finite() || record.amount < 0.0 {
            return Err(Error::InvalidInput(format!(
                "expense {} has invalid amount {}",
                record.id, record.amount
            )));
        }

        total += record.amount;

        let category = record.category_or_default();
        match index.get(category) {
            Some(&i) => groups[i].amount += record.amount,
            None => {
                index.insert(category, groups.len());
                groups.push(CategoryAmount {
                    category: category.to_string(),
                    amount: record.amount,
                    percentage: 0.0,
                });
            }
        }
    }

    for group in &mut groups {
        group.percentage = percentage_of(group.amount, total);
    }

    // sort_by is stable
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    Ok(AggregateResult {
        total_spending: total,
        average_daily_spending: total / f64::from(config.window_days),
        category_breakdown: groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::expense;

    #[test]
    fn test_single_record() {
        let records = vec![expense(1, 1000.0, Some("food"))];
        let result = aggregate(&records, &AnalysisConfig::default()).unwrap();

        assert_eq!(result.total_spending, 1000.0);
        assert!((result.average_daily_spending - 33.333333).abs() < 1e-5);
        assert_eq!(result.category_breakdown.len(), 1);
        assert_eq!(result.category_breakdown[0].category, "food");
        assert_eq!(result.category_breakdown[0].amount, 1000.0);
        assert_eq!(result.category_breakdown[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_records() {
        let result = aggregate(&[], &AnalysisConfig::default()).unwrap();
        assert_eq!(result.total_spending, 0.0);
        assert_eq!(result.average_daily_spending, 0.0);
        assert!(result.category_breakdown.is_empty());
    }

    #[test]
    fn test_zero_total_gives_zero_percentages() {
        let records = vec![
            expense(1, 0.0, Some("food")),
            expense(2, 0.0, Some("travel")),
        ];
        let result = aggregate(&records, &AnalysisConfig::default()).unwrap();

        assert_eq!(result.total_spending, 0.0);
        for group in &result.category_breakdown {
            assert_eq!(group.percentage, 0.0);
            assert!(!group.percentage.is_nan());
        }
    }

    #[test]
    fn test_missing_and_blank_categories_become_other() {
        let records = vec![
            expense(1, 10.0, None),
            expense(2, 20.0, Some("  ")),
            expense(3, 5.0, Some("")),
        ];
        let result = aggregate(&records, &AnalysisConfig::default()).unwrap();

        assert_eq!(result.category_breakdown.len(), 1);
        assert_eq!(result.category_breakdown[0].category, "Other");
        assert_eq!(result.category_breakdown[0].amount, 35.0);
    }

    #[test]
    fn test_sorted_descending_and_stable_on_ties() {
        let records = vec![
            expense(1, 50.0, Some("books")),
            expense(2, 200.0, Some("rent")),
            expense(3, 50.0, Some("games")),
            expense(4, 25.0, Some("books")),
            expense(5, 75.0, Some("games")),
            expense(6, 75.0, Some("music")),
        ];
        let result = aggregate(&records, &AnalysisConfig::default()).unwrap();

        let order: Vec<&str> = result
            .category_breakdown
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        // books and music tie at 75; books was seen first
        assert_eq!(order, vec!["rent", "games", "books", "music"]);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let records = vec![
            expense(1, 12.34, Some("food")),
            expense(2, 56.78, Some("travel")),
            expense(3, 0.99, Some("food")),
            expense(4, 100.01, None),
        ];
        let result = aggregate(&records, &AnalysisConfig::default()).unwrap();

        let amount_sum: f64 = result.category_breakdown.iter().map(|c| c.amount).sum();
        let pct_sum: f64 = result.category_breakdown.iter().map(|c| c.percentage).sum();
        assert!((amount_sum - result.total_spending).abs() < 1e-9);
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let records = vec![expense(1, 10.0, Some("food")), expense(2, -5.0, None)];
        let err = aggregate(&records, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_nan_amount_is_rejected() {
        let records = vec![expense(1, f64::NAN, Some("food"))];
        let err = aggregate(&records, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_window_divisor_is_configurable() {
        let config = AnalysisConfig {
            window_days: 10,
            ..Default::default()
        };
        let records = vec![expense(1, 100.0, Some("food"))];
        let result = aggregate(&records, &config).unwrap();
        assert_eq!(result.average_daily_spending, 10.0);
    }
}
