//! Domain models for Trackaro

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::CategoryAmount;

/// Category label used when an expense has none
pub const DEFAULT_CATEGORY: &str = "Other";

/// How an expense entered the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseOrigin {
    /// Entered through the expenses API or CLI
    Manual,
    /// Logged from a chat message via the NLU backend
    Chat,
}

impl ExpenseOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Chat => "chat",
        }
    }
}

impl std::str::FromStr for ExpenseOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Self::Manual),
            "chat" => Ok(Self::Chat),
            _ => Err(format!("Unknown expense origin: {}", s)),
        }
    }
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    /// Identifier of the user who owns this expense
    pub owner: String,
    /// Non-negative currency amount
    pub amount: f64,
    pub category: Option<String>,
    pub description: Option<String>,
    pub source: ExpenseOrigin,
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Category label with blanks folded into [`DEFAULT_CATEGORY`]
    pub fn category_or_default(&self) -> &str {
        normalize_category(self.category.as_deref())
    }
}

/// Trim a category label, mapping missing or blank labels to [`DEFAULT_CATEGORY`]
pub fn normalize_category(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CATEGORY,
    }
}

/// A new expense to be stored (before DB insertion)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to "now" when omitted
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl NewExpense {
    /// Reject amounts that would corrupt aggregates and timestamps that cannot be stored
    pub fn validate(&self) -> crate::Result<()> {
        validate_amount(self.amount)?;
        if let Some(created_at) = self.created_at {
            validate_timestamp(created_at)?;
        }
        Ok(())
    }
}

/// Amounts must be finite and non-negative
pub fn validate_amount(amount: f64) -> crate::Result<()> {
    if !amount.is_finite() {
        return Err(crate::Error::InvalidInput(format!(
            "amount must be a number, got {}",
            amount
        )));
    }
    if amount < 0.0 {
        return Err(crate::Error::InvalidInput(format!(
            "amount must not be negative, got {}",
            amount
        )));
    }
    Ok(())
}

/// Stored timestamps are fixed-width text, so the year must have four digits
pub fn validate_timestamp(at: DateTime<Utc>) -> crate::Result<()> {
    if !(0..=9999).contains(&at.year()) {
        return Err(crate::Error::InvalidInput(format!(
            "created_at year must be between 0000 and 9999, got {}",
            at.year()
        )));
    }
    Ok(())
}

/// Spending on a single calendar day (dashboard chart point)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpending {
    pub date: NaiveDate,
    pub amount: f64,
    pub count: i64,
}

/// Dashboard data for the trailing window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub window_days: u32,
    pub total_spending: f64,
    pub average_daily_spending: f64,
    pub expense_count: i64,
    pub by_category: Vec<CategoryAmount>,
    pub daily: Vec<DailySpending>,
    pub recent: Vec<ExpenseRecord>,
}

/// A chat message with the reply that was sent back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub id: i64,
    pub owner: String,
    pub message: String,
    /// "expense" or "query"
    pub kind: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}
