//! Mock backend for testing
//!
//! Classifies messages with a few regex rules instead of a model. Useful for
//! unit tests and development without a running LLM server.

use async_trait::async_trait;
use regex::Regex;

use crate::error::{Error, Result};

use super::types::MessageClassification;
use super::AIBackend;

const AMOUNT_PATTERN: &str = r"(\d+(?:\.\d+)?)";
const CATEGORY_PATTERN: &str = r"(?i)\b(?:on|for)\s+([a-z][a-z ]*?)(?:\s+(?:in|during|over|this|last|past|today|yesterday)\b|[?.!,]|$)";
const QUERY_PATTERN: &str = r"(?i)^\s*(?:how much|what did i spend|what have i spent|total)\b|\?\s*$";
const DAYS_PATTERN: &str = r"(?i)\b(?:last|past)\s+(\d+)\s+days?\b";
const WEEK_PATTERN: &str = r"(?i)\b(?:this|last|past)\s+week\b";
const MONTH_PATTERN: &str = r"(?i)\b(?:this|last|past)\s+month\b";

/// Mock AI backend for testing
///
/// - Questions ("how much ...", anything ending in `?`) become queries.
/// - Anything containing a number becomes an expense for that amount.
/// - The category is the phrase after "on" or "for".
#[derive(Clone, Default)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self { healthy: true }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self { healthy: false }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    fn category(message: &str) -> Result<Option<String>> {
        let re = Regex::new(CATEGORY_PATTERN)?;
        Ok(re
            .captures(message)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_lowercase())
            .filter(|c| !c.is_empty()))
    }

    fn days(message: &str) -> Result<Option<u32>> {
        if let Some(days) = Regex::new(DAYS_PATTERN)?
            .captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
        {
            return Ok(Some(days));
        }
        if Regex::new(WEEK_PATTERN)?.is_match(message) {
            return Ok(Some(7));
        }
        if Regex::new(MONTH_PATTERN)?.is_match(message) {
            return Ok(Some(30));
        }
        Ok(None)
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn classify_message(&self, message: &str) -> Result<MessageClassification> {
        let message = message.trim();

        if Regex::new(QUERY_PATTERN)?.is_match(message) {
            return Ok(MessageClassification::Query {
                category: Self::category(message)?,
                days: Self::days(message)?,
            });
        }

        let amount = Regex::new(AMOUNT_PATTERN)?
            .captures(message)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok());

        match amount {
            Some(amount) => Ok(MessageClassification::Expense {
                amount,
                category: Self::category(message)?,
                description: Some(message.to_string()),
            }),
            None => Err(Error::Unclassifiable(message.to_string())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expense_message() {
        let backend = MockBackend::new();
        let c = backend
            .classify_message("Spent 12.50 on food today")
            .await
            .unwrap();
        assert_eq!(
            c,
            MessageClassification::Expense {
                amount: 12.5,
                category: Some("food".to_string()),
                description: Some("Spent 12.50 on food today".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_expense_without_category() {
        let backend = MockBackend::new();
        let c = backend.classify_message("paid 40").await.unwrap();
        assert_eq!(
            c,
            MessageClassification::Expense {
                amount: 40.0,
                category: None,
                description: Some("paid 40".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_query_message() {
        let backend = MockBackend::new();
        let c = backend
            .classify_message("How much did I spend on food in the last 7 days?")
            .await
            .unwrap();
        assert_eq!(
            c,
            MessageClassification::Query {
                category: Some("food".to_string()),
                days: Some(7),
            }
        );
    }

    #[tokio::test]
    async fn test_query_this_week() {
        let backend = MockBackend::new();
        let c = backend
            .classify_message("what did I spend this week?")
            .await
            .unwrap();
        assert_eq!(
            c,
            MessageClassification::Query {
                category: None,
                days: Some(7),
            }
        );
    }

    #[tokio::test]
    async fn test_unclassifiable_message() {
        let backend = MockBackend::new();
        let err = backend.classify_message("hello there").await.unwrap_err();
        assert!(matches!(err, Error::Unclassifiable(_)));
    }

    #[tokio::test]
    async fn test_health() {
        assert!(MockBackend::new().health_check().await);
        assert!(!MockBackend::unhealthy().health_check().await);
    }
}
