//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::validate_amount;

/// What a free-text chat message asks for
///
/// Serialized with a `type` tag, which is also the shape the model is asked
/// to reply with:
///
/// ```json
/// {"type": "expense", "amount": 12.5, "category": "food", "description": "lunch"}
/// {"type": "query", "category": "food", "days": 7}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageClassification {
    /// The user reports money spent
    Expense {
        amount: f64,
        #[serde(default)]
        category: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// The user asks how much was spent
    Query {
        #[serde(default)]
        category: Option<String>,
        /// Look-back period; the analysis window when absent
        #[serde(default)]
        days: Option<u32>,
    },
}

impl MessageClassification {
    /// Short label stored alongside chat history
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Expense { .. } => "expense",
            Self::Query { .. } => "query",
        }
    }

    /// Reject classifications that would store an unusable expense
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Expense { amount, .. } => validate_amount(*amount),
            Self::Query { days: Some(0), .. } => Err(Error::InvalidInput(
                "query days must be greater than 0".to_string(),
            )),
            Self::Query { .. } => Ok(()),
        }
    }
}
