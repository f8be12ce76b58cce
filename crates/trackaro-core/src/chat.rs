//! Chat message handling
//!
//! Classifies a free-text message through an AI backend, then either records
//! an expense or answers a spending question from the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ai::{AIBackend, MessageClassification};
use crate::analysis::{days_before, round2};
use crate::config::AnalysisConfig;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{normalize_category, ExpenseOrigin, ExpenseRecord, NewExpense};

/// Reply to a handled chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatReply {
    /// An expense was stored
    ExpenseRecorded {
        expense: ExpenseRecord,
        message: String,
    },
    /// A spending question was answered
    QueryAnswer {
        category: Option<String>,
        days: u32,
        total: f64,
        count: usize,
        message: String,
    },
}

impl ChatReply {
    /// Human-readable reply text
    pub fn message(&self) -> &str {
        match self {
            Self::ExpenseRecorded { message, .. } | Self::QueryAnswer { message, .. } => message,
        }
    }
}

/// Handles chat messages for one backend and database
pub struct ChatService<'a, B: AIBackend> {
    db: &'a Database,
    backend: &'a B,
    config: &'a AnalysisConfig,
}

impl<'a, B: AIBackend> ChatService<'a, B> {
    pub fn new(db: &'a Database, backend: &'a B, config: &'a AnalysisConfig) -> Self {
        Self {
            db,
            backend,
            config,
        }
    }

    /// Classify `text` and act on it for `owner`
    pub async fn handle_message(
        &self,
        owner: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ChatReply> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("message must not be empty".to_string()));
        }

        let classification = self.backend.classify_message(text).await?;
        classification.validate()?;
        debug!(kind = classification.kind(), "Classified chat message");

        let reply = match classification {
            MessageClassification::Expense {
                amount,
                category,
                description,
            } => self.record_expense(owner, amount, category, description, now)?,
            MessageClassification::Query { category, days } => {
                self.answer_query(owner, category, days, now)?
            }
        };

        self.db
            .log_chat_message(owner, text, classification_kind(&reply), reply.message())?;

        Ok(reply)
    }

    fn record_expense(
        &self,
        owner: &str,
        amount: f64,
        category: Option<String>,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<ChatReply> {
        let new_expense = NewExpense {
            amount,
            category,
            description,
            created_at: Some(now),
        };
        let id = self
            .db
            .insert_expense_from(owner, &new_expense, ExpenseOrigin::Chat)?;
        let expense = self
            .db
            .get_expense(owner, id)?
            .ok_or_else(|| Error::NotFound(format!("expense {}", id)))?;

        let message = format!(
            "Recorded {:.2} for {}",
            expense.amount,
            expense.category_or_default()
        );
        info!(id, owner, "Recorded expense from chat");

        Ok(ChatReply::ExpenseRecorded { expense, message })
    }

    fn answer_query(
        &self,
        owner: &str,
        category: Option<String>,
        days: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<ChatReply> {
        let days = days.unwrap_or(self.config.window_days);
        let since = days_before(now, days)?;
        let category = category
            .as_deref()
            .map(|c| normalize_category(Some(c)).to_string());

        let matching: Vec<ExpenseRecord> = self
            .db
            .expenses_since(owner, since)?
            .into_iter()
            .filter(|e| match &category {
                Some(c) => e.category_or_default().eq_ignore_ascii_case(c),
                None => true,
            })
            .collect();

        let total = round2(matching.iter().map(|e| e.amount).sum());
        let count = matching.len();

        let message = match &category {
            Some(c) => format!(
                "You spent {:.2} on {} in the last {} days ({} expenses)",
                total, c, days, count
            ),
            None => format!(
                "You spent {:.2} in the last {} days ({} expenses)",
                total, days, count
            ),
        };

        Ok(ChatReply::QueryAnswer {
            category,
            days,
            total,
            count,
            message,
        })
    }
}

fn classification_kind(reply: &ChatReply) -> &'static str {
    match reply {
        ChatReply::ExpenseRecorded { .. } => "expense",
        ChatReply::QueryAnswer { .. } => "query",
    }
}
