//! Expense CRUD operations

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tracing::debug;

use super::{format_datetime, parse_datetime, Database};
use crate::analysis::ExpenseSource;
use crate::error::Result;
use crate::models::{ExpenseOrigin, ExpenseRecord, NewExpense};

const EXPENSE_COLUMNS: &str = "id, owner, amount, category, description, source, created_at";

/// Row as stored, before timestamp and origin parsing
struct ExpenseRow {
    id: i64,
    owner: String,
    amount: f64,
    category: Option<String>,
    description: Option<String>,
    source: String,
    created_at: String,
}

impl ExpenseRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            description: row.get(4)?,
            source: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<ExpenseRecord> {
        Ok(ExpenseRecord {
            id: self.id,
            owner: self.owner,
            amount: self.amount,
            category: self.category,
            description: self.description,
            // Unknown values fall back to manual
            source: self.source.parse().unwrap_or(ExpenseOrigin::Manual),
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl Database {
    /// Store a new expense and return its ID
    ///
    /// Blank categories are stored as NULL; the "Other" label is applied at
    /// read time.
    pub fn insert_expense(&self, owner: &str, expense: &NewExpense) -> Result<i64> {
        self.insert_expense_from(owner, expense, ExpenseOrigin::Manual)
    }

    /// Store a new expense recording how it was entered
    pub fn insert_expense_from(
        &self,
        owner: &str,
        expense: &NewExpense,
        origin: ExpenseOrigin,
    ) -> Result<i64> {
        expense.validate()?;

        let category = expense
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let description = expense
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        let created_at = expense.created_at.unwrap_or_else(Utc::now);

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (owner, amount, category, description, source, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                owner,
                expense.amount,
                category,
                description,
                origin.as_str(),
                format_datetime(&created_at)
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, owner, amount = expense.amount, "Inserted expense");
        Ok(id)
    }

    /// Get a single expense owned by `owner`
    pub fn get_expense(&self, owner: &str, id: i64) -> Result<Option<ExpenseRecord>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT {} FROM expenses WHERE owner = ? AND id = ?",
                    EXPENSE_COLUMNS
                ),
                params![owner, id],
                ExpenseRow::from_row,
            )
            .optional()?;

        row.map(ExpenseRow::into_record).transpose()
    }

    /// List an owner's expenses, newest first
    pub fn list_expenses(&self, owner: &str, limit: i64, offset: i64) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE owner = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
            EXPENSE_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![owner, limit, offset], ExpenseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ExpenseRow::into_record).collect()
    }

    /// Count an owner's expenses
    pub fn count_expenses(&self, owner: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE owner = ?",
            params![owner],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete an expense; returns whether a row was removed
    pub fn delete_expense(&self, owner: &str, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE owner = ? AND id = ?",
            params![owner, id],
        )?;
        Ok(deleted > 0)
    }

    /// An owner's expenses created at or after `since`, oldest first
    pub fn expenses_since(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM expenses WHERE owner = ? AND created_at >= ?
             ORDER BY created_at ASC, id ASC",
            EXPENSE_COLUMNS
        ))?;

        let rows = stmt
            .query_map(params![owner, format_datetime(&since)], ExpenseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ExpenseRow::into_record).collect()
    }
}

impl ExpenseSource for Database {
    fn expenses_since(&self, owner: &str, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>> {
        Database::expenses_since(self, owner, since)
    }
}
