//! Expense command implementations

use anyhow::Result;
use trackaro_core::db::Database;
use trackaro_core::models::{ExpenseRecord, NewExpense};

use super::truncate;

fn print_expense_line(expense: &ExpenseRecord) {
    println!(
        "   [{}] {} │ {:>10} │ {:<12} │ {}",
        expense.id,
        expense.created_at.format("%Y-%m-%d %H:%M"),
        format!("${:.2}", expense.amount),
        truncate(expense.category_or_default(), 12),
        truncate(expense.description.as_deref().unwrap_or(""), 35)
    );
}

pub fn cmd_add(
    db: &Database,
    owner: &str,
    amount: f64,
    category: Option<&str>,
    description: Option<&str>,
) -> Result<i64> {
    let new_expense = NewExpense {
        amount,
        category: category.map(str::to_string),
        description: description.map(str::to_string),
        created_at: None,
    };

    let id = db.insert_expense(owner, &new_expense)?;
    tracing::debug!(id, owner, "Inserted expense");

    println!("✅ Recorded expense {}:", id);
    if let Some(expense) = db.get_expense(owner, id)? {
        print_expense_line(&expense);
    }

    Ok(id)
}

pub fn cmd_list(db: &Database, owner: &str, limit: i64) -> Result<()> {
    let expenses = db.list_expenses(owner, limit.max(1), 0)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  trackaro add --amount 12.50 --category food");
        return Ok(());
    }

    let total = db.count_expenses(owner)?;

    println!();
    println!("📝 Recent Expenses ({} of {})", expenses.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in &expenses {
        print_expense_line(expense);
    }

    Ok(())
}

pub fn cmd_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    if !db.delete_expense(owner, id)? {
        anyhow::bail!("Expense {} not found", id);
    }

    println!("🗑️  Deleted expense {}", id);

    Ok(())
}
