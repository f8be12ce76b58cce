//! Database tests

use super::*;
use crate::analysis::{recommend_for_owner, ExpenseSource};
use crate::config::AnalysisConfig;
use crate::models::*;
use chrono::{Duration, TimeZone};
use rusqlite::params;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
}

fn new_expense(amount: f64, category: Option<&str>, days_ago: i64) -> NewExpense {
    NewExpense {
        amount,
        category: category.map(str::to_string),
        description: None,
        created_at: Some(now() - Duration::days(days_ago)),
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    let expenses = db.list_expenses("alice", 20, 0).unwrap();
    assert!(expenses.is_empty());
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(10.0, None, 0))
        .unwrap();

    // Reopening the same file re-runs migrations without touching data
    let reopened = Database::new(db.path()).unwrap();
    assert_eq!(reopened.count_expenses("alice").unwrap(), 1);
}

#[test]
fn test_expense_crud() {
    let db = Database::in_memory().unwrap();

    let id = db
        .insert_expense(
            "alice",
            &NewExpense {
                amount: 42.5,
                category: Some("  food ".to_string()),
                description: Some("lunch".to_string()),
                created_at: Some(now()),
            },
        )
        .unwrap();
    assert!(id > 0);

    let expense = db.get_expense("alice", id).unwrap().unwrap();
    assert_eq!(expense.amount, 42.5);
    assert_eq!(expense.category.as_deref(), Some("food"));
    assert_eq!(expense.description.as_deref(), Some("lunch"));
    assert_eq!(expense.source, ExpenseOrigin::Manual);
    assert_eq!(expense.created_at, now());

    assert!(db.delete_expense("alice", id).unwrap());
    assert!(db.get_expense("alice", id).unwrap().is_none());
    assert!(!db.delete_expense("alice", id).unwrap());
}

#[test]
fn test_blank_category_stored_as_null() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_expense("alice", &new_expense(5.0, Some("   "), 0))
        .unwrap();

    let expense = db.get_expense("alice", id).unwrap().unwrap();
    assert!(expense.category.is_none());
    assert_eq!(expense.category_or_default(), "Other");
}

#[test]
fn test_negative_amount_rejected() {
    let db = Database::in_memory().unwrap();
    let result = db.insert_expense("alice", &new_expense(-1.0, None, 0));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(db.count_expenses("alice").unwrap(), 0);
}

#[test]
fn test_amount_check_constraint() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    let result = conn.execute(
        "INSERT INTO expenses (owner, amount, created_at) VALUES ('alice', -5, ?)",
        params![format_datetime(&now())],
    );
    assert!(result.is_err());
}

#[test]
fn test_expenses_are_scoped_to_owner() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_expense("alice", &new_expense(10.0, None, 0))
        .unwrap();
    db.insert_expense("bob", &new_expense(20.0, None, 0))
        .unwrap();

    assert_eq!(db.list_expenses("alice", 20, 0).unwrap().len(), 1);
    assert!(db.get_expense("bob", id).unwrap().is_none());
    assert!(!db.delete_expense("bob", id).unwrap());
    assert!(db.get_expense("alice", id).unwrap().is_some());
}

#[test]
fn test_list_expenses_newest_first_with_paging() {
    let db = Database::in_memory().unwrap();
    for days_ago in [3, 1, 2] {
        db.insert_expense("alice", &new_expense(days_ago as f64, None, days_ago))
            .unwrap();
    }

    let page = db.list_expenses("alice", 2, 0).unwrap();
    let amounts: Vec<f64> = page.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, vec![1.0, 2.0]);

    let rest = db.list_expenses("alice", 2, 2).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].amount, 3.0);
}

#[test]
fn test_expenses_since_window_boundary() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(1.0, None, 30))
        .unwrap();
    db.insert_expense("alice", &new_expense(2.0, None, 31))
        .unwrap();
    db.insert_expense("alice", &new_expense(3.0, None, 0))
        .unwrap();

    let since = now() - Duration::days(30);
    let records = db.expenses_since("alice", since).unwrap();
    let amounts: Vec<f64> = records.iter().map(|e| e.amount).collect();
    // Exactly 30 days old is inside the window; oldest first
    assert_eq!(amounts, vec![1.0, 3.0]);

    let via_trait = ExpenseSource::expenses_since(&db, "alice", since).unwrap();
    assert_eq!(via_trait, records);
}

#[test]
fn test_malformed_timestamp_is_invalid_input() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    conn.execute(
        "INSERT INTO expenses (owner, amount, created_at) VALUES ('alice', 5, 'yesterday')",
        [],
    )
    .unwrap();
    drop(conn);

    let result = db.list_expenses("alice", 20, 0);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_recommend_from_database() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(600.0, Some("food"), 1))
        .unwrap();
    db.insert_expense("alice", &new_expense(400.0, Some("travel"), 5))
        .unwrap();
    db.insert_expense("alice", &new_expense(999.0, Some("food"), 45))
        .unwrap();

    let report = recommend_for_owner(&db, "alice", now(), &AnalysisConfig::default()).unwrap();
    assert_eq!(report.total_spending, 1000.0);
    assert_eq!(report.category_breakdown[0].category, "food");
    assert_eq!(report.category_breakdown[0].percentage, 60.0);
    assert_eq!(report.category_breakdown[1].category, "travel");
}

#[test]
fn test_dashboard_summary() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(10.0, Some("food"), 0))
        .unwrap();
    db.insert_expense("alice", &new_expense(20.0, Some("food"), 0))
        .unwrap();
    db.insert_expense("alice", &new_expense(30.0, None, 2))
        .unwrap();
    db.insert_expense("alice", &new_expense(500.0, None, 40))
        .unwrap();

    let dashboard = db.get_dashboard("alice", now(), 30).unwrap();
    assert_eq!(dashboard.window_days, 30);
    assert_eq!(dashboard.total_spending, 60.0);
    assert_eq!(dashboard.average_daily_spending, 2.0);
    assert_eq!(dashboard.expense_count, 3);

    assert_eq!(dashboard.by_category.len(), 2);
    assert_eq!(dashboard.by_category[0].amount, 30.0);

    assert_eq!(dashboard.daily.len(), 2);
    assert!(dashboard.daily[0].date < dashboard.daily[1].date);
    assert_eq!(dashboard.daily[1].amount, 30.0);
    assert_eq!(dashboard.daily[1].count, 2);

    // Recent list is not limited to the window
    assert_eq!(dashboard.recent.len(), 4);
}

#[test]
fn test_dashboard_rejects_oversized_window() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(10.0, None, 0))
        .unwrap();

    let result = db.get_dashboard("alice", now(), u32::MAX);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert!(db.get_dashboard("alice", now(), 36_500).is_ok());
}

#[test]
fn test_insert_rejects_out_of_range_timestamp() {
    let db = Database::in_memory().unwrap();
    let far_future = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
    let expense = NewExpense {
        amount: 5.0,
        category: None,
        description: None,
        created_at: Some(far_future),
    };

    let result = db.insert_expense("alice", &expense);
    assert!(matches!(result, Err(Error::InvalidInput(_))));

    // Nothing was stored, so listing and the dashboard keep working
    assert!(db.list_expenses("alice", 20, 0).unwrap().is_empty());
    assert!(db.get_dashboard("alice", now(), 30).is_ok());
}

#[test]
fn test_dashboard_rejects_zero_window() {
    let db = Database::in_memory().unwrap();
    let result = db.get_dashboard("alice", now(), 0);
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn test_chat_history() {
    let db = Database::in_memory().unwrap();
    db.log_chat_message("alice", "spent 5 on coffee", "expense", "Recorded 5.00")
        .unwrap();
    db.log_chat_message("alice", "how much on coffee?", "query", "5.00")
        .unwrap();
    db.log_chat_message("bob", "hi", "query", "0.00").unwrap();

    let history = db.list_chat_messages("alice", 10).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "how much on coffee?");
    assert_eq!(history[0].kind, "query");
    assert_eq!(history[1].kind, "expense");

    assert_eq!(db.list_chat_messages("alice", 1).unwrap().len(), 1);
}
