//! Report command implementations (recommend, goals, dashboard)

use anyhow::{Context, Result};
use chrono::Utc;
use trackaro_core::analysis::{goals_for_owner, recommend_for_owner, CategoryAmount};
use trackaro_core::config::AnalysisConfig;
use trackaro_core::db::Database;

use super::truncate;

fn print_categories(categories: &[CategoryAmount]) {
    for c in categories {
        println!(
            "   {:<20} ${:>10.2}  {:>6.2}%",
            truncate(&c.category, 20),
            c.amount,
            c.percentage
        );
    }
}

pub fn cmd_recommend(
    db: &Database,
    owner: &str,
    config: &AnalysisConfig,
    json: bool,
) -> Result<()> {
    let report = recommend_for_owner(db, owner, Utc::now(), config)?;

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    println!("💡 Savings Recommendations (last {} days)", config.window_days);
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Total spending:       ${:.2}", report.total_spending);
    println!("   Estimated monthly:    ${:.2}", report.estimated_monthly_spending);
    println!("   Average per day:      ${:.2}", report.average_daily_spending);

    if report.category_breakdown.is_empty() {
        println!();
        println!("   No expenses in this window yet.");
        return Ok(());
    }

    println!();
    println!("📊 By Category");
    print_categories(&report.category_breakdown);

    println!();
    println!("✂️  If You Cut Back");
    for scenario in &report.savings_scenarios {
        println!(
            "   {:>3}% → save ${:.2}/month",
            scenario.reduction_percent, scenario.monthly_savings
        );
    }

    println!();
    println!("📈 Investing The Savings (SIP)");
    for scenario in &report.sip_projections {
        println!(
            "   {}% reduction, ${:.2}/month:",
            scenario.reduction_percent, scenario.monthly_investment
        );
        for p in &scenario.projections {
            println!(
                "      {:>2} years: ${:.2} invested → ${:.2} (+${:.2}, {:.2}%)",
                p.years, p.total_invested, p.expected_value, p.profit, p.return_percentage
            );
        }
    }

    Ok(())
}

pub fn cmd_goals(db: &Database, owner: &str, config: &AnalysisConfig, json: bool) -> Result<()> {
    let report = goals_for_owner(db, owner, Utc::now(), config)?;

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    println!("🎯 Savings Goals");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Average per day:      ${:.2}", report.average_daily_spending);
    println!(
        "   Saving {}% per month: ${:.2}",
        config.goal_savings_rate_percent, report.monthly_savings_at_rate
    );
    println!();

    for goal in &report.goals {
        let timeline = match goal.months_to_goal {
            Some(months) => format!("{} months", months),
            None => "not reachable at this rate".to_string(),
        };
        let marker = if goal.achievable { "✅" } else { "⏳" };
        println!(
            "   {} {:<28} ${:>10.2}  {}",
            marker, goal.name, goal.target_amount, timeline
        );
    }

    Ok(())
}

pub fn cmd_dashboard(db: &Database, owner: &str, days: u32) -> Result<()> {
    let dashboard = db.get_dashboard(owner, Utc::now(), days)?;

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│         💰 Trackaro Dashboard           │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Window:          last {} days", dashboard.window_days);
    println!("  Expenses:        {}", dashboard.expense_count);
    println!("  Total spent:     ${:.2}", dashboard.total_spending);
    println!("  Average per day: ${:.2}", dashboard.average_daily_spending);

    if !dashboard.by_category.is_empty() {
        println!();
        println!("  📊 Top Categories");
        for c in dashboard.by_category.iter().take(5) {
            println!(
                "     {:<20} ${:>10.2}  {:>6.2}%",
                truncate(&c.category, 20),
                c.amount,
                c.percentage
            );
        }
    }

    if !dashboard.recent.is_empty() {
        println!();
        println!("  📝 Recent");
        for e in &dashboard.recent {
            println!(
                "     {} │ ${:>9.2} │ {}",
                e.created_at.format("%Y-%m-%d"),
                e.amount,
                e.category_or_default()
            );
        }
    }

    println!();
    Ok(())
}
