//! Trackaro CLI - Expense tracking with savings recommendations
//!
//! Usage:
//!   trackaro init                         Initialize database
//!   trackaro add --amount 12.5 -c food    Record an expense
//!   trackaro recommend                    Savings scenarios and SIP projections
//!   trackaro chat "spent 5 on coffee"     Record or query through the AI backend
//!   trackaro serve --port 3000            Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Add {
            amount,
            category,
            description,
        } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_add(
                &db,
                &cli.user,
                amount,
                category.as_deref(),
                description.as_deref(),
            )?;
            Ok(())
        }
        Commands::List { limit } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_list(&db, &cli.user, limit)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, &cli.user, id)
        }
        Commands::Recommend { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_recommend(&db, &cli.user, &config.analysis, json)
        }
        Commands::Goals { json } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_goals(&db, &cli.user, &config.analysis, json)
        }
        Commands::Dashboard { days } => {
            let db = commands::open_db(&cli.db)?;
            let days = days.unwrap_or(config.analysis.window_days);
            commands::cmd_dashboard(&db, &cli.user, days)
        }
        Commands::Chat { message } => {
            let db = commands::open_db(&cli.db)?;
            let ai = commands::require_ai()?;
            commands::cmd_chat(&db, &ai, &cli.user, &config.analysis, &message).await?;
            Ok(())
        }
        Commands::Classify { message } => {
            let ai = commands::require_ai()?;
            commands::cmd_classify(&ai, &message).await
        }
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref(), config).await,
    }
}
