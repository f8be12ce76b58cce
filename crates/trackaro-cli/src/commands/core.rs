//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `load_config` - Resolve the analysis config file
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use trackaro_core::config::TrackaroConfig;
use trackaro_core::db::Database;

/// Open (and migrate) the database at the given path
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    Database::new(path_str).context("Failed to open database")
}

/// Load the analysis config: --config, then TRACKARO_CONFIG, then the data dir
pub fn load_config(explicit: Option<&Path>) -> Result<TrackaroConfig> {
    let config = TrackaroConfig::load(explicit).context("Failed to load config")?;
    tracing::debug!(
        window_days = config.analysis.window_days,
        "Loaded analysis config"
    );
    Ok(config)
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    open_db(db_path)?;

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Record an expense: trackaro add --amount 12.50 --category food");
    println!("  2. See what you could save: trackaro recommend");
    println!("  3. Start web UI: trackaro serve");

    Ok(())
}
