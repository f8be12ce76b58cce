//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Trackaro - Track expenses and see what cutting back could grow into
#[derive(Parser)]
#[command(name = "trackaro")]
#[command(about = "Self-hosted expense tracker with savings recommendations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "trackaro.db", global = true)]
    pub db: PathBuf,

    /// Owner of the expenses to read and write
    #[arg(long, default_value = "local-dev", global = true)]
    pub user: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Analysis config file (TOML)
    ///
    /// Falls back to TRACKARO_CONFIG, then ~/.local/share/trackaro/config.toml,
    /// then built-in defaults.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record an expense
    Add {
        /// Amount spent (must not be negative)
        #[arg(short, long)]
        amount: f64,

        /// Category label (defaults to "Other" in reports)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List recent expenses
    List {
        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Show savings scenarios and SIP projections
    Recommend {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how long common savings goals would take
    Goals {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show dashboard summary
    Dashboard {
        /// Window length in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Send a chat message: records an expense or answers a spending question
    ///
    /// Requires an AI backend (OLLAMA_HOST, OPENAI_COMPATIBLE_HOST or AI_BACKEND=mock).
    Chat {
        /// The message, e.g. "spent 12 on lunch"
        message: String,
    },

    /// Classify a message without acting on it
    Classify {
        /// The message to classify
        message: String,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
}
