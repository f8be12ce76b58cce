//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use trackaro_core::config::TrackaroConfig;
use trackaro_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    config: TrackaroConfig,
) -> Result<()> {
    println!("🚀 Starting Trackaro web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let server_config = ServerConfig::from_env(config.analysis);
    if server_config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!(
            "   🌐 CORS origins: {} ({})",
            server_config.allowed_origins.join(", "),
            ALLOWED_ORIGINS_ENV
        );
    }
    println!();
    println!("   ⚠️  No authentication: the x-trackaro-user header names the owner");
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path)?;
    tracing::info!(host, port, "Starting web server");

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    trackaro_server::serve(db, host, port, static_dir_str, server_config).await?;

    Ok(())
}
