//! AI-backed command implementations (chat, classify)

use anyhow::{Context, Result};
use chrono::Utc;
use trackaro_core::ai::{AIBackend, AIClient};
use trackaro_core::chat::{ChatReply, ChatService};
use trackaro_core::config::AnalysisConfig;
use trackaro_core::db::Database;

/// The AI backend from the environment, or an error explaining how to set one up
pub fn require_ai() -> Result<AIClient> {
    AIClient::from_env().context(
        "AI backend not configured. Set OLLAMA_HOST, OPENAI_COMPATIBLE_HOST or AI_BACKEND=mock",
    )
}

pub async fn cmd_chat(
    db: &Database,
    ai: &AIClient,
    owner: &str,
    config: &AnalysisConfig,
    message: &str,
) -> Result<ChatReply> {
    tracing::debug!(model = ai.model(), host = ai.host(), "Sending chat message");
    let service = ChatService::new(db, ai, config);
    let reply = service.handle_message(owner, message, Utc::now()).await?;

    match &reply {
        ChatReply::ExpenseRecorded { expense, .. } => {
            println!("✅ {} (id {})", reply.message(), expense.id);
        }
        ChatReply::QueryAnswer { .. } => {
            println!("💬 {}", reply.message());
        }
    }

    Ok(reply)
}

pub async fn cmd_classify(ai: &AIClient, message: &str) -> Result<()> {
    println!("🤖 Classifying with {} ({})...", ai.model(), ai.host());

    let classification = match ai.classify_message(message.trim()).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to classify '{}': {}", message.trim(), e);
            return Err(e.into());
        }
    };
    let out =
        serde_json::to_string_pretty(&classification).context("Failed to serialize result")?;
    println!("{}", out);

    Ok(())
}
