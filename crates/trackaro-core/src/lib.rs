//! Trackaro Core Library
//!
//! Shared functionality for the Trackaro expense tracker:
//! - Spending aggregation, savings scenarios and SIP projections
//! - Savings goal sizing
//! - Database access and migrations
//! - Pluggable AI backends for chat message classification
//! - Chat service that records expenses and answers spending questions
//! - Analysis configuration

pub mod ai;
pub mod analysis;
pub mod chat;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

/// Test utilities including mock Ollama server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIBackend, AIClient, MessageClassification, MockBackend, OllamaBackend,
    OpenAICompatibleBackend,
};
pub use analysis::{
    goals_for_owner, recommend, recommend_for_owner, AggregateResult, CategoryAmount,
    ExpenseSource, GoalsReport, RecommendationReport, SavingsGoal, SavingsScenario,
    ScenarioProjections, SipProjection,
};
pub use chat::{ChatReply, ChatService};
pub use config::{AnalysisConfig, TrackaroConfig};
pub use db::Database;
pub use error::{Error, Result};
