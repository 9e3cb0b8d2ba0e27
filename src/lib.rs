//! Business Health Chat
//!
//! A console assistant that:
//! - Registers small and medium business financial profiles
//! - Annotates company names and sectors (tokens, lemmas, POS tags, embeddings)
//! - Scores financial health with a fixed four-indicator formula
//! - Persists every profile to a single JSON snapshot
//! - Answers commands and free-text questions about the registered companies
//!
//! FLOW PER LINE:
//! INPUT → CLASSIFY → (REGISTER → ANALYZE → PERSIST) | QUERY → REPLY

pub mod analysis;
pub mod chat;
pub mod classifier;
pub mod config;
pub mod error;
pub mod models;
pub mod nlp;
pub mod report;
pub mod scoring;
pub mod store;

pub use error::Result;

// Re-export common types
pub use models::*;
pub use chat::{ChatSession, Flow};
pub use classifier::{Command, Intent, IntentClassifier};
pub use config::ChatConfig;
pub use store::{CompanyStore, LoadStatus};
