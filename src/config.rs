//! Runtime configuration
//!
//! Values come from the process environment (optionally seeded from a
//! `.env` file by the binary). Every field has a usable default so the
//! chat always starts.

use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "empresas_data.json";
pub const DEFAULT_LEXICON_PATH: &str = "data/lexicon_es.json";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";

const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// JSON snapshot holding every registered company
    pub data_path: PathBuf,
    /// Lexicon resource for the full tagger/lemmatizer
    pub lexicon_path: PathBuf,
    /// Gemini key for remote embeddings; `None` disables them
    pub gemini_api_key: Option<String>,
    pub embedding_model: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            lexicon_path: PathBuf::from(DEFAULT_LEXICON_PATH),
            gemini_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl ChatConfig {
    /// Overlay environment variables on top of the defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(path) = env::var("HEALTH_CHAT_DATA") {
            if !path.trim().is_empty() {
                config.data_path = PathBuf::from(path);
            }
        }

        if let Ok(path) = env::var("HEALTH_CHAT_LEXICON") {
            if !path.trim().is_empty() {
                config.lexicon_path = PathBuf::from(path);
            }
        }

        config.gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .and_then(|key| usable_api_key(&key));

        if let Ok(model) = env::var("HEALTH_CHAT_EMBEDDING_MODEL") {
            if !model.trim().is_empty() {
                config.embedding_model = model.trim().to_string();
            }
        }

        config
    }
}

/// Empty keys and the `.env.example` placeholder count as "not configured"
fn usable_api_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    if key.is_empty() || key == API_KEY_PLACEHOLDER {
        None
    } else {
        Some(key.to_string())
    }
}
