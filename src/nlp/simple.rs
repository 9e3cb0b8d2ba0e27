//! Fallback linguistic backend
//!
//! Used when no lexicon is available, and for any single call the full
//! backend fails on.

use super::LinguisticBackend;
use crate::models::TaggedToken;
use crate::Result;

/// Tag given to every token when no tagger is available
pub const GENERIC_TAG: &str = "NN";

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleBackend;

impl SimpleBackend {
    /// Lowercase, drop ASCII punctuation, split on whitespace
    pub fn split(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect::<String>()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn tag_all(&self, tokens: &[String]) -> Vec<TaggedToken> {
        tokens
            .iter()
            .map(|t| (t.clone(), GENERIC_TAG.to_string()))
            .collect()
    }
}

impl LinguisticBackend for SimpleBackend {
    fn name(&self) -> &'static str {
        "simple"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.split(text))
    }

    fn pos_tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>> {
        Ok(self.tag_all(tokens))
    }

    fn lemmatize(&self, token: &str) -> Result<String> {
        Ok(token.to_string())
    }
}
