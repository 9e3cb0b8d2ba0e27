//! Lexicon-backed linguistic backend
//!
//! Tokens come from Unicode word segmentation after NFKC normalization.
//! Tags and lemmas come from a JSON lexicon resource of the form
//! `{ "servicios": { "lemma": "servicio", "tag": "NNS" }, ... }`.

use super::LinguisticBackend;
use crate::error::ChatError;
use crate::models::TaggedToken;
use crate::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

const NUMERAL_TAG: &str = "CD";
const UNKNOWN_TAG: &str = "NN";

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconEntry {
    #[serde(default)]
    pub lemma: Option<String>,
    pub tag: String,
}

#[derive(Debug, Clone)]
pub struct LexiconBackend {
    entries: HashMap<String, LexiconEntry>,
}

impl LexiconBackend {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            ChatError::LexiconError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let parsed: HashMap<String, LexiconEntry> = serde_json::from_str(raw)?;
        if parsed.is_empty() {
            return Err(ChatError::LexiconError("lexicon has no entries".to_string()));
        }

        // Keys are matched against lowercased, normalized tokens
        let entries = parsed
            .into_iter()
            .map(|(word, entry)| (normalize(&word), entry))
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn is_numeral(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_numeric() || c == '.' || c == ',')
        && token.chars().any(char::is_numeric)
}

impl LinguisticBackend for LexiconBackend {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let normalized = normalize(text);
        Ok(normalized.unicode_words().map(str::to_string).collect())
    }

    fn pos_tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>> {
        Ok(tokens
            .iter()
            .map(|token| {
                let tag = match self.entries.get(token) {
                    Some(entry) => entry.tag.clone(),
                    None if is_numeral(token) => NUMERAL_TAG.to_string(),
                    None => UNKNOWN_TAG.to_string(),
                };
                (token.clone(), tag)
            })
            .collect())
    }

    fn lemmatize(&self, token: &str) -> Result<String> {
        Ok(self
            .entries
            .get(token)
            .and_then(|entry| entry.lemma.clone())
            .unwrap_or_else(|| token.to_string()))
    }
}
