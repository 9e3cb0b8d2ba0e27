//! Linguistic annotation of company names and sectors
//!
//! Capabilities are probed once at startup:
//! - a lexicon-backed tokenizer/tagger/lemmatizer, or the simple fallback
//! - an optional remote embedding model, or zero vectors
//!
//! A failing call degrades only itself to the fallback; the next call
//! tries the full backend again.

pub mod embedding;
pub mod lexicon;
pub mod simple;

pub use embedding::{EmbeddingModel, GeminiEmbedder};
pub use lexicon::LexiconBackend;
pub use simple::SimpleBackend;

use crate::config::ChatConfig;
use crate::models::TaggedToken;
use crate::Result;
use tracing::{debug, info, warn};

/// Length of the placeholder vector used when no embedding is available
pub const FALLBACK_EMBEDDING_DIM: usize = 10;

/// Trait for a tokenizer / tagger / lemmatizer implementation
pub trait LinguisticBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn tokenize(&self, text: &str) -> Result<Vec<String>>;
    fn pos_tag(&self, tokens: &[String]) -> Result<Vec<TaggedToken>>;
    fn lemmatize(&self, token: &str) -> Result<String>;
}

/// Everything produced for one piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    pub tokens: Vec<String>,
    pub lemmas: Vec<String>,
    pub pos_tags: Vec<TaggedToken>,
    pub embedding: Vec<f32>,
}

pub struct Annotator {
    backend: Box<dyn LinguisticBackend>,
    embedder: Option<Box<dyn EmbeddingModel>>,
    fallback: SimpleBackend,
}

impl Annotator {
    pub fn new(
        backend: Box<dyn LinguisticBackend>,
        embedder: Option<Box<dyn EmbeddingModel>>,
    ) -> Self {
        Self {
            backend,
            embedder,
            fallback: SimpleBackend,
        }
    }

    /// Annotator with no optional capability at all
    pub fn degraded() -> Self {
        Self::new(Box::new(SimpleBackend), None)
    }

    /// One-time capability probe. Never fails: anything missing is
    /// logged and replaced by its fallback.
    pub fn probe(config: &ChatConfig) -> Self {
        let backend: Box<dyn LinguisticBackend> = match LexiconBackend::load(&config.lexicon_path) {
            Ok(lexicon) => {
                info!(
                    path = %config.lexicon_path.display(),
                    entries = lexicon.len(),
                    "Lexicon loaded, full tagging enabled"
                );
                Box::new(lexicon)
            }
            Err(e) => {
                warn!(
                    path = %config.lexicon_path.display(),
                    "Lexicon unavailable, using simplified tokenization and tagging: {}",
                    e
                );
                Box::new(SimpleBackend)
            }
        };

        let embedder: Option<Box<dyn EmbeddingModel>> = match &config.gemini_api_key {
            Some(key) => match GeminiEmbedder::new(key.clone(), config.embedding_model.clone()) {
                Ok(client) => {
                    info!(model = %config.embedding_model, "Embedding model enabled");
                    Some(Box::new(client))
                }
                Err(e) => {
                    warn!("Embedding client could not be built, using zero vectors: {}", e);
                    None
                }
            },
            None => {
                info!("GEMINI_API_KEY not configured, using zero-vector embeddings");
                None
            }
        };

        Self::new(backend, embedder)
    }

    /// Short human-readable summary of the active capabilities
    pub fn capabilities(&self) -> String {
        let embeddings = self
            .embedder
            .as_ref()
            .map(|e| e.name().to_string())
            .unwrap_or_else(|| "none".to_string());

        format!("backend={}, embeddings={}", self.backend.name(), embeddings)
    }

    pub fn annotate(&self, text: &str) -> TextAnnotation {
        let lowered = text.to_lowercase();

        let tokens = self.backend.tokenize(&lowered).unwrap_or_else(|e| {
            warn!("Tokenization failed, using simple split: {}", e);
            self.fallback.split(&lowered)
        });

        let lemmas = tokens
            .iter()
            .map(|t| self.backend.lemmatize(t))
            .collect::<Result<Vec<_>>>()
            .unwrap_or_else(|e| {
                warn!("Lemmatization failed, keeping tokens as lemmas: {}", e);
                tokens.clone()
            });

        let pos_tags = self.backend.pos_tag(&tokens).unwrap_or_else(|e| {
            warn!("POS tagging failed, using generic tag: {}", e);
            self.fallback.tag_all(&tokens)
        });

        let embedding = self.embed(&tokens);

        debug!(text = %lowered, tokens = tokens.len(), "Annotated text");

        TextAnnotation {
            tokens,
            lemmas,
            pos_tags,
            embedding,
        }
    }

    fn embed(&self, tokens: &[String]) -> Vec<f32> {
        let Some(embedder) = &self.embedder else {
            return zero_embedding();
        };

        match embedder.embed(tokens) {
            Ok(vector) if !vector.is_empty() => vector,
            Ok(_) => {
                warn!("Embedding model returned an empty vector");
                zero_embedding()
            }
            Err(e) => {
                warn!("Embedding failed, using zero vector: {}", e);
                zero_embedding()
            }
        }
    }
}

pub fn zero_embedding() -> Vec<f32> {
    vec![0.0; FALLBACK_EMBEDDING_DIM]
}
