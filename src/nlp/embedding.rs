//! Embedding models
//!
//! The remote model is Gemini's `embedContent` endpoint, called through a
//! long-lived blocking reqwest client.

use crate::error::ChatError;
use crate::Result;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Trait for anything that turns a token sequence into a fixed-length vector
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;
    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>>;
}

pub struct GeminiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiEmbedder {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// The key travels in a header, never in the URL
    fn endpoint(&self) -> String {
        format!("{}/{}:embedContent", self.base_url, self.model)
    }

    fn request_for(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: Content {
                parts: vec![Part {
                    text: text.to_string(),
                }],
            },
        }
    }
}

impl EmbeddingModel for GeminiEmbedder {
    fn name(&self) -> &str {
        &self.model
    }

    fn embed(&self, tokens: &[String]) -> Result<Vec<f32>> {
        if tokens.is_empty() {
            return Err(ChatError::EmbeddingError("no tokens to embed".to_string()));
        }

        let request = self.request_for(&tokens.join(" "));

        debug!(model = %self.model, tokens = tokens.len(), "Calling Gemini embedContent");

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini embedding request failed: {}", e);
                ChatError::EmbeddingError(format!("Gemini request error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ChatError::EmbeddingError(format!(
                "Gemini returned {}: {}",
                status, error_text
            )));
        }

        let parsed: EmbedResponse = response.json().map_err(|e| {
            ChatError::EmbeddingError(format!("Gemini parse error: {}", e.without_url()))
        })?;

        Ok(parsed.embedding.values)
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}
