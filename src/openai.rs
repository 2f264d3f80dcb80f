//! Embedding provider for OpenAI-compatible `/v1/embeddings` endpoints.
//!
//! Works against the hosted OpenAI API as well as self-hosted encoder
//! servers (text-embeddings-inference and similar) that speak the same
//! wire format. The corpus must be embedded by the same endpoint/model the
//! queries use, or scores stop being comparable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "text-embedding-3-small";
const DEFAULT_DIMENSIONS: usize = 1536;

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible embeddings API.
///
/// # Example
///
/// ```rust,ignore
/// use review_rag::openai::OpenAiEncoder;
///
/// let encoder = OpenAiEncoder::new("sk-...")?
///     .with_base_url("http://localhost:8080/v1")
///     .with_model("all-MiniLM-L6-v2", 384);
/// let query_vector = encoder.embed("best wireless headphones").await?;
/// ```
pub struct OpenAiEncoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEncoder {
    /// Create an encoder with the given API key and default model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Create an encoder from the `OPENAI_API_KEY` environment variable.
    ///
    /// Intended to run once at process start; a missing key is a
    /// configuration error, not a per-request one.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Embedding {
            provider: "openai".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Point the encoder at a different OpenAI-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model name and its embedding dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
        self
    }
}

// ── wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[async_trait]
impl EmbeddingProvider for OpenAiEncoder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: "openai".into(),
            message: "API returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "encoding batch");

        let url = format!("{}/embeddings", self.base_url);
        let body = EmbeddingsRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embedding request failed");
                RagError::Embedding {
                    provider: "openai".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let raw = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|b| b.error.message)
                .unwrap_or(raw);
            error!(%status, "embedding API error");
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse embedding response");
            RagError::Embedding {
                provider: "openai".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
