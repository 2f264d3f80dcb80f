//! Embedding provider trait for encoding text into vectors.

use async_trait::async_trait;

use crate::error::Result;

/// An encoder mapping text to fixed-dimension embedding vectors.
///
/// Query and document embeddings are only comparable when produced by the
/// same encoder instance (scores are raw dot products, so vector magnitude
/// matters). The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends with
/// native batching should override it.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Encode a single text into an embedding vector of [`dimensions`](EmbeddingProvider::dimensions) length.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode a batch of texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of vectors produced by this encoder.
    ///
    /// Fixed for the lifetime of the instance and required to match the
    /// dimension documents were ingested with.
    fn dimensions(&self) -> usize;
}
