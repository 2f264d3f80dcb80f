//! Data types for review documents, scored results, and query responses.

use serde::{Deserialize, Serialize};

/// A product review held in the document store.
///
/// The `embedding` is precomputed at ingestion time by the same encoder used
/// for queries; documents without one are skipped during ranking rather than
/// failing the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Opaque store key for the review.
    pub id: String,
    /// Name of the reviewed product. Empty when the source record lacks it.
    #[serde(default)]
    pub product_name: String,
    /// Full review text. Empty when the source record lacks it.
    #[serde(default)]
    pub review_content: String,
    /// Embedding vector; `None` excludes the document from ranking.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub embedding: Option<Vec<f32>>,
}

impl Document {
    /// Create a document without an embedding.
    pub fn new(
        id: impl Into<String>,
        product_name: impl Into<String>,
        review_content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            product_name: product_name.into(),
            review_content: review_content.into(),
            embedding: None,
        }
    }

    /// Attach an embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// A [`Document`] paired with its dot-product relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredDocument {
    /// The retrieved document.
    pub document: Document,
    /// Raw dot product of the query vector and the document embedding.
    /// Scores are only comparable for embeddings from the same encoder.
    pub score: f32,
}

/// Why a document was excluded from ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipReason {
    /// The document carries no embedding at all.
    MissingEmbedding,
    /// The embedding does not match the query vector's dimension.
    DimensionMismatch {
        /// Dimension of the query vector.
        expected: usize,
        /// Dimension of the document embedding.
        actual: usize,
    },
}

/// A document excluded from ranking, with the reason recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedDocument {
    /// Store key of the excluded document.
    pub id: String,
    /// Why it was excluded.
    pub reason: SkipReason,
}

/// The outcome of ranking a document set against a query vector.
///
/// `scored` is ordered by descending score with ties kept in fetch order.
/// `skipped` lists every document that could not be scored, so degraded
/// corpora stay inspectable instead of silently shrinking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ranking {
    /// Scored documents, best first.
    pub scored: Vec<ScoredDocument>,
    /// Documents excluded from scoring.
    pub skipped: Vec<SkippedDocument>,
}

/// The text produced by the generation provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Generation {
    /// Generated answer text; empty when the provider returned no content.
    pub answer: String,
}

/// The successful result of a full query cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    /// The original query text, echoed back.
    pub query: String,
    /// The generated answer.
    pub answer: String,
}
