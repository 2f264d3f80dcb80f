//! Vector index trait and the brute-force full-scan implementation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::document::Ranking;
use crate::error::Result;
use crate::ranker;
use crate::store::DocumentStore;

/// A searchable index over document embeddings.
///
/// The pipeline only depends on this trait, so the brute-force scan below
/// can later be swapped for an approximate-nearest-neighbor backend without
/// touching the orchestration contract.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Return the `k` best-scoring documents for the query vector, best
    /// first, along with any per-document skips encountered.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyCorpus`](crate::RagError::EmptyCorpus) when
    /// nothing in the corpus is scorable, and store errors unchanged.
    async fn search(&self, query: &[f32], k: usize) -> Result<Ranking>;
}

/// A [`VectorIndex`] that scans the whole [`DocumentStore`] per query.
///
/// O(N·D) per search with N documents of dimension D. Fine for review
/// corpora in the tens of thousands; the trait boundary exists for when it
/// is not.
pub struct BruteForceIndex {
    store: Arc<dyn DocumentStore>,
}

impl BruteForceIndex {
    /// Create an index over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl VectorIndex for BruteForceIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Ranking> {
        let documents = self.store.fetch_all().await?;
        debug!(candidates = documents.len(), k, "scanning corpus");

        let mut ranking = ranker::rank(query, documents)?;
        ranking.scored.truncate(k);
        Ok(ranking)
    }
}
