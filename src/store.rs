//! Document store trait for reading and writing the review corpus.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// A backend holding the review corpus.
///
/// The query path only reads: every stored document is fetched and scored
/// per query, so the store needs no filtering or pagination contract. The
/// write side exists for the ingestion path that attaches embeddings.
///
/// # Example
///
/// ```rust,ignore
/// use review_rag::{DocumentStore, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// store.insert(&documents).await?;
/// let all = store.fetch_all().await?;
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch every document in the corpus, in stable store order.
    ///
    /// Repeated calls against an unchanged store must return documents in
    /// the same order; ranking uses that order to break score ties.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreUnavailable`](crate::RagError::StoreUnavailable)
    /// when the backend cannot be reached.
    async fn fetch_all(&self) -> Result<Vec<Document>>;

    /// Insert documents, replacing any existing document with the same id.
    async fn insert(&self, documents: &[Document]) -> Result<()>;
}
