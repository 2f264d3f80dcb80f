//! In-memory document store.
//!
//! Provides [`InMemoryDocumentStore`], a vector-backed store suitable for
//! development, testing, and small corpora. Insertion order is preserved so
//! ranking ties break deterministically.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::Document;
use crate::error::Result;
use crate::store::DocumentStore;

/// A [`DocumentStore`] keeping the corpus in process memory.
///
/// Documents live in a `Vec` behind a `tokio::sync::RwLock`; fetch order is
/// insertion order. Re-inserting an existing id overwrites the document in
/// place without changing its position.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given documents.
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self { documents: RwLock::new(documents) }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch_all(&self) -> Result<Vec<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.clone())
    }

    async fn insert(&self, new_documents: &[Document]) -> Result<()> {
        let mut documents = self.documents.write().await;
        for document in new_documents {
            match documents.iter_mut().find(|d| d.id == document.id) {
                Some(existing) => *existing = document.clone(),
                None => documents.push(document.clone()),
            }
        }
        Ok(())
    }
}
