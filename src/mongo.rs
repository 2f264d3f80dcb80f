//! MongoDB document store backend.
//!
//! Provides [`MongoDocumentStore`], a [`DocumentStore`] over a review
//! collection in MongoDB. Only available when the `mongo` feature is
//! enabled.
//!
//! Records use the collection's historical field layout: `_id`,
//! `product_name`, `review_content`, and `embeddings` (plural). Missing
//! text fields deserialize as empty strings and a missing `embeddings`
//! field as `None`, so partially-ingested records degrade instead of
//! failing the fetch.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, doc};
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::error::{RagError, Result};
use crate::store::DocumentStore;

/// A [`DocumentStore`] backed by a MongoDB collection.
///
/// # Example
///
/// ```rust,ignore
/// use review_rag::mongo::MongoDocumentStore;
///
/// let store = MongoDocumentStore::connect(
///     "mongodb://localhost:27017/",
///     "product-review-data",
///     "product_reviews",
/// ).await?;
/// ```
pub struct MongoDocumentStore {
    collection: Collection<ReviewRecord>,
}

/// Wire shape of one stored review.
#[derive(Debug, Serialize, Deserialize)]
struct ReviewRecord {
    #[serde(rename = "_id")]
    id: Bson,
    #[serde(default)]
    product_name: String,
    #[serde(default)]
    review_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    embeddings: Option<Vec<f32>>,
}

fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<ReviewRecord> for Document {
    fn from(record: ReviewRecord) -> Self {
        Document {
            id: id_to_string(&record.id),
            product_name: record.product_name,
            review_content: record.review_content,
            embedding: record.embeddings,
        }
    }
}

impl From<&Document> for ReviewRecord {
    fn from(document: &Document) -> Self {
        ReviewRecord {
            id: Bson::String(document.id.clone()),
            product_name: document.product_name.clone(),
            review_content: document.review_content.clone(),
            embeddings: document.embedding.clone(),
        }
    }
}

impl MongoDocumentStore {
    /// Connect to MongoDB and verify the server is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::StoreUnavailable`] when the URI is invalid or
    /// the server does not answer a ping.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await.map_err(Self::unavailable)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(Self::unavailable)?;

        debug!(database, collection, "connected to MongoDB");

        Ok(Self { collection: client.database(database).collection(collection) })
    }

    fn unavailable(e: mongodb::error::Error) -> RagError {
        RagError::StoreUnavailable { message: e.to_string() }
    }
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn fetch_all(&self) -> Result<Vec<Document>> {
        let records: Vec<ReviewRecord> = self
            .collection
            .find(doc! {})
            .await
            .map_err(Self::unavailable)?
            .try_collect()
            .await
            .map_err(Self::unavailable)?;

        Ok(records.into_iter().map(Document::from).collect())
    }

    async fn insert(&self, documents: &[Document]) -> Result<()> {
        for document in documents {
            let record = ReviewRecord::from(document);
            self.collection
                .replace_one(doc! { "_id": record.id.clone() }, &record)
                .upsert(true)
                .await
                .map_err(|e| RagError::Store {
                    backend: "mongodb".to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}
