//! Retrieval-augmented generation over a product review corpus.
//!
//! `review-rag` turns a natural-language question into a ranked set of
//! supporting reviews and one hosted chat-completion call:
//!
//! 1. **Encode** the query with an [`EmbeddingProvider`]
//! 2. **Search** a [`VectorIndex`] (brute-force dot-product scan over a
//!    [`DocumentStore`] by default)
//! 3. **Assemble** a bounded context string from the top-K reviews
//! 4. **Generate** an answer via a [`GenerationClient`] (Groq by default)
//!
//! The [`RagPipeline`] orchestrates the cycle with injected dependencies,
//! structured [`RagError`]s tagged by [`Stage`], and no retries or hidden
//! state. Retrieval is deterministic: an unchanged corpus and identical
//! query text always rank identically.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use review_rag::{GroqClient, InMemoryDocumentStore, OpenAiEncoder, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .embedding_provider(Arc::new(OpenAiEncoder::from_env()?))
//!     .document_store(Arc::new(InMemoryDocumentStore::new()))
//!     .generation_client(Arc::new(GroqClient::from_env()?))
//!     .build()?;
//!
//! let response = pipeline.handle_query("best budget headphones?").await?;
//! ```

pub mod config;
pub mod context;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod groq;
pub mod index;
pub mod inmemory;
#[cfg(feature = "mongo")]
pub mod mongo;
pub mod openai;
pub mod pipeline;
pub mod ranker;
pub mod store;

pub use config::{RagConfig, RagConfigBuilder};
pub use context::{PromptStrategy, build_context, format_document, merged_prompt};
pub use document::{
    Document, Generation, QueryResponse, Ranking, ScoredDocument, SkipReason, SkippedDocument,
};
pub use embedding::EmbeddingProvider;
pub use error::{ErrorClass, RagError, Result, Stage};
pub use generation::GenerationClient;
pub use groq::GroqClient;
pub use index::{BruteForceIndex, VectorIndex};
pub use inmemory::InMemoryDocumentStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoDocumentStore;
pub use openai::OpenAiEncoder;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use ranker::rank;
pub use store::DocumentStore;
