//! Query pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates one query end to end: validate → encode →
//! search → build context → generate. All dependencies are injected once at
//! construction and shared by reference across queries; a query runs its
//! stages sequentially, each exactly once, with no internal retries.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use review_rag::{RagPipeline, RagConfig, InMemoryDocumentStore};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(encoder))
//!     .document_store(Arc::new(InMemoryDocumentStore::new()))
//!     .generation_client(Arc::new(groq))
//!     .build()?;
//!
//! let response = pipeline.handle_query("best wireless headphones").await?;
//! println!("{}", response.answer);
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::config::RagConfig;
use crate::context::{self, PromptStrategy};
use crate::document::{Document, QueryResponse, Ranking};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result, Stage};
use crate::generation::GenerationClient;
use crate::index::{BruteForceIndex, VectorIndex};
use crate::store::DocumentStore;

/// The query orchestrator.
///
/// Owns the injected encoder, index, and generation client for its whole
/// lifetime; every query borrows them, so there is no hidden global state.
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    store: Option<Arc<dyn DocumentStore>>,
    generation_client: Arc<dyn GenerationClient>,
    prompt_strategy: PromptStrategy,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Run the retrieval half of a query: validate → encode → search.
    ///
    /// Returns the top-K ranked documents plus any per-document skips.
    /// Retrieval is deterministic: an unchanged corpus and identical query
    /// text yield an identical ranking on every call.
    ///
    /// # Errors
    ///
    /// Every failure carries its originating [`Stage`]:
    /// [`RagError::InvalidQuery`] for blank query text (nothing downstream
    /// is called), [`RagError::Embedding`] when the encoder fails,
    /// [`RagError::StoreUnavailable`] when the store cannot be read, and
    /// [`RagError::EmptyCorpus`] when nothing is scorable.
    pub async fn retrieve(&self, query_text: &str) -> Result<Ranking> {
        if query_text.trim().is_empty() {
            return Err(RagError::InvalidQuery("query text must not be empty".to_string())
                .at(Stage::Encode));
        }

        let query_vector = self.embedding_provider.embed(query_text).await.map_err(|e| {
            error!(error = %e, "query encoding failed");
            e.at(Stage::Encode)
        })?;

        let expected = self.embedding_provider.dimensions();
        if query_vector.len() != expected {
            return Err(RagError::Embedding {
                provider: "query".to_string(),
                message: format!(
                    "encoder returned {} dimensions, expected {expected}",
                    query_vector.len()
                ),
            }
            .at(Stage::Encode));
        }

        let ranking =
            self.index.search(&query_vector, self.config.top_k).await.map_err(|e| match &e {
                RagError::StoreUnavailable { .. } | RagError::Store { .. } => {
                    error!(error = %e, "document fetch failed");
                    e.at(Stage::Fetch)
                }
                _ => e.at(Stage::Rank),
            })?;

        info!(
            scored = ranking.scored.len(),
            skipped = ranking.skipped.len(),
            "retrieval completed"
        );

        Ok(ranking)
    }

    /// Serve one query end to end and return the generated answer.
    ///
    /// The context is built from the top-K retrieved documents and merged
    /// with the query by the configured prompt strategy (by default a
    /// single user turn of `query + "\n" + context`). The generation
    /// provider is called exactly once; it is never called when any earlier
    /// stage fails.
    ///
    /// # Errors
    ///
    /// All retrieval errors from [`retrieve`](RagPipeline::retrieve), plus
    /// [`RagError::Provider`] and [`RagError::Transport`] from the
    /// generation call, each tagged with its stage. The caller always gets
    /// a structured error, never a panic or a partial answer.
    pub async fn handle_query(&self, query_text: &str) -> Result<QueryResponse> {
        let ranking = self.retrieve(query_text).await?;

        let context_bundle =
            context::build_context(&ranking.scored, self.config.max_context_chars);
        let prompt = (self.prompt_strategy)(query_text, &context_bundle);

        let generation = self.generation_client.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "generation failed");
            e.at(Stage::Generate)
        })?;

        info!(answer_len = generation.answer.len(), "query answered");

        Ok(QueryResponse { query: query_text.to_string(), answer: generation.answer })
    }

    /// Ingest documents: embed each review's text and write to the store.
    ///
    /// Documents that already carry an embedding are stored as-is; the rest
    /// are encoded in one batch. Returns the documents as stored.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] when the pipeline was built from a bare
    /// index without a writable store, and encoder or store errors
    /// otherwise.
    pub async fn ingest(&self, documents: Vec<Document>) -> Result<Vec<Document>> {
        let store = self.store.as_ref().ok_or_else(|| {
            RagError::Config("pipeline has no document store to ingest into".to_string())
        })?;

        let mut stored = documents;
        let pending: Vec<usize> = stored
            .iter()
            .enumerate()
            .filter(|(_, d)| d.embedding.is_none())
            .map(|(i, _)| i)
            .collect();

        if !pending.is_empty() {
            let texts: Vec<&str> =
                pending.iter().map(|&i| stored[i].review_content.as_str()).collect();
            let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
                error!(error = %e, "embedding failed during ingestion");
                e
            })?;
            for (&i, embedding) in pending.iter().zip(embeddings) {
                stored[i].embedding = Some(embedding);
            }
        }

        store.insert(&stored).await?;
        info!(count = stored.len(), "ingested documents");

        Ok(stored)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// The encoder and generation client are required, together with either a
/// document store (wrapped in a [`BruteForceIndex`]) or an explicit
/// [`VectorIndex`]. Config and prompt strategy default sensibly.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn DocumentStore>>,
    index: Option<Arc<dyn VectorIndex>>,
    generation_client: Option<Arc<dyn GenerationClient>>,
    prompt_strategy: Option<PromptStrategy>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration. Defaults to [`RagConfig::default()`].
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding encoder.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the document store. Searched via a [`BruteForceIndex`] unless an
    /// explicit index is also set; always used as the ingestion target.
    pub fn document_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set an explicit vector index, overriding the brute-force default.
    pub fn vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Set the generation client.
    pub fn generation_client(mut self, client: Arc<dyn GenerationClient>) -> Self {
        self.generation_client = Some(client);
        self
    }

    /// Set the prompt construction strategy. Defaults to
    /// [`merged_prompt`](crate::context::merged_prompt).
    pub fn prompt_strategy(mut self, strategy: PromptStrategy) -> Self {
        self.prompt_strategy = Some(strategy);
        self
    }

    /// Build the [`RagPipeline`], validating that required pieces are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the encoder or generation client is
    /// missing, or if neither a store nor an index was provided.
    pub fn build(self) -> Result<RagPipeline> {
        let embedding_provider = self.embedding_provider.ok_or_else(|| {
            RagError::Config("embedding_provider is required".to_string())
        })?;
        let generation_client = self.generation_client.ok_or_else(|| {
            RagError::Config("generation_client is required".to_string())
        })?;

        let index: Arc<dyn VectorIndex> = match (self.index, &self.store) {
            (Some(index), _) => index,
            (None, Some(store)) => Arc::new(BruteForceIndex::new(Arc::clone(store))),
            (None, None) => {
                return Err(RagError::Config(
                    "either document_store or vector_index is required".to_string(),
                ));
            }
        };

        Ok(RagPipeline {
            config: self.config.unwrap_or_default(),
            embedding_provider,
            index,
            store: self.store,
            generation_client,
            prompt_strategy: self.prompt_strategy.unwrap_or(context::merged_prompt),
        })
    }
}
