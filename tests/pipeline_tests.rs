//! End-to-end pipeline scenarios over mock encoder, store, and generator.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use review_rag::document::{Document, Generation, SkipReason};
use review_rag::error::{ErrorClass, RagError, Result, Stage};
use review_rag::{
    DocumentStore, EmbeddingProvider, GenerationClient, InMemoryDocumentStore, RagConfig,
    RagPipeline,
};

// ---------------------------------------------------------------------------
// Mocks
// ---------------------------------------------------------------------------

/// Encoder that returns one fixed vector for every input and counts calls.
struct FixedEncoder {
    vector: Vec<f32>,
    calls: AtomicUsize,
}

impl FixedEncoder {
    fn new(vector: Vec<f32>) -> Self {
        Self { vector, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl EmbeddingProvider for FixedEncoder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector.clone())
    }

    fn dimensions(&self) -> usize {
        self.vector.len()
    }
}

/// What the mock generator should do when called.
enum Script {
    Answer(&'static str),
    ProviderStatus(u16, &'static str),
}

/// Generator that records prompts and follows a fixed script.
struct ScriptedGenerator {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(script: Script) -> Self {
        Self { script, calls: AtomicUsize::new(0), prompts: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.script {
            Script::Answer(answer) => Ok(Generation { answer: answer.to_string() }),
            Script::ProviderStatus(status, detail) => {
                Err(RagError::Provider { status, detail: detail.to_string() })
            }
        }
    }
}

/// Store whose fetch always fails with a connectivity error.
struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn fetch_all(&self) -> Result<Vec<Document>> {
        Err(RagError::StoreUnavailable { message: "connection refused".to_string() })
    }

    async fn insert(&self, _documents: &[Document]) -> Result<()> {
        Err(RagError::StoreUnavailable { message: "connection refused".to_string() })
    }
}

fn three_reviews() -> Vec<Document> {
    vec![
        Document::new("doc1", "Headphones", "crisp highs").with_embedding(vec![1.0, 0.0]),
        Document::new("doc2", "Blender", "loud motor").with_embedding(vec![0.0, 1.0]),
        Document::new("doc3", "Earbuds", "decent fit").with_embedding(vec![0.7, 0.7]),
    ]
}

fn pipeline_over(
    documents: Vec<Document>,
    encoder: Arc<FixedEncoder>,
    generator: Arc<ScriptedGenerator>,
    config: RagConfig,
) -> RagPipeline {
    RagPipeline::builder()
        .config(config)
        .embedding_provider(encoder)
        .document_store(Arc::new(InMemoryDocumentStore::with_documents(documents)))
        .generation_client(generator)
        .build()
        .unwrap()
}

/// Split a staged error into its stage and underlying kind.
fn unstage(err: RagError) -> (Option<Stage>, RagError) {
    match err {
        RagError::Staged { stage, source } => (Some(stage), *source),
        other => (None, other),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn query_vector_ranks_reviews_by_dot_product() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let pipeline = pipeline_over(three_reviews(), encoder, generator, RagConfig::default());

    let ranking = pipeline.retrieve("best headphones").await.unwrap();
    let ids: Vec<&str> = ranking.scored.iter().map(|s| s.document.id.as_str()).collect();

    assert_eq!(ids, vec!["doc1", "doc3", "doc2"]);
    assert!(ranking.skipped.is_empty());
}

#[tokio::test]
async fn empty_store_fails_with_empty_corpus_before_any_provider_call() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("never")));
    let pipeline =
        pipeline_over(Vec::new(), encoder, Arc::clone(&generator), RagConfig::default());

    let err = pipeline.handle_query("best headphones").await.unwrap_err();
    let (_, kind) = unstage(err);

    assert!(matches!(kind, RagError::EmptyCorpus));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn document_without_embedding_is_skipped_not_fatal() {
    let mut documents = three_reviews();
    documents.push(Document::new("doc4", "Monitor", "no embedding yet"));

    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let pipeline = pipeline_over(documents, encoder, generator, RagConfig::default());

    let ranking = pipeline.retrieve("best monitor").await.unwrap();

    assert_eq!(ranking.scored.len(), 3);
    assert_eq!(ranking.skipped.len(), 1);
    assert_eq!(ranking.skipped[0].id, "doc4");
    assert_eq!(ranking.skipped[0].reason, SkipReason::MissingEmbedding);
}

#[tokio::test]
async fn provider_429_surfaces_status_and_detail_with_no_partial_answer() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator =
        Arc::new(ScriptedGenerator::new(Script::ProviderStatus(429, "rate limit exceeded")));
    let pipeline = pipeline_over(three_reviews(), encoder, generator, RagConfig::default());

    let err = pipeline.handle_query("best headphones").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Generate));
    assert_eq!(err.class(), ErrorClass::Upstream(429));

    let (_, kind) = unstage(err);
    match kind {
        RagError::Provider { status, detail } => {
            assert_eq!(status, 429);
            assert_eq!(detail, "rate limit exceeded");
        }
        other => panic!("expected provider error, got {other}"),
    }
}

#[tokio::test]
async fn blank_query_fails_validation_before_encode_store_or_provider() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("never")));
    let pipeline = pipeline_over(
        three_reviews(),
        Arc::clone(&encoder),
        Arc::clone(&generator),
        RagConfig::default(),
    );

    for query in ["", "   ", "\n\t"] {
        let err = pipeline.handle_query(query).await.unwrap_err();
        assert_eq!(err.class(), ErrorClass::BadRequest);
        let (_, kind) = unstage(err);
        assert!(matches!(kind, RagError::InvalidQuery(_)));
    }

    assert_eq!(encoder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_store_fails_at_the_fetch_stage() {
    let pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(FixedEncoder::new(vec![1.0, 0.0])))
        .document_store(Arc::new(UnreachableStore))
        .generation_client(Arc::new(ScriptedGenerator::new(Script::Answer("never"))))
        .build()
        .unwrap();

    let err = pipeline.handle_query("anything").await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Fetch));
    assert_eq!(err.class(), ErrorClass::Unavailable);
    let (_, kind) = unstage(err);
    assert!(matches!(kind, RagError::StoreUnavailable { .. }));
}

#[tokio::test]
async fn retrieval_is_idempotent_for_an_unchanged_store() {
    let encoder = Arc::new(FixedEncoder::new(vec![0.3, 0.9]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let pipeline = pipeline_over(three_reviews(), encoder, generator, RagConfig::default());

    let first = pipeline.retrieve("same question").await.unwrap();
    let second = pipeline.retrieve("same question").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn prompt_merges_query_and_ranked_context_in_one_turn() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("the headphones")));
    let pipeline = pipeline_over(
        three_reviews(),
        encoder,
        Arc::clone(&generator),
        RagConfig::default(),
    );

    let response = pipeline.handle_query("best headphones").await.unwrap();
    assert_eq!(response.query, "best headphones");
    assert_eq!(response.answer, "the headphones");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert_eq!(
        prompts[0],
        "best headphones\nProduct: Headphones Review: crisp highs \
         Product: Earbuds Review: decent fit Product: Blender Review: loud motor"
    );
}

#[tokio::test]
async fn custom_prompt_strategy_replaces_the_default_framing() {
    fn tagged(query: &str, context: &str) -> String {
        format!("QUESTION: {query}\nEVIDENCE: {context}")
    }

    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let pipeline = RagPipeline::builder()
        .embedding_provider(encoder)
        .document_store(Arc::new(InMemoryDocumentStore::with_documents(three_reviews())))
        .generation_client(Arc::clone(&generator) as Arc<dyn GenerationClient>)
        .prompt_strategy(tagged)
        .build()
        .unwrap();

    pipeline.handle_query("best headphones").await.unwrap();

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].starts_with("QUESTION: best headphones\nEVIDENCE: Product:"));
}

#[tokio::test]
async fn top_k_bounds_the_retrieved_set() {
    let encoder = Arc::new(FixedEncoder::new(vec![1.0, 0.0]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let config = RagConfig::builder().top_k(2).build().unwrap();
    let pipeline = pipeline_over(three_reviews(), encoder, generator, config);

    let ranking = pipeline.retrieve("best headphones").await.unwrap();
    let ids: Vec<&str> = ranking.scored.iter().map(|s| s.document.id.as_str()).collect();

    assert_eq!(ids, vec!["doc1", "doc3"]);
}

#[tokio::test]
async fn ingest_embeds_documents_and_makes_them_retrievable() {
    let encoder = Arc::new(FixedEncoder::new(vec![0.5, 0.5]));
    let generator = Arc::new(ScriptedGenerator::new(Script::Answer("ok")));
    let pipeline = pipeline_over(Vec::new(), Arc::clone(&encoder), generator, RagConfig::default());

    let stored = pipeline
        .ingest(vec![
            Document::new("r1", "Kettle", "boils fast"),
            Document::new("r2", "Toaster", "uneven browning"),
        ])
        .await
        .unwrap();

    assert!(stored.iter().all(|d| d.embedding.is_some()));

    let ranking = pipeline.retrieve("fast kettle").await.unwrap();
    let ids: Vec<&str> = ranking.scored.iter().map(|s| s.document.id.as_str()).collect();

    // Identical embeddings tie; fetch (insertion) order breaks the tie.
    assert_eq!(ids, vec!["r1", "r2"]);
}

#[tokio::test]
async fn builder_rejects_missing_dependencies() {
    let err = RagPipeline::builder()
        .generation_client(Arc::new(ScriptedGenerator::new(Script::Answer("ok"))))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::Config(_)));

    let err = RagPipeline::builder()
        .embedding_provider(Arc::new(FixedEncoder::new(vec![1.0])))
        .generation_client(Arc::new(ScriptedGenerator::new(Script::Answer("ok"))))
        .build()
        .unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}
