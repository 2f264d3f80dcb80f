//! Error types for the `review-rag` crate.

use thiserror::Error;

/// The pipeline stage at which a query failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Query validation and embedding.
    Encode,
    /// Reading candidate documents from the store.
    Fetch,
    /// Scoring and ordering candidates.
    Rank,
    /// Assembling the context string.
    Context,
    /// Calling the generation provider.
    Generate,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Encode => "encode",
            Stage::Fetch => "fetch",
            Stage::Rank => "rank",
            Stage::Context => "context",
            Stage::Generate => "generate",
        };
        f.write_str(name)
    }
}

/// Coarse classification a serving layer can map onto HTTP status classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Caller-caused; retrying the same request will not help.
    BadRequest,
    /// A dependency or the corpus is missing; safe to retry later.
    Unavailable,
    /// The generation provider reported a failure with this status code.
    Upstream(u16),
    /// A fault internal to this component.
    Internal,
}

/// Errors that can occur while serving or preparing a query.
#[derive(Debug, Error)]
pub enum RagError {
    /// The query text is empty or otherwise unusable.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The document store could not be reached.
    #[error("document store unavailable: {message}")]
    StoreUnavailable {
        /// A description of the connectivity failure.
        message: String,
    },

    /// The store is reachable but holds no scorable documents.
    #[error("no scorable documents in the corpus")]
    EmptyCorpus,

    /// The embedding encoder failed on the given text.
    #[error("embedding error ({provider}): {message}")]
    Embedding {
        /// The encoder that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The generation provider returned a non-success response.
    #[error("generation provider returned {status}: {detail}")]
    Provider {
        /// The HTTP status code reported by the provider.
        status: u16,
        /// The provider's reported detail payload.
        detail: String,
    },

    /// The generation provider could not be reached.
    #[error("transport failure reaching provider: {0}")]
    Transport(String),

    /// A store operation other than a connectivity failure went wrong.
    #[error("store error ({backend}): {message}")]
    Store {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration or construction-time validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A failure tagged with the pipeline stage it originated from.
    #[error("{stage} stage failed: {source}")]
    Staged {
        /// The stage that failed.
        stage: Stage,
        /// The underlying failure.
        #[source]
        source: Box<RagError>,
    },
}

impl RagError {
    /// Tag this error with the stage it occurred in.
    ///
    /// Already-staged errors keep their original stage.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            RagError::Staged { .. } => self,
            other => RagError::Staged { stage, source: Box::new(other) },
        }
    }

    /// The stage this error was tagged with, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            RagError::Staged { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Classify this error for a serving layer's status mapping.
    pub fn class(&self) -> ErrorClass {
        match self {
            RagError::InvalidQuery(_) => ErrorClass::BadRequest,
            RagError::StoreUnavailable { .. } | RagError::EmptyCorpus | RagError::Transport(_) => {
                ErrorClass::Unavailable
            }
            RagError::Provider { status, .. } => ErrorClass::Upstream(*status),
            RagError::Embedding { .. } | RagError::Store { .. } | RagError::Config(_) => {
                ErrorClass::Internal
            }
            RagError::Staged { source, .. } => source.class(),
        }
    }
}

/// A convenience result type for query operations.
pub type Result<T> = std::result::Result<T, RagError>;
