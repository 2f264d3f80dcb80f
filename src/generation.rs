//! Generation client trait for the hosted completion provider.

use async_trait::async_trait;

use crate::document::Generation;
use crate::error::Result;

/// A client for a hosted text-completion service.
///
/// One call per query, no internal retries and no timeout beyond the
/// transport default; callers needing resilience wrap this.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Send the assembled prompt and return the generated answer.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Provider`](crate::RagError::Provider) on any
    /// non-success provider response (carrying the HTTP status and the
    /// provider's detail payload) and
    /// [`RagError::Transport`](crate::RagError::Transport) on network
    /// failure. A success response with no content path is an empty
    /// answer, not an error.
    async fn generate(&self, prompt: &str) -> Result<Generation>;
}
