//! Configuration for the query pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the query pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of top-ranked documents used to build the context.
    pub top_k: usize,
    /// Optional cap on the assembled context string, in characters.
    ///
    /// `None` leaves the context unbounded. When set, lowest-ranked
    /// documents are dropped whole until the remainder fits.
    pub max_context_chars: Option<usize>,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self { top_k: 5, max_context_chars: None }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of top-ranked documents used for context.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the maximum context length in characters.
    pub fn max_context_chars(mut self, max: usize) -> Self {
        self.config.max_context_chars = Some(max);
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if `top_k == 0` or the context budget
    /// is zero.
    pub fn build(self) -> Result<RagConfig> {
        if self.config.top_k == 0 {
            return Err(RagError::Config("top_k must be greater than zero".to_string()));
        }
        if self.config.max_context_chars == Some(0) {
            return Err(RagError::Config(
                "max_context_chars must be greater than zero when set".to_string(),
            ));
        }
        Ok(self.config)
    }
}
