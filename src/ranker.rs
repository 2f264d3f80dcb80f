//! Dot-product similarity ranking over the review corpus.

use tracing::warn;

use crate::document::{Document, Ranking, ScoredDocument, SkipReason, SkippedDocument};
use crate::error::{RagError, Result};

/// Compute the dot product of two equal-length vectors.
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Score every eligible document against the query vector and sort.
///
/// Eligibility is per document: a missing embedding or a dimension mismatch
/// skips that one document (logged and recorded in [`Ranking::skipped`]),
/// never the whole call. Scores are raw dot products; no normalization is
/// applied, so stored embeddings must come from the same encoder as the
/// query vector.
///
/// The result is sorted descending by score. The sort is stable, so exact
/// ties keep the input (fetch) order, which makes ranking deterministic for
/// a fixed corpus and query vector.
///
/// # Errors
///
/// Returns [`RagError::EmptyCorpus`] when no document could be scored —
/// an empty result is a distinct failure mode from "no good match" and is
/// never returned silently.
pub fn rank(query: &[f32], documents: Vec<Document>) -> Result<Ranking> {
    let mut scored = Vec::with_capacity(documents.len());
    let mut skipped = Vec::new();

    for document in documents {
        match document.embedding.as_deref() {
            None => {
                warn!(document.id = %document.id, "skipping document without embedding");
                skipped.push(SkippedDocument {
                    id: document.id,
                    reason: SkipReason::MissingEmbedding,
                });
            }
            Some(embedding) if embedding.len() != query.len() => {
                warn!(
                    document.id = %document.id,
                    expected = query.len(),
                    actual = embedding.len(),
                    "skipping document with mismatched embedding dimension"
                );
                skipped.push(SkippedDocument {
                    id: document.id,
                    reason: SkipReason::DimensionMismatch {
                        expected: query.len(),
                        actual: embedding.len(),
                    },
                });
            }
            Some(embedding) => {
                let score = dot(query, embedding);
                scored.push(ScoredDocument { document, score });
            }
        }
    }

    if scored.is_empty() {
        return Err(RagError::EmptyCorpus);
    }

    // Stable sort: equal scores keep fetch order.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    Ok(Ranking { scored, skipped })
}
