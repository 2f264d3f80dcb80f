//! Context assembly and prompt construction.
//!
//! Turns the top-ranked documents into the single context string sent to
//! the generation provider. Assembly is deterministic and never fails:
//! missing fields render as empty substrings, and an optional character
//! budget drops lowest-ranked documents whole rather than erroring.

use tracing::debug;

use crate::document::{Document, ScoredDocument};

/// Format one document for inclusion in the context.
///
/// Empty `product_name` or `review_content` fields render as empty
/// substrings; a degraded context beats aborting the query.
pub fn format_document(document: &Document) -> String {
    format!("Product: {} Review: {}", document.product_name, document.review_content)
}

/// Assemble the context string from ranked documents, best first.
///
/// Per-document snippets are joined with a single space and no trailing
/// separator. When `max_chars` is set and appending the next snippet would
/// exceed it, that document and everything ranked below it are dropped —
/// truncation always removes the lowest-ranked documents first and is not
/// an error.
pub fn build_context(ranked: &[ScoredDocument], max_chars: Option<usize>) -> String {
    let mut context = String::new();

    for (position, scored) in ranked.iter().enumerate() {
        let snippet = format_document(&scored.document);
        let separator = if context.is_empty() { 0 } else { 1 };

        if let Some(budget) = max_chars {
            if context.len() + separator + snippet.len() > budget {
                debug!(
                    kept = position,
                    dropped = ranked.len() - position,
                    budget,
                    "context budget reached, dropping lowest-ranked documents"
                );
                break;
            }
        }

        if separator == 1 {
            context.push(' ');
        }
        context.push_str(&snippet);
    }

    context
}

/// A strategy turning (query, context) into the single prompt string.
pub type PromptStrategy = fn(&str, &str) -> String;

/// The default prompt framing: query and context merged into one user turn,
/// separated by a newline.
pub fn merged_prompt(query: &str, context: &str) -> String {
    format!("{query}\n{context}")
}
