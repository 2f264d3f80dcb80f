//! Tests for context assembly, truncation, and prompt construction.

use review_rag::document::{Document, ScoredDocument};
use review_rag::{build_context, format_document, merged_prompt};

fn scored(id: &str, product: &str, review: &str, score: f32) -> ScoredDocument {
    ScoredDocument { document: Document::new(id, product, review), score }
}

#[test]
fn documents_are_templated_and_space_joined() {
    let ranked = vec![
        scored("1", "Headphones", "great bass", 0.9),
        scored("2", "Earbuds", "tinny sound", 0.4),
    ];

    let context = build_context(&ranked, None);
    assert_eq!(
        context,
        "Product: Headphones Review: great bass Product: Earbuds Review: tinny sound"
    );
}

#[test]
fn no_trailing_separator_on_single_document() {
    let ranked = vec![scored("1", "Headphones", "great bass", 0.9)];
    assert_eq!(build_context(&ranked, None), "Product: Headphones Review: great bass");
}

#[test]
fn missing_fields_render_as_empty_substrings() {
    let ranked = vec![scored("1", "", "", 0.5)];
    assert_eq!(build_context(&ranked, None), "Product:  Review: ");
}

#[test]
fn empty_ranking_yields_empty_context() {
    assert_eq!(build_context(&[], None), "");
}

#[test]
fn budget_drops_lowest_ranked_documents_whole() {
    let ranked = vec![
        scored("1", "A", "first", 0.9),
        scored("2", "B", "second", 0.5),
        scored("3", "C", "third", 0.1),
    ];
    let first = format_document(&ranked[0].document);
    let second = format_document(&ranked[1].document);

    // Budget fits exactly two snippets plus the joining space.
    let budget = first.len() + 1 + second.len();
    let context = build_context(&ranked, Some(budget));

    assert_eq!(context, format!("{first} {second}"));
}

#[test]
fn budget_smaller_than_first_document_yields_empty_context() {
    let ranked = vec![scored("1", "Headphones", "a very long review body", 0.9)];
    assert_eq!(build_context(&ranked, Some(5)), "");
}

#[test]
fn unbounded_context_includes_everything() {
    let ranked: Vec<ScoredDocument> = (0..50)
        .map(|i| scored(&i.to_string(), "P", &"x".repeat(100), 1.0 - i as f32 * 0.01))
        .collect();

    let context = build_context(&ranked, None);
    let per_doc = format_document(&ranked[0].document).len();
    assert_eq!(context.len(), 50 * per_doc + 49);
}

#[test]
fn context_assembly_is_deterministic() {
    let ranked = vec![
        scored("1", "A", "alpha", 0.9),
        scored("2", "B", "beta", 0.5),
    ];
    assert_eq!(build_context(&ranked, None), build_context(&ranked, None));
}

#[test]
fn merged_prompt_joins_query_and_context_with_newline() {
    assert_eq!(
        merged_prompt("best headphones", "Product: A Review: r"),
        "best headphones\nProduct: A Review: r"
    );
}
