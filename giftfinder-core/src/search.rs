//! Query matching
//!
//! Scores every catalog item against a query vector and applies the
//! budget and relevance filters before ranking. Scoring the whole
//! catalog is a linear scan; at a few thousand rows that is cheaper
//! than maintaining an index.

use serde::Serialize;

use crate::catalog::{Catalog, CatalogItem};

/// Search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of results returned
    pub top_k: usize,
    /// Minimum cosine similarity; matches must score strictly above it
    pub relevance_threshold: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 15,
            relevance_threshold: 0.35,
        }
    }
}

/// A ranked match against the catalog
#[derive(Debug, Clone, Serialize)]
pub struct GiftMatch<'a> {
    /// The matched catalog item
    pub item: &'a CatalogItem,
    /// Cosine similarity between the query and the item description
    pub score: f32,
}

/// Rank catalog items for a query vector
///
/// Items are filtered to `price_eur <= max_price` (inclusive) and
/// `score > relevance_threshold` (strict: a score equal to the
/// threshold is excluded), sorted by score descending with ties keeping
/// catalog order, and truncated to `top_k`. An empty result means
/// nothing affordable was relevant; it is not an error.
pub fn rank<'a>(
    catalog: &'a Catalog,
    vectors: &[Vec<f32>],
    query_vector: &[f32],
    max_price: f64,
    config: &SearchConfig,
) -> Vec<GiftMatch<'a>> {
    let mut matches: Vec<GiftMatch<'a>> = catalog
        .iter()
        .zip(vectors.iter())
        .filter(|(item, _)| item.price_eur <= max_price)
        .map(|(item, vector)| GiftMatch {
            item,
            score: cosine_similarity(query_vector, vector),
        })
        .filter(|m| m.score > config.relevance_threshold)
        .collect();

    // Stable sort keeps catalog order for equal scores
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(config.top_k);
    matches
}

/// Calculate cosine similarity between two vectors
///
/// Returns 0.0 for mismatched lengths or zero-norm inputs.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}
