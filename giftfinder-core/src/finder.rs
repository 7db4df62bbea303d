//! Process-lifetime context for gift search
//!
//! A [`GiftFinder`] owns the loaded catalog, its embedding store and the
//! shared encoder. Everything is loaded once; queries only encode their
//! own text (memoized, since preset queries repeat often) and scan the
//! precomputed vectors.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;

use crate::catalog::{Catalog, CatalogConfig};
use crate::embedding::{EmbeddingStore, TextEncoder};
use crate::error::Result;
use crate::search::{self, GiftMatch, SearchConfig};

pub struct GiftFinder {
    catalog: Catalog,
    embeddings: EmbeddingStore,
    encoder: Arc<dyn TextEncoder>,
    query_cache: DashMap<String, Vec<f32>>,
}

impl GiftFinder {
    /// Create a finder from already-loaded parts
    pub fn new(catalog: Catalog, embeddings: EmbeddingStore, encoder: Arc<dyn TextEncoder>) -> Self {
        Self {
            catalog,
            embeddings,
            encoder,
            query_cache: DashMap::new(),
        }
    }

    /// Load the catalog, then load or build its embedding cache
    pub fn open(
        csv_path: impl AsRef<Path>,
        cache_path: impl AsRef<Path>,
        encoder: Arc<dyn TextEncoder>,
        config: &CatalogConfig,
    ) -> Result<Self> {
        let catalog = Catalog::load_with_config(csv_path, config)?;
        let embeddings = EmbeddingStore::get_or_build(&catalog, encoder.as_ref(), cache_path)?;
        Ok(Self::new(catalog, embeddings, encoder))
    }

    /// Search with the default configuration
    pub fn search(&self, query: &str, max_price: f64) -> Result<Vec<GiftMatch<'_>>> {
        self.search_with(query, max_price, &SearchConfig::default())
    }

    /// Rank catalog items for a free-text query within a budget
    ///
    /// An empty or whitespace-only query returns no matches without
    /// invoking the encoder, so callers can tell "no query yet" apart
    /// from "nothing affordable matched".
    pub fn search_with(
        &self,
        query: &str,
        max_price: f64,
        config: &SearchConfig,
    ) -> Result<Vec<GiftMatch<'_>>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let query_vector = self.embed_query(query)?;
        Ok(search::rank(
            &self.catalog,
            self.embeddings.vectors(),
            &query_vector,
            max_price,
            config,
        ))
    }

    /// Count of catalog items within the given budget
    pub fn affordable_count(&self, max_price: f64) -> usize {
        self.catalog.affordable_count(max_price)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn embeddings(&self) -> &EmbeddingStore {
        &self.embeddings
    }

    fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.query_cache.get(query) {
            return Ok(cached.clone());
        }

        let vector = self.encoder.embed_one(query)?;
        self.query_cache.insert(query.to_string(), vector.clone());
        Ok(vector)
    }
}
