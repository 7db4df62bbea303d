//! Semantic gift matching over a product catalog
//!
//! The pipeline loads a product CSV once, embeds every description
//! through a multilingual sentence-embedding model (persisted across
//! runs as a binary cache), then ranks items for a free-text query by
//! cosine similarity, filtered to a budget and a relevance threshold.
//!
//! ## Pipeline
//!
//! 1. [`Catalog`] parses and normalizes the CSV (prices, image links,
//!    missing descriptions)
//! 2. [`EmbeddingStore`] loads or builds the catalog's vectors
//! 3. [`GiftFinder`] embeds each query and scans the vectors
//!
//! One encoder instance embeds both the catalog and every query, so
//! they share a vector space.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use giftfinder_core::{CatalogConfig, FastEmbedEncoder, GiftFinder};
//!
//! let encoder = Arc::new(FastEmbedEncoder::new()?);
//! let finder = GiftFinder::open(
//!     "amazon.csv",
//!     "catalog_embeddings.bin",
//!     encoder,
//!     &CatalogConfig::default(),
//! )?;
//!
//! for gift in finder.search("wireless headphones for a teenager", 50.0)? {
//!     println!("{:3.0}%  {:8.2} EUR  {}", gift.score * 100.0, gift.item.price_eur, gift.item.name);
//! }
//! ```

pub mod catalog;
pub mod embedding;
pub mod error;
pub mod finder;
pub mod search;

pub use catalog::{Catalog, CatalogConfig, CatalogItem, DEFAULT_CONVERSION_RATE};
pub use embedding::{EmbeddingStore, FastEmbedEncoder, TextEncoder, DEFAULT_CACHE_FILE};
pub use error::{GiftError, Result};
pub use finder::GiftFinder;
pub use search::{cosine_similarity, GiftMatch, SearchConfig};
