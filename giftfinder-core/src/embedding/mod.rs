//! Embedding generation and persistence
//!
//! [`TextEncoder`] turns product descriptions and queries into vectors;
//! [`EmbeddingStore`] keeps the catalog's vectors on disk across runs.

mod cache;
mod encoder;

pub use cache::{EmbeddingStore, DEFAULT_CACHE_FILE, DESCRIPTION_PREFIX_CHARS};
pub use encoder::{FastEmbedEncoder, TextEncoder};

#[cfg(test)]
pub(crate) use encoder::testing;
