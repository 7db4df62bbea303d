//! Persisted embedding cache
//!
//! Encoding the full catalog takes minutes on CPU, so the vectors are
//! computed once and stored as a single bincode blob next to the
//! catalog. The blob header carries a format version, the model name,
//! the row count and a content fingerprint; any mismatch marks the
//! cache stale and triggers a silent rebuild instead of serving vectors
//! for a catalog that no longer exists.

use std::fs;
use std::hash::Hasher;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::encoder::TextEncoder;
use crate::catalog::Catalog;
use crate::error::Result;

/// Default cache file name, created next to the catalog
pub const DEFAULT_CACHE_FILE: &str = "catalog_embeddings.bin";

/// Leading description characters submitted to the encoder
///
/// Counted in characters, not bytes, so multibyte text never splits.
pub const DESCRIPTION_PREFIX_CHARS: usize = 500;

/// On-disk format version; bump when the payload layout changes
const CACHE_VERSION: u32 = 1;

/// Serialized cache payload
#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    model: String,
    dimension: usize,
    catalog_len: usize,
    catalog_fingerprint: u64,
    built_at: DateTime<Utc>,
    vectors: Vec<Vec<f32>>,
}

impl CacheFile {
    fn matches(&self, catalog_len: usize, fingerprint: u64, model: &str) -> bool {
        self.version == CACHE_VERSION
            && self.catalog_len == catalog_len
            && self.catalog_fingerprint == fingerprint
            && self.model == model
    }
}

/// Catalog embeddings, aligned one-to-one with catalog rows
#[derive(Debug)]
pub struct EmbeddingStore {
    vectors: Vec<Vec<f32>>,
    dimension: usize,
    model: String,
    built_at: DateTime<Utc>,
}

impl EmbeddingStore {
    /// Load the persisted cache or build it by encoding the catalog
    ///
    /// A missing, unreadable or mismatching cache file triggers a
    /// rebuild. Writing the rebuilt cache is best-effort: on failure the
    /// in-memory vectors are still returned and the next run rebuilds
    /// again.
    pub fn get_or_build(
        catalog: &Catalog,
        encoder: &dyn TextEncoder,
        cache_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let cache_path = cache_path.as_ref();
        let fingerprint = catalog_fingerprint(catalog);

        if cache_path.exists() {
            match read_cache(cache_path) {
                Ok(file) if file.matches(catalog.len(), fingerprint, encoder.model_name()) => {
                    log::info!(
                        "Loaded {} cached embeddings from {} (built {})",
                        file.vectors.len(),
                        cache_path.display(),
                        file.built_at
                    );
                    return Ok(Self::from_file(file));
                }
                Ok(_) => {
                    log::warn!(
                        "Embedding cache at {} does not match the current catalog, rebuilding",
                        cache_path.display()
                    );
                }
                Err(e) => {
                    log::warn!(
                        "Failed to read embedding cache at {}: {}. Rebuilding.",
                        cache_path.display(),
                        e
                    );
                }
            }
        }

        let file = build_cache(catalog, encoder, fingerprint)?;
        if let Err(e) = write_cache(cache_path, &file) {
            log::warn!(
                "Failed to write embedding cache to {}: {} (continuing with in-memory vectors)",
                cache_path.display(),
                e
            );
        }
        Ok(Self::from_file(file))
    }

    fn from_file(file: CacheFile) -> Self {
        Self {
            vectors: file.vectors,
            dimension: file.dimension,
            model: file.model,
            built_at: file.built_at,
        }
    }

    /// Embedding vectors in catalog order
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the store holds no vectors
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimension
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Model that produced the vectors
    pub fn model(&self) -> &str {
        &self.model
    }

    /// When the vectors were computed
    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

fn build_cache(
    catalog: &Catalog,
    encoder: &dyn TextEncoder,
    fingerprint: u64,
) -> Result<CacheFile> {
    let texts: Vec<String> = catalog
        .iter()
        .map(|item| embed_text(&item.description))
        .collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    log::info!(
        "Encoding {} catalog descriptions with {}",
        refs.len(),
        encoder.model_name()
    );
    let vectors = encoder.embed_batch(&refs)?;

    Ok(CacheFile {
        version: CACHE_VERSION,
        model: encoder.model_name().to_string(),
        dimension: encoder.dimension(),
        catalog_len: catalog.len(),
        catalog_fingerprint: fingerprint,
        built_at: Utc::now(),
        vectors,
    })
}

fn read_cache(path: &Path) -> Result<CacheFile> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

fn write_cache(path: &Path, file: &CacheFile) -> Result<()> {
    let bytes = bincode::serialize(file)?;
    fs::write(path, bytes)?;
    log::info!("Wrote {} embeddings to {}", file.vectors.len(), path.display());
    Ok(())
}

/// Text actually submitted to the encoder for one item
fn embed_text(description: &str) -> String {
    description.chars().take(DESCRIPTION_PREFIX_CHARS).collect()
}

/// Stable content fingerprint over the text that gets embedded
///
/// seahash is deterministic across processes and builds, unlike the
/// std hasher.
fn catalog_fingerprint(catalog: &Catalog) -> u64 {
    let mut hasher = seahash::SeaHasher::new();
    for item in catalog.iter() {
        hasher.write(embed_text(&item.description).as_bytes());
        hasher.write_u8(0);
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;
    use crate::embedding::testing::KeywordEncoder;
    use tempfile::TempDir;

    fn item(index: usize, name: &str, description: &str, price_eur: f64) -> CatalogItem {
        CatalogItem {
            index,
            name: name.to_string(),
            description: description.to_string(),
            image_url: String::new(),
            price_inr: price_eur * 105.0,
            price_eur,
        }
    }

    fn sample_catalog() -> Catalog {
        Catalog::from_items(vec![
            item(0, "Headphones", "wireless bluetooth headphones", 30.0),
            item(1, "Spoon", "steel kitchen spoon", 2.0),
            item(2, "Cable", "braided charger cable", 10.0),
        ])
    }

    #[test]
    fn test_build_then_reload_hits_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        let catalog = sample_catalog();
        let encoder = KeywordEncoder::gift_shop();

        let first = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();
        assert_eq!(encoder.batch_calls(), 1);
        assert_eq!(first.len(), 3);
        assert!(path.exists());

        let bytes_after_build = std::fs::read(&path).unwrap();

        let second = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();
        // Cache hit: no second encoding pass, file untouched
        assert_eq!(encoder.batch_calls(), 1);
        assert_eq!(second.vectors(), first.vectors());
        assert_eq!(std::fs::read(&path).unwrap(), bytes_after_build);
    }

    #[test]
    fn test_round_trip_preserves_vectors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        let catalog = sample_catalog();
        let encoder = KeywordEncoder::gift_shop();

        let built = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();
        let reloaded = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();

        for (a, b) in built.vectors().iter().zip(reloaded.vectors()) {
            assert_eq!(a.len(), b.len());
            for (x, y) in a.iter().zip(b) {
                assert!((x - y).abs() <= 1e-6);
            }
        }
        assert_eq!(built.built_at(), reloaded.built_at());
        assert_eq!(reloaded.model(), "keyword-test-encoder");
    }

    #[test]
    fn test_changed_catalog_marks_cache_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        let encoder = KeywordEncoder::gift_shop();

        let old_catalog = Catalog::from_items(vec![
            item(0, "Headphones", "wireless bluetooth headphones", 30.0),
            item(1, "Spoon", "steel kitchen spoon", 2.0),
        ]);
        EmbeddingStore::get_or_build(&old_catalog, &encoder, &path).unwrap();
        assert_eq!(encoder.batch_calls(), 1);

        let store = EmbeddingStore::get_or_build(&sample_catalog(), &encoder, &path).unwrap();
        // Row count changed: rebuild, not a stale hit
        assert_eq!(encoder.batch_calls(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_same_row_count_different_text_marks_cache_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        let encoder = KeywordEncoder::gift_shop();

        EmbeddingStore::get_or_build(&sample_catalog(), &encoder, &path).unwrap();

        let edited = Catalog::from_items(vec![
            item(0, "Headphones", "wireless bluetooth headphones", 30.0),
            item(1, "Spoon", "steel kitchen spoon", 2.0),
            item(2, "Speaker", "portable bluetooth speaker", 25.0),
        ]);
        EmbeddingStore::get_or_build(&edited, &encoder, &path).unwrap();

        assert_eq!(encoder.batch_calls(), 2);
    }

    #[test]
    fn test_corrupt_cache_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        std::fs::write(&path, b"not a cache file").unwrap();

        let catalog = sample_catalog();
        let encoder = KeywordEncoder::gift_shop();
        let store = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();

        assert_eq!(encoder.batch_calls(), 1);
        assert_eq!(store.len(), 3);
        // The rebuilt blob replaced the garbage
        let reloaded = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();
        assert_eq!(encoder.batch_calls(), 1);
        assert_eq!(reloaded.len(), 3);
    }

    #[test]
    fn test_unwritable_cache_path_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("emb.bin");

        let catalog = sample_catalog();
        let encoder = KeywordEncoder::gift_shop();
        let store = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();

        assert_eq!(store.len(), 3);
        assert!(!path.exists());
    }

    #[test]
    fn test_embed_text_truncates_on_char_boundary() {
        let long = "é".repeat(600);
        let truncated = embed_text(&long);

        assert_eq!(truncated.chars().count(), DESCRIPTION_PREFIX_CHARS);

        let short = "wireless headphones";
        assert_eq!(embed_text(short), short);
    }

    #[test]
    fn test_fingerprint_tracks_embedded_prefix_only() {
        let base = "x".repeat(DESCRIPTION_PREFIX_CHARS);

        let a = Catalog::from_items(vec![item(0, "A", &format!("{base}tail-one"), 1.0)]);
        let b = Catalog::from_items(vec![item(0, "A", &format!("{base}tail-two"), 1.0)]);
        // Text beyond the embedded prefix cannot invalidate the cache
        assert_eq!(catalog_fingerprint(&a), catalog_fingerprint(&b));

        let c = Catalog::from_items(vec![item(0, "A", "different", 1.0)]);
        assert_ne!(catalog_fingerprint(&a), catalog_fingerprint(&c));
    }

    #[test]
    fn test_empty_catalog_builds_empty_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("emb.bin");
        let catalog = Catalog::from_items(vec![]);
        let encoder = KeywordEncoder::gift_shop();

        let store = EmbeddingStore::get_or_build(&catalog, &encoder, &path).unwrap();
        assert!(store.is_empty());
    }
}
