//! Text encoder backends
//!
//! [`TextEncoder`] abstracts the sentence-embedding model so the rest of
//! the pipeline never touches fastembed directly. The production backend
//! wraps fastembed's ONNX models; tests substitute a deterministic
//! encoder.

use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::{GiftError, Result};

/// Produces fixed-dimension float vectors from text
///
/// One shared instance lives for the whole process: loading the model is
/// the most expensive step in the pipeline and must not repeat per
/// query. Implementations take multilingual input as-is, without
/// translation.
pub trait TextEncoder: Send + Sync {
    /// Embed a batch of texts, one vector per input in the same order
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed_batch(&[text])?;
        vectors
            .pop()
            .ok_or_else(|| GiftError::embedding("encoder returned no vector"))
    }

    /// Vector dimension of every embedding this encoder produces
    fn dimension(&self) -> usize;

    /// Model identifier recorded in the cache header
    fn model_name(&self) -> &str;
}

/// fastembed-backed sentence encoder
///
/// Defaults to paraphrase-multilingual-MiniLM-L12-v2 (384 dimensions),
/// which matches queries in any language against the catalog. Model
/// files are downloaded on first use and cached locally by fastembed.
///
/// The ONNX session is kept behind a mutex so the encoder can be shared
/// across threads.
pub struct FastEmbedEncoder {
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedEncoder {
    /// Load the default multilingual model
    pub fn new() -> Result<Self> {
        Self::with_model(EmbeddingModel::ParaphraseMLMiniLML12V2)
    }

    /// Load a specific fastembed model
    pub fn with_model(model: EmbeddingModel) -> Result<Self> {
        let model_name = format!("{:?}", model);
        let options = InitOptions::new(model).with_show_download_progress(true);
        let embedding = TextEmbedding::try_new(options)
            .map_err(|e| GiftError::model(format!("Failed to load embedding model: {}", e)))?;

        // Probe the output dimension with a test string
        let probe = embedding
            .embed(vec!["test"], None)
            .map_err(|e| GiftError::model(format!("Failed to encode test string: {}", e)))?;
        let dimension = probe.first().map(|v| v.len()).unwrap_or(0);
        if dimension == 0 {
            return Err(GiftError::model("embedding model returned an empty test vector"));
        }

        log::info!("Loaded embedding model {} ({} dimensions)", model_name, dimension);

        Ok(Self {
            model: Mutex::new(embedding),
            model_name,
            dimension,
        })
    }

    /// Resolve a user-facing model name
    pub fn with_model_name(name: &str) -> Result<Self> {
        Self::with_model(parse_model_name(name)?)
    }
}

impl TextEncoder for FastEmbedEncoder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let model = self
            .model
            .lock()
            .map_err(|_| GiftError::embedding("embedding model lock poisoned"))?;
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| GiftError::embedding(format!("Failed to generate embeddings: {}", e)))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Map a user-facing model name onto the fastembed catalog
fn parse_model_name(name: &str) -> Result<EmbeddingModel> {
    match name.to_lowercase().as_str() {
        "paraphrase-multilingual-minilm-l12-v2" | "paraphrase-ml-minilm" => {
            Ok(EmbeddingModel::ParaphraseMLMiniLML12V2)
        }
        "multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
        "all-minilm-l6-v2" => Ok(EmbeddingModel::AllMiniLML6V2),
        other => Err(GiftError::model(format!(
            "unknown embedding model '{}' (expected paraphrase-ml-minilm, \
             multilingual-e5-small or all-minilm-l6-v2)",
            other
        ))),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::KeywordEncoder;
    use super::*;

    #[test]
    fn test_embed_one_uses_batch_path() {
        let encoder = KeywordEncoder::gift_shop();
        let vector = encoder.embed_one("wireless headphones").unwrap();

        assert_eq!(vector.len(), encoder.dimension());
        assert_eq!(encoder.batch_calls(), 1);
        // "wireless" and "headphones" each hit one vocabulary slot
        assert!((vector.iter().sum::<f32>() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_encoder_is_deterministic() {
        let encoder = KeywordEncoder::gift_shop();
        let first = encoder.embed_one("steel kitchen spoon").unwrap();
        let second = encoder.embed_one("steel kitchen spoon").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_preserves_input_order() {
        let encoder = KeywordEncoder::gift_shop();
        let vectors = encoder
            .embed_batch(&["wireless speaker", "steel spoon"])
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert!(vectors[0][0] > 0.0); // "wireless" slot
        assert!(vectors[1][5] > 0.0); // "steel" slot
    }

    #[test]
    fn test_parse_model_name() {
        assert!(matches!(
            parse_model_name("paraphrase-ml-minilm"),
            Ok(EmbeddingModel::ParaphraseMLMiniLML12V2)
        ));
        assert!(matches!(
            parse_model_name("Paraphrase-Multilingual-MiniLM-L12-v2"),
            Ok(EmbeddingModel::ParaphraseMLMiniLML12V2)
        ));
        assert!(matches!(
            parse_model_name("multilingual-e5-small"),
            Ok(EmbeddingModel::MultilingualE5Small)
        ));

        let err = parse_model_name("gpt-9").unwrap_err();
        assert!(err.to_string().contains("gpt-9"));
    }

    #[test]
    #[ignore = "downloads embedding model"]
    fn test_fastembed_encoder_loads_default_model() {
        let encoder = FastEmbedEncoder::new().unwrap();

        assert_eq!(encoder.dimension(), 384);
        let vector = encoder.embed_one("wireless headphones for a teenager").unwrap();
        assert_eq!(vector.len(), encoder.dimension());
    }

    #[test]
    #[ignore = "downloads embedding model"]
    fn test_fastembed_multilingual_queries_agree() {
        let encoder = FastEmbedEncoder::new().unwrap();

        // Same meaning in two languages should land close together
        let english = encoder.embed_one("wireless headphones").unwrap();
        let german = encoder.embed_one("kabellose Kopfhörer").unwrap();
        let unrelated = encoder.embed_one("stainless steel soup spoon").unwrap();

        let close = crate::search::cosine_similarity(&english, &german);
        let far = crate::search::cosine_similarity(&english, &unrelated);
        assert!(close > far);
    }
}
