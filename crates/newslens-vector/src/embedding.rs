//! Embedding capability and the in-process hashing backend.
//!
//! - [`Embedder`] is the narrow contract the analysis engine calls. Real
//!   model backends (sentence-transformers, ONNX, a remote service) live
//!   behind it and are constructed once by the caller.
//! - [`HashingEmbedder`] is a feature-hashing bag of words. It is
//!   deterministic, needs no model files, and keeps lexically similar texts
//!   close in cosine space, which is enough for tests and the CLI.

use newslens_core::error::{NewsLensError, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Service for generating text embeddings.
///
/// Implementations return one vector per input text, in input order, all of
/// [`Embedder::dimensions`] length. Empty input yields empty output.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Return the dimensionality of vectors produced by this service.
    fn dimensions(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| NewsLensError::Embedding("backend returned no vector".to_string()))
    }
}

impl<E: Embedder + ?Sized> Embedder for &E {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }
}

/// Feature-hashing embedder over lowercase word tokens.
///
/// Each token is hashed into one of `dimensions` buckets with a sign taken
/// from the hash, then the vector is L2-normalized. Texts without any word
/// characters map to the zero vector.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(NewsLensError::Config(
                "embedding dimensions must be greater than zero".to_string(),
            ));
        }
        Ok(Self { dimensions })
    }

    fn hash_to_vector(&self, text: &str) -> Vec<f32> {
        let mut result = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let h = token_hash(&token.to_lowercase());
            let bucket = (h % self.dimensions as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            result[bucket] += sign;
        }

        let norm: f32 = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut result {
                *val /= norm;
            }
        }

        result
    }
}

/// First 8 bytes of the SHA-256 digest, big-endian. Stable across builds
/// and platforms.
fn token_hash(token: &str) -> u64 {
    let digest = Sha256::digest(token.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(bytes)
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

impl Embedder for HashingEmbedder {
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(texts = texts.len(), dimensions = self.dimensions, "Embedding batch");
        Ok(texts.iter().map(|t| self.hash_to_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
