//! In-memory vector index with brute-force cosine similarity search.
//!
//! All operations are O(n) for search, which is fine for the result-set
//! sizes the analysis engine works with.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use newslens_core::error::{NewsLensError, Result};
use newslens_core::types::Document;
use uuid::Uuid;

use crate::similarity::cosine_similarity;

/// A single hit returned from a vector search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The ID of the matching entry.
    pub id: Uuid,
    /// Cosine similarity score.
    pub score: f64,
    /// The stored document.
    pub document: Document,
}

#[derive(Debug, Clone)]
struct VectorEntry {
    embedding: Vec<f32>,
    document: Document,
}

/// In-memory document index keyed by UUID.
///
/// Thread-safe via interior RwLock.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Arc<RwLock<HashMap<Uuid, VectorEntry>>>,
}

impl VectorIndex {
    /// Create a new empty vector index.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Deterministic ID for a document: UUIDv5 of its URL, so indexing the
    /// same URL twice replaces the earlier entry. Documents without a URL
    /// get a random ID.
    pub fn document_id(document: &Document) -> Uuid {
        Self::url_id(&document.url).unwrap_or_else(Uuid::new_v4)
    }

    /// UUIDv5 of a trimmed URL, or `None` for a blank one.
    pub fn url_id(url: &str) -> Option<Uuid> {
        let url = url.trim();
        if url.is_empty() {
            None
        } else {
            Some(Uuid::new_v5(&Uuid::NAMESPACE_URL, url.as_bytes()))
        }
    }

    /// Insert a vector with its document. Overwrites any entry with the same ID.
    pub fn insert(&self, id: Uuid, embedding: Vec<f32>, document: Document) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| NewsLensError::Retrieval(format!("Lock poisoned: {}", e)))?;
        entries.insert(
            id,
            VectorEntry {
                embedding,
                document,
            },
        );
        Ok(())
    }

    /// Score every entry against the query vector.
    ///
    /// Returns hits sorted by descending score; equal scores are ordered by
    /// ID so results are reproducible.
    pub fn search(&self, query: &[f32]) -> Result<Vec<SearchHit>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| NewsLensError::Retrieval(format!("Lock poisoned: {}", e)))?;

        let mut scored: Vec<SearchHit> = entries
            .iter()
            .map(|(id, entry)| SearchHit {
                id: *id,
                score: cosine_similarity(query, &entry.embedding),
                document: entry.document.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(scored)
    }

    /// Fetch the stored document for an ID.
    pub fn get(&self, id: Uuid) -> Result<Option<Document>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| NewsLensError::Retrieval(format!("Lock poisoned: {}", e)))?;
        Ok(entries.get(&id).map(|entry| entry.document.clone()))
    }

    /// Return the number of vectors currently stored in the index.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Return true if the index contains no vectors.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VectorIndex {
    fn default() -> Self {
        Self::new()
    }
}
