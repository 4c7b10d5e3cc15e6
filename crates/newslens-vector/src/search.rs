//! Retrieval: the ranked, filtered document list the analysis engine consumes.

use chrono::{DateTime, Utc};
use newslens_core::dates::normalize_published;
use newslens_core::error::{NewsLensError, Result};
use newslens_core::types::Document;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::index::VectorIndex;

/// Optional filters applied during retrieval.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Case-insensitive substring match on the title.
    pub title_contains: Option<String>,
    /// Exact match on the source name.
    pub source: Option<String>,
    /// Earliest publication instant (inclusive).
    pub start: Option<DateTime<Utc>>,
    /// Latest publication instant (inclusive).
    pub end: Option<DateTime<Utc>>,
}

impl SearchFilters {
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Blank strings count as "no filter".
    fn matches(&self, document: &Document) -> bool {
        if let Some(needle) = self.title_contains.as_deref().map(str::trim) {
            if !needle.is_empty()
                && !document
                    .title
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        if let Some(source) = self.source.as_deref().map(str::trim) {
            if !source.is_empty() && document.source.trim() != source {
                return false;
            }
        }
        in_date_range(document, self.start, self.end)
    }
}

/// Query-time retrieval capability.
///
/// Returns at most `k` documents ranked by relevance score, descending.
/// Zero matches is an empty list, not an error.
pub trait Retriever: Send + Sync {
    fn search(&self, query: &str, k: usize, filters: &SearchFilters) -> Result<Vec<Document>>;

    /// Look up one stored document by its exact URL.
    fn document(&self, url: &str) -> Result<Option<Document>>;
}

impl<R: Retriever + ?Sized> Retriever for &R {
    fn search(&self, query: &str, k: usize, filters: &SearchFilters) -> Result<Vec<Document>> {
        (**self).search(query, k, filters)
    }

    fn document(&self, url: &str) -> Result<Option<Document>> {
        (**self).document(url)
    }
}

/// Whether a document falls inside `[start, end]`.
///
/// Documents whose date is missing or cannot be parsed pass through.
fn in_date_range(
    document: &Document,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> bool {
    let Some(published) = normalize_published(document.published_at.as_ref()) else {
        return true;
    };
    if start.is_some_and(|s| published < s) {
        return false;
    }
    if end.is_some_and(|e| published > e) {
        return false;
    }
    true
}

/// Keep documents published inside `[start, end]`, inclusive.
///
/// Documents with missing or unparseable dates are retained.
pub fn filter_date_range(
    documents: Vec<Document>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<Document> {
    if start.is_none() && end.is_none() {
        return documents;
    }
    documents
        .into_iter()
        .filter(|d| in_date_range(d, start, end))
        .collect()
}

/// Semantic retrieval over an in-memory [`VectorIndex`].
pub struct InMemoryRetriever<E: Embedder> {
    index: VectorIndex,
    embedder: E,
}

impl<E: Embedder> InMemoryRetriever<E> {
    pub fn new(embedder: E) -> Self {
        Self {
            index: VectorIndex::new(),
            embedder,
        }
    }

    /// Embed and store one document. Re-indexing a URL replaces it.
    pub fn index_document(&self, document: Document) -> Result<Uuid> {
        let id = VectorIndex::document_id(&document);
        let embedding = self.embedder.embed(&document.text())?;
        self.index.insert(id, embedding, document)?;
        Ok(id)
    }

    /// Embed and store a batch of documents with one embedding call.
    pub fn index_documents(&self, documents: Vec<Document>) -> Result<usize> {
        let texts: Vec<String> = documents.iter().map(Document::text).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != documents.len() {
            return Err(NewsLensError::Embedding(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }
        let count = documents.len();
        for (document, embedding) in documents.into_iter().zip(embeddings) {
            let id = VectorIndex::document_id(&document);
            self.index.insert(id, embedding, document)?;
        }
        debug!(indexed = count, total = self.index.len(), "Indexed documents");
        Ok(count)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }
}

impl<E: Embedder> Retriever for InMemoryRetriever<E> {
    fn search(&self, query: &str, k: usize, filters: &SearchFilters) -> Result<Vec<Document>> {
        if k == 0 || self.index.is_empty() {
            return Ok(Vec::new());
        }
        let query_vec = self.embedder.embed(query)?;
        let results: Vec<Document> = self
            .index
            .search(&query_vec)?
            .into_iter()
            .filter(|hit| filters.matches(&hit.document))
            .take(k)
            .map(|hit| Document {
                score: Some(hit.score),
                ..hit.document
            })
            .collect();

        debug!(query, k, results = results.len(), "Retrieval complete");
        Ok(results)
    }

    fn document(&self, url: &str) -> Result<Option<Document>> {
        match VectorIndex::url_id(url) {
            Some(id) => self.index.get(id),
            None => Ok(None),
        }
    }
}
