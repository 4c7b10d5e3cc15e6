//! NewsLens Vector crate - embedding capability, in-memory vector index, and retrieval.
//!
//! These are the collaborators the analysis engine consumes: an
//! [`Embedder`] that turns texts into fixed-dimension vectors and a
//! [`Retriever`] that returns a ranked, filtered document list for a query.
//! The in-process implementations here need no model files, which keeps the
//! CLI and the test suites self-contained.

pub mod embedding;
pub mod index;
pub mod search;
pub mod similarity;

pub use embedding::{Embedder, HashingEmbedder};
pub use index::{SearchHit, VectorIndex};
pub use search::{filter_date_range, InMemoryRetriever, Retriever, SearchFilters};
pub use similarity::{cosine_distance_matrix, cosine_similarity, l2_normalize};
