//! NewsLens Insight crate - the analysis and aggregation engine.
//!
//! Turns a retrieved, ranked document list into one of three views, next to
//! plain search and single-document lookup:
//! - Storylines: similarity clusters ordered in time
//! - Perspectives: per-source volume, entities, tone, terms, and daily counts
//! - Entity graphs: weighted co-occurrence between named entities
//!
//! Embedding, entity extraction, and retrieval are injected capabilities;
//! nothing in this crate loads models or performs I/O.

pub mod entity;
pub mod error;
pub mod graph;
pub mod perspective;
pub mod sentiment;
pub mod service;
pub mod storyline;
pub mod terms;
pub mod types;

pub use entity::{EntityExtractor, RegexEntityExtractor};
pub use error::InsightError;
pub use graph::{build_graph, GraphBuilder};
pub use perspective::{build_perspective, PerspectiveAggregator};
pub use sentiment::sentiment_score;
pub use service::AnalysisService;
pub use storyline::{storyline_clusters, StorylineClusterer};
pub use terms::{top_terms, TermExtractor};
pub use types::{
    EntityGraph, GraphEdge, GraphNode, GraphResponse, PerspectiveResponse, SearchResult,
    SourcePerspective, StoryCluster, StoryGroup, StoryItem, StorylineResponse,
};
