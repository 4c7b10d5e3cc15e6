use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use newslens_core::types::EntityType;
use serde::{Deserialize, Serialize};

/// One storyline cluster as produced by the clusterer: document indices in
/// chronological order plus the title of the earliest member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryGroup {
    pub indices: Vec<usize>,
    pub title: String,
}

/// One ranked retrieval hit with a content excerpt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub source: String,
    pub score: Option<f64>,
    /// Leading characters of the content.
    pub snippet: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Document entry inside a storyline cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryItem {
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub score: Option<f64>,
}

/// A storyline cluster ready for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryCluster {
    /// Position of the cluster in the chronological storyline.
    pub cluster_id: usize,
    /// Title of the first chronological member.
    pub title: String,
    /// `[earliest, latest]` normalized publication instant of the members.
    pub timespan: [Option<DateTime<Utc>>; 2],
    pub items: Vec<StoryItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorylineResponse {
    pub query: String,
    pub clusters: Vec<StoryCluster>,
}

/// Per-source comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePerspective {
    pub source: String,
    pub volume: usize,
    pub top_entities: Vec<String>,
    /// Mean heuristic tone, -1..=1.
    pub avg_sentiment: f64,
    pub top_terms: Vec<String>,
    /// `YYYY-MM-DD` -> document count.
    pub time_histogram: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveResponse {
    pub query: String,
    pub sources: Vec<SourcePerspective>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

/// Undirected co-occurrence edge. `source` sorts before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: usize,
}

/// Entity co-occurrence graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphResponse {
    pub query: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphResponse {
    pub fn new(query: impl Into<String>, graph: EntityGraph) -> Self {
        Self {
            query: query.into(),
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}
