//! Entity co-occurrence graph.

use std::collections::{BTreeMap, HashMap};

use newslens_core::config::GraphConfig;
use newslens_core::types::{Document, EntityType};
use tracing::debug;

use crate::entity::EntityExtractor;
use crate::error::Result;
use crate::types::{EntityGraph, GraphEdge, GraphNode};

/// Builds an undirected graph linking entities mentioned in the same document.
pub struct GraphBuilder {
    max_edges: usize,
}

impl GraphBuilder {
    pub fn new(max_edges: usize) -> Self {
        Self { max_edges }
    }

    pub fn from_config(config: &GraphConfig) -> Self {
        Self::new(config.max_edges)
    }

    /// Edge weight counts documents, so a pair mentioned several times in one
    /// document still adds 1. Only the `max_edges` heaviest edges are kept;
    /// equal weights keep discovery order.
    pub fn build(
        &self,
        documents: &[Document],
        extractor: &dyn EntityExtractor,
    ) -> Result<EntityGraph> {
        let mut labels: BTreeMap<String, EntityType> = BTreeMap::new();
        let mut pairs: Vec<((String, String), usize)> = Vec::new();
        let mut pair_index: HashMap<(String, String), usize> = HashMap::new();

        for doc in documents {
            let mut unique: BTreeMap<String, EntityType> = BTreeMap::new();
            for mention in extractor.extract(&doc.text())? {
                unique.insert(mention.label, mention.entity_type);
            }

            let sorted: Vec<&String> = unique.keys().collect();
            for (i, a) in sorted.iter().enumerate() {
                for b in &sorted[i + 1..] {
                    let key = ((*a).clone(), (*b).clone());
                    match pair_index.get(&key) {
                        Some(&idx) => pairs[idx].1 += 1,
                        None => {
                            pair_index.insert(key.clone(), pairs.len());
                            pairs.push((key, 1));
                        }
                    }
                }
            }

            labels.extend(unique);
        }

        pairs.sort_by(|a, b| b.1.cmp(&a.1));
        pairs.truncate(self.max_edges);

        let nodes: Vec<GraphNode> = labels
            .into_iter()
            .map(|(label, entity_type)| GraphNode {
                id: label.clone(),
                label,
                entity_type,
            })
            .collect();
        let edges: Vec<GraphEdge> = pairs
            .into_iter()
            .map(|((source, target), weight)| GraphEdge {
                source,
                target,
                weight,
            })
            .collect();

        debug!(
            documents = documents.len(),
            nodes = nodes.len(),
            edges = edges.len(),
            "Built entity graph"
        );
        Ok(EntityGraph { nodes, edges })
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::from_config(&GraphConfig::default())
    }
}

/// Build a graph with the default edge cap.
pub fn build_graph(documents: &[Document], extractor: &dyn EntityExtractor) -> Result<EntityGraph> {
    GraphBuilder::default().build(documents, extractor)
}
