//! Query-level analysis: retrieve, then build one of the three views.

use chrono::{DateTime, Utc};
use newslens_core::config::NewsLensConfig;
use newslens_core::dates::normalize_published;
use newslens_core::error::NewsLensError;
use newslens_core::types::Document;
use newslens_vector::embedding::Embedder;
use newslens_vector::search::{Retriever, SearchFilters};
use tracing::info;

use crate::entity::EntityExtractor;
use crate::error::{InsightError, Result};
use crate::graph::GraphBuilder;
use crate::perspective::PerspectiveAggregator;
use crate::storyline::StorylineClusterer;
use crate::terms::TermExtractor;
use crate::types::{
    GraphResponse, PerspectiveResponse, SearchResult, StoryCluster, StoryItem,
    StorylineResponse,
};

/// Shortest query accepted, in characters after trimming.
pub const MIN_QUERY_CHARS: usize = 2;

/// Length of the content excerpt in search results, in characters.
pub const SNIPPET_CHARS: usize = 240;

/// Wires the injected collaborators to the analysis components.
///
/// Holds borrowed capabilities only; the caller constructs backends once
/// and keeps them alive for as long as the service is used.
pub struct AnalysisService<'a> {
    retriever: &'a dyn Retriever,
    embedder: &'a dyn Embedder,
    extractor: &'a dyn EntityExtractor,
    config: NewsLensConfig,
}

impl<'a> AnalysisService<'a> {
    pub fn new(
        retriever: &'a dyn Retriever,
        embedder: &'a dyn Embedder,
        extractor: &'a dyn EntityExtractor,
        config: NewsLensConfig,
    ) -> Self {
        Self {
            retriever,
            embedder,
            extractor,
            config,
        }
    }

    /// Ranked retrieval without further analysis.
    pub fn search(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
    ) -> Result<Vec<SearchResult>> {
        validate_query(query)?;
        let documents = self.retriever.search(query, k, filters)?;
        let results: Vec<SearchResult> = documents
            .iter()
            .map(|doc| SearchResult {
                title: doc.title.clone(),
                url: doc.url.clone(),
                source: doc.source.clone(),
                score: doc.score,
                snippet: truncate_chars(&doc.content, SNIPPET_CHARS),
                published_at: normalize_published(doc.published_at.as_ref()),
            })
            .collect();

        info!(query, results = results.len(), "Search complete");
        Ok(results)
    }

    /// Fetch one document by URL, its content cut to `max_chars` characters.
    /// `max_chars == 0` returns the full content.
    pub fn document(&self, url: &str, max_chars: usize) -> Result<Option<Document>> {
        let Some(mut doc) = self.retriever.document(url)? else {
            return Ok(None);
        };
        if max_chars > 0 {
            doc.content = truncate_chars(&doc.content, max_chars);
        }
        Ok(Some(doc))
    }

    /// Retrieve up to `k` documents and group them into dated storylines.
    pub fn build_storyline(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
    ) -> Result<StorylineResponse> {
        validate_query(query)?;
        let documents = self.retriever.search(query, k, filters)?;

        let texts: Vec<String> = documents.iter().map(Document::text).collect();
        let embeddings = self.embedder.embed_batch(&texts)?;
        if embeddings.len() != documents.len() {
            return Err(NewsLensError::Embedding(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            ))
            .into());
        }
        let titles: Vec<String> = documents.iter().map(|d| d.title.clone()).collect();
        let dates: Vec<Option<DateTime<Utc>>> = documents
            .iter()
            .map(|d| normalize_published(d.published_at.as_ref()))
            .collect();

        let groups = StorylineClusterer::new(self.config.storyline.min_documents)
            .cluster(&embeddings, &titles, &dates)?;

        let clusters: Vec<StoryCluster> = groups
            .into_iter()
            .enumerate()
            .map(|(cluster_id, group)| {
                let member_dates = group.indices.iter().filter_map(|&i| dates[i]);
                let timespan = [member_dates.clone().min(), member_dates.max()];
                let items = group
                    .indices
                    .iter()
                    .map(|&i| story_item(&documents[i], dates[i]))
                    .collect();
                StoryCluster {
                    cluster_id,
                    title: group.title,
                    timespan,
                    items,
                }
            })
            .collect();

        info!(
            query,
            documents = documents.len(),
            clusters = clusters.len(),
            "Storyline built"
        );
        Ok(StorylineResponse {
            query: query.to_string(),
            clusters,
        })
    }

    /// Retrieve up to `k` documents and compare them per source.
    ///
    /// `filters` apply during retrieval. A single source is pushed into
    /// retrieval as well; several sources are applied after retrieval.
    pub fn build_perspective(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
        sources: &[String],
    ) -> Result<PerspectiveResponse> {
        validate_query(query)?;
        let filters = match sources {
            [only] => filters.clone().with_source(only.clone()),
            _ => filters.clone(),
        };
        let documents = self.retriever.search(query, k, &filters)?;

        let aggregator = PerspectiveAggregator::from_config(
            &self.config.perspective,
            TermExtractor::new(self.config.terms.max_features),
        );
        let reports = aggregator.build(&documents, Some(sources), self.extractor)?;

        info!(
            query,
            documents = documents.len(),
            sources = reports.len(),
            "Perspective built"
        );
        Ok(PerspectiveResponse {
            query: query.to_string(),
            sources: reports,
        })
    }

    /// Retrieve up to `k` documents and link co-mentioned entities.
    pub fn build_graph(
        &self,
        query: &str,
        k: usize,
        filters: &SearchFilters,
    ) -> Result<GraphResponse> {
        validate_query(query)?;
        let documents = self.retriever.search(query, k, filters)?;
        let graph =
            GraphBuilder::from_config(&self.config.graph).build(&documents, self.extractor)?;

        info!(
            query,
            documents = documents.len(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "Graph built"
        );
        Ok(GraphResponse::new(query, graph))
    }
}

fn validate_query(query: &str) -> Result<()> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Err(InsightError::InvalidInput(format!(
            "query must have at least {} characters",
            MIN_QUERY_CHARS
        )));
    }
    Ok(())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn story_item(doc: &Document, published_at: Option<DateTime<Utc>>) -> StoryItem {
    StoryItem {
        title: doc.title.clone(),
        url: doc.url.clone(),
        source: doc.source.clone(),
        published_at,
        score: doc.score,
    }
}
