//! Per-source comparison reports.

use std::collections::{BTreeMap, HashMap};

use newslens_core::config::PerspectiveConfig;
use newslens_core::types::Document;
use tracing::debug;

use crate::entity::EntityExtractor;
use crate::error::Result;
use crate::sentiment::sentiment_score;
use crate::terms::TermExtractor;
use crate::types::SourcePerspective;

/// Histogram bucket for documents without a publication date.
pub const UNKNOWN_DAY: &str = "unknown";

/// Builds one [`SourcePerspective`] per distinct source.
pub struct PerspectiveAggregator {
    top_entities: usize,
    top_terms: usize,
    terms: TermExtractor,
}

impl PerspectiveAggregator {
    pub fn new(top_entities: usize, top_terms: usize, terms: TermExtractor) -> Self {
        Self {
            top_entities,
            top_terms,
            terms,
        }
    }

    pub fn from_config(config: &PerspectiveConfig, terms: TermExtractor) -> Self {
        Self::new(config.top_entities, config.top_terms, terms)
    }

    /// Aggregate `documents` by source.
    ///
    /// A non-empty `sources` list keeps only documents from those sources.
    /// Reports are ordered by volume, largest first; equal volumes keep the
    /// order in which the sources were first seen.
    pub fn build(
        &self,
        documents: &[Document],
        sources: Option<&[String]>,
        extractor: &dyn EntityExtractor,
    ) -> Result<Vec<SourcePerspective>> {
        let allowed: Option<Vec<&str>> = sources
            .filter(|s| !s.is_empty())
            .map(|s| s.iter().map(|name| name.trim()).collect());

        let mut order: Vec<&str> = Vec::new();
        let mut partitions: HashMap<&str, Vec<&Document>> = HashMap::new();
        for doc in documents {
            let source = doc.source_or_unknown();
            if let Some(allowed) = &allowed {
                if !allowed.contains(&source) {
                    continue;
                }
            }
            partitions
                .entry(source)
                .or_insert_with(|| {
                    order.push(source);
                    Vec::new()
                })
                .push(doc);
        }

        let mut reports = Vec::with_capacity(order.len());
        for source in order {
            let docs = partitions.remove(source).unwrap_or_default();
            reports.push(self.report(source, &docs, extractor)?);
        }
        reports.sort_by(|a, b| b.volume.cmp(&a.volume));

        debug!(
            documents = documents.len(),
            sources = reports.len(),
            "Built perspective reports"
        );
        Ok(reports)
    }

    fn report(
        &self,
        source: &str,
        docs: &[&Document],
        extractor: &dyn EntityExtractor,
    ) -> Result<SourcePerspective> {
        let texts: Vec<String> = docs.iter().map(|d| d.text()).collect();

        let mut mentions = Vec::new();
        for text in &texts {
            mentions.extend(extractor.extract(text)?.into_iter().map(|m| m.label));
        }

        let scored: Vec<f64> = texts
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| sentiment_score(t))
            .collect();
        let avg_sentiment = if scored.is_empty() {
            0.0
        } else {
            scored.iter().sum::<f64>() / scored.len() as f64
        };

        let mut time_histogram: BTreeMap<String, usize> = BTreeMap::new();
        for doc in docs {
            let key = doc
                .published_at
                .as_ref()
                .map(|p| p.day_key())
                .filter(|k| !k.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DAY.to_string());
            *time_histogram.entry(key).or_insert(0) += 1;
        }

        Ok(SourcePerspective {
            source: source.to_string(),
            volume: docs.len(),
            top_entities: most_common(mentions, self.top_entities),
            avg_sentiment,
            top_terms: self.terms.top_terms(&texts, self.top_terms),
            time_histogram,
        })
    }
}

impl Default for PerspectiveAggregator {
    fn default() -> Self {
        Self::from_config(&PerspectiveConfig::default(), TermExtractor::default())
    }
}

/// Aggregate with default settings.
pub fn build_perspective(
    documents: &[Document],
    sources: Option<&[String]>,
    extractor: &dyn EntityExtractor,
) -> Result<Vec<SourcePerspective>> {
    PerspectiveAggregator::default().build(documents, sources, extractor)
}

/// Up to `k` items by frequency, ties in first-seen order.
fn most_common(items: Vec<String>, k: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut position: HashMap<String, usize> = HashMap::new();
    for item in items {
        match position.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(k).map(|(item, _)| item).collect()
}
