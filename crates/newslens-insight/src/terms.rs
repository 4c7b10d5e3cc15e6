//! Corpus-relative term salience (TF-IDF over unigrams and bigrams).
//!
//! Each text in the batch is a document for IDF purposes, so terms shared by
//! every document are pushed down while terms distinctive to a few are
//! boosted. Salience is the mean L2-normalized row weight across the batch.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::debug;

/// Default vocabulary cap.
pub const DEFAULT_MAX_FEATURES: usize = 2048;

/// Ranks salient unigrams and bigrams across a small batch of texts.
pub struct TermExtractor {
    max_features: usize,
    token_regex: Regex,
}

impl TermExtractor {
    /// Create an extractor keeping at most `max_features` terms.
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            token_regex: Regex::new(r"\w+").expect("token pattern is valid"),
        }
    }

    /// Return up to `k` terms ranked by salience, highest first.
    pub fn top_terms(&self, texts: &[String], k: usize) -> Vec<String> {
        self.scored_terms(texts)
            .into_iter()
            .take(k)
            .map(|(term, _)| term)
            .collect()
    }

    /// All terms with a positive salience, highest first; ties are ordered
    /// lexically.
    pub fn scored_terms(&self, texts: &[String]) -> Vec<(String, f64)> {
        if texts.is_empty() {
            return Vec::new();
        }

        let counts: Vec<HashMap<String, usize>> =
            texts.iter().map(|t| self.term_counts(t)).collect();

        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        let mut total_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for (term, count) in doc {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
                *total_freq.entry(term.as_str()).or_insert(0) += count;
            }
        }
        if doc_freq.is_empty() {
            return Vec::new();
        }

        let vocabulary = self.select_vocabulary(&doc_freq, &total_freq);

        let n = texts.len() as f64;
        let idf: HashMap<&str, f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq[term] as f64;
                (*term, ((1.0 + n) / (1.0 + df)).ln() + 1.0)
            })
            .collect();

        let mut sums: HashMap<&str, f64> = HashMap::new();
        for doc in &counts {
            let weights: Vec<(&str, f64)> = doc
                .iter()
                .filter_map(|(term, count)| {
                    idf.get(term.as_str())
                        .map(|w| (term.as_str(), *count as f64 * w))
                })
                .collect();
            let norm = weights.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm == 0.0 {
                continue;
            }
            for (term, w) in weights {
                *sums.entry(term).or_insert(0.0) += w / norm;
            }
        }

        let mut scored: Vec<(String, f64)> = sums
            .into_iter()
            .map(|(term, sum)| (term.to_string(), sum / n))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        debug!(
            documents = texts.len(),
            vocabulary = vocabulary.len(),
            scored = scored.len(),
            "Computed term salience"
        );
        scored
    }

    /// Unigram and bigram counts for one text.
    fn term_counts(&self, text: &str) -> HashMap<String, usize> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut counts: HashMap<String, usize> = HashMap::new();
        for token in &tokens {
            *counts.entry((*token).to_string()).or_insert(0) += 1;
        }
        for pair in tokens.windows(2) {
            *counts.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
        }
        counts
    }

    /// Apply the vocabulary cap, preferring terms found in more documents.
    fn select_vocabulary<'a>(
        &self,
        doc_freq: &HashMap<&'a str, usize>,
        total_freq: &HashMap<&'a str, usize>,
    ) -> HashSet<&'a str> {
        if doc_freq.len() <= self.max_features {
            return doc_freq.keys().copied().collect();
        }
        let mut terms: Vec<&'a str> = doc_freq.keys().copied().collect();
        terms.sort_by(|a, b| {
            doc_freq[b]
                .cmp(&doc_freq[a])
                .then_with(|| total_freq[b].cmp(&total_freq[a]))
                .then_with(|| a.cmp(b))
        });
        terms.truncate(self.max_features);
        terms.into_iter().collect()
    }
}

impl Default for TermExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

/// Top `k` salient terms with the default vocabulary cap.
pub fn top_terms(texts: &[String], k: usize) -> Vec<String> {
    TermExtractor::default().top_terms(texts, k)
}
