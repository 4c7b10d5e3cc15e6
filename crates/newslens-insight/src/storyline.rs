//! Storyline clustering: similarity groups ordered in time.

use chrono::{DateTime, Utc};
use newslens_vector::similarity::cosine_distance_matrix;
use tracing::debug;

use crate::error::{InsightError, Result};
use crate::types::StoryGroup;

/// Default minimum number of documents before clustering is attempted.
pub const DEFAULT_MIN_DOCUMENTS: usize = 2;

/// Groups document embeddings into storylines.
///
/// The cluster count is not a parameter: for `n` documents it is
/// `max(2, round(sqrt(n)))`, so group count grows sub-linearly with the
/// result set. Grouping is average-linkage agglomerative clustering over
/// cosine distance.
pub struct StorylineClusterer {
    /// Below this many documents everything lands in one cluster.
    pub min_documents: usize,
}

impl StorylineClusterer {
    pub fn new(min_documents: usize) -> Self {
        Self { min_documents }
    }

    /// Number of clusters produced for `n` documents at or above the minimum.
    pub fn cluster_count(n: usize) -> usize {
        ((n as f64).sqrt().round() as usize).max(2)
    }

    /// Cluster `embeddings` and order the result chronologically.
    ///
    /// `titles` and `dates` are parallel to `embeddings`. Members of each
    /// group are sorted by date (missing dates first), and groups by their
    /// earliest member. Each group is labelled with the title of its first
    /// chronological member.
    pub fn cluster(
        &self,
        embeddings: &[Vec<f32>],
        titles: &[String],
        dates: &[Option<DateTime<Utc>>],
    ) -> Result<Vec<StoryGroup>> {
        let n = embeddings.len();
        if titles.len() != n || dates.len() != n {
            return Err(InsightError::InvalidInput(format!(
                "{} embeddings, {} titles, {} dates",
                n,
                titles.len(),
                dates.len()
            )));
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut groups = if n < self.min_documents {
            vec![(0..n).collect::<Vec<usize>>()]
        } else {
            let dim = embeddings[0].len();
            if let Some(bad) = embeddings.iter().position(|e| e.len() != dim) {
                return Err(InsightError::InvalidInput(format!(
                    "embedding {} has dimension {}, expected {}",
                    bad,
                    embeddings[bad].len(),
                    dim
                )));
            }
            let k = Self::cluster_count(n);
            let distances = cosine_distance_matrix(embeddings);
            let mut groups = average_linkage(&distances, k);
            // Stable sorts: ties keep input order.
            for group in &mut groups {
                group.sort_by_key(|&i| dates[i]);
            }
            groups.sort_by_key(|group| dates[group[0]]);
            groups
        };
        groups.retain(|g| !g.is_empty());

        debug!(documents = n, clusters = groups.len(), "Built storyline clusters");

        Ok(groups
            .into_iter()
            .map(|indices| StoryGroup {
                title: titles[indices[0]].clone(),
                indices,
            })
            .collect())
    }
}

impl Default for StorylineClusterer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DOCUMENTS)
    }
}

/// Cluster and return only the index lists.
pub fn storyline_clusters(
    embeddings: &[Vec<f32>],
    titles: &[String],
    dates: &[Option<DateTime<Utc>>],
) -> Result<Vec<Vec<usize>>> {
    Ok(StorylineClusterer::default()
        .cluster(embeddings, titles, dates)?
        .into_iter()
        .map(|g| g.indices)
        .collect())
}

/// Agglomerative clustering with average linkage over a precomputed
/// distance matrix, stopping at `n_clusters` groups.
///
/// Merged distances use the Lance-Williams update for average linkage.
/// On equal distances the first pair in row-major order merges. Groups are
/// returned ordered by their smallest member index, members ascending.
fn average_linkage(distances: &[Vec<f64>], n_clusters: usize) -> Vec<Vec<usize>> {
    let n = distances.len();
    let mut groups: Vec<Option<Vec<usize>>> = (0..n).map(|i| Some(vec![i])).collect();
    let mut dist = distances.to_vec();
    let mut active = n;

    while active > n_clusters.max(1) {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..n {
            if groups[i].is_none() {
                continue;
            }
            for j in (i + 1)..n {
                if groups[j].is_none() {
                    continue;
                }
                let d = dist[i][j];
                if best.map_or(true, |(_, _, b)| d < b) {
                    best = Some((i, j, d));
                }
            }
        }
        let Some((a, b, _)) = best else {
            break;
        };

        let size_a = groups[a].as_ref().map_or(0, Vec::len) as f64;
        let size_b = groups[b].as_ref().map_or(0, Vec::len) as f64;
        for k in 0..n {
            if k == a || k == b || groups[k].is_none() {
                continue;
            }
            let merged = (size_a * dist[a][k] + size_b * dist[b][k]) / (size_a + size_b);
            dist[a][k] = merged;
            dist[k][a] = merged;
        }

        let absorbed = groups[b].take().unwrap_or_default();
        if let Some(target) = groups[a].as_mut() {
            target.extend(absorbed);
            target.sort_unstable();
        }
        active -= 1;
    }

    groups.into_iter().flatten().collect()
}
