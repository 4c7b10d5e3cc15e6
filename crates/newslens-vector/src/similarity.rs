//! Cosine helpers shared by the index and the storyline clusterer.

/// Added to vector norms so zero vectors do not divide by zero.
pub const NORM_EPSILON: f64 = 1e-12;

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();

    let mag_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    dot / (mag_a * mag_b)
}

/// Scale a vector to unit length. The norm is offset by [`NORM_EPSILON`],
/// so a zero vector stays zero.
pub fn l2_normalize(v: &[f32]) -> Vec<f64> {
    let norm = v.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    v.iter().map(|x| *x as f64 / (norm + NORM_EPSILON)).collect()
}

/// Pairwise cosine distance (`1 - cosine`) between all rows.
///
/// Rows are L2-normalized first. All rows must share one dimension; the
/// caller is responsible for checking that.
pub fn cosine_distance_matrix(vectors: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let normalized: Vec<Vec<f64>> = vectors.iter().map(|v| l2_normalize(v)).collect();
    let n = normalized.len();
    let mut distances = vec![vec![0.0f64; n]; n];
    for i in 0..n {
        for j in i..n {
            let dot: f64 = normalized[i]
                .iter()
                .zip(normalized[j].iter())
                .map(|(x, y)| x * y)
                .sum();
            distances[i][j] = 1.0 - dot;
            distances[j][i] = 1.0 - dot;
        }
    }
    distances
}
