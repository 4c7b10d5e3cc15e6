//! Lexicon-based tone heuristic.
//!
//! Deliberately crude: counts whitespace tokens found in two short Spanish
//! polarity lists. Not a classifier.

const POSITIVE: &[&str] = &[
    "bueno",
    "positiva",
    "beneficio",
    "mejora",
    "avance",
    "exitoso",
    "crecimiento",
    "favorable",
];

const NEGATIVE: &[&str] = &[
    "malo",
    "negativa",
    "crisis",
    "caída",
    "retroceso",
    "fracaso",
    "escándalo",
    "riesgo",
];

/// Score `text` in `[-1, 1]` as `(pos - neg) / (pos + neg)`.
///
/// Returns exactly `0.0` when no lexicon word occurs.
pub fn sentiment_score(text: &str) -> f64 {
    let (pos, neg) = text
        .split_whitespace()
        .map(str::to_lowercase)
        .fold((0usize, 0usize), |(pos, neg), token| {
            if POSITIVE.contains(&token.as_str()) {
                (pos + 1, neg)
            } else if NEGATIVE.contains(&token.as_str()) {
                (pos, neg + 1)
            } else {
                (pos, neg)
            }
        });

    if pos == 0 && neg == 0 {
        return 0.0;
    }
    (pos as f64 - neg as f64) / (pos + neg) as f64
}
