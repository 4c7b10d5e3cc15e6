//! Entity extraction capability.
//!
//! The engine only depends on [`EntityExtractor`]. A statistical NER
//! backend can sit behind it; [`RegexEntityExtractor`] is the in-process
//! default, which picks up runs of capitalized words and types them from an
//! optional gazetteer.

use std::collections::HashMap;

use newslens_core::error::Result;
use newslens_core::types::{EntityMention, EntityType};
use regex::Regex;

/// Default cap on characters scanned per text.
pub const DEFAULT_MAX_CHARS: usize = 20_000;

/// Finds named entities in a text.
///
/// Backends must map labels they do not recognize to [`EntityType::Misc`]
/// (see [`EntityType::from_model_label`]) instead of failing.
pub trait EntityExtractor: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<EntityMention>>;
}

/// Capitalized-span entity extractor.
pub struct RegexEntityExtractor {
    span_regex: Regex,
    gazetteer: HashMap<String, EntityType>,
    max_chars: usize,
}

impl RegexEntityExtractor {
    /// Create an extractor that scans at most `max_chars` characters.
    pub fn new(max_chars: usize) -> Self {
        Self {
            // Capitalized words, optionally linked by "de", "del", "de la", "la".
            span_regex: Regex::new(
                r"\b\p{Lu}[\p{L}\p{M}'’\-]*(?:(?:\s+(?:de\s+la|del|de|la)\s+|\s+)\p{Lu}[\p{L}\p{M}'’\-]*)*",
            )
            .expect("span pattern is valid"),
            gazetteer: HashMap::new(),
            max_chars,
        }
    }

    /// Attach known labels with their types. Unknown labels stay `Misc`.
    pub fn with_gazetteer<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, EntityType)>,
        S: Into<String>,
    {
        self.gazetteer
            .extend(entries.into_iter().map(|(label, t)| (label.into(), t)));
        self
    }

    fn classify(&self, label: &str) -> EntityType {
        self.gazetteer
            .get(label)
            .copied()
            .unwrap_or(EntityType::Misc)
    }
}

impl Default for RegexEntityExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

impl EntityExtractor for RegexEntityExtractor {
    fn extract(&self, text: &str) -> Result<Vec<EntityMention>> {
        let text = truncate_chars(text, self.max_chars);
        let mentions = self
            .span_regex
            .find_iter(text)
            .filter_map(|m| clean_span(m.as_str()))
            .map(|label| {
                let entity_type = self.classify(&label);
                EntityMention::new(label, entity_type)
            })
            .collect();
        Ok(mentions)
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Drop leading function words ("El", "La", ...) and lowercase particles
/// from a span. Returns `None` if nothing meaningful is left.
fn clean_span(span: &str) -> Option<String> {
    let words: Vec<&str> = span.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| !is_common_word(w) && w.chars().next().is_some_and(char::is_uppercase))?;
    let label = words[start..].join(" ");
    if label.chars().count() < 2 {
        return None;
    }
    Some(label)
}

/// Returns true for capitalized words that are usually not entities:
/// sentence-initial articles and prepositions, weekdays and months.
fn is_common_word(s: &str) -> bool {
    matches!(
        s,
        "El" | "La"
            | "Los"
            | "Las"
            | "Lo"
            | "Un"
            | "Una"
            | "Unos"
            | "Unas"
            | "En"
            | "De"
            | "Del"
            | "Y"
            | "A"
            | "Al"
            | "Por"
            | "Para"
            | "Con"
            | "Sin"
            | "Según"
            | "Tras"
            | "Este"
            | "Esta"
            | "Ese"
            | "Esa"
            | "Hoy"
            | "Ayer"
            | "The"
            | "This"
            | "That"
            | "Lunes"
            | "Martes"
            | "Miércoles"
            | "Jueves"
            | "Viernes"
            | "Sábado"
            | "Domingo"
            | "Enero"
            | "Febrero"
            | "Marzo"
            | "Abril"
            | "Mayo"
            | "Junio"
            | "Julio"
            | "Agosto"
            | "Septiembre"
            | "Octubre"
            | "Noviembre"
            | "Diciembre"
    )
}
