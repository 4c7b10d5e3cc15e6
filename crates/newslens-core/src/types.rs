use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Source bucket used when a document carries no source.
pub const UNKNOWN_SOURCE: &str = "unknown";

// =============================================================================
// Enums
// =============================================================================

/// Coarse entity category shared by every extractor backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityType {
    Person,
    Org,
    Loc,
    Misc,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Org => "ORG",
            Self::Loc => "LOC",
            Self::Misc => "MISC",
        }
    }

    /// Map a raw NER model label (e.g. `PER`, `GPE`, `NORP`) onto the
    /// canonical categories. Labels the mapping does not know become `Misc`.
    pub fn from_model_label(label: &str) -> Self {
        match label {
            "PER" | "PERSON" => Self::Person,
            "ORG" => Self::Org,
            "LOC" | "GPE" | "FAC" => Self::Loc,
            _ => Self::Misc,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Published timestamps
// =============================================================================

/// A publication timestamp as it arrived from upstream.
///
/// Feeds and APIs disagree on how they encode dates, so the raw form is kept
/// and only normalized on demand (see [`crate::dates`]). Deserializing from
/// JSON always yields [`PublishedAt::Text`] so the original string survives.
#[derive(Clone, Debug, PartialEq)]
pub enum PublishedAt {
    /// Timezone-aware instant.
    Instant(DateTime<FixedOffset>),
    /// Date-time without timezone information.
    Naive(NaiveDateTime),
    /// Date without a time component.
    Date(NaiveDate),
    /// Unparsed string.
    Text(String),
}

impl PublishedAt {
    /// The value rendered the way it would appear in a JSON payload.
    pub fn raw(&self) -> String {
        match self {
            Self::Instant(dt) => dt.to_rfc3339(),
            Self::Naive(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Day bucket: the first 10 characters of the raw value.
    ///
    /// This is a literal prefix, not a parsed date. A non-ISO string yields
    /// whatever its first 10 characters are.
    pub fn day_key(&self) -> String {
        self.raw().chars().take(10).collect()
    }
}

impl From<&str> for PublishedAt {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl Serialize for PublishedAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw())
    }
}

impl<'de> Deserialize<'de> for PublishedAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(PublishedAt::Text)
    }
}

// =============================================================================
// Structs
// =============================================================================

/// A retrieved news document.
///
/// Treated as immutable input by the analysis engine. Missing optional
/// fields are defaulted here, at the deserialization boundary. A `null`
/// string field reads as empty, and a non-string `published_at` reads as
/// undated, so one odd record does not reject the whole batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_published_at")]
    pub published_at: Option<PublishedAt>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Relevance score assigned by retrieval.
    #[serde(default)]
    pub score: Option<f64>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        source: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: source.into(),
            published_at: None,
            content: content.into(),
            score: None,
        }
    }

    pub fn with_published_at(mut self, published_at: impl Into<PublishedAt>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    /// Title and content joined by a single space, trimmed.
    pub fn text(&self) -> String {
        format!("{} {}", self.title, self.content).trim().to_string()
    }

    /// The source name, or [`UNKNOWN_SOURCE`] when blank.
    pub fn source_or_unknown(&self) -> &str {
        let source = self.source.trim();
        if source.is_empty() {
            UNKNOWN_SOURCE
        } else {
            source
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn lenient_published_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<PublishedAt>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(PublishedAt::Text(s))),
        _ => Ok(None),
    }
}

/// A single named-entity mention found in a text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityMention {
    pub label: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl EntityMention {
    pub fn new(label: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            label: label.into(),
            entity_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_entity_type_serialization() {
        let json = serde_json::to_string(&EntityType::Person).unwrap();
        assert_eq!(json, "\"PERSON\"");
        let back: EntityType = serde_json::from_str("\"LOC\"").unwrap();
        assert_eq!(back, EntityType::Loc);
    }

    #[test]
    fn test_entity_type_from_model_label() {
        assert_eq!(EntityType::from_model_label("PER"), EntityType::Person);
        assert_eq!(EntityType::from_model_label("ORG"), EntityType::Org);
        assert_eq!(EntityType::from_model_label("GPE"), EntityType::Loc);
        assert_eq!(EntityType::from_model_label("FAC"), EntityType::Loc);
        assert_eq!(EntityType::from_model_label("NORP"), EntityType::Misc);
        assert_eq!(EntityType::from_model_label("WORK_OF_ART"), EntityType::Misc);
    }

    #[test]
    fn test_document_deserialize_with_defaults() {
        let doc: Document = serde_json::from_str(r#"{"title": "Solo título"}"#).unwrap();
        assert_eq!(doc.title, "Solo título");
        assert!(doc.source.is_empty());
        assert!(doc.published_at.is_none());
        assert!(doc.score.is_none());
        assert_eq!(doc.source_or_unknown(), UNKNOWN_SOURCE);
    }

    #[test]
    fn test_document_keeps_raw_published_string() {
        let doc: Document = serde_json::from_str(
            r#"{"title": "t", "source": "foo", "published_at": "2024-01-02T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(
            doc.published_at,
            Some(PublishedAt::Text("2024-01-02T00:00:00".to_string()))
        );
    }

    #[test]
    fn test_document_null_published_at() {
        let doc: Document =
            serde_json::from_str(r#"{"title": "t", "published_at": null}"#).unwrap();
        assert!(doc.published_at.is_none());
    }

    #[test]
    fn test_document_non_string_published_at_is_undated() {
        let docs: Vec<Document> = serde_json::from_str(
            r#"[
                {"title": "a", "published_at": 1704153600},
                {"title": "b", "published_at": {"ts": "2024-01-02"}},
                {"title": "c", "published_at": "2024-01-02"}
            ]"#,
        )
        .unwrap();
        assert_eq!(docs.len(), 3);
        assert!(docs[0].published_at.is_none());
        assert!(docs[1].published_at.is_none());
        assert_eq!(docs[2].published_at, Some(PublishedAt::from("2024-01-02")));
    }

    #[test]
    fn test_document_null_strings_default_to_empty() {
        let doc: Document = serde_json::from_str(
            r#"{"title": "t", "url": null, "source": null, "content": null}"#,
        )
        .unwrap();
        assert!(doc.url.is_empty());
        assert!(doc.content.is_empty());
        assert_eq!(doc.source_or_unknown(), UNKNOWN_SOURCE);
        assert_eq!(doc.text(), "t");
    }

    #[test]
    fn test_document_text_joins_title_and_content() {
        let doc = Document::new("Título", "http://a/1", "foo", "cuerpo");
        assert_eq!(doc.text(), "Título cuerpo");
        let empty = Document::new("Título", "http://a/1", "foo", "");
        assert_eq!(empty.text(), "Título");
    }

    #[test]
    fn test_day_key_truncates_raw_value() {
        assert_eq!(PublishedAt::from("2024-01-02T10:00:00Z").day_key(), "2024-01-02");
        assert_eq!(PublishedAt::from("Tue, 02 Jan 2024").day_key(), "Tue, 02 Ja");
        assert_eq!(PublishedAt::from("2024").day_key(), "2024");

        let aware = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 5, 23, 0, 0)
            .unwrap();
        assert_eq!(PublishedAt::Instant(aware).day_key(), "2024-03-05");

        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(PublishedAt::Date(date).day_key(), "2024-03-05");
    }

    #[test]
    fn test_entity_mention_serializes_type_field() {
        let m = EntityMention::new("Bogotá", EntityType::Loc);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["label"], "Bogotá");
        assert_eq!(json["type"], "LOC");
    }
}
