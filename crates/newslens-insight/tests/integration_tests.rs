//! End-to-end tests for the analysis engine.
//!
//! Each test indexes a small fixed corpus into an in-memory retriever with
//! the hashing embedder and the regex entity extractor, then drives the
//! public API the way the CLI does.

use chrono::{TimeZone, Utc};
use newslens_core::config::NewsLensConfig;
use newslens_core::types::{Document, EntityType};
use newslens_insight::{
    build_graph, build_perspective, storyline_clusters, top_terms, AnalysisService, InsightError,
    RegexEntityExtractor,
};
use newslens_vector::{filter_date_range, HashingEmbedder, InMemoryRetriever, SearchFilters};

// =============================================================================
// Helpers
// =============================================================================

fn corpus() -> Vec<Document> {
    vec![
        Document::new(
            "Argentina gana la final",
            "http://noticias.test/1",
            "foo",
            "Argentina celebra un avance histórico en el fútbol",
        )
        .with_published_at("2024-01-02T00:00:00"),
        Document::new(
            "Argentina festeja en Buenos Aires",
            "http://noticias.test/2",
            "foo",
            "miles de hinchas celebran la victoria de Argentina",
        )
        .with_published_at("2024-01-03T09:15:00Z"),
        Document::new(
            "Colombia exporta más café",
            "http://noticias.test/3",
            "bar",
            "Colombia registra crecimiento en exportaciones de café",
        )
        .with_published_at("2024-01-05"),
        Document::new(
            "Crisis cafetera en Colombia",
            "http://noticias.test/4",
            "bar",
            "productores de Colombia temen una caída de precios",
        )
        .with_published_at("2024-01-04 08:00:00"),
        Document::new(
            "Clima en Lima",
            "http://noticias.test/5",
            "",
            "Lluvias en Lima sin fecha confirmada",
        ),
    ]
}

fn retriever() -> InMemoryRetriever<HashingEmbedder> {
    let retriever = InMemoryRetriever::new(HashingEmbedder::default());
    retriever.index_documents(corpus()).unwrap();
    retriever
}

fn extractor() -> RegexEntityExtractor {
    RegexEntityExtractor::default().with_gazetteer([
        ("Argentina", EntityType::Loc),
        ("Colombia", EntityType::Loc),
        ("Buenos Aires", EntityType::Loc),
        ("Bogotá", EntityType::Loc),
        ("Cali", EntityType::Loc),
        ("Claudia López", EntityType::Person),
        ("Gustavo Petro", EntityType::Person),
    ])
}

// =============================================================================
// Storyline
// =============================================================================

#[test]
fn test_storyline_covers_every_document_in_time_order() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let response = service
        .build_storyline("Argentina Colombia", 10, &SearchFilters::default())
        .unwrap();

    // 5 documents: round(sqrt(5)) = 2 clusters.
    assert_eq!(response.clusters.len(), 2);
    let mut urls: Vec<&str> = response
        .clusters
        .iter()
        .flat_map(|c| c.items.iter().map(|i| i.url.as_str()))
        .collect();
    urls.sort();
    assert_eq!(urls.len(), 5);
    urls.dedup();
    assert_eq!(urls.len(), 5);

    for cluster in &response.clusters {
        let dates: Vec<_> = cluster.items.iter().map(|i| i.published_at).collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }
    let firsts: Vec<_> = response
        .clusters
        .iter()
        .map(|c| c.items[0].published_at)
        .collect();
    assert!(firsts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_storyline_serializes_stable_shape() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let filters = SearchFilters {
        title_contains: Some("argentina".to_string()),
        ..Default::default()
    };
    let response = service.build_storyline("Argentina", 10, &filters).unwrap();
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["query"], "Argentina");
    let clusters = json["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 2);
    for cluster in clusters {
        for field in ["cluster_id", "title", "timespan", "items"] {
            assert!(cluster.get(field).is_some(), "missing {field}");
        }
        assert_eq!(cluster["timespan"].as_array().unwrap().len(), 2);
    }
    assert_eq!(clusters[0]["items"][0]["published_at"], "2024-01-02T00:00:00Z");
}

#[test]
fn test_storyline_date_range_filter() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let filters = SearchFilters {
        start: Some(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    let response = service.build_storyline("Colombia", 10, &filters).unwrap();
    let mut urls: Vec<&str> = response
        .clusters
        .iter()
        .flat_map(|c| c.items.iter().map(|i| i.url.as_str()))
        .collect();
    urls.sort();
    // The undated Lima document passes through the date filter.
    assert_eq!(
        urls,
        vec![
            "http://noticias.test/3",
            "http://noticias.test/4",
            "http://noticias.test/5"
        ]
    );
}

#[test]
fn test_storyline_empty_retrieval() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let filters = SearchFilters::default().with_source("nadie");
    let response = service.build_storyline("Colombia", 10, &filters).unwrap();
    assert!(response.clusters.is_empty());
}

#[test]
fn test_storyline_clusters_free_function_partitions() {
    let embedder = HashingEmbedder::default();
    let docs = corpus();
    let texts: Vec<String> = docs.iter().map(Document::text).collect();
    let embeddings = newslens_vector::Embedder::embed_batch(&embedder, &texts).unwrap();
    let titles: Vec<String> = docs.iter().map(|d| d.title.clone()).collect();
    let dates: Vec<_> = docs
        .iter()
        .map(|d| newslens_core::normalize_published(d.published_at.as_ref()))
        .collect();

    let clusters = storyline_clusters(&embeddings, &titles, &dates).unwrap();
    let mut all: Vec<usize> = clusters.into_iter().flatten().collect();
    all.sort_unstable();
    assert_eq!(all, vec![0, 1, 2, 3, 4]);
}

// =============================================================================
// Search and lookup
// =============================================================================

#[test]
fn test_search_title_filter_and_snippet() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let filters = SearchFilters {
        title_contains: Some("colombia".to_string()),
        ..Default::default()
    };
    let results = service.search("café", 10, &filters).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.source == "bar"));
    let scores: Vec<f64> = results.iter().filter_map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));

    let json = serde_json::to_value(&results[0]).unwrap();
    for field in ["title", "url", "source", "score", "snippet", "published_at"] {
        assert!(json.get(field).is_some(), "missing {field}");
    }
}

#[test]
fn test_document_lookup_by_url() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let doc = service
        .document("http://noticias.test/5", 6)
        .unwrap()
        .unwrap();
    assert_eq!(doc.title, "Clima en Lima");
    assert_eq!(doc.content, "Lluvia");
    assert!(service.document("http://noticias.test/99", 0).unwrap().is_none());
}

// =============================================================================
// Perspective
// =============================================================================

#[test]
fn test_perspective_per_source_reports() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let response = service
        .build_perspective("noticias", 10, &SearchFilters::default(), &[])
        .unwrap();
    let sources: Vec<(&str, usize)> = response
        .sources
        .iter()
        .map(|s| (s.source.as_str(), s.volume))
        .collect();
    assert_eq!(sources.len(), 3);
    assert!(sources.contains(&("foo", 2)));
    assert!(sources.contains(&("bar", 2)));
    assert_eq!(sources[2], ("unknown", 1));

    let bar = response.sources.iter().find(|s| s.source == "bar").unwrap();
    assert_eq!(bar.top_entities[0], "Colombia");
    // One positive document, one negative.
    assert_eq!(bar.avg_sentiment, 0.0);
    assert_eq!(bar.time_histogram.get("2024-01-05"), Some(&1));
    assert_eq!(bar.time_histogram.get("2024-01-04"), Some(&1));
    assert!(bar.top_terms.len() <= 8);

    let unknown = response.sources.iter().find(|s| s.source == "unknown").unwrap();
    assert_eq!(unknown.time_histogram.get("unknown"), Some(&1));
}

#[test]
fn test_perspective_multi_source_allow_list() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let allow = vec!["foo".to_string(), "bar".to_string()];
    let response = service
        .build_perspective("noticias", 10, &SearchFilters::default(), &allow)
        .unwrap();
    let mut sources: Vec<&str> = response.sources.iter().map(|s| s.source.as_str()).collect();
    sources.sort();
    assert_eq!(sources, vec!["bar", "foo"]);
}

#[test]
fn test_perspective_date_bound_narrows_volume() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let filters = SearchFilters {
        start: Some(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()),
        ..Default::default()
    };
    let response = service
        .build_perspective("noticias", 10, &filters, &[])
        .unwrap();
    let mut sources: Vec<(&str, usize)> = response
        .sources
        .iter()
        .map(|s| (s.source.as_str(), s.volume))
        .collect();
    sources.sort();
    // Both foo reports predate the bound; the undated report passes through.
    assert_eq!(sources, vec![("bar", 2), ("unknown", 1)]);
}

#[test]
fn test_perspective_two_sources_direct() {
    let docs = vec![
        Document::new("Argentina gana", "http://a/1", "foo", "Argentina celebra")
            .with_published_at("2024-01-02T00:00:00"),
        Document::new("Otra cosa", "http://a/2", "bar", "Clima en Lima")
            .with_published_at("2024-01-05"),
    ];
    let reports = build_perspective(&docs, None, &extractor()).unwrap();
    let mut sources: Vec<&str> = reports.iter().map(|r| r.source.as_str()).collect();
    sources.sort();
    assert_eq!(sources, vec!["bar", "foo"]);
    assert!(reports.iter().all(|r| r.volume == 1));
}

// =============================================================================
// Graph
// =============================================================================

#[test]
fn test_graph_weights_and_types() {
    let docs = vec![
        Document::new("Claudia López recorre Bogotá", "http://a/1", "foo", ""),
        Document::new(
            "Claudia López y Gustavo Petro en Cali",
            "http://a/2",
            "bar",
            "luego regresan a Bogotá",
        ),
        Document::new("Bogotá y Cali.", "http://a/3", "foo", "Claudia López opina"),
    ];
    let graph = build_graph(&docs, &extractor()).unwrap();

    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["Bogotá", "Cali", "Claudia López", "Gustavo Petro"]);
    let petro = graph.nodes.iter().find(|n| n.id == "Gustavo Petro").unwrap();
    assert_eq!(petro.entity_type, EntityType::Person);

    let weight = |a: &str, b: &str| {
        graph
            .edges
            .iter()
            .find(|e| e.source == a && e.target == b)
            .map(|e| e.weight)
    };
    assert_eq!(weight("Bogotá", "Claudia López"), Some(3));
    assert_eq!(weight("Bogotá", "Cali"), Some(2));
    assert_eq!(weight("Cali", "Claudia López"), Some(2));
    assert_eq!(weight("Cali", "Gustavo Petro"), Some(1));
    assert_eq!(graph.edges[0].weight, 3);
    assert!(graph.edges.windows(2).all(|w| w[0].weight >= w[1].weight));
}

#[test]
fn test_graph_service_response_shape() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    let response = service
        .build_graph("Argentina", 10, &SearchFilters::default().with_source("foo"))
        .unwrap();
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["query"], "Argentina");
    let nodes = json["nodes"].as_array().unwrap();
    assert!(nodes
        .iter()
        .any(|n| n["id"] == "Buenos Aires" && n["type"] == "LOC"));
    assert!(json["edges"].as_array().unwrap().len() <= 200);
}

// =============================================================================
// Misc
// =============================================================================

#[test]
fn test_invalid_query_rejected_everywhere() {
    let retriever = retriever();
    let embedder = HashingEmbedder::default();
    let extractor = extractor();
    let service =
        AnalysisService::new(&retriever, &embedder, &extractor, NewsLensConfig::default());

    assert!(matches!(
        service.build_storyline("x", 10, &SearchFilters::default()),
        Err(InsightError::InvalidInput(_))
    ));
    assert!(matches!(
        service.build_perspective(" ", 10, &SearchFilters::default(), &[]),
        Err(InsightError::InvalidInput(_))
    ));
    assert!(matches!(
        service.build_graph("", 10, &SearchFilters::default()),
        Err(InsightError::InvalidInput(_))
    ));
}

#[test]
fn test_top_terms_and_date_filter_helpers() {
    let texts: Vec<String> = corpus().iter().map(Document::text).collect();
    let terms = top_terms(&texts, 5);
    assert_eq!(terms.len(), 5);

    let start = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2024, 1, 4, 23, 59, 59).unwrap();
    let kept = filter_date_range(corpus(), Some(start), Some(end));
    let urls: Vec<&str> = kept.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "http://noticias.test/2",
            "http://noticias.test/4",
            "http://noticias.test/5"
        ]
    );
}
