//! NewsLens application binary - composition root.
//!
//! 1. Load configuration from TOML (or write a default one with `init`)
//! 2. Read the document set from a JSON file
//! 3. Construct the embedder, retriever, and entity extractor once
//! 4. Run the requested command and print the response as JSON on stdout
//!
//! Logs go to stderr so stdout stays machine-readable.

mod cli;

use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Parser;
use newslens_core::config::{GeneralConfig, NewsLensConfig};
use newslens_core::dates::parse_timestamp;
use newslens_core::types::Document;
use newslens_insight::{AnalysisService, RegexEntityExtractor};
use newslens_vector::{HashingEmbedder, InMemoryRetriever, SearchFilters};

use cli::{CliArgs, Command, QueryArgs};

/// Read a JSON array of documents.
fn load_documents(path: &Path) -> Result<Vec<Document>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    let documents: Vec<Document> = serde_json::from_str(&content)
        .map_err(|e| format!("failed to parse {}: {}", path.display(), e))?;
    Ok(documents)
}

/// Parse an optional `--from`/`--to` bound. Unparseable input is an error here,
/// unlike document dates, because the user typed it.
fn parse_bound(
    flag: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, Box<dyn std::error::Error>> {
    match value {
        None => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| format!("invalid {} date: {:?}", flag, raw).into()),
    }
}

fn build_filters(args: &QueryArgs) -> Result<SearchFilters, Box<dyn std::error::Error>> {
    Ok(SearchFilters {
        title_contains: args.title_contains.clone(),
        source: match args.sources.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        },
        start: parse_bound("--from", args.from.as_deref())?,
        end: parse_bound("--to", args.to.as_deref())?,
    })
}

/// Write the default configuration to `path`. An existing file is kept
/// unless `force` is set.
fn write_default_config(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !force {
        return Err(format!("{} already exists, pass --force to overwrite", path.display()).into());
    }
    NewsLensConfig::default().save(path)?;
    Ok(())
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();
    let config_file = args.resolve_config_path();

    if let Command::Init(init) = &args.command {
        init_tracing(&args.resolve_log_level(&GeneralConfig::default().log_level));
        write_default_config(&config_file, init.force)?;
        tracing::info!(path = %config_file.display(), "Configuration written");
        return Ok(());
    }

    // Config.
    let config = NewsLensConfig::load_or_default(&config_file)?;

    // Tracing.
    init_tracing(&args.resolve_log_level(&config.general.log_level));

    tracing::info!("Starting NewsLens v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let default_k = config.general.default_k;
    let k = |q: &QueryArgs| q.k.unwrap_or(default_k);

    // Collaborators.
    let docs_path = args.command.docs().ok_or("no document file given")?;
    let documents = load_documents(docs_path)?;
    let embedder = HashingEmbedder::new(config.embedding.dimensions)?;
    let retriever = InMemoryRetriever::new(embedder.clone());
    let indexed = retriever.index_documents(documents)?;
    tracing::info!(path = %docs_path.display(), indexed, "Documents indexed");
    let extractor = RegexEntityExtractor::new(config.extraction.max_chars);

    let service = AnalysisService::new(&retriever, &embedder, &extractor, config);
    tracing::info!(command = args.command.name(), "Running command");

    let output = match &args.command {
        Command::Search(q) => {
            serde_json::to_string_pretty(&service.search(&q.query, k(q), &build_filters(q)?)?)?
        }
        Command::Doc(d) => {
            let doc = service
                .document(&d.url, d.max_chars)?
                .ok_or_else(|| format!("document not found: {}", d.url))?;
            serde_json::to_string_pretty(&doc)?
        }
        Command::Storyline(q) => serde_json::to_string_pretty(&service.build_storyline(
            &q.query,
            k(q),
            &build_filters(q)?,
        )?)?,
        Command::Perspective(q) => serde_json::to_string_pretty(&service.build_perspective(
            &q.query,
            k(q),
            &build_filters(q)?,
            &q.sources,
        )?)?,
        Command::Graph(q) => serde_json::to_string_pretty(&service.build_graph(
            &q.query,
            k(q),
            &build_filters(q)?,
        )?)?,
        Command::Init(_) => unreachable!("init returns before documents are loaded"),
    };
    println!("{}", output);

    Ok(())
}
