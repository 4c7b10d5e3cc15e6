//! CLI argument definitions for the NewsLens binary.
//!
//! Uses `clap` with derive macros.
//! Priority resolution: CLI args > env vars > config file > defaults.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

/// NewsLens - storylines, per-source perspectives, and entity graphs over news.
#[derive(Parser, Debug)]
#[command(name = "newslens", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ranked search with content snippets.
    Search(QueryArgs),
    /// Print one document by URL.
    Doc(DocArgs),
    /// Group results into similarity clusters ordered in time.
    Storyline(QueryArgs),
    /// Compare coverage per source.
    Perspective(QueryArgs),
    /// Build the entity co-occurrence graph.
    Graph(QueryArgs),
    /// Write a default configuration file.
    Init(InitArgs),
}

impl Command {
    /// Query arguments, for the commands that run a query.
    pub fn query_args(&self) -> Option<&QueryArgs> {
        match self {
            Self::Search(args)
            | Self::Storyline(args)
            | Self::Perspective(args)
            | Self::Graph(args) => Some(args),
            Self::Doc(_) | Self::Init(_) => None,
        }
    }

    /// Document file, for the commands that read one.
    pub fn docs(&self) -> Option<&Path> {
        match self {
            Self::Doc(args) => Some(&args.docs),
            Self::Init(_) => None,
            _ => self.query_args().map(|q| q.docs.as_path()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Search(_) => "search",
            Self::Doc(_) => "doc",
            Self::Storyline(_) => "storyline",
            Self::Perspective(_) => "perspective",
            Self::Graph(_) => "graph",
            Self::Init(_) => "init",
        }
    }
}

/// Arguments for single-document lookup.
#[derive(Args, Debug, Clone)]
pub struct DocArgs {
    /// JSON file holding an array of documents.
    #[arg(long = "docs")]
    pub docs: PathBuf,

    /// Exact document URL.
    #[arg(short = 'u', long = "url")]
    pub url: String,

    /// Truncate content to this many characters (0 = no limit).
    #[arg(long = "max-chars", default_value_t = 0)]
    pub max_chars: usize,
}

/// Arguments for writing a default configuration file.
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing file.
    #[arg(long = "force")]
    pub force: bool,
}

/// Arguments shared by every analysis command.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// JSON file holding an array of documents.
    #[arg(long = "docs")]
    pub docs: PathBuf,

    /// Search query (at least 2 characters).
    #[arg(short = 'q', long = "query")]
    pub query: String,

    /// Number of documents to retrieve.
    #[arg(short = 'k')]
    pub k: Option<usize>,

    /// Restrict to this source. Repeat for several sources.
    #[arg(short = 's', long = "source")]
    pub sources: Vec<String>,

    /// Case-insensitive title substring.
    #[arg(long = "title-contains")]
    pub title_contains: Option<String>,

    /// Earliest publication date, inclusive (ISO-8601 or YYYY-MM-DD).
    #[arg(long = "from")]
    pub from: Option<String>,

    /// Latest publication date, inclusive (ISO-8601 or YYYY-MM-DD).
    #[arg(long = "to")]
    pub to: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > NEWSLENS_CONFIG env var > ~/.newslens/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("NEWSLENS_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".newslens").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".newslens").join("config.toml");
    }
    PathBuf::from("config.toml")
}
