use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Top-level configuration for NewsLens.
///
/// Loaded from `~/.newslens/config.toml` by default. Each section tunes one
/// analysis component; every field has a default so partial files work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsLensConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub storyline: StorylineConfig,
    #[serde(default)]
    pub perspective: PerspectiveConfig,
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub terms: TermsConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl NewsLensConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NewsLensConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, using defaults when the file does
    /// not exist. A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Number of documents retrieved when the caller gives no `k`.
    pub default_k: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            default_k: 20,
        }
    }
}

/// Storyline clustering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorylineConfig {
    /// Below this many documents no clustering is attempted.
    pub min_documents: usize,
}

impl Default for StorylineConfig {
    fn default() -> Self {
        Self { min_documents: 2 }
    }
}

/// Per-source perspective report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    pub top_entities: usize,
    pub top_terms: usize,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            top_entities: 8,
            top_terms: 8,
        }
    }
}

/// Entity graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Maximum number of edges kept, highest weight first.
    pub max_edges: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_edges: 200 }
    }
}

/// Term salience settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TermsConfig {
    /// Vocabulary cap (unigrams + bigrams).
    pub max_features: usize,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self { max_features: 2048 }
    }
}

/// Embedding backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Vector dimension.
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

/// Entity extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Texts are truncated to this many characters before extraction.
    pub max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { max_chars: 20_000 }
    }
}
