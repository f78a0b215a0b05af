use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CodingError, Result};

/// Load a `.env` file from the working directory (or a parent) if one exists
///
/// Variables already present in the process environment are not overwritten.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            debug!("Loaded environment from {:?}", path);
            Some(path)
        }
        Err(e) if e.not_found() => None,
        Err(e) => {
            debug!("Ignoring unreadable .env file: {}", e);
            None
        }
    }
}

/// Load a specific env file into the process environment
pub fn load_dotenv_file(path: &Path) -> Result<()> {
    dotenvy::from_path(path)
        .map_err(|e| CodingError::Config(format!("failed to load {:?}: {}", path, e)))?;
    debug!("Loaded environment from {:?}", path);
    Ok(())
}

/// Model names and thresholds shared by every pipeline stage.
///
/// Built once at process start and passed by reference; nothing in the
/// library reads the environment on its own.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model used for translation and coding tasks
    pub llm_model: String,
    /// Model used for codebook (theme) extraction
    pub theme_extraction_model: String,
    /// Reasoning effort passed with theme extraction requests
    pub theme_extraction_reasoning_effort: String,
    /// Embedding model name
    pub embedding_model: String,
    /// Minimum characters per merged chunk
    pub min_chunk_chars: usize,
    /// Minimum question similarity for a chunk to be kept
    pub relevance_threshold: f32,
    /// Number of chunks sent to LLM coding tasks
    pub coding_limit: usize,
    /// Number of results returned by ranking queries
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            llm_model: "gpt-5-mini".to_string(),
            theme_extraction_model: "gpt-5".to_string(),
            theme_extraction_reasoning_effort: "high".to_string(),
            embedding_model: "text-embedding-3-large".to_string(),
            min_chunk_chars: 250,
            relevance_threshold: 0.20,
            coding_limit: 10,
            top_k: 5,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        Ok(Self {
            llm_model: text("LLM_MODEL", defaults.llm_model),
            theme_extraction_model: text("THEME_EXTRACTION_MODEL", defaults.theme_extraction_model),
            theme_extraction_reasoning_effort: text(
                "THEME_EXTRACTION_REASONING_EFFORT",
                defaults.theme_extraction_reasoning_effort,
            ),
            embedding_model: text("EMBEDDING_MODEL", defaults.embedding_model),
            min_chunk_chars: parse_var(&lookup, "MIN_CHUNK_CHARS", defaults.min_chunk_chars)?,
            relevance_threshold: parse_var(
                &lookup,
                "RELEVANCE_THRESHOLD",
                defaults.relevance_threshold,
            )?,
            coding_limit: parse_var(&lookup, "CODING_LIMIT", defaults.coding_limit)?,
            top_k: parse_var(&lookup, "TOP_K", defaults.top_k)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key).map(|v| v.trim().to_string()) {
        Some(value) if !value.is_empty() => value
            .parse()
            .map_err(|_| CodingError::Config(format!("{} has invalid value {:?}", key, value))),
        _ => Ok(default),
    }
}
