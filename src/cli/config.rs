//! Configuration management for docqa
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.docqa/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::args::Args;
use crate::errors::{RagError, Result};
use crate::models::embedding::{PoolingStrategy, DEFAULT_EMBEDDING_MODEL};
use crate::models::generation::{GenerationLimits, DEFAULT_GENERATION_MODEL};
use crate::rag::chunker::DEFAULT_TARGET_WORDS;
use crate::rag::retrieval::{SearchParams, DEFAULT_TOP_K};
use crate::rag::{ContextConfig, RAGConfig};

/// Complete configuration for docqa
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Passage sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub target_words: usize,
}

/// Retrieval and context assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub max_context_words: Option<usize>,
}

/// Local model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub embedding_model: String,
    pub embedding_revision: String,
    pub pooling: PoolingStrategy,
    pub generation_model: String,
    pub generation_revision: String,
    pub max_input_tokens: usize,
    pub max_new_tokens: usize,
}

/// File system paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub history_file: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_words: DEFAULT_TARGET_WORDS,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            max_context_words: None,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        let limits = GenerationLimits::default();
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            embedding_revision: "main".to_string(),
            pooling: PoolingStrategy::Auto,
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_revision: "main".to_string(),
            max_input_tokens: limits.max_input_tokens,
            max_new_tokens: limits.max_new_tokens,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: "~/.docqa/history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| RagError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| RagError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".docqa").join("config.toml"))
    }

    /// Apply command-line overrides, then re-validate
    pub fn apply_args(&mut self, args: &Args) -> Result<()> {
        if let Some(top_k) = args.top_k {
            self.retrieval.top_k = top_k;
        }
        if let Some(words) = args.chunk_size {
            self.chunking.target_words = words;
        }
        if let Some(model) = &args.embedding_model {
            self.models.embedding_model = model.clone();
        }
        if let Some(model) = &args.generation_model {
            self.models.generation_model = model.clone();
        }
        self.validate()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.chunking.target_words == 0 {
            return Err(RagError::ConfigError(
                "target_words must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(RagError::ConfigError(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if self.models.max_input_tokens < 2 {
            return Err(RagError::ConfigError(
                "max_input_tokens must be at least 2".to_string(),
            ));
        }

        if self.models.max_new_tokens == 0 {
            return Err(RagError::ConfigError(
                "max_new_tokens must be greater than 0".to_string(),
            ));
        }

        if self.models.embedding_model.trim().is_empty()
            || self.models.generation_model.trim().is_empty()
        {
            return Err(RagError::ConfigError(
                "model ids must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| RagError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| RagError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| RagError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| RagError::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Pipeline settings derived from this configuration
    pub fn to_rag_config(&self) -> RAGConfig {
        RAGConfig {
            chunk_target_words: self.chunking.target_words,
            search: SearchParams {
                top_k: self.retrieval.top_k,
            },
            context: ContextConfig {
                max_context_words: self.retrieval.max_context_words,
                ..Default::default()
            },
        }
    }

    /// Decoding limits for the generation model
    pub fn generation_limits(&self) -> GenerationLimits {
        GenerationLimits {
            max_input_tokens: self.models.max_input_tokens,
            max_new_tokens: self.models.max_new_tokens,
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get history file path
    pub fn history_file(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }
}
