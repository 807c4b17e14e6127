// Hugging Face Hub downloads for local models
use anyhow::{Context, Result};
use hf_hub::{api::sync::Api, Repo, RepoType};
use std::path::PathBuf;
use tracing::info;

/// Local paths of the files a candle model needs
#[derive(Debug, Clone)]
pub struct ModelFiles {
    pub model_id: String,
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

impl ModelFiles {
    /// Download (or reuse from the local cache) config, tokenizer and weights
    pub fn fetch(model_id: &str, revision: &str) -> Result<Self> {
        info!(model = model_id, revision, "Fetching model files");

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let config = repo
            .get("config.json")
            .with_context(|| format!("Failed to download config for {}", model_id))?;
        let tokenizer = repo
            .get("tokenizer.json")
            .with_context(|| format!("Failed to download tokenizer for {}", model_id))?;
        let weights = repo
            .get("model.safetensors")
            .with_context(|| format!("Failed to download weights for {}", model_id))?;

        Ok(Self {
            model_id: model_id.to_string(),
            config,
            tokenizer,
            weights,
        })
    }

    /// Use files that already exist on disk
    pub fn from_dir(model_id: &str, dir: &std::path::Path) -> Self {
        Self {
            model_id: model_id.to_string(),
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights: dir.join("model.safetensors"),
        }
    }
}
