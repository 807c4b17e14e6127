// Local sentence embeddings with a BERT-family encoder via Candle
use anyhow::{Context, Result};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use serde::{Deserialize, Serialize};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::models::{Embedder, ModelFiles};

pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Configured pooling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoolingStrategy {
    /// Summary token when the tokenizer emits one first, mean otherwise
    #[default]
    Auto,
    Cls,
    Mean,
}

/// Pooling actually applied to encoder output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pooling {
    /// Hidden state of the leading summary token
    Cls,
    /// Attention-masked mean over the sequence
    Mean,
}

impl PoolingStrategy {
    /// Resolve to a concrete pooling given whether a leading [CLS] is emitted
    pub fn resolve(self, leading_cls: bool) -> Pooling {
        match self {
            PoolingStrategy::Cls => Pooling::Cls,
            PoolingStrategy::Mean => Pooling::Mean,
            PoolingStrategy::Auto if leading_cls => Pooling::Cls,
            PoolingStrategy::Auto => Pooling::Mean,
        }
    }
}

#[derive(Deserialize)]
struct EncoderShape {
    hidden_size: usize,
    max_position_embeddings: usize,
}

/// BERT encoder producing one vector per input text.
///
/// The pooling is fixed when the embedder is created so every vector of a
/// session comes from the same representation.
pub struct CandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    pooling: Pooling,
    dimension: usize,
}

impl CandleEmbedder {
    /// Load the encoder from downloaded model files
    pub fn load(files: &ModelFiles, strategy: PoolingStrategy) -> Result<Self> {
        let device = Device::Cpu;

        let config_contents = std::fs::read_to_string(&files.config)
            .context("Failed to read model config")?;
        let config: Config = serde_json::from_str(&config_contents)
            .context("Failed to parse model config")?;
        let shape: EncoderShape = serde_json::from_str(&config_contents)
            .context("Failed to read encoder dimensions")?;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_padding(None)
            .with_truncation(Some(TruncationParams {
                max_length: shape.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer: {}", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = BertModel::load(vb, &config).context("Failed to create BERT model")?;

        let pooling = strategy.resolve(Self::emits_leading_cls(&tokenizer)?);
        info!(
            model = %files.model_id,
            dimension = shape.hidden_size,
            ?pooling,
            "Embedding model ready"
        );

        Ok(Self {
            model,
            tokenizer,
            device,
            pooling,
            dimension: shape.hidden_size,
        })
    }

    fn emits_leading_cls(tokenizer: &Tokenizer) -> Result<bool> {
        let Some(cls_id) = tokenizer.token_to_id("[CLS]") else {
            return Ok(false);
        };
        let probe = tokenizer
            .encode("probe", true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        Ok(probe.get_ids().first() == Some(&cls_id))
    }

    pub fn pooling(&self) -> Pooling {
        self.pooling
    }

    /// Generate embeddings for multiple texts in one forward pass
    pub fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = texts.len();

        // Right-pad ids and mask to the longest sequence
        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (row, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let offset = row * max_len;
            flat_ids[offset..offset + ids.len()].copy_from_slice(ids);
            flat_mask[offset..offset + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = match self.pooling {
            Pooling::Cls => hidden.i((.., 0))?,
            Pooling::Mean => Self::mean_pool(&hidden, &attention_mask)?,
        };

        debug!(batch = batch_size, tokens = max_len, "Encoded batch");
        Ok(pooled.to_vec2::<f32>()?)
    }

    /// Mean pooling with attention mask
    fn mean_pool(embeddings: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        let mask_expanded = attention_mask
            .unsqueeze(2)?
            .expand(embeddings.shape())?
            .to_dtype(embeddings.dtype())?;

        let sum_embeddings = (embeddings * &mask_expanded)?.sum(1)?;
        let sum_mask = mask_expanded.sum(1)?.clamp(1e-9, f64::MAX)?;

        Ok(sum_embeddings.broadcast_div(&sum_mask)?)
    }
}

impl Embedder for CandleEmbedder {
    fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.embed_batch(texts)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}
