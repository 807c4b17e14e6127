// Local answer generation with a T5 encoder-decoder via Candle
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::generation::LogitsProcessor;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use std::sync::Mutex;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::models::{ModelFiles, TextGenerator};

pub const DEFAULT_GENERATION_MODEL: &str = "google/flan-t5-base";

// Greedy decoding ignores the seed; it is fixed so runs are comparable.
const GREEDY_SEED: u64 = 299792458;

/// Decoding limits
#[derive(Debug, Clone, Copy)]
pub struct GenerationLimits {
    pub max_input_tokens: usize,
    pub max_new_tokens: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_input_tokens: 512,
            max_new_tokens: 128,
        }
    }
}

/// T5 sequence-to-sequence generator with greedy decoding.
///
/// The model keeps a decoder KV cache, so calls are serialized behind a lock.
pub struct T5Generator {
    model: Mutex<T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    config: t5::Config,
    device: Device,
    limits: GenerationLimits,
}

impl T5Generator {
    /// Load the model from downloaded files
    pub fn load(files: &ModelFiles, limits: GenerationLimits) -> Result<Self> {
        let device = Device::Cpu;

        let config_contents = std::fs::read_to_string(&files.config)
            .context("Failed to read model config")?;
        let mut config: t5::Config = serde_json::from_str(&config_contents)
            .context("Failed to parse model config")?;
        config.use_cache = true;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer
            .with_padding(None)
            .with_truncation(None)
            .map_err(|e| anyhow::anyhow!("Failed to configure tokenizer: {}", e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.clone()], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = T5ForConditionalGeneration::load(vb, &config)
            .context("Failed to create T5 model")?;

        info!(
            model = %files.model_id,
            max_input_tokens = limits.max_input_tokens,
            "Generation model ready"
        );

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            config,
            device,
            limits,
        })
    }

    /// Tokenize a prompt, cutting it to the input limit while keeping EOS
    fn encode_prompt(&self, prompt: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;
        let ids = encoding.get_ids().to_vec();

        Ok(truncate_with_eos(
            ids,
            self.limits.max_input_tokens,
            self.config.eos_token_id as u32,
        ))
    }
}

/// Keep at most `max_len` ids, ending with `eos` when a cut happened
pub fn truncate_with_eos(mut ids: Vec<u32>, max_len: usize, eos: u32) -> Vec<u32> {
    if ids.len() <= max_len {
        return ids;
    }
    debug!(tokens = ids.len(), limit = max_len, "Truncating prompt");
    ids.truncate(max_len.saturating_sub(1));
    ids.push(eos);
    ids
}

impl TextGenerator for T5Generator {
    fn generate(&self, prompt: &str) -> Result<String> {
        let input_ids = self.encode_prompt(prompt)?;
        let input = Tensor::new(input_ids.as_slice(), &self.device)?.unsqueeze(0)?;

        let mut model = self
            .model
            .lock()
            .map_err(|_| anyhow::anyhow!("Generator lock poisoned"))?;
        model.clear_kv_cache();

        let encoder_output = model.encode(&input)?;

        let start = self
            .config
            .decoder_start_token_id
            .unwrap_or(self.config.pad_token_id) as u32;
        let mut output_ids = vec![start];
        let mut logits_processor = LogitsProcessor::new(GREEDY_SEED, None, None);

        for step in 0..self.limits.max_new_tokens {
            let decoder_ids = if step == 0 || !self.config.use_cache {
                Tensor::new(output_ids.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = output_ids[output_ids.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = model.decode(&decoder_ids, &encoder_output)?.squeeze(0)?;
            let next = logits_processor.sample(&logits)?;
            if next as usize == self.config.eos_token_id {
                break;
            }
            output_ids.push(next);
        }
        model.clear_kv_cache();

        debug!(generated = output_ids.len() - 1, "Decoded answer");

        let text = self
            .tokenizer
            .decode(&output_ids[1..], true)
            .map_err(|e| anyhow::anyhow!("Detokenization failed: {}", e))?;
        Ok(text.trim().to_string())
    }

    fn max_input_tokens(&self) -> Option<usize> {
        Some(self.limits.max_input_tokens)
    }
}
