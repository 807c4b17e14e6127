//! Model capabilities used by the pipeline
//!
//! The pipeline only depends on two narrow traits:
//! - [`Embedder`]: texts in, one fixed-length vector per text out
//! - [`TextGenerator`]: prompt in, decoded answer out
//!
//! Any implementation satisfying those contracts can be injected. The
//! candle-backed implementations in [`embedding`] and [`generation`] run
//! pretrained Hugging Face models locally on the CPU.

pub mod embedding;
pub mod generation;
pub mod hub;

pub use embedding::{CandleEmbedder, Pooling, PoolingStrategy};
pub use generation::T5Generator;
pub use hub::ModelFiles;

/// Dense text encoding capability
pub trait Embedder: Send + Sync {
    /// Encode every text into one vector, preserving input order.
    ///
    /// Must be deterministic for identical input within a session.
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Output dimension, when known up front
    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Conditional text generation capability
pub trait TextGenerator: Send + Sync {
    /// Generate an answer for a fully assembled prompt
    fn generate(&self, prompt: &str) -> anyhow::Result<String>;

    /// Maximum prompt length in tokens; longer prompts are truncated
    fn max_input_tokens(&self) -> Option<usize> {
        None
    }
}
