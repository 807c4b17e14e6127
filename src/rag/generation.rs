// Answer generation conditioned on the retrieved context
use std::sync::Arc;
use tracing::debug;

use crate::errors::{RagError, Result};
use crate::models::TextGenerator;

/// Build the generator prompt for a question and its context
pub fn build_prompt(question: &str, context: &str) -> String {
    format!("question: {} context: {}", question, context)
}

/// Wraps a generation capability with the question/context prompt template
pub struct AnswerGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl AnswerGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate an answer. An empty context is passed through unchanged.
    pub fn generate(&self, question: &str, context: &str) -> Result<String> {
        let prompt = build_prompt(question, context);
        self.generate_prompt(&prompt)
    }

    /// Generate from an already assembled prompt
    pub fn generate_prompt(&self, prompt: &str) -> Result<String> {
        debug!(
            prompt_chars = prompt.len(),
            max_input_tokens = ?self.generator.max_input_tokens(),
            "Generating answer"
        );

        let answer = self
            .generator
            .generate(prompt)
            .map_err(RagError::GenerationFailed)?;

        Ok(answer.trim().to_string())
    }
}
