// Context builder: joins retrieved passages into the generator's context
use serde::{Deserialize, Serialize};

use crate::rag::retrieval::RetrievedPassage;

/// Context assembly configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Text placed between consecutive passages
    pub separator: String,
    /// Stop adding passages once this many words are included (None = no limit)
    pub max_context_words: Option<usize>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            separator: " ".to_string(),
            max_context_words: None,
        }
    }
}

/// Assembled context for one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Passage texts in retrieval order
    pub text: String,
    /// Number of passages included
    pub passage_count: usize,
    /// Document positions of the included passages
    pub passage_indices: Vec<usize>,
    /// Total words included
    pub word_count: usize,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.passage_count == 0
    }
}

/// Context builder for assembling retrieved passages
pub struct ContextBuilder {
    config: ContextConfig,
}

impl ContextBuilder {
    /// Create new context builder with default config
    pub fn new() -> Self {
        Self {
            config: ContextConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: ContextConfig) -> Self {
        Self { config }
    }

    /// Build context from retrieved passages, keeping their order.
    ///
    /// The most relevant passage is always included, even when it alone
    /// exceeds the word budget.
    pub fn build(&self, passages: &[RetrievedPassage]) -> AssembledContext {
        let mut parts = Vec::new();
        let mut indices = Vec::new();
        let mut total_words = 0;

        for retrieved in passages {
            let words = retrieved.passage.word_count;

            if let Some(limit) = self.config.max_context_words {
                if !parts.is_empty() && total_words + words > limit {
                    break;
                }
            }

            parts.push(retrieved.passage.text.as_str());
            indices.push(retrieved.passage.index);
            total_words += words;
        }

        AssembledContext {
            text: parts.join(self.config.separator.as_str()),
            passage_count: parts.len(),
            passage_indices: indices,
            word_count: total_words,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Update configuration
    pub fn set_config(&mut self, config: ContextConfig) {
        self.config = config;
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
