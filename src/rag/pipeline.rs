// End-to-end RAG pipeline: load a document once, answer many questions
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::{RagError, Result};
use crate::models::{Embedder, TextGenerator};
use crate::rag::chunker::{SentenceChunker, DEFAULT_TARGET_WORDS};
use crate::rag::context::{AssembledContext, ContextBuilder, ContextConfig};
use crate::rag::corpus::IndexedCorpus;
use crate::rag::generation::{build_prompt, AnswerGenerator};
use crate::rag::retrieval::{RetrievalEngine, RetrievedPassage, SearchParams};

/// RAG pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RAGConfig {
    /// Target passage size in words
    pub chunk_target_words: usize,
    /// Search parameters for retrieval
    pub search: SearchParams,
    /// Context assembly configuration
    pub context: ContextConfig,
}

impl Default for RAGConfig {
    fn default() -> Self {
        Self {
            chunk_target_words: DEFAULT_TARGET_WORDS,
            search: SearchParams::default(),
            context: ContextConfig::default(),
        }
    }
}

/// RAG pipeline result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RAGResult {
    /// Original question
    pub question: String,
    /// Generated answer
    pub answer: String,
    /// Retrieved passages, most relevant first
    pub passages: Vec<RetrievedPassage>,
    /// Context handed to the generator
    pub context: AssembledContext,
    /// Exact prompt sent to the generator
    pub prompt: String,
}

/// Pipeline lifecycle
#[derive(Debug, Clone, Default)]
pub enum PipelineState {
    /// No document processed yet (or the last load failed)
    #[default]
    Unloaded,
    /// Passages and index built for the current document
    Ready(IndexedCorpus),
}

/// End-to-end RAG pipeline.
///
/// Embedding and generation capabilities are injected, so any model (or a
/// deterministic fake) can drive it.
pub struct RAGPipeline {
    embedder: Arc<dyn Embedder>,
    chunker: SentenceChunker,
    retrieval_engine: RetrievalEngine,
    context_builder: ContextBuilder,
    answer_generator: AnswerGenerator,
    config: RAGConfig,
    state: PipelineState,
    session_dimension: Option<usize>,
}

impl RAGPipeline {
    /// Create new RAG pipeline
    pub fn new(embedder: Arc<dyn Embedder>, generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_config(embedder, generator, RAGConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn TextGenerator>,
        config: RAGConfig,
    ) -> Self {
        Self {
            chunker: SentenceChunker::new(config.chunk_target_words),
            retrieval_engine: RetrievalEngine::with_params(embedder.clone(), config.search.clone()),
            context_builder: ContextBuilder::with_config(config.context.clone()),
            answer_generator: AnswerGenerator::new(generator),
            embedder,
            config,
            state: PipelineState::Unloaded,
            session_dimension: None,
        }
    }

    /// Process a document, replacing whatever was loaded before.
    ///
    /// The previous corpus is dropped before the new one is built, so a
    /// failed load leaves the pipeline unloaded.
    pub fn load(&mut self, document: &str) -> Result<()> {
        self.state = PipelineState::Unloaded;

        let corpus = self.build_corpus(document)?;

        if let Some(actual) = corpus.dimension() {
            match self.session_dimension {
                Some(expected) if expected != actual => {
                    return Err(RagError::DimensionMismatch { expected, actual });
                }
                _ => self.session_dimension = Some(actual),
            }
        }

        info!(passages = corpus.len(), "Document loaded");
        self.state = PipelineState::Ready(corpus);
        Ok(())
    }

    /// Build an indexed corpus without touching pipeline state
    pub fn build_corpus(&self, document: &str) -> Result<IndexedCorpus> {
        IndexedCorpus::build(document, &self.chunker, self.embedder.as_ref())
    }

    /// Answer a question about the loaded document
    pub fn answer(&self, question: &str) -> Result<String> {
        Ok(self.answer_with_details(question)?.answer)
    }

    /// Answer and return the retrieved passages, context and prompt
    pub fn answer_with_details(&self, question: &str) -> Result<RAGResult> {
        let corpus = match &self.state {
            PipelineState::Ready(corpus) => corpus,
            PipelineState::Unloaded => return Err(RagError::NotReady),
        };

        self.answer_corpus(corpus, question)
    }

    /// Answer a question against any corpus: retrieve -> build context -> generate
    pub fn answer_corpus(&self, corpus: &IndexedCorpus, question: &str) -> Result<RAGResult> {
        if let (Some(expected), Some(actual)) = (self.session_dimension, corpus.dimension()) {
            if expected != actual {
                return Err(RagError::DimensionMismatch { expected, actual });
            }
        }

        // Step 1: Retrieve the nearest passages
        let passages = self.retrieval_engine.retrieve(corpus, question)?;

        // Step 2: Concatenate them in relevance order
        let context = self.context_builder.build(&passages);

        // Step 3: Generate conditioned on question and context
        let prompt = build_prompt(question, &context.text);
        let answer = self.answer_generator.generate_prompt(&prompt)?;

        debug!(
            passages = passages.len(),
            context_words = context.word_count,
            "Answered question"
        );

        Ok(RAGResult {
            question: question.to_string(),
            answer,
            passages,
            context,
            prompt,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, PipelineState::Ready(_))
    }

    /// Corpus of the loaded document, if any
    pub fn corpus(&self) -> Option<&IndexedCorpus> {
        match &self.state {
            PipelineState::Ready(corpus) => Some(corpus),
            PipelineState::Unloaded => None,
        }
    }

    /// Embedding dimension fixed by the first non-empty document
    pub fn session_dimension(&self) -> Option<usize> {
        self.session_dimension
    }

    /// Get current configuration
    pub fn config(&self) -> &RAGConfig {
        &self.config
    }

    /// Update configuration; the loaded corpus is kept as is
    pub fn set_config(&mut self, config: RAGConfig) {
        self.chunker = SentenceChunker::new(config.chunk_target_words);
        self.retrieval_engine.set_default_params(config.search.clone());
        self.context_builder.set_config(config.context.clone());
        self.config = config;
    }
}
