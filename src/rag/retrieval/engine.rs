// Retrieval Engine: embeds a query and looks up the nearest passages
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{RagError, Result};
use crate::models::Embedder;
use crate::rag::chunker::Passage;
use crate::rag::corpus::IndexedCorpus;

/// Default number of passages handed to the generator
pub const DEFAULT_TOP_K: usize = 3;

/// Search parameters for retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Maximum number of passages to retrieve
    pub top_k: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Passage returned by a search, most relevant first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub passage: Passage,
    /// Squared L2 distance between query and passage embeddings
    pub distance: f32,
    /// 0-based position in the result list
    pub rank: usize,
}

/// Retrieval engine for semantic search over an indexed corpus
pub struct RetrievalEngine {
    embedder: Arc<dyn Embedder>,
    default_params: SearchParams,
}

impl RetrievalEngine {
    /// Create new retrieval engine
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            default_params: SearchParams::default(),
        }
    }

    /// Create with custom default parameters
    pub fn with_params(embedder: Arc<dyn Embedder>, params: SearchParams) -> Self {
        Self {
            embedder,
            default_params: params,
        }
    }

    /// Retrieve passages matching query
    pub fn retrieve(&self, corpus: &IndexedCorpus, query: &str) -> Result<Vec<RetrievedPassage>> {
        self.retrieve_with_params(corpus, query, &self.default_params)
    }

    /// Retrieve with custom parameters.
    ///
    /// `top_k` larger than the corpus returns every passage. An empty
    /// corpus returns nothing without calling the embedder.
    pub fn retrieve_with_params(
        &self,
        corpus: &IndexedCorpus,
        query: &str,
        params: &SearchParams,
    ) -> Result<Vec<RetrievedPassage>> {
        if corpus.is_empty() || params.top_k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embed_query(query)?;
        let hits = corpus.index().search(&query_vector, params.top_k)?;

        let results: Vec<RetrievedPassage> = hits
            .into_iter()
            .enumerate()
            .filter_map(|(rank, hit)| {
                corpus.passage(hit.index).map(|passage| RetrievedPassage {
                    passage: passage.clone(),
                    distance: hit.distance,
                    rank,
                })
            })
            .collect();

        debug!(
            top_k = params.top_k,
            hits = results.len(),
            best = ?results.first().map(|r| r.passage.index),
            "Retrieved passages"
        );

        Ok(results)
    }

    /// Encode a single query as a batch of one
    pub fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
        let vectors = self.embedder.encode(&[query]).map_err(RagError::EmbeddingFailed)?;
        let actual = vectors.len();

        match <[Vec<f32>; 1]>::try_from(vectors) {
            Ok([vector]) => Ok(vector),
            Err(_) => Err(RagError::EmbeddingCountMismatch {
                expected: 1,
                actual,
            }),
        }
    }

    /// Get default search parameters
    pub fn default_params(&self) -> &SearchParams {
        &self.default_params
    }

    /// Update default search parameters
    pub fn set_default_params(&mut self, params: SearchParams) {
        self.default_params = params;
    }
}
