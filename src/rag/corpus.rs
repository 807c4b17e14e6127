// Immutable indexed corpus: passages of one document plus their vectors
use tracing::info;

use crate::errors::{RagError, Result};
use crate::models::Embedder;
use crate::rag::chunker::{Passage, SentenceChunker};
use crate::rag::index::VectorIndex;

/// Passages of a single document and the index over their embeddings.
///
/// Built once per document and never mutated, so it can be shared freely
/// between readers.
#[derive(Debug, Clone, Default)]
pub struct IndexedCorpus {
    passages: Vec<Passage>,
    index: VectorIndex,
}

impl IndexedCorpus {
    /// Chunk the document, embed every passage in one batch and index them
    pub fn build(document: &str, chunker: &SentenceChunker, embedder: &dyn Embedder) -> Result<Self> {
        let passages = chunker.chunk(document);

        if passages.is_empty() {
            info!("Document is empty; corpus has no passages");
            return Ok(Self::default());
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let vectors = embedder.encode(&texts).map_err(RagError::EmbeddingFailed)?;

        if vectors.len() != texts.len() {
            return Err(RagError::EmbeddingCountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        let index = VectorIndex::build(vectors)?;

        info!(
            passages = passages.len(),
            target_words = chunker.target_words(),
            dimension = index.dimension().unwrap_or(0),
            "Indexed document"
        );

        Ok(Self { passages, index })
    }

    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    pub fn passage(&self, index: usize) -> Option<&Passage> {
        self.passages.get(index)
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Embedding dimension of the indexed passages
    pub fn dimension(&self) -> Option<usize> {
        self.index.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Encodes each text as [word count, length]
    struct ShapeEmbedder;

    impl Embedder for ShapeEmbedder {
        fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| vec![t.split_whitespace().count() as f32, t.len() as f32])
                .collect())
        }
    }

    struct DroppingEmbedder;

    impl Embedder for DroppingEmbedder {
        fn encode(&self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(vec![vec![1.0]])
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn encode(&self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
            anyhow::bail!("encoder unavailable")
        }
    }

    #[test]
    fn test_build_indexes_every_passage() {
        let chunker = SentenceChunker::new(2);
        let corpus = IndexedCorpus::build("One two. Three four. Five six.", &chunker, &ShapeEmbedder).unwrap();

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.index().len(), 3);
        assert_eq!(corpus.dimension(), Some(2));
        assert_eq!(corpus.passage(1).unwrap().text, "Three four.");
    }

    #[test]
    fn test_empty_document_skips_embedding() {
        let corpus = IndexedCorpus::build("  ", &SentenceChunker::default(), &FailingEmbedder).unwrap();
        assert!(corpus.is_empty());
        assert_eq!(corpus.dimension(), None);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let err = IndexedCorpus::build("Some text.", &SentenceChunker::default(), &FailingEmbedder)
            .unwrap_err();
        assert!(matches!(err, RagError::EmbeddingFailed(_)));
    }

    #[test]
    fn test_vector_count_checked() {
        let chunker = SentenceChunker::new(1);
        let err = IndexedCorpus::build("A. B.", &chunker, &DroppingEmbedder).unwrap_err();
        assert!(matches!(
            err,
            RagError::EmbeddingCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
