// RAG (Retrieval-Augmented Generation) Pipeline
//
// Answers questions about a single in-memory document by retrieving the
// most relevant passages and conditioning a generator on them.
//
// Components:
// - Chunker: sentence-greedy passages of a target word count
// - Vector Index: exact squared-L2 nearest-neighbour search
// - Retrieval Engine: query embedding + top-k lookup
// - Context Builder: ordered concatenation of retrieved passages
// - Answer Generator: question/context prompt for the generation model
// - Pipeline: load once, answer many times

pub mod chunker;
pub mod context;
pub mod corpus;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod retrieval;

// Re-export key types
pub use chunker::{Passage, SentenceChunker};
pub use context::{AssembledContext, ContextBuilder, ContextConfig};
pub use corpus::IndexedCorpus;
pub use generation::{build_prompt, AnswerGenerator};
pub use index::{SearchHit, VectorIndex};
pub use pipeline::{PipelineState, RAGConfig, RAGPipeline, RAGResult};
pub use retrieval::{RetrievalEngine, RetrievedPassage, SearchParams};
