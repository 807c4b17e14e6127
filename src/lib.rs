//! docqa - Ask questions about a document with local models
//!
//! A minimal retrieval-augmented generation pipeline: a document is split
//! into passages, each passage is embedded, and questions are answered by a
//! generator conditioned on the nearest passages.
//!
//! # Architecture
//!
//! - **rag**: chunking, vector index, retrieval, context assembly, pipeline
//! - **models**: capability traits plus candle-backed BERT and T5 models
//! - **cli** / **repl**: argument parsing, configuration, interactive loop

pub mod cli;
pub mod errors;
pub mod logging;
pub mod models;
pub mod rag;
pub mod repl;

// Re-export commonly used types
pub use errors::{RagError, Result};
pub use models::{Embedder, TextGenerator};
pub use rag::{IndexedCorpus, RAGConfig, RAGPipeline, RAGResult};
