// Retrieval Engine Module
pub mod engine;

pub use engine::{RetrievalEngine, RetrievedPassage, SearchParams, DEFAULT_TOP_K};
