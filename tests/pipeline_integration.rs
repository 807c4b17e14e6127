//! Integration tests for the question-answering pipeline
//!
//! Runs the full load -> retrieve -> generate flow against deterministic
//! in-process capabilities, so no model download is needed.

mod common;

use std::sync::Arc;

use common::{
    CountingEmbedder, CountingGenerator, EchoGenerator, FailingEmbedder, FailingGenerator,
    ResizableEmbedder, VocabularyEmbedder, STORY,
};
use docqa::rag::{RAGConfig, RAGPipeline, SearchParams};
use docqa::RagError;

const QUESTION: &str = "What was Elias searching for?";

fn sentence_config(top_k: usize) -> RAGConfig {
    RAGConfig {
        chunk_target_words: 1,
        search: SearchParams { top_k },
        ..Default::default()
    }
}

fn story_pipeline(top_k: usize) -> RAGPipeline {
    RAGPipeline::with_config(
        Arc::new(VocabularyEmbedder::default()),
        Arc::new(EchoGenerator),
        sentence_config(top_k),
    )
}

#[test]
fn test_elias_answer_comes_from_manuscript_passage() {
    let mut pipeline = story_pipeline(1);
    pipeline.load(STORY).unwrap();
    assert_eq!(pipeline.corpus().unwrap().len(), 3);

    let result = pipeline.answer_with_details(QUESTION).unwrap();

    assert_eq!(result.passages.len(), 1);
    let best = &result.passages[0].passage;
    assert_eq!(best.index, 1);
    assert!(best.text.contains("manuscript"));

    assert!(result.answer.contains("manuscript"));
    assert!(best.text.contains(&result.answer));
}

#[test]
fn test_context_follows_relevance_order() {
    let mut pipeline = story_pipeline(3);
    pipeline.load(STORY).unwrap();

    let result = pipeline.answer_with_details(QUESTION).unwrap();
    let order: Vec<usize> = result.passages.iter().map(|r| r.passage.index).collect();
    assert_eq!(order, vec![1, 0, 2]);

    let expected: Vec<&str> = result
        .passages
        .iter()
        .map(|r| r.passage.text.as_str())
        .collect();
    assert_eq!(result.context.text, expected.join(" "));
    assert_eq!(
        result.prompt,
        format!("question: {} context: {}", QUESTION, result.context.text)
    );

    for pair in result.passages.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[test]
fn test_answer_before_load_is_not_ready() {
    let embedder = CountingEmbedder::new(VocabularyEmbedder::default());
    let generator = CountingGenerator::new(EchoGenerator);
    let pipeline = RAGPipeline::new(embedder.clone(), generator.clone());

    assert!(matches!(pipeline.answer(QUESTION), Err(RagError::NotReady)));
    assert_eq!(embedder.calls(), 0);
    assert_eq!(generator.calls(), 0);
}

#[test]
fn test_load_embeds_passages_in_one_batch() {
    let embedder = CountingEmbedder::new(VocabularyEmbedder::default());
    let generator = CountingGenerator::new(EchoGenerator);
    let mut pipeline =
        RAGPipeline::with_config(embedder.clone(), generator.clone(), sentence_config(2));

    pipeline.load(STORY).unwrap();
    assert_eq!(embedder.calls(), 1);
    assert_eq!(embedder.texts(), 3);

    pipeline.answer(QUESTION).unwrap();
    assert_eq!(embedder.calls(), 2);
    assert_eq!(embedder.texts(), 4);
    assert_eq!(generator.calls(), 1);
}

#[test]
fn test_reload_discards_previous_document() {
    let mut pipeline = story_pipeline(3);
    pipeline.load(STORY).unwrap();
    pipeline
        .load("The weather report promised rain over the harbor.")
        .unwrap();

    assert_eq!(pipeline.corpus().unwrap().len(), 1);

    let answer = pipeline.answer(QUESTION).unwrap();
    assert!(!answer.contains("manuscript"));
    assert!(answer.contains("harbor"));
}

#[test]
fn test_repeated_questions_are_deterministic() {
    let mut pipeline = story_pipeline(2);
    pipeline.load(STORY).unwrap();

    let first = pipeline.answer_with_details(QUESTION).unwrap();
    let second = pipeline.answer_with_details(QUESTION).unwrap();

    assert_eq!(first.answer, second.answer);
    assert_eq!(first.prompt, second.prompt);
}

#[test]
fn test_top_k_larger_than_corpus_returns_everything() {
    let mut pipeline = story_pipeline(10);
    pipeline.load(STORY).unwrap();

    let result = pipeline.answer_with_details(QUESTION).unwrap();
    assert_eq!(result.passages.len(), 3);
    let ranks: Vec<usize> = result.passages.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![0, 1, 2]);
}

#[test]
fn test_empty_document_generates_with_empty_context() {
    let embedder = CountingEmbedder::new(VocabularyEmbedder::default());
    let generator = CountingGenerator::new(EchoGenerator);
    let mut pipeline = RAGPipeline::new(embedder.clone(), generator.clone());

    pipeline.load("").unwrap();
    assert!(pipeline.is_ready());

    let result = pipeline.answer_with_details(QUESTION).unwrap();
    assert!(result.passages.is_empty());
    assert!(result.context.is_empty());
    assert_eq!(result.answer, "");

    assert_eq!(embedder.calls(), 0);
    assert_eq!(generator.calls(), 1);
}

#[test]
fn test_dimension_change_between_documents_fails_load() {
    let embedder = Arc::new(ResizableEmbedder::new(3));
    let mut pipeline = RAGPipeline::new(embedder.clone(), Arc::new(EchoGenerator));

    pipeline.load(STORY).unwrap();
    assert_eq!(pipeline.session_dimension(), Some(3));

    embedder.resize(4);
    let err = pipeline.load(STORY).unwrap_err();
    assert!(matches!(
        err,
        RagError::DimensionMismatch {
            expected: 3,
            actual: 4
        }
    ));

    assert!(!pipeline.is_ready());
    assert!(matches!(pipeline.answer(QUESTION), Err(RagError::NotReady)));
}

#[test]
fn test_query_dimension_change_fails_answer() {
    let embedder = Arc::new(ResizableEmbedder::new(3));
    let mut pipeline = RAGPipeline::new(embedder.clone(), Arc::new(EchoGenerator));
    pipeline.load(STORY).unwrap();

    embedder.resize(5);
    assert!(matches!(
        pipeline.answer(QUESTION),
        Err(RagError::DimensionMismatch { .. })
    ));
    assert!(pipeline.is_ready());
}

#[test]
fn test_embedding_failure_propagates_from_load() {
    let mut pipeline = RAGPipeline::new(Arc::new(FailingEmbedder), Arc::new(EchoGenerator));

    let err = pipeline.load(STORY).unwrap_err();
    assert!(matches!(err, RagError::EmbeddingFailed(_)));
    assert!(err.to_string().contains("embedding backend unavailable"));
    assert!(!pipeline.is_ready());
}

#[test]
fn test_generation_failure_propagates_and_keeps_corpus() {
    let mut pipeline = RAGPipeline::new(
        Arc::new(VocabularyEmbedder::default()),
        Arc::new(FailingGenerator),
    );
    pipeline.load(STORY).unwrap();

    let err = pipeline.answer(QUESTION).unwrap_err();
    assert!(matches!(err, RagError::GenerationFailed(_)));
    assert!(pipeline.is_ready());
}

#[test]
fn test_answer_corpus_leaves_state_untouched() {
    let pipeline = story_pipeline(1);

    let corpus = pipeline.build_corpus(STORY).unwrap();
    let result = pipeline.answer_corpus(&corpus, QUESTION).unwrap();

    assert!(result.answer.contains("manuscript"));
    assert!(!pipeline.is_ready());
    assert_eq!(pipeline.session_dimension(), None);
}
