// Sentence-greedy chunker: groups consecutive sentences into passages
use serde::{Deserialize, Serialize};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

/// Default passage size in words
pub const DEFAULT_TARGET_WORDS: usize = 200;

/// A contiguous run of document sentences used as one retrieval unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Position of the passage in the document
    pub index: usize,
    /// Sentences joined with a single space
    pub text: String,
    /// Whitespace-delimited word count
    pub word_count: usize,
    /// Indices of the document sentences this passage covers
    pub sentences: Range<usize>,
}

/// Splits a document into passages of roughly `target_words` words.
///
/// Sentences are never split. A passage is closed as soon as its running
/// word count reaches the target, so a single long sentence forms its own
/// passage and the last passage may be shorter than the target.
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    target_words: usize,
}

impl SentenceChunker {
    /// Create a chunker; a target of zero is treated as one word
    pub fn new(target_words: usize) -> Self {
        Self {
            target_words: target_words.max(1),
        }
    }

    pub fn target_words(&self) -> usize {
        self.target_words
    }

    /// Split text into trimmed, non-empty sentences (UAX #29 boundaries)
    pub fn split_sentences(text: &str) -> Vec<&str> {
        text.split_sentence_bounds()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Chunk a document into ordered passages
    pub fn chunk(&self, text: &str) -> Vec<Passage> {
        let sentences = Self::split_sentences(text);
        let mut passages = Vec::new();

        let mut start = 0;
        let mut words = 0;

        for (i, sentence) in sentences.iter().enumerate() {
            words += sentence.split_whitespace().count();

            if words >= self.target_words {
                passages.push(Self::close(passages.len(), &sentences, start..i + 1, words));
                start = i + 1;
                words = 0;
            }
        }

        if start < sentences.len() {
            passages.push(Self::close(
                passages.len(),
                &sentences,
                start..sentences.len(),
                words,
            ));
        }

        passages
    }

    fn close(index: usize, sentences: &[&str], range: Range<usize>, word_count: usize) -> Passage {
        Passage {
            index,
            text: sentences[range.clone()].join(" "),
            word_count,
            sentences: range,
        }
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_WORDS)
    }
}
