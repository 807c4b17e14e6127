//! Deterministic stand-ins for the model capabilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use docqa::{Embedder, TextGenerator};

pub const STORY: &str = "Elias was an old librarian who lived in a quiet coastal town. \
Every night he was searching the archive for a lost manuscript written by his grandfather. \
At dawn he finally found the manuscript hidden behind a loose brick.";

/// Bag-of-words embedder over a vocabulary grown on first sight.
///
/// Words get a stable slot for the lifetime of the embedder, so identical
/// text always maps to the identical unit vector.
pub struct VocabularyEmbedder {
    dimension: usize,
    vocabulary: Mutex<HashMap<String, usize>>,
}

impl VocabularyEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vocabulary: Mutex::new(HashMap::new()),
        }
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        let mut vocabulary = self.vocabulary.lock().unwrap();

        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let next = vocabulary.len();
            let slot = *vocabulary.entry(word.to_lowercase()).or_insert(next);
            vector[slot % self.dimension] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for VocabularyEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Embedder for VocabularyEmbedder {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed(t)).collect())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }
}

/// Embedder whose output width can be changed mid-session
pub struct ResizableEmbedder {
    dimension: AtomicUsize,
}

impl ResizableEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: AtomicUsize::new(dimension),
        }
    }

    pub fn resize(&self, dimension: usize) {
        self.dimension.store(dimension, Ordering::SeqCst);
    }
}

impl Embedder for ResizableEmbedder {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let dimension = self.dimension.load(Ordering::SeqCst);
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0; dimension];
                v[0] = t.len() as f32;
                v
            })
            .collect())
    }
}

/// Always fails
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn encode(&self, _texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        Err(anyhow::anyhow!("embedding backend unavailable"))
    }
}

/// Returns the context part of the prompt verbatim
pub struct EchoGenerator;

impl TextGenerator for EchoGenerator {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        Ok(prompt
            .split_once("context:")
            .map(|(_, context)| context.trim().to_string())
            .unwrap_or_default())
    }
}

/// Always fails
pub struct FailingGenerator;

impl TextGenerator for FailingGenerator {
    fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("generator out of memory"))
    }
}

/// Counts calls and texts passed to an inner embedder
pub struct CountingEmbedder<E> {
    inner: E,
    calls: AtomicUsize,
    texts: AtomicUsize,
}

impl<E: Embedder> CountingEmbedder<E> {
    pub fn new(inner: E) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn texts(&self) -> usize {
        self.texts.load(Ordering::SeqCst)
    }
}

impl<E: Embedder> Embedder for CountingEmbedder<E> {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts.fetch_add(texts.len(), Ordering::SeqCst);
        self.inner.encode(texts)
    }
}

/// Counts calls and records prompts sent to an inner generator
pub struct CountingGenerator<G> {
    inner: G,
    prompts: Mutex<Vec<String>>,
}

impl<G: TextGenerator> CountingGenerator<G> {
    pub fn new(inner: G) -> Arc<Self> {
        Arc::new(Self {
            inner,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl<G: TextGenerator> TextGenerator for CountingGenerator<G> {
    fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.inner.generate(prompt)
    }
}
