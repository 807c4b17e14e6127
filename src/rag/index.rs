// Exact nearest-neighbour index over passage embeddings
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{RagError, Result};

/// A single search hit: passage position and its squared L2 distance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub index: usize,
    pub distance: f32,
}

/// Flat index with exhaustive squared-Euclidean search.
///
/// Vector `i` belongs to passage `i`. The index is read-only once built.
#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Build an index from vectors that must all share one dimension
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = vectors.first().map(Vec::len).unwrap_or(0);

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(RagError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        debug!(vectors = vectors.len(), dimension, "Built vector index");
        Ok(Self { dimension, vectors })
    }

    /// Return the `k` nearest vectors, closest first.
    ///
    /// Equal distances keep ascending passage order. An empty index yields
    /// no hits for any query.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(RagError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| SearchHit {
                index,
                distance: squared_l2(query, v),
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.index.cmp(&b.index))
        });
        hits.truncate(k);

        Ok(hits)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimension of the stored vectors (None when empty)
    pub fn dimension(&self) -> Option<usize> {
        (!self.vectors.is_empty()).then_some(self.dimension)
    }
}

/// Squared Euclidean distance
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
