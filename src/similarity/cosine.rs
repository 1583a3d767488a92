//! Thresholded cosine similarity
//!
//! Pairs whose cosine similarity falls below the threshold are dropped from
//! the graph entirely. Self-similarity is fixed at 1.

use super::{map_rows, SimilarityMatrix};
use crate::graph::matrix::SquareMatrix;
use crate::pipeline::artifacts::TopicView;
use crate::types::Sentence;

/// Cosine similarity engine
#[derive(Debug, Clone, PartialEq)]
pub struct CosineSimilarity {
    /// Minimum similarity kept in the graph
    pub threshold: f64,
}

impl Default for CosineSimilarity {
    fn default() -> Self {
        Self { threshold: 0.0 }
    }
}

impl CosineSimilarity {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Build the similarity matrix for a topic view
    pub fn build(&self, view: &TopicView<'_>) -> SimilarityMatrix {
        self.build_for(&view.sentences)
    }

    /// Build the similarity matrix for a sentence sequence
    pub fn build_for(&self, sentences: &[&Sentence]) -> SimilarityMatrix {
        let n = sentences.len();

        // Upper triangle per row, mirrored below
        let upper: Vec<Vec<(usize, f64)>> = map_rows(n, |i| {
            ((i + 1)..n)
                .filter_map(|j| {
                    let sim = sentences[i].weights.cosine_similarity(&sentences[j].weights);
                    (sim >= self.threshold && sim > 0.0).then_some((j, sim))
                })
                .collect()
        });

        let mut affinity = SquareMatrix::zeros(n);
        for (i, row) in upper.into_iter().enumerate() {
            affinity.set(i, i, 1.0);
            for (j, sim) in row {
                affinity.set(i, j, sim);
                affinity.set(j, i, sim);
            }
        }

        SimilarityMatrix::from_affinity(affinity)
    }
}
