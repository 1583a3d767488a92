//! Inter-sentence similarity engines
//!
//! Each engine produces a [`SimilarityMatrix`]: the raw symmetric affinity
//! between sentences plus its row-normalized (row-stochastic) form used by
//! the transition matrix.

pub mod cosine;
pub mod generative;

use crate::graph::matrix::SquareMatrix;
use crate::pipeline::artifacts::TopicView;
use crate::pipeline::traits::SimilarityBuilder;
use crate::types::{SimilarityFormula, SummaryConfig};
use rayon::prelude::*;

pub use cosine::CosineSimilarity;
pub use generative::{GenerativeSimilarity, LanguageModel};

/// Below this many sentences, rows are computed sequentially
const PARALLEL_MIN_SENTENCES: usize = 64;

/// Pairwise sentence similarity, raw and row-normalized
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityMatrix {
    affinity: SquareMatrix,
    normalized: SquareMatrix,
    self_loops: usize,
}

impl SimilarityMatrix {
    /// Normalize a symmetric affinity matrix into its row-stochastic form
    pub fn from_affinity(affinity: SquareMatrix) -> Self {
        let mut normalized = affinity.clone();
        let self_loops = normalized.normalize_rows();
        Self {
            affinity,
            normalized,
            self_loops,
        }
    }

    /// Raw similarities before normalization
    pub fn affinity(&self) -> &SquareMatrix {
        &self.affinity
    }

    /// Row-normalized similarities
    pub fn normalized(&self) -> &SquareMatrix {
        &self.normalized
    }

    /// Number of all-zero rows that were replaced by a self-loop
    pub fn self_loops(&self) -> usize {
        self.self_loops
    }

    pub fn size(&self) -> usize {
        self.affinity.size()
    }

    pub fn is_empty(&self) -> bool {
        self.affinity.is_empty()
    }
}

/// Similarity formula selected once from the configuration
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityStrategy {
    Cosine(CosineSimilarity),
    Generative(GenerativeSimilarity),
}

impl SimilarityStrategy {
    pub fn from_config(config: &SummaryConfig) -> Self {
        match config.similarity_formula {
            SimilarityFormula::Cosine => {
                Self::Cosine(CosineSimilarity::new(config.intersentence_threshold))
            }
            SimilarityFormula::NormalizedGenerative => Self::Generative(GenerativeSimilarity::new(
                config.smoothing_lambda,
                config.neighbor_cap,
            )),
        }
    }

    pub fn formula(&self) -> SimilarityFormula {
        match self {
            Self::Cosine(_) => SimilarityFormula::Cosine,
            Self::Generative(_) => SimilarityFormula::NormalizedGenerative,
        }
    }
}

impl Default for SimilarityStrategy {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

impl SimilarityBuilder for SimilarityStrategy {
    fn build(&self, view: &TopicView<'_>) -> SimilarityMatrix {
        match self {
            Self::Cosine(engine) => engine.build(view),
            Self::Generative(engine) => engine.build(view),
        }
    }
}

/// Compute one value per row, in parallel for large topics
pub(crate) fn map_rows<T, F>(n: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    if n < PARALLEL_MIN_SENTENCES {
        (0..n).map(f).collect()
    } else {
        (0..n).into_par_iter().map(f).collect()
    }
}
