//! Query-biased Markov transition matrix
//!
//! `M[i][j] = d * bias[j] + (1 - d) * sim[i][j]`. Both the similarity rows
//! and the bias vector sum to 1, so every row of `M` sums to 1 for any
//! `d` in `[0, 1]`.

use super::matrix::SquareMatrix;
use crate::bias::BiasVector;
use crate::errors::{LexRankError, Result};
use crate::similarity::SimilarityMatrix;

/// A row-stochastic transition matrix over sentences
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransitionMatrix {
    matrix: SquareMatrix,
    damping: f64,
}

impl TransitionMatrix {
    /// Mix the bias vector into every row of the similarity matrix
    pub fn build(similarity: &SimilarityMatrix, bias: &BiasVector, damping: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&damping) {
            return Err(LexRankError::invalid_config(format!(
                "damping must be between 0 and 1, got {damping}"
            )));
        }

        let sim = similarity.normalized();
        let n = sim.size();
        if bias.len() != n {
            return Err(LexRankError::invalid_input(format!(
                "similarity matrix has {} rows but bias vector has {} entries",
                n,
                bias.len()
            )));
        }

        let mut matrix = SquareMatrix::zeros(n);
        for i in 0..n {
            let sim_row = sim.row(i);
            for (j, (m, &b)) in matrix.row_mut(i).iter_mut().zip(bias.values()).enumerate() {
                *m = damping * b + (1.0 - damping) * sim_row[j];
            }
        }

        Ok(Self { matrix, damping })
    }

    pub fn matrix(&self) -> &SquareMatrix {
        &self.matrix
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j)
    }
}
