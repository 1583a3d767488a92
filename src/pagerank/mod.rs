//! Stationary-distribution ranking
//!
//! This module provides power iteration over a row-stochastic transition
//! matrix.

pub mod power;

pub use power::PowerIteration;

/// Result of a stationary-distribution computation
#[derive(Debug, Clone, PartialEq)]
pub struct StationaryDistribution {
    /// Score for each sentence (indexed like the transition matrix), summing to 1
    pub scores: Vec<f64>,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final convergence delta (Euclidean)
    pub delta: f64,
}

impl StationaryDistribution {
    pub fn new(scores: Vec<f64>, iterations: usize, delta: f64) -> Self {
        Self {
            scores,
            iterations,
            delta,
        }
    }

    /// Top N positions by score, lower index first on ties
    pub fn top_n(&self, n: usize) -> Vec<(usize, f64)> {
        let mut indexed: Vec<_> = self.scores.iter().copied().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        indexed.truncate(n);
        indexed
    }

    /// Score at a position (0 when out of range)
    pub fn score(&self, i: usize) -> f64 {
        self.scores.get(i).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
