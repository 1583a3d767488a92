//! Power iteration
//!
//! Repeatedly applies `p ← Mᵀ p` from the uniform distribution until the
//! Euclidean change between successive iterates falls below epsilon.

use super::StationaryDistribution;
use crate::errors::{LexRankError, Result};
use crate::graph::transition::TransitionMatrix;
use crate::pipeline::traits::Ranker;
use crate::types::SummaryConfig;

/// Power-iteration ranker
#[derive(Debug, Clone, PartialEq)]
pub struct PowerIteration {
    /// Convergence threshold on the Euclidean delta
    pub epsilon: f64,
    /// Iterations allowed before giving up
    pub max_iterations: usize,
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            max_iterations: 1000,
        }
    }
}

impl PowerIteration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            epsilon: config.epsilon,
            max_iterations: config.max_iterations,
        }
    }

    /// Set the convergence threshold
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Compute the stationary distribution of `transition`
    ///
    /// Fails with [`LexRankError::Convergence`] when the cap is reached
    /// without the delta dropping below epsilon.
    pub fn run(&self, transition: &TransitionMatrix) -> Result<StationaryDistribution> {
        let n = transition.size();
        if n == 0 {
            return Ok(StationaryDistribution::new(vec![], 0, 0.0));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(LexRankError::invalid_config(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }

        let matrix = transition.matrix();
        let mut scores = vec![1.0 / n as f64; n];
        let mut next = vec![0.0; n];
        let mut delta = f64::INFINITY;

        for iteration in 1..=self.max_iterations {
            matrix.transpose_mul(&scores, &mut next);

            delta = scores
                .iter()
                .zip(next.iter())
                .map(|(old, new)| (old - new) * (old - new))
                .sum::<f64>()
                .sqrt();

            std::mem::swap(&mut scores, &mut next);

            if delta < self.epsilon {
                normalize(&mut scores);
                tracing::debug!(iterations = iteration, delta, "power iteration converged");
                return Ok(StationaryDistribution::new(scores, iteration, delta));
            }
        }

        Err(LexRankError::Convergence {
            iterations: self.max_iterations,
            delta,
            epsilon: self.epsilon,
        })
    }
}

impl Ranker for PowerIteration {
    fn rank(&self, transition: &TransitionMatrix) -> Result<StationaryDistribution> {
        self.run(transition)
    }
}

// Rows of M sum to 1 so the mass is preserved up to rounding
fn normalize(scores: &mut [f64]) {
    let sum: f64 = scores.iter().sum();
    if sum > 0.0 {
        for score in scores.iter_mut() {
            *score /= sum;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bias::BiasVector;
    use crate::graph::matrix::SquareMatrix;
    use crate::similarity::SimilarityMatrix;

    fn transition(rows: Vec<Vec<f64>>, bias: Vec<f64>, damping: f64) -> TransitionMatrix {
        let sim = SimilarityMatrix::from_affinity(SquareMatrix::from_rows(rows).unwrap());
        TransitionMatrix::build(&sim, &BiasVector::from_raw(bias), damping).unwrap()
    }

    #[test]
    fn test_symmetric_graph_uniform_bias_gives_equal_scores() {
        let t = transition(
            vec![
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
                vec![1.0, 1.0, 1.0],
            ],
            vec![1.0, 1.0, 1.0],
            0.5,
        );
        let result = PowerIteration::new().with_epsilon(1e-9).run(&t).unwrap();
        for &s in &result.scores {
            assert!((s - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_full_damping_returns_bias() {
        let t = transition(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            vec![3.0, 1.0],
            1.0,
        );
        let result = PowerIteration::new().with_epsilon(1e-9).run(&t).unwrap();
        assert!((result.scores[0] - 0.75).abs() < 1e-9);
        assert!((result.scores[1] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_scores_sum_to_one() {
        let t = transition(
            vec![
                vec![1.0, 0.3, 0.0],
                vec![0.3, 1.0, 0.6],
                vec![0.0, 0.6, 1.0],
            ],
            vec![0.5, 0.1, 0.4],
            0.7,
        );
        let result = PowerIteration::new().with_epsilon(1e-6).run(&t).unwrap();
        let sum: f64 = result.scores.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(result.scores.iter().all(|&s| s >= 0.0));
    }

    #[test]
    fn test_result_is_a_fixed_point() {
        let t = transition(
            vec![
                vec![1.0, 0.3, 0.0],
                vec![0.3, 1.0, 0.6],
                vec![0.0, 0.6, 1.0],
            ],
            vec![0.5, 0.1, 0.4],
            0.3,
        );
        let result = PowerIteration::new().with_epsilon(1e-12).run(&t).unwrap();
        let mut next = vec![0.0; 3];
        t.matrix().transpose_mul(&result.scores, &mut next);
        for (a, b) in result.scores.iter().zip(&next) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_iteration_cap_is_an_error() {
        // periodic chain without teleportation oscillates forever
        let t = transition(
            vec![
                vec![0.0, 1.0, 0.0],
                vec![1.0, 0.0, 0.0],
                vec![1.0, 0.0, 0.0],
            ],
            vec![1.0, 0.0, 0.0],
            0.0,
        );
        let err = PowerIteration::new()
            .with_max_iterations(5)
            .with_epsilon(1e-6)
            .run(&t)
            .unwrap_err();
        assert!(matches!(err, LexRankError::Convergence { iterations: 5, .. }));
    }

    #[test]
    fn test_empty_matrix() {
        let result = PowerIteration::new().run(&TransitionMatrix::default()).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_single_sentence() {
        let t = transition(vec![vec![1.0]], vec![1.0], 0.7);
        let result = PowerIteration::new().run(&t).unwrap();
        assert_eq!(result.scores, vec![1.0]);
    }
}
