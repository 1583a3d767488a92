//! Sparse term-weight vectors
//!
//! Sentences and queries carry their externally computed term weights
//! (e.g. TF-IDF) as a [`TermVector`]. The L2 norm is cached at construction
//! so pairwise cosine similarity only walks the shorter of the two maps.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A sparse term -> weight vector with its cached L2 norm
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "FxHashMap<String, f64>", into = "FxHashMap<String, f64>")]
pub struct TermVector {
    weights: FxHashMap<String, f64>,
    norm: f64,
}

impl TermVector {
    /// Create a new empty vector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a map of term weights
    pub fn from_weights(weights: FxHashMap<String, f64>) -> Self {
        let norm = Self::compute_norm(&weights);
        Self { weights, norm }
    }

    /// Compute L2 norm
    fn compute_norm(weights: &FxHashMap<String, f64>) -> f64 {
        weights.values().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Weight of a term (0 when absent)
    pub fn get(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over (term, weight) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Dot product with another vector
    pub fn dot(&self, other: &TermVector) -> f64 {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .weights
            .iter()
            .filter_map(|(term, w)| large.weights.get(term).map(|o| w * o))
            .sum()
    }

    /// Cosine similarity; 0 when either vector has zero norm
    pub fn cosine_similarity(&self, other: &TermVector) -> f64 {
        if self.norm == 0.0 || other.norm == 0.0 {
            return 0.0;
        }
        self.dot(other) / (self.norm * other.norm)
    }

    /// First term whose weight is negative or not finite
    pub(crate) fn first_invalid_term(&self) -> Option<&str> {
        self.weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
            .map(|(k, _)| k.as_str())
    }
}

impl From<FxHashMap<String, f64>> for TermVector {
    fn from(weights: FxHashMap<String, f64>) -> Self {
        Self::from_weights(weights)
    }
}

impl From<TermVector> for FxHashMap<String, f64> {
    fn from(v: TermVector) -> Self {
        v.weights
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for TermVector {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut weights = FxHashMap::default();
        for (term, weight) in iter {
            *weights.entry(term.into()).or_insert(0.0) += weight;
        }
        Self::from_weights(weights)
    }
}
