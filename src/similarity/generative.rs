//! Generation-probability similarity
//!
//! A sentence `s` is smoothed into a language model by interpolating its own
//! term frequencies with the topic-wide background model:
//!
//! `p(w | s) = λ · tf_s(w) + (1 - λ) · p(w | topic)`
//!
//! The similarity of `i` to `j` is the probability of generating `i`'s terms
//! from `j`'s model, raised to `1 / len(i)` so long sentences are not
//! penalized. Only the top-k neighbors of each sentence are kept, and the
//! graph is symmetrized afterwards.

use super::{map_rows, SimilarityMatrix};
use crate::graph::matrix::SquareMatrix;
use crate::pipeline::artifacts::TopicView;
use crate::types::Sentence;
use rustc_hash::FxHashMap;

/// Topic-wide background term distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LanguageModel {
    probabilities: FxHashMap<String, f64>,
}

impl LanguageModel {
    /// Relative frequency of every term over the raw counts of `sentences`
    pub fn from_sentences<'a>(sentences: impl IntoIterator<Item = &'a Sentence>) -> Self {
        let mut counts: FxHashMap<String, f64> = FxHashMap::default();
        for sentence in sentences {
            for (term, &count) in &sentence.counts {
                *counts.entry(term.clone()).or_insert(0.0) += count as f64;
            }
        }

        let total: f64 = counts.values().sum();
        if total > 0.0 {
            for value in counts.values_mut() {
                *value /= total;
            }
        }

        Self {
            probabilities: counts,
        }
    }

    /// Background probability of a term (0 when unseen)
    pub fn probability(&self, term: &str) -> f64 {
        self.probabilities.get(term).copied().unwrap_or(0.0)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Whether any counted term of `text` is in the vocabulary
    ///
    /// When it is not, every sentence generates `text` with probability 1.
    pub fn covers(&self, text: &Sentence) -> bool {
        text.counts
            .iter()
            .any(|(term, &count)| count > 0 && self.probability(term) > 0.0)
    }

    /// Smoothed probability of `term` under `sentence`'s model
    pub fn smoothed(&self, sentence: &Sentence, term: &str, lambda: f64) -> f64 {
        lambda * sentence.term_freqs.get(term) + (1.0 - lambda) * self.probability(term)
    }

    /// Log-probability of generating `text`'s terms from `source`'s model
    ///
    /// Terms outside the background vocabulary are skipped. Returns `None`
    /// when some term has zero probability under the smoothed model.
    pub fn log_generation(&self, text: &Sentence, source: &Sentence, lambda: f64) -> Option<f64> {
        let mut log_p = 0.0;
        for (term, &count) in &text.counts {
            if count == 0 || self.probability(term) == 0.0 {
                continue;
            }
            let p = self.smoothed(source, term, lambda);
            if p <= 0.0 {
                return None;
            }
            log_p += count as f64 * p.ln();
        }
        Some(log_p)
    }

    /// Probability of generating `text`'s terms from `source`'s model
    pub fn generation(&self, text: &Sentence, source: &Sentence, lambda: f64) -> f64 {
        self.log_generation(text, source, lambda)
            .map_or(0.0, f64::exp)
    }

    /// Generation probability normalized by the length of `text`
    pub fn normalized_generation(&self, text: &Sentence, source: &Sentence, lambda: f64) -> f64 {
        let length = text.length();
        if length == 0 {
            return 0.0;
        }
        self.log_generation(text, source, lambda)
            .map_or(0.0, |log_p| (log_p / length as f64).exp())
    }
}

/// Normalized generation-probability similarity engine
#[derive(Debug, Clone, PartialEq)]
pub struct GenerativeSimilarity {
    /// Interpolation weight of the sentence model
    pub lambda: f64,
    /// Neighbors kept per sentence
    pub neighbor_cap: usize,
}

impl Default for GenerativeSimilarity {
    fn default() -> Self {
        Self {
            lambda: 0.6,
            neighbor_cap: 20,
        }
    }
}

impl GenerativeSimilarity {
    pub fn new(lambda: f64, neighbor_cap: usize) -> Self {
        Self {
            lambda,
            neighbor_cap,
        }
    }

    /// Build the similarity matrix for a topic view
    pub fn build(&self, view: &TopicView<'_>) -> SimilarityMatrix {
        self.build_for(&view.sentences, &view.background)
    }

    /// Build the similarity matrix for a sentence sequence
    pub fn build_for(&self, sentences: &[&Sentence], background: &LanguageModel) -> SimilarityMatrix {
        let n = sentences.len();

        let neighbors: Vec<Vec<(usize, f64)>> = map_rows(n, |i| {
            let mut scored: Vec<(usize, f64)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| {
                    (
                        j,
                        background.normalized_generation(sentences[i], sentences[j], self.lambda),
                    )
                })
                .filter(|&(_, s)| s > 0.0)
                .collect();
            // Highest score first, lower index on ties
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.truncate(self.neighbor_cap);
            scored
        });

        let mut affinity = SquareMatrix::zeros(n);
        for (i, row) in neighbors.into_iter().enumerate() {
            for (j, score) in row {
                // Keep the larger value when both directions were kept
                let value = score.max(affinity.get(i, j));
                affinity.set(i, j, value);
                affinity.set(j, i, value);
            }
        }

        SimilarityMatrix::from_affinity(affinity)
    }
}
