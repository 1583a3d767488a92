//! Rank order over scored sentences

use crate::types::{Sentence, SentenceRef};
use std::cmp::Ordering;

/// A sentence paired with its position in the topic and its salience score
#[derive(Debug, Clone, Copy)]
pub struct RankedSentence<'a> {
    pub at: SentenceRef,
    pub sentence: &'a Sentence,
    pub score: f64,
}

impl<'a> RankedSentence<'a> {
    pub fn new(at: SentenceRef, sentence: &'a Sentence, score: f64) -> Self {
        Self {
            at,
            sentence,
            score,
        }
    }

    /// Deterministic rank comparator
    ///
    /// Scores are compared on a grid of `SCORE_EPSILON`, descending; scores
    /// in the same cell are tied and fall back to corpus order (document
    /// index, then sentence index). Bucketing keeps the order total.
    pub fn stable_cmp(&self, other: &Self) -> Ordering {
        other
            .score_bucket()
            .cmp(&self.score_bucket())
            .then_with(|| self.at.cmp(&other.at))
    }

    fn score_bucket(&self) -> i64 {
        /// Width of the grid scores are compared on.
        const SCORE_EPSILON: f64 = 1e-10;

        // NaN maps to 0; out-of-range values saturate
        (self.score / SCORE_EPSILON).round() as i64
    }
}

/// Sort sentences into rank order
pub fn sort_by_rank(ranked: &mut [RankedSentence<'_>]) {
    ranked.sort_by(|a, b| a.stable_cmp(b));
}
