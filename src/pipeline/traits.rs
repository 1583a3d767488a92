//! Stage trait definitions for the pipeline.
//!
//! Each trait represents one processing stage boundary. Implementations are
//! statically dispatched; the shipped strategies are closed enums chosen once
//! from a [`SummaryConfig`](crate::types::SummaryConfig).

use crate::bias::BiasVector;
use crate::errors::Result;
use crate::graph::transition::TransitionMatrix;
use crate::pagerank::StationaryDistribution;
use crate::pipeline::artifacts::TopicView;
use crate::similarity::SimilarityMatrix;
use crate::summarizer::{RankedSentence, Selection};

// ============================================================================
// SimilarityBuilder: pairwise sentence similarity
// ============================================================================

/// Builds the inter-sentence similarity matrix.
///
/// # Contract
///
/// - **Input**: the eligible sentences of one topic, in corpus order.
/// - **Output**: a square matrix with one row per sentence whose normalized
///   rows each sum to 1. An empty view yields an empty matrix.
/// - **Pure**: no side effects; may run concurrently with [`BiasBuilder`].
pub trait SimilarityBuilder: Sync {
    fn build(&self, view: &TopicView<'_>) -> SimilarityMatrix;
}

// ============================================================================
// BiasBuilder: relevance to the query
// ============================================================================

/// Builds the per-sentence query bias.
///
/// The returned vector has one entry per sentence and sums to 1 (uniform
/// when no sentence relates to the query). An empty view yields an empty
/// vector.
pub trait BiasBuilder: Sync {
    fn build(&self, view: &TopicView<'_>) -> BiasVector;
}

// ============================================================================
// Ranker: stationary distribution
// ============================================================================

/// Computes salience scores from a transition matrix.
pub trait Ranker {
    fn rank(&self, transition: &TransitionMatrix) -> Result<StationaryDistribution>;
}

// ============================================================================
// SentenceSelector: summary assembly
// ============================================================================

/// Picks the summary from sentences already sorted into rank order.
pub trait SentenceSelector {
    fn select(&self, ranked: &[RankedSentence<'_>]) -> Selection;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::matrix::SquareMatrix;
    use crate::types::{IdfTable, Sentence, SentenceRef};

    /// Test that custom stages can stand in for the shipped strategies.
    #[test]
    fn test_custom_stages_as_trait_objects() {
        struct Identity;
        impl SimilarityBuilder for Identity {
            fn build(&self, view: &TopicView<'_>) -> SimilarityMatrix {
                let n = view.len();
                let mut m = SquareMatrix::zeros(n);
                for i in 0..n {
                    m.set(i, i, 1.0);
                }
                SimilarityMatrix::from_affinity(m)
            }
        }

        struct FirstOnly;
        impl SentenceSelector for FirstOnly {
            fn select(&self, ranked: &[RankedSentence<'_>]) -> Selection {
                Selection {
                    sentences: ranked.iter().take(1).map(|r| r.at).collect(),
                    ..Default::default()
                }
            }
        }

        let title = Sentence::new("title", "cat");
        let a = Sentence::new("a", "cat");
        let idf = IdfTable::default();
        let view = TopicView::new(vec![(SentenceRef::new(0, 0), &a)], &title, &idf);

        let sim: Box<dyn SimilarityBuilder> = Box::new(Identity);
        assert_eq!(sim.build(&view).size(), 1);

        let ranked = vec![RankedSentence::new(SentenceRef::new(0, 0), &a, 1.0)];
        let selector: Box<dyn SentenceSelector> = Box::new(FirstOnly);
        assert_eq!(selector.select(&ranked).sentences, vec![SentenceRef::new(0, 0)]);
    }
}
