//! Budgeted greedy sentence selection
//!
//! Walks sentences in rank order and keeps each one that fits the remaining
//! word budget and is not too similar to anything already kept. Skipped
//! sentences are never revisited.

use super::ranking::RankedSentence;
use crate::pipeline::traits::SentenceSelector;
use crate::types::{LeadSentencePolicy, SentenceRef, SummaryConfig};
use serde::{Deserialize, Serialize};

/// Result of sentence selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Selected sentences in rank order
    pub sentences: Vec<SentenceRef>,
    /// Sum of the selected sentences' word counts
    pub total_words: usize,
    /// Candidates rejected because they did not fit the budget
    pub skipped_over_budget: usize,
    /// Candidates rejected as redundant
    pub skipped_redundant: usize,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Greedy selector bounded by a word budget and a redundancy ceiling
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetedSelector {
    /// Maximum summary size in words
    pub word_budget: usize,
    /// Candidates with cosine similarity at or above this to a selected
    /// sentence are skipped
    pub redundancy_threshold: f64,
    pub lead_policy: LeadSentencePolicy,
}

impl Default for BudgetedSelector {
    fn default() -> Self {
        Self {
            word_budget: 100,
            redundancy_threshold: 0.5,
            lead_policy: LeadSentencePolicy::AlwaysInclude,
        }
    }
}

impl BudgetedSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SummaryConfig) -> Self {
        Self {
            word_budget: config.word_budget,
            redundancy_threshold: config.redundancy_threshold,
            lead_policy: config.lead_policy,
        }
    }

    /// Set the word budget
    pub fn with_word_budget(mut self, words: usize) -> Self {
        self.word_budget = words;
        self
    }

    /// Set the redundancy threshold
    pub fn with_redundancy_threshold(mut self, threshold: f64) -> Self {
        self.redundancy_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the lead sentence policy
    pub fn with_lead_policy(mut self, policy: LeadSentencePolicy) -> Self {
        self.lead_policy = policy;
        self
    }

    /// Select from sentences already sorted into rank order
    pub fn select(&self, ranked: &[RankedSentence<'_>]) -> Selection {
        let mut selection = Selection::default();
        let mut chosen: Vec<&RankedSentence<'_>> = Vec::new();

        for (rank, candidate) in ranked.iter().enumerate() {
            let words = candidate.sentence.word_count;
            let lead = rank == 0 && self.lead_policy == LeadSentencePolicy::AlwaysInclude;

            if !lead && selection.total_words + words > self.word_budget {
                selection.skipped_over_budget += 1;
                continue;
            }

            let redundant = chosen.iter().any(|kept| {
                candidate
                    .sentence
                    .weights
                    .cosine_similarity(&kept.sentence.weights)
                    >= self.redundancy_threshold
            });
            if redundant {
                selection.skipped_redundant += 1;
                continue;
            }

            selection.sentences.push(candidate.at);
            selection.total_words += words;
            chosen.push(candidate);
        }

        selection
    }
}

impl SentenceSelector for BudgetedSelector {
    fn select(&self, ranked: &[RankedSentence<'_>]) -> Selection {
        BudgetedSelector::select(self, ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentence;
    use crate::vector::TermVector;

    fn sentence(id: &str, text: &str, weights: &[(&str, f64)]) -> Sentence {
        Sentence::new(id, text).with_weights(weights.iter().copied().collect::<TermVector>())
    }

    fn ranked(sentences: &[Sentence]) -> Vec<RankedSentence<'_>> {
        let n = sentences.len();
        sentences
            .iter()
            .enumerate()
            .map(|(i, s)| RankedSentence::new(SentenceRef::new(0, i), s, (n - i) as f64))
            .collect()
    }

    #[test]
    fn test_redundant_candidate_is_skipped() {
        let sentences = vec![
            sentence("a", "cat dog cat", &[("cat", 2.0), ("dog", 1.0)]),
            sentence("b", "cat dog cat", &[("cat", 2.0), ("dog", 1.0)]),
            sentence("c", "fish bird", &[("fish", 1.0), ("bird", 1.0)]),
        ];
        let selection = BudgetedSelector::new().select(&ranked(&sentences));

        assert_eq!(
            selection.sentences,
            vec![SentenceRef::new(0, 0), SentenceRef::new(0, 2)]
        );
        assert_eq!(selection.total_words, 5);
        assert_eq!(selection.skipped_redundant, 1);
    }

    #[test]
    fn test_budget_skips_but_keeps_walking() {
        let sentences = vec![
            sentence("a", "one two three four", &[("a", 1.0)]),
            sentence("b", "one two three four five six", &[("b", 1.0)]),
            sentence("c", "one two", &[("c", 1.0)]),
        ];
        let selection = BudgetedSelector::new()
            .with_word_budget(7)
            .select(&ranked(&sentences));

        assert_eq!(
            selection.sentences,
            vec![SentenceRef::new(0, 0), SentenceRef::new(0, 2)]
        );
        assert_eq!(selection.total_words, 6);
        assert_eq!(selection.skipped_over_budget, 1);
    }

    #[test]
    fn test_lead_sentence_bypasses_budget() {
        let sentences = vec![
            sentence("a", "one two three four five", &[("a", 1.0)]),
            sentence("b", "one", &[("b", 1.0)]),
        ];
        let selection = BudgetedSelector::new()
            .with_word_budget(3)
            .select(&ranked(&sentences));

        // the lead already exceeds the budget, so nothing else fits
        assert_eq!(selection.sentences, vec![SentenceRef::new(0, 0)]);
        assert_eq!(selection.total_words, 5);
    }

    #[test]
    fn test_respect_budget_policy_skips_long_lead() {
        let sentences = vec![
            sentence("a", "one two three four five", &[("a", 1.0)]),
            sentence("b", "one", &[("b", 1.0)]),
        ];
        let selection = BudgetedSelector::new()
            .with_word_budget(3)
            .with_lead_policy(LeadSentencePolicy::RespectBudget)
            .select(&ranked(&sentences));

        assert_eq!(selection.sentences, vec![SentenceRef::new(0, 1)]);
        assert_eq!(selection.total_words, 1);
    }

    #[test]
    fn test_zero_threshold_keeps_only_lead() {
        let sentences = vec![
            sentence("a", "x", &[("a", 1.0)]),
            sentence("b", "y", &[("b", 1.0)]),
        ];
        // every similarity, including 0, reaches a 0 threshold
        let selection = BudgetedSelector::new()
            .with_redundancy_threshold(0.0)
            .select(&ranked(&sentences));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let selection = BudgetedSelector::new().select(&[]);
        assert!(selection.is_empty());
        assert_eq!(selection.total_words, 0);
    }
}
