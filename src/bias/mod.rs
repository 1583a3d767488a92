//! Query bias engines
//!
//! A bias engine scores every sentence against the topic query and returns a
//! [`BiasVector`] normalized to sum to 1. It plays the role of the teleport
//! distribution in personalized PageRank: the ranker jumps to sentences in
//! proportion to their bias.

pub mod cosine;
pub mod generative;
pub mod relevance;

use crate::pipeline::artifacts::{QueryContext, TopicView};
use crate::pipeline::traits::BiasBuilder;
use crate::types::{BiasFormula, Sentence, SummaryConfig};

pub use cosine::CosineBias;
pub use generative::GenerativeBias;
pub use relevance::RelevanceBias;

/// Per-sentence query relevance, summing to 1
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BiasVector {
    values: Vec<f64>,
    degenerate: bool,
}

impl BiasVector {
    /// Normalize raw relevance scores
    ///
    /// When every raw score is zero the query expresses no preference, and
    /// the vector becomes uniform.
    pub fn from_raw(raw: Vec<f64>) -> Self {
        let n = raw.len();
        let sum: f64 = raw.iter().sum();
        if n == 0 {
            return Self::default();
        }
        if sum > 0.0 && sum.is_finite() {
            Self {
                values: raw.into_iter().map(|v| v / sum).collect(),
                degenerate: false,
            }
        } else {
            Self {
                values: vec![1.0 / n as f64; n],
                degenerate: true,
            }
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, i: usize) -> f64 {
        self.values.get(i).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the raw scores were all zero and the vector fell back to uniform
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// Bias formula selected once from the configuration
#[derive(Debug, Clone, PartialEq)]
pub enum BiasStrategy {
    Cosine(CosineBias),
    Relevance(RelevanceBias),
    Generative(GenerativeBias),
}

impl BiasStrategy {
    pub fn from_config(config: &SummaryConfig) -> Self {
        match config.bias_formula {
            BiasFormula::Cosine => Self::Cosine(CosineBias),
            BiasFormula::Relevance => Self::Relevance(RelevanceBias),
            BiasFormula::Generative => {
                Self::Generative(GenerativeBias::new(config.smoothing_lambda))
            }
        }
    }

    pub fn formula(&self) -> BiasFormula {
        match self {
            Self::Cosine(_) => BiasFormula::Cosine,
            Self::Relevance(_) => BiasFormula::Relevance,
            Self::Generative(_) => BiasFormula::Generative,
        }
    }
}

impl Default for BiasStrategy {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

impl BiasBuilder for BiasStrategy {
    fn build(&self, view: &TopicView<'_>) -> BiasVector {
        match self {
            Self::Cosine(engine) => engine.build(view),
            Self::Relevance(engine) => engine.build(view),
            Self::Generative(engine) => engine.build(view),
        }
    }
}

/// Score each sentence against the title, plus the query extension if any
pub(crate) fn score_against_query<F>(
    sentences: &[&Sentence],
    query: &QueryContext<'_>,
    score: F,
) -> Vec<f64>
where
    F: Fn(&Sentence, &Sentence) -> f64,
{
    sentences
        .iter()
        .map(|s| {
            let title = score(s, query.title);
            let extra = query.extension.map_or(0.0, |ext| score(s, ext));
            title + extra
        })
        .collect()
}
