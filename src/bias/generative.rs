//! Generative bias: probability of generating the query from each sentence
//!
//! Unlike the inter-sentence similarity, the query probability is not
//! length-normalized; the query is the same for every sentence.

use super::{score_against_query, BiasVector};
use crate::pipeline::artifacts::{QueryContext, TopicView};
use crate::similarity::LanguageModel;
use crate::types::Sentence;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerativeBias {
    /// Interpolation weight of the sentence model
    pub lambda: f64,
}

impl Default for GenerativeBias {
    fn default() -> Self {
        Self { lambda: 0.6 }
    }
}

impl GenerativeBias {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    pub fn build(&self, view: &TopicView<'_>) -> BiasVector {
        self.build_for(&view.sentences, &view.query, &view.background)
    }

    pub fn build_for(
        &self,
        sentences: &[&Sentence],
        query: &QueryContext<'_>,
        background: &LanguageModel,
    ) -> BiasVector {
        let informative = background.covers(query.title)
            || query.extension.is_some_and(|ext| background.covers(ext));
        if !informative {
            return BiasVector::from_raw(vec![0.0; sentences.len()]);
        }

        let raw = score_against_query(sentences, query, |s, q| {
            background.generation(q, s, self.lambda)
        });
        BiasVector::from_raw(raw)
    }
}
