//! Cosine bias: similarity of each sentence's term weights to the query

use super::{score_against_query, BiasVector};
use crate::pipeline::artifacts::{QueryContext, TopicView};
use crate::types::Sentence;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CosineBias;

impl CosineBias {
    pub fn build(&self, view: &TopicView<'_>) -> BiasVector {
        self.build_for(&view.sentences, &view.query)
    }

    pub fn build_for(&self, sentences: &[&Sentence], query: &QueryContext<'_>) -> BiasVector {
        let raw = score_against_query(sentences, query, |s, q| {
            s.weights.cosine_similarity(&q.weights)
        });
        BiasVector::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::TermVector;

    fn sentence(id: &str, weights: &[(&str, f64)]) -> Sentence {
        Sentence::new(id, id).with_weights(weights.iter().copied().collect::<TermVector>())
    }

    #[test]
    fn test_identical_to_title_gets_full_bias() {
        let title = sentence("title", &[("cat", 1.0), ("dog", 1.0)]);
        let s = title.clone();
        let bias = CosineBias.build_for(&[&s], &QueryContext::new(&title));
        assert!((bias.get(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_proportional_to_cosine() {
        let title = sentence("title", &[("cat", 1.0)]);
        let a = sentence("a", &[("cat", 1.0)]);
        let b = sentence("b", &[("cat", 1.0), ("dog", 1.0)]);
        let bias = CosineBias.build_for(&[&a, &b], &QueryContext::new(&title));

        let cos_b = 1.0 / 2.0_f64.sqrt();
        assert!((bias.get(0) - 1.0 / (1.0 + cos_b)).abs() < 1e-12);
        assert!((bias.get(1) - cos_b / (1.0 + cos_b)).abs() < 1e-12);
    }

    #[test]
    fn test_narrative_adds_to_title() {
        let title = sentence("title", &[("cat", 1.0)]);
        let narrative = sentence("narrative", &[("fish", 1.0)]);
        let a = sentence("a", &[("cat", 1.0)]);
        let b = sentence("b", &[("fish", 1.0)]);

        let title_only = CosineBias.build_for(&[&a, &b], &QueryContext::new(&title));
        assert_eq!(title_only.get(1), 0.0);

        let with_narrative = CosineBias.build_for(
            &[&a, &b],
            &QueryContext::new(&title).with_extension(Some(&narrative)),
        );
        assert!((with_narrative.get(0) - 0.5).abs() < 1e-12);
        assert!((with_narrative.get(1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_no_overlap_is_degenerate() {
        let title = sentence("title", &[("zebra", 1.0)]);
        let a = sentence("a", &[("cat", 1.0)]);
        let bias = CosineBias.build_for(&[&a], &QueryContext::new(&title));
        assert!(bias.is_degenerate());
    }
}
