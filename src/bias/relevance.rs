//! Relevance bias
//!
//! `rel(s | q) = Σ_{w ∈ q} ln(1 + c_s(w)) · ln(1 + c_q(w)) · idf(w)`

use super::{score_against_query, BiasVector};
use crate::pipeline::artifacts::{QueryContext, TopicView};
use crate::types::{IdfTable, Sentence};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelevanceBias;

impl RelevanceBias {
    pub fn build(&self, view: &TopicView<'_>) -> BiasVector {
        self.build_for(&view.sentences, &view.query, view.idf)
    }

    pub fn build_for(
        &self,
        sentences: &[&Sentence],
        query: &QueryContext<'_>,
        idf: &IdfTable,
    ) -> BiasVector {
        let raw = score_against_query(sentences, query, |s, q| relevance(s, q, idf));
        BiasVector::from_raw(raw)
    }
}

/// Relevance of `sentence` to `query`; terms missing from `idf` contribute 0
pub fn relevance(sentence: &Sentence, query: &Sentence, idf: &IdfTable) -> f64 {
    query
        .counts
        .iter()
        .map(|(term, &q_count)| {
            let s_count = sentence.count(term);
            if s_count == 0 {
                return 0.0;
            }
            let idf = idf.get(term).copied().unwrap_or(0.0);
            (1.0 + s_count as f64).ln() * (1.0 + q_count as f64).ln() * idf
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(id: &str, terms: &[(&str, u32)]) -> Sentence {
        let counts = terms.iter().map(|&(t, c)| (t.to_string(), c)).collect();
        Sentence::new(id, id).with_counts(counts)
    }

    fn idf(pairs: &[(&str, f64)]) -> IdfTable {
        pairs.iter().map(|&(t, v)| (t.to_string(), v)).collect()
    }

    #[test]
    fn test_relevance_formula() {
        let query = sentence("q", &[("cat", 1), ("dog", 2)]);
        let s = sentence("s", &[("cat", 3), ("fish", 1)]);
        let table = idf(&[("cat", 2.0), ("dog", 1.5)]);

        let expected = 4.0_f64.ln() * 2.0_f64.ln() * 2.0;
        assert!((relevance(&s, &query, &table) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_missing_idf_contributes_nothing() {
        let query = sentence("q", &[("cat", 1)]);
        let s = sentence("s", &[("cat", 1)]);
        assert_eq!(relevance(&s, &query, &IdfTable::default()), 0.0);
    }

    #[test]
    fn test_normalized_bias() {
        let query = sentence("q", &[("cat", 1)]);
        let a = sentence("a", &[("cat", 1)]);
        let b = sentence("b", &[("cat", 3)]);
        let c = sentence("c", &[("fish", 3)]);
        let table = idf(&[("cat", 1.0)]);

        let bias = RelevanceBias.build_for(&[&a, &b, &c], &QueryContext::new(&query), &table);
        let total = 2.0_f64.ln() + 4.0_f64.ln();
        assert!((bias.get(0) - 2.0_f64.ln() / total).abs() < 1e-12);
        assert!((bias.get(1) - 4.0_f64.ln() / total).abs() < 1e-12);
        assert_eq!(bias.get(2), 0.0);
        let sum: f64 = bias.values().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
