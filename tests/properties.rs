use biased_lexrank::bias::{CosineBias, GenerativeBias, RelevanceBias};
use biased_lexrank::pipeline::artifacts::QueryContext;
use biased_lexrank::similarity::{CosineSimilarity, GenerativeSimilarity};
use biased_lexrank::summarizer::RankedSentence;
use biased_lexrank::{
    BiasVector, BudgetedSelector, Document, IdfTable, LanguageModel, LeadSentencePolicy,
    LexRankPipeline, PowerIteration, Sentence, SentenceRef, SummaryConfig, TermVector, Topic,
    TransitionMatrix,
};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

const VOCABULARY: [&str; 6] = ["cat", "dog", "fish", "bird", "tree", "rock"];
const TOLERANCE: f64 = 1e-9;

/// Sentence whose text repeats each term by its count, so the word count
/// equals the total count
fn sentence_from_counts(id: String, counts: &[(usize, u32)]) -> Sentence {
    let mut map: FxHashMap<String, u32> = FxHashMap::default();
    for &(term, count) in counts {
        *map.entry(VOCABULARY[term].to_string()).or_insert(0) += count;
    }
    let mut words = Vec::new();
    for (term, &count) in &map {
        for _ in 0..count {
            words.push(term.as_str());
        }
    }
    let text = words.join(" ");
    let weights: TermVector = map.iter().map(|(t, &c)| (t.clone(), c as f64)).collect();
    Sentence::new(id, text).with_weights(weights).with_counts(map)
}

fn arb_counts() -> impl Strategy<Value = Vec<(usize, u32)>> {
    prop::collection::vec((0..VOCABULARY.len(), 1u32..4), 1..5)
}

fn arb_sentences() -> impl Strategy<Value = Vec<Sentence>> {
    prop::collection::vec(arb_counts(), 1..8).prop_map(|all| {
        all.iter()
            .enumerate()
            .map(|(i, counts)| sentence_from_counts(format!("s{i}"), counts))
            .collect()
    })
}

fn arb_query() -> impl Strategy<Value = Sentence> {
    arb_counts().prop_map(|counts| sentence_from_counts("query".to_string(), &counts))
}

fn idf() -> IdfTable {
    VOCABULARY
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), 0.5 + i as f64 * 0.25))
        .collect()
}

fn assert_stochastic(rows: Vec<f64>) -> Result<(), TestCaseError> {
    for sum in rows {
        prop_assert!((sum - 1.0).abs() < TOLERANCE, "row sums to {}", sum);
    }
    Ok(())
}

fn assert_distribution(values: &[f64]) -> Result<(), TestCaseError> {
    prop_assert!(values.iter().all(|&v| v >= 0.0 && v.is_finite()));
    let total: f64 = values.iter().sum();
    prop_assert!((total - 1.0).abs() < TOLERANCE, "sums to {}", total);
    Ok(())
}

// ── Similarity ─────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn cosine_similarity_is_symmetric_and_stochastic(
        sentences in arb_sentences(),
        threshold in 0.0f64..=1.0,
    ) {
        let refs: Vec<&Sentence> = sentences.iter().collect();
        let sim = CosineSimilarity::new(threshold).build_for(&refs);

        prop_assert_eq!(sim.size(), sentences.len());
        prop_assert!(sim.affinity().is_symmetric(TOLERANCE));
        assert_stochastic(sim.normalized().row_sums())?;
    }

    #[test]
    fn generative_similarity_is_symmetric_and_stochastic(
        sentences in arb_sentences(),
        lambda in 0.1f64..=1.0,
        neighbor_cap in 1usize..10,
    ) {
        let refs: Vec<&Sentence> = sentences.iter().collect();
        let background = LanguageModel::from_sentences(sentences.iter());
        let sim = GenerativeSimilarity::new(lambda, neighbor_cap).build_for(&refs, &background);

        prop_assert!(sim.affinity().is_symmetric(TOLERANCE));
        assert_stochastic(sim.normalized().row_sums())?;
    }
}

// ── Bias ───────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn every_bias_formula_is_a_distribution(
        sentences in arb_sentences(),
        title in arb_query(),
        lambda in 0.1f64..=1.0,
    ) {
        let refs: Vec<&Sentence> = sentences.iter().collect();
        let query = QueryContext::new(&title);
        let background = LanguageModel::from_sentences(sentences.iter());
        let idf = idf();

        let cosine = CosineBias.build_for(&refs, &query);
        let relevance = RelevanceBias.build_for(&refs, &query, &idf);
        let generative = GenerativeBias::new(lambda).build_for(&refs, &query, &background);

        for bias in [cosine, relevance, generative] {
            prop_assert_eq!(bias.len(), sentences.len());
            assert_distribution(bias.values())?;
        }
    }

    #[test]
    fn zero_bias_falls_back_to_uniform(n in 1usize..20) {
        let bias = BiasVector::from_raw(vec![0.0; n]);
        prop_assert!(bias.is_degenerate());
        for &v in bias.values() {
            prop_assert!((v - 1.0 / n as f64).abs() < TOLERANCE);
        }
    }
}

// ── Transition & power iteration ───────────────────────────────────────────

proptest! {
    #[test]
    fn transition_rows_sum_to_one(
        sentences in arb_sentences(),
        title in arb_query(),
        damping in 0.0f64..=1.0,
    ) {
        let refs: Vec<&Sentence> = sentences.iter().collect();
        let sim = CosineSimilarity::default().build_for(&refs);
        let bias = CosineBias.build_for(&refs, &QueryContext::new(&title));
        let transition = TransitionMatrix::build(&sim, &bias, damping).unwrap();

        assert_stochastic(transition.matrix().row_sums())?;
    }

    #[test]
    fn power_iteration_yields_distribution(
        sentences in arb_sentences(),
        title in arb_query(),
        damping in 0.1f64..=1.0,
    ) {
        let refs: Vec<&Sentence> = sentences.iter().collect();
        let sim = CosineSimilarity::default().build_for(&refs);
        let bias = CosineBias.build_for(&refs, &QueryContext::new(&title));
        let transition = TransitionMatrix::build(&sim, &bias, damping).unwrap();

        let distribution = PowerIteration::new()
            .with_epsilon(1e-8)
            .run(&transition)
            .unwrap();

        prop_assert_eq!(distribution.len(), sentences.len());
        assert_distribution(&distribution.scores)?;
        prop_assert!(distribution.delta < 1e-8);
    }
}

// ── Selection ──────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn selection_respects_budget_and_redundancy(
        sentences in arb_sentences(),
        word_budget in 0usize..30,
        redundancy_threshold in 0.0f64..=1.0,
        respect_budget in any::<bool>(),
    ) {
        let ranked: Vec<RankedSentence<'_>> = sentences
            .iter()
            .enumerate()
            .map(|(i, s)| RankedSentence::new(SentenceRef::new(0, i), s, 1.0 / (i + 1) as f64))
            .collect();
        let policy = if respect_budget {
            LeadSentencePolicy::RespectBudget
        } else {
            LeadSentencePolicy::AlwaysInclude
        };
        let selection = BudgetedSelector::new()
            .with_word_budget(word_budget)
            .with_redundancy_threshold(redundancy_threshold)
            .with_lead_policy(policy)
            .select(&ranked);

        if respect_budget {
            prop_assert!(selection.total_words <= word_budget);
        } else {
            prop_assert!(!selection.is_empty());
            prop_assert!(selection.total_words <= word_budget || selection.len() == 1);
        }

        let chosen: Vec<&Sentence> = selection
            .sentences
            .iter()
            .map(|at| &sentences[at.sentence])
            .collect();
        for (i, a) in chosen.iter().enumerate() {
            for b in &chosen[i + 1..] {
                prop_assert!(a.weights.cosine_similarity(&b.weights) < redundancy_threshold);
            }
        }

        let counted: usize = chosen.iter().map(|s| s.word_count).sum();
        prop_assert_eq!(counted, selection.total_words);
    }
}

// ── End to end ─────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn summarize_is_deterministic(
        sentences in arb_sentences(),
        title in arb_query(),
        preset in prop::sample::select(vec!["cosine", "relevance", "generative"]),
    ) {
        let config = SummaryConfig::from_spec_json(&format!(
            r#"{{ "v": 1, "preset": "{preset}", "params": {{ "min_sentence_length": 0 }} }}"#
        ))
        .unwrap();
        let topic = || {
            Topic::new("p", title.clone())
                .with_idf(idf())
                .with_document(Document::new("d").with_sentences(sentences.clone()))
        };
        let pipeline = LexRankPipeline::from_config(&config);

        let mut first = topic();
        let mut second = topic();
        let a = pipeline.summarize(&mut first).unwrap();
        let b = pipeline.summarize(&mut second).unwrap();

        prop_assert_eq!(&first.summary, &second.summary);
        prop_assert_eq!(a, b);
        prop_assert!(!first.summary.is_empty());

        let scores: Vec<f64> = first.sentences().map(|(_, s)| s.score).collect();
        assert_distribution(&scores)?;
    }
}
