//! Core types for biased_lexrank
//!
//! This module defines the topic/document/sentence data model consumed by the
//! ranking stage, and the immutable configuration record passed into every
//! engine.

use crate::errors::{LexRankError, Result};
use crate::vector::TermVector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Inverse-document-frequency table for a topic (term -> idf)
pub type IdfTable = FxHashMap<String, f64>;

// ============================================================================
// Sentence
// ============================================================================

/// A sentence with its externally computed term statistics
///
/// Deserialized sentences derive their term frequencies from the raw counts
/// when none are supplied, the same way [`Sentence::with_counts`] does.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "SentenceRecord")]
pub struct Sentence {
    /// Identity, unique within a topic
    pub id: String,
    /// The original sentence text
    pub text: String,
    /// Whitespace-delimited word count of the original text
    pub word_count: usize,
    /// Position within the parent document
    pub index: usize,
    /// Term weights (e.g. TF-IDF)
    pub weights: TermVector,
    /// Raw term counts
    pub counts: FxHashMap<String, u32>,
    /// Normalized term frequencies
    pub term_freqs: TermVector,
    /// Salience score written by the ranker
    pub score: f64,
}

/// Serialized form of a [`Sentence`]
#[derive(Deserialize)]
struct SentenceRecord {
    id: String,
    #[serde(default)]
    text: String,
    word_count: usize,
    #[serde(default)]
    index: usize,
    #[serde(default)]
    weights: TermVector,
    #[serde(default)]
    counts: FxHashMap<String, u32>,
    #[serde(default)]
    term_freqs: TermVector,
    #[serde(default)]
    score: f64,
}

impl From<SentenceRecord> for Sentence {
    fn from(record: SentenceRecord) -> Self {
        Self {
            id: record.id,
            text: record.text,
            word_count: record.word_count,
            index: record.index,
            weights: record.weights,
            counts: FxHashMap::default(),
            term_freqs: record.term_freqs,
            score: record.score,
        }
        .with_counts(record.counts)
    }
}

impl Sentence {
    /// Create a sentence from its text; the word count is derived from it
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            id: id.into(),
            word_count: text.split_whitespace().count(),
            text,
            index: 0,
            weights: TermVector::new(),
            counts: FxHashMap::default(),
            term_freqs: TermVector::new(),
            score: 0.0,
        }
    }

    /// Builder method: set term weights
    pub fn with_weights(mut self, weights: TermVector) -> Self {
        self.weights = weights;
        self
    }

    /// Builder method: set raw term counts
    ///
    /// Term frequencies are derived as count / total count unless they were
    /// already supplied.
    pub fn with_counts(mut self, counts: FxHashMap<String, u32>) -> Self {
        if self.term_freqs.is_empty() {
            let total: u32 = counts.values().sum();
            if total > 0 {
                self.term_freqs = counts
                    .iter()
                    .map(|(t, &c)| (t.clone(), c as f64 / total as f64))
                    .collect();
            }
        }
        self.counts = counts;
        self
    }

    /// Builder method: set normalized term frequencies
    pub fn with_term_freqs(mut self, term_freqs: TermVector) -> Self {
        self.term_freqs = term_freqs;
        self
    }

    /// Builder method: override the word count
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count;
        self
    }

    /// Builder method: set the position within the document
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Raw count of a term (0 when absent)
    pub fn count(&self, term: &str) -> u32 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// Total number of counted terms
    pub fn length(&self) -> u32 {
        self.counts.values().sum()
    }

    /// Check that the externally produced statistics are usable
    pub fn validate(&self) -> Result<()> {
        if let Some(term) = self.weights.first_invalid_term() {
            return Err(LexRankError::invalid_input(format!(
                "sentence {} has an invalid weight for term {:?}",
                self.id, term
            )));
        }
        if let Some(term) = self.term_freqs.first_invalid_term() {
            return Err(LexRankError::invalid_input(format!(
                "sentence {} has an invalid term frequency for term {:?}",
                self.id, term
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Document & Topic
// ============================================================================

/// A source document holding sentences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method: set the document date
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Builder method: append sentences, assigning their in-document index
    pub fn with_sentences(mut self, sentences: impl IntoIterator<Item = Sentence>) -> Self {
        for sentence in sentences {
            let index = self.sentences.len();
            self.sentences.push(sentence.with_index(index));
        }
        self
    }
}

/// Position of a sentence inside a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SentenceRef {
    /// Document index within the topic
    pub document: usize,
    /// Sentence index within the document
    pub sentence: usize,
}

impl SentenceRef {
    pub fn new(document: usize, sentence: usize) -> Self {
        Self { document, sentence }
    }
}

/// A query unit: title, optional narrative/category and its document cluster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    /// Title treated as the primary query sentence
    pub title: Sentence,
    #[serde(default)]
    pub narrative: Option<Sentence>,
    /// Used in place of the narrative when the topic has none
    #[serde(default)]
    pub category: Option<Sentence>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub idf: IdfTable,
    /// Selected sentences in rank order
    #[serde(default)]
    pub summary: Vec<SentenceRef>,
}

impl Topic {
    pub fn new(id: impl Into<String>, title: Sentence) -> Self {
        Self {
            id: id.into(),
            title,
            narrative: None,
            category: None,
            documents: Vec::new(),
            idf: IdfTable::default(),
            summary: Vec::new(),
        }
    }

    /// Builder method: set the narrative
    pub fn with_narrative(mut self, narrative: Sentence) -> Self {
        self.narrative = Some(narrative);
        self
    }

    /// Builder method: set the category
    pub fn with_category(mut self, category: Sentence) -> Self {
        self.category = Some(category);
        self
    }

    /// Builder method: add a document
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    /// Builder method: set the idf table
    pub fn with_idf(mut self, idf: IdfTable) -> Self {
        self.idf = idf;
        self
    }

    /// Look up a sentence by reference
    pub fn sentence(&self, at: SentenceRef) -> Option<&Sentence> {
        self.documents
            .get(at.document)
            .and_then(|d| d.sentences.get(at.sentence))
    }

    /// Parent document of a referenced sentence
    pub fn document_of(&self, at: SentenceRef) -> Option<&Document> {
        self.documents.get(at.document)
    }

    /// All sentences in corpus order
    pub fn sentences(&self) -> impl Iterator<Item = (SentenceRef, &Sentence)> {
        self.documents.iter().enumerate().flat_map(|(d, doc)| {
            doc.sentences
                .iter()
                .enumerate()
                .map(move |(s, sent)| (SentenceRef::new(d, s), sent))
        })
    }

    /// Total number of sentences across documents
    pub fn num_sentences(&self) -> usize {
        self.documents.iter().map(|d| d.sentences.len()).sum()
    }

    /// Secondary query text: the narrative, or the category when absent
    pub fn query_extension(&self) -> Option<&Sentence> {
        self.narrative.as_ref().or(self.category.as_ref())
    }

    /// Check identities and term statistics before ranking
    pub fn validate(&self) -> Result<()> {
        if self.num_sentences() == 0 {
            return Err(LexRankError::invalid_input(format!(
                "topic {} has no sentences",
                self.id
            )));
        }
        let mut seen = FxHashSet::default();
        for (_, sentence) in self.sentences() {
            if !seen.insert(sentence.id.as_str()) {
                return Err(LexRankError::invalid_input(format!(
                    "topic {} has duplicate sentence id {}",
                    self.id, sentence.id
                )));
            }
            sentence.validate()?;
        }
        self.title.validate()?;
        if let Some(extra) = self.query_extension() {
            extra.validate()?;
        }
        Ok(())
    }
}

// ============================================================================
// Formula selection
// ============================================================================

/// Inter-sentence similarity formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityFormula {
    /// Thresholded cosine over term weights
    #[default]
    Cosine,
    /// Length-normalized generation probability with a top-k neighbor cap
    NormalizedGenerative,
}

impl SimilarityFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::NormalizedGenerative => "normalized_generative",
        }
    }
}

/// Query bias formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasFormula {
    /// Cosine similarity to the query
    #[default]
    Cosine,
    /// Log-count overlap weighted by idf
    Relevance,
    /// Probability of generating the query from the sentence
    Generative,
}

impl BiasFormula {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Relevance => "relevance",
            Self::Generative => "generative",
        }
    }
}

/// What to do when the top-ranked sentence alone exceeds the word budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSentencePolicy {
    /// The top-ranked sentence is always selected
    #[default]
    AlwaysInclude,
    /// The top-ranked sentence is subject to the budget like any other
    RespectBudget,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for one summarization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Weight of the query bias against inter-sentence similarity
    pub damping: f64,
    /// Minimum cosine similarity kept in the similarity graph
    pub intersentence_threshold: f64,
    /// Maximum similarity allowed between two summary sentences
    pub redundancy_threshold: f64,
    /// Power-iteration stopping criterion (Euclidean delta)
    pub epsilon: f64,
    /// Power-iteration cap
    pub max_iterations: usize,
    /// Interpolation weight of the sentence model in generative formulas
    pub smoothing_lambda: f64,
    /// Neighbors kept per sentence by the generative similarity
    pub neighbor_cap: usize,
    /// Sentences shorter than this (in words) are not ranked
    pub min_sentence_length: usize,
    /// Add narrative (or category) relevance into the bias vector
    pub include_narrative: bool,
    pub bias_formula: BiasFormula,
    pub similarity_formula: SimilarityFormula,
    /// Maximum summary size in words
    pub word_budget: usize,
    pub lead_policy: LeadSentencePolicy,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            damping: 0.7,
            intersentence_threshold: 0.0,
            redundancy_threshold: 0.5,
            epsilon: 0.1,
            max_iterations: 1000,
            smoothing_lambda: 0.6,
            neighbor_cap: 20,
            min_sentence_length: 5,
            include_narrative: false,
            bias_formula: BiasFormula::Cosine,
            similarity_formula: SimilarityFormula::Cosine,
            word_budget: 100,
            lead_policy: LeadSentencePolicy::AlwaysInclude,
        }
    }
}

impl SummaryConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let unit_checks = [
            ("damping", self.damping),
            ("intersentence_threshold", self.intersentence_threshold),
            ("redundancy_threshold", self.redundancy_threshold),
            ("smoothing_lambda", self.smoothing_lambda),
        ];
        for (name, value) in unit_checks {
            if !(0.0..=1.0).contains(&value) {
                return Err(LexRankError::invalid_config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }

        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(LexRankError::invalid_config(format!(
                "epsilon must be a positive finite number, got {}",
                self.epsilon
            )));
        }

        if self.max_iterations == 0 {
            return Err(LexRankError::invalid_config("max_iterations must be > 0"));
        }

        Ok(())
    }

    /// Builder method: set damping factor
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Builder method: set inter-sentence threshold
    pub fn with_intersentence_threshold(mut self, threshold: f64) -> Self {
        self.intersentence_threshold = threshold;
        self
    }

    /// Builder method: set redundancy threshold
    pub fn with_redundancy_threshold(mut self, threshold: f64) -> Self {
        self.redundancy_threshold = threshold;
        self
    }

    /// Builder method: set convergence epsilon
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Builder method: set max iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: set smoothing lambda
    pub fn with_smoothing_lambda(mut self, lambda: f64) -> Self {
        self.smoothing_lambda = lambda;
        self
    }

    /// Builder method: set neighbor cap
    pub fn with_neighbor_cap(mut self, k: usize) -> Self {
        self.neighbor_cap = k;
        self
    }

    /// Builder method: set minimum sentence length
    pub fn with_min_sentence_length(mut self, words: usize) -> Self {
        self.min_sentence_length = words;
        self
    }

    /// Builder method: include narrative in the bias
    pub fn with_include_narrative(mut self, include: bool) -> Self {
        self.include_narrative = include;
        self
    }

    /// Builder method: set bias formula
    pub fn with_bias_formula(mut self, formula: BiasFormula) -> Self {
        self.bias_formula = formula;
        self
    }

    /// Builder method: set similarity formula
    pub fn with_similarity_formula(mut self, formula: SimilarityFormula) -> Self {
        self.similarity_formula = formula;
        self
    }

    /// Builder method: set word budget
    pub fn with_word_budget(mut self, words: usize) -> Self {
        self.word_budget = words;
        self
    }

    /// Builder method: set lead sentence policy
    pub fn with_lead_policy(mut self, policy: LeadSentencePolicy) -> Self {
        self.lead_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> FxHashMap<String, u32> {
        pairs.iter().map(|&(t, c)| (t.to_string(), c)).collect()
    }

    #[test]
    fn test_word_count_from_text() {
        let s = Sentence::new("s1", "  the cat   sat ");
        assert_eq!(s.word_count, 3);
    }

    #[test]
    fn test_term_freqs_derived_from_counts() {
        let s = Sentence::new("s1", "cat dog cat").with_counts(counts(&[("cat", 2), ("dog", 1)]));
        assert!((s.term_freqs.get("cat") - 2.0 / 3.0).abs() < 1e-12);
        assert!((s.term_freqs.get("dog") - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.length(), 3);
    }

    #[test]
    fn test_supplied_term_freqs_are_kept() {
        let tf: TermVector = [("cat", 0.9)].into_iter().collect();
        let s = Sentence::new("s1", "cat")
            .with_term_freqs(tf)
            .with_counts(counts(&[("cat", 1)]));
        assert!((s.term_freqs.get("cat") - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_deserialized_sentence_derives_term_freqs() {
        let s: Sentence = serde_json::from_str(
            r#"{ "id": "s1", "word_count": 3, "counts": { "cat": 2, "dog": 1 } }"#,
        )
        .unwrap();
        assert!((s.term_freqs.get("cat") - 2.0 / 3.0).abs() < 1e-12);
        assert!((s.term_freqs.get("dog") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialized_term_freqs_are_kept() {
        let s: Sentence = serde_json::from_str(
            r#"{ "id": "s1", "word_count": 1, "counts": { "cat": 1 }, "term_freqs": { "cat": 0.9 } }"#,
        )
        .unwrap();
        assert!((s.term_freqs.get("cat") - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_document_assigns_indices() {
        let doc = Document::new("d1")
            .with_sentences([Sentence::new("a", "one"), Sentence::new("b", "two")]);
        assert_eq!(doc.sentences[0].index, 0);
        assert_eq!(doc.sentences[1].index, 1);
    }

    #[test]
    fn test_topic_validation_rejects_empty() {
        let topic = Topic::new("t1", Sentence::new("title", "cat"));
        assert!(matches!(topic.validate(), Err(LexRankError::InvalidInput(_))));
    }

    #[test]
    fn test_topic_validation_rejects_duplicate_ids() {
        let topic = Topic::new("t1", Sentence::new("title", "cat")).with_document(
            Document::new("d1").with_sentences([Sentence::new("s", "a"), Sentence::new("s", "b")]),
        );
        let err = topic.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_topic_validation_rejects_negative_weight() {
        let bad: TermVector = [("cat", -1.0)].into_iter().collect();
        let topic = Topic::new("t1", Sentence::new("title", "cat")).with_document(
            Document::new("d1").with_sentences([Sentence::new("s", "cat").with_weights(bad)]),
        );
        assert!(topic.validate().is_err());
    }

    #[test]
    fn test_query_extension_falls_back_to_category() {
        let topic = Topic::new("t1", Sentence::new("title", "cat"))
            .with_category(Sentence::new("cat", "animals"));
        assert_eq!(topic.query_extension().map(|s| s.id.as_str()), Some("cat"));

        let topic = topic.with_narrative(Sentence::new("narr", "pets at home"));
        assert_eq!(topic.query_extension().map(|s| s.id.as_str()), Some("narr"));
    }

    #[test]
    fn test_sentences_iterate_in_corpus_order() {
        let topic = Topic::new("t1", Sentence::new("title", "x"))
            .with_document(Document::new("d1").with_sentences([Sentence::new("a", "a")]))
            .with_document(
                Document::new("d2").with_sentences([Sentence::new("b", "b"), Sentence::new("c", "c")]),
            );
        let refs: Vec<_> = topic.sentences().map(|(r, _)| r).collect();
        assert_eq!(
            refs,
            vec![SentenceRef::new(0, 0), SentenceRef::new(1, 0), SentenceRef::new(1, 1)]
        );
        assert_eq!(topic.sentence(SentenceRef::new(1, 1)).map(|s| s.id.as_str()), Some("c"));
    }

    #[test]
    fn test_config_validation() {
        let config = SummaryConfig::default();
        assert!(config.validate().is_ok());

        let bad = SummaryConfig::default().with_damping(1.5);
        assert!(bad.validate().is_err());

        let bad = SummaryConfig::default().with_epsilon(0.0);
        assert!(bad.validate().is_err());

        let bad = SummaryConfig::default().with_max_iterations(0);
        assert!(bad.validate().is_err());

        let bad = SummaryConfig::default().with_smoothing_lambda(-0.1);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_config_serde_missing_fields_default() {
        let cfg: SummaryConfig =
            serde_json::from_str(r#"{ "damping": 0.3, "bias_formula": "relevance" }"#).unwrap();
        assert!((cfg.damping - 0.3).abs() < 1e-12);
        assert_eq!(cfg.bias_formula, BiasFormula::Relevance);
        assert_eq!(cfg.word_budget, 100);
        assert_eq!(cfg.lead_policy, LeadSentencePolicy::AlwaysInclude);
    }

    #[test]
    fn test_formula_names() {
        assert_eq!(
            serde_json::to_string(&SimilarityFormula::NormalizedGenerative).unwrap(),
            r#""normalized_generative""#
        );
        assert_eq!(BiasFormula::Generative.as_str(), "generative");
    }
}
