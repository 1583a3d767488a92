//! First-class pipeline artifacts.
//!
//! Each type represents a typed intermediate result flowing between pipeline
//! stages. Sentences are borrowed from the topic; the stages never copy them.

use crate::similarity::LanguageModel;
use crate::types::{IdfTable, Sentence, SentenceRef, SummaryConfig, Topic};
use serde::{Deserialize, Serialize};

/// The query a topic is summarized against
#[derive(Debug, Clone, Copy)]
pub struct QueryContext<'a> {
    /// Primary query sentence
    pub title: &'a Sentence,
    /// Narrative or category, scored additively with the title when present
    pub extension: Option<&'a Sentence>,
}

impl<'a> QueryContext<'a> {
    pub fn new(title: &'a Sentence) -> Self {
        Self {
            title,
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: Option<&'a Sentence>) -> Self {
        self.extension = extension;
        self
    }
}

/// Borrowed view of the sentences of one topic that take part in ranking.
///
/// Positions in every stage output (matrix rows, bias entries, scores)
/// follow the order of `sentences`.
#[derive(Debug, Clone)]
pub struct TopicView<'a> {
    /// Eligible sentences in corpus order
    pub sentences: Vec<&'a Sentence>,
    /// Location of each eligible sentence in the topic
    pub refs: Vec<SentenceRef>,
    pub query: QueryContext<'a>,
    pub idf: &'a IdfTable,
    /// Topic-wide term distribution used by the generative formulas
    pub background: LanguageModel,
}

impl<'a> TopicView<'a> {
    /// View over explicit sentences; the background model is built from them
    pub fn new(entries: Vec<(SentenceRef, &'a Sentence)>, title: &'a Sentence, idf: &'a IdfTable) -> Self {
        let (refs, sentences): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let background = LanguageModel::from_sentences(sentences.iter().copied());
        Self {
            sentences,
            refs,
            query: QueryContext::new(title),
            idf,
            background,
        }
    }

    /// View over the sentences of `topic` that pass the minimum-length filter
    ///
    /// The background model covers every sentence of the topic, filtered or
    /// not.
    pub fn from_topic(topic: &'a Topic, config: &SummaryConfig) -> Self {
        let (refs, sentences): (Vec<_>, Vec<_>) = topic
            .sentences()
            .filter(|(_, s)| s.word_count >= config.min_sentence_length)
            .unzip();

        let extension = if config.include_narrative {
            topic.query_extension()
        } else {
            None
        };

        Self {
            sentences,
            refs,
            query: QueryContext::new(&topic.title).with_extension(extension),
            idf: &topic.idf,
            background: LanguageModel::from_sentences(topic.sentences().map(|(_, s)| s)),
        }
    }

    /// Builder method: score against the narrative as well
    pub fn with_extension(mut self, extension: Option<&'a Sentence>) -> Self {
        self.query = self.query.with_extension(extension);
        self
    }

    /// Builder method: replace the background model
    pub fn with_background(mut self, background: LanguageModel) -> Self {
        self.background = background;
        self
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Outcome of summarizing one topic
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub topic_id: String,
    /// Selected sentences in rank order (also written to `Topic::summary`)
    pub summary: Vec<SentenceRef>,
    /// Words in the selected sentences
    pub total_words: usize,
    /// Sentences that took part in ranking
    pub ranked_sentences: usize,
    /// Sentences removed by the minimum-length filter
    pub filtered_sentences: usize,
    /// Power iterations until convergence
    pub iterations: usize,
    /// Final Euclidean delta of the power iteration
    pub delta: f64,
    /// The query matched no sentence and the bias fell back to uniform
    pub degenerate_bias: bool,
    /// Similarity rows with no neighbor, replaced by a self-loop
    pub self_loops: usize,
}
