//! # biased_lexrank
//!
//! Query-biased LexRank sentence ranking with budgeted greedy summary
//! selection.
//!
//! Given a topic (a query plus documents already split into sentences with
//! precomputed term statistics), the crate builds a sentence-similarity
//! graph, biases it toward the query, computes the stationary distribution
//! of the resulting random walk by power iteration, and greedily assembles
//! a non-redundant summary under a word budget.
//!
//! ```
//! use biased_lexrank::{Document, LexRankPipeline, Sentence, SummaryConfig, TermVector, Topic};
//!
//! let weights = |terms: &[&str]| terms.iter().map(|t| (*t, 1.0)).collect::<TermVector>();
//! let mut topic = Topic::new("t1", Sentence::new("q", "rust safety").with_weights(weights(&["rust", "safety"])))
//!     .with_document(Document::new("d1").with_sentences([
//!         Sentence::new("s1", "rust guarantees memory safety").with_weights(weights(&["rust", "memory", "safety"])),
//!         Sentence::new("s2", "cargo builds crates").with_weights(weights(&["cargo", "crates"])),
//!     ]));
//!
//! let config = SummaryConfig::default().with_min_sentence_length(0);
//! let report = LexRankPipeline::from_config(&config).summarize(&mut topic).unwrap();
//! assert_eq!(topic.summary, report.summary);
//! ```

pub mod bias;
pub mod errors;
pub mod graph;
pub mod pagerank;
pub mod pipeline;
pub mod similarity;
pub mod summarizer;
pub mod types;
pub mod vector;

// Re-export commonly used types
pub use errors::{LexRankError, Result};
pub use types::{
    BiasFormula, Document, IdfTable, LeadSentencePolicy, Sentence, SentenceRef,
    SimilarityFormula, SummaryConfig, Topic,
};
pub use vector::TermVector;

// Re-export main functionality
pub use bias::{BiasStrategy, BiasVector};
pub use graph::transition::TransitionMatrix;
pub use pagerank::{PowerIteration, StationaryDistribution};
pub use pipeline::{
    summarize_topics, LexRankPipeline, Pipeline, PipelineBuilder, SummaryReport, SummarySpec,
};
pub use similarity::{LanguageModel, SimilarityMatrix, SimilarityStrategy};
pub use summarizer::{BudgetedSelector, Selection};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
