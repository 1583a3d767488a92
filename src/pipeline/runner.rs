//! Pipeline runner: executes the stages in order and moves artifacts between them.
//!
//! The [`Pipeline`] struct holds a statically-composed set of pipeline stages.
//! Calling [`Pipeline::summarize`] executes them in order against one topic,
//! threading artifacts between stages and notifying an optional
//! [`PipelineObserver`] at each boundary.
//!
//! # Static dispatch
//!
//! `Pipeline` is generic over all stage types, so the compiler monomorphizes
//! each combination into a unique concrete type. The shipped strategies are
//! closed enums, so switching formulas never needs a trait object.
//!
//! # Factory methods
//!
//! Use [`Pipeline::from_config()`] to build the pipeline a
//! [`SummaryConfig`] describes without spelling out the generics manually.

use crate::bias::BiasStrategy;
use crate::errors::{LexRankError, Result};
use crate::graph::transition::TransitionMatrix;
use crate::pagerank::PowerIteration;
use crate::pipeline::artifacts::{SummaryReport, TopicView};
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, StageReportBuilder, STAGE_BIAS,
    STAGE_FILTER, STAGE_RANK, STAGE_SELECT, STAGE_SIMILARITY, STAGE_TRANSITION,
};
use crate::pipeline::traits::{BiasBuilder, Ranker, SentenceSelector, SimilarityBuilder};
use crate::similarity::SimilarityStrategy;
use crate::summarizer::{sort_by_rank, BudgetedSelector, RankedSentence, Selection};
use crate::types::{SentenceRef, SummaryConfig, Topic};
use rayon::prelude::*;

/// Enter a tracing span for a pipeline stage.
macro_rules! trace_stage {
    ($name:expr) => {
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A pipeline composed of concrete stage implementations.
///
/// | Param | Trait | Default impl |
/// |-------|-------|--------------|
/// | `Sim`  | [`SimilarityBuilder`] | [`SimilarityStrategy`] |
/// | `Bias` | [`BiasBuilder`] | [`BiasStrategy`] |
/// | `Rnk`  | [`Ranker`] | [`PowerIteration`] |
/// | `Sel`  | [`SentenceSelector`] | [`BudgetedSelector`] |
///
/// `config` supplies the options that belong to no single stage: the
/// minimum sentence length, the narrative flag and the damping factor.
#[derive(Debug, Clone)]
pub struct Pipeline<Sim, Bias, Rnk, Sel> {
    pub similarity: Sim,
    pub bias: Bias,
    pub ranker: Rnk,
    pub selector: Sel,
    pub config: SummaryConfig,
}

/// Type alias for the pipeline built from a [`SummaryConfig`].
pub type LexRankPipeline =
    Pipeline<SimilarityStrategy, BiasStrategy, PowerIteration, BudgetedSelector>;

impl LexRankPipeline {
    /// Build every stage from `config`, choosing formulas once.
    pub fn from_config(config: &SummaryConfig) -> Self {
        Pipeline {
            similarity: SimilarityStrategy::from_config(config),
            bias: BiasStrategy::from_config(config),
            ranker: PowerIteration::from_config(config),
            selector: BudgetedSelector::from_config(config),
            config: config.clone(),
        }
    }
}

impl Default for LexRankPipeline {
    fn default() -> Self {
        Self::from_config(&SummaryConfig::default())
    }
}

// ============================================================================
// Pipeline::summarize: execute stages in order
// ============================================================================

impl<Sim, Bias, Rnk, Sel> Pipeline<Sim, Bias, Rnk, Sel>
where
    Sim: SimilarityBuilder,
    Bias: BiasBuilder,
    Rnk: Ranker,
    Sel: SentenceSelector,
{
    /// Summarize `topic`, writing sentence scores and `topic.summary`.
    pub fn summarize(&self, topic: &mut Topic) -> Result<SummaryReport> {
        self.summarize_observed(topic, &mut NoopObserver)
    }

    /// Summarize `topic`, notifying `observer` at every stage boundary.
    ///
    /// Stages run in order:
    /// 1. Filter sentences below the minimum length
    /// 2. Similarity and bias (concurrently)
    /// 3. Transition matrix
    /// 4. Rank
    /// 5. Select
    ///
    /// Fails without touching the topic when the configuration or topic is
    /// invalid, when the topic already carries a summary, or when the power
    /// iteration does not converge.
    pub fn summarize_observed(
        &self,
        topic: &mut Topic,
        observer: &mut impl PipelineObserver,
    ) -> Result<SummaryReport> {
        self.config.validate()?;
        topic.validate()?;
        if !topic.summary.is_empty() {
            return Err(LexRankError::invalid_input(format!(
                "topic {} already has a summary",
                topic.id
            )));
        }

        let (scores, report) = self.rank(topic, observer)?;

        for (at, score) in scores {
            if let Some(sentence) = topic
                .documents
                .get_mut(at.document)
                .and_then(|d| d.sentences.get_mut(at.sentence))
            {
                sentence.score = score;
            }
        }
        topic.summary = report.summary.clone();

        tracing::debug!(
            topic = %topic.id,
            selected = report.summary.len(),
            words = report.total_words,
            "topic summarized"
        );
        Ok(report)
    }

    fn rank(
        &self,
        topic: &Topic,
        observer: &mut impl PipelineObserver,
    ) -> Result<(Vec<(SentenceRef, f64)>, SummaryReport)> {
        let mut report = SummaryReport {
            topic_id: topic.id.clone(),
            ..Default::default()
        };

        // Stage 1: Filter
        let view = {
            trace_stage!(STAGE_FILTER);
            observer.on_stage_start(STAGE_FILTER);
            let clock = StageClock::start();
            let view = TopicView::from_topic(topic, &self.config);
            let stage = StageReportBuilder::new(clock.elapsed())
                .sentences(view.len())
                .build();
            observer.on_stage_end(STAGE_FILTER, &stage);
            view
        };
        report.ranked_sentences = view.len();
        report.filtered_sentences = topic.num_sentences() - view.len();

        if view.is_empty() {
            tracing::warn!(
                topic = %topic.id,
                min_sentence_length = self.config.min_sentence_length,
                "every sentence is below the minimum length; summary is empty"
            );
            return Ok((Vec::new(), report));
        }

        // Stage 2: Similarity and bias have no data dependency
        observer.on_stage_start(STAGE_SIMILARITY);
        observer.on_stage_start(STAGE_BIAS);
        let (sim_builder, bias_builder) = (&self.similarity, &self.bias);
        let ((similarity, sim_elapsed), (bias, bias_elapsed)) = rayon::join(
            || {
                trace_stage!(STAGE_SIMILARITY);
                let clock = StageClock::start();
                let similarity = sim_builder.build(&view);
                (similarity, clock.elapsed())
            },
            || {
                trace_stage!(STAGE_BIAS);
                let clock = StageClock::start();
                let bias = bias_builder.build(&view);
                (bias, clock.elapsed())
            },
        );
        let stage = StageReportBuilder::new(sim_elapsed)
            .sentences(similarity.size())
            .edges(similarity.affinity().num_nonzero())
            .build();
        observer.on_stage_end(STAGE_SIMILARITY, &stage);
        observer.on_similarity(&similarity);

        let stage = StageReportBuilder::new(bias_elapsed)
            .sentences(bias.len())
            .degenerate(bias.is_degenerate())
            .build();
        observer.on_stage_end(STAGE_BIAS, &stage);
        observer.on_bias(&bias);

        report.self_loops = similarity.self_loops();
        report.degenerate_bias = bias.is_degenerate();
        if bias.is_degenerate() {
            tracing::debug!(topic = %topic.id, "query matches no sentence; bias is uniform");
        }

        // Stage 3: Transition matrix
        let transition = {
            trace_stage!(STAGE_TRANSITION);
            observer.on_stage_start(STAGE_TRANSITION);
            let clock = StageClock::start();
            let transition = TransitionMatrix::build(&similarity, &bias, self.config.damping)?;
            observer.on_stage_end(STAGE_TRANSITION, &StageReport::new(clock.elapsed()));
            transition
        };

        // Stage 4: Rank
        let distribution = {
            trace_stage!(STAGE_RANK);
            observer.on_stage_start(STAGE_RANK);
            let clock = StageClock::start();
            let distribution = self.ranker.rank(&transition)?;
            let stage = StageReportBuilder::new(clock.elapsed())
                .iterations(distribution.iterations)
                .residual(distribution.delta)
                .converged(true)
                .build();
            observer.on_stage_end(STAGE_RANK, &stage);
            observer.on_rank(&distribution);
            distribution
        };
        if distribution.len() != view.len() {
            return Err(LexRankError::invalid_input(format!(
                "ranker returned {} scores for {} sentences",
                distribution.len(),
                view.len()
            )));
        }
        report.iterations = distribution.iterations;
        report.delta = distribution.delta;

        // Stage 5: Select
        let selection: Selection = {
            trace_stage!(STAGE_SELECT);
            observer.on_stage_start(STAGE_SELECT);
            let clock = StageClock::start();
            let mut ranked: Vec<RankedSentence<'_>> = view
                .refs
                .iter()
                .zip(&view.sentences)
                .zip(&distribution.scores)
                .map(|((&at, &sentence), &score)| RankedSentence::new(at, sentence, score))
                .collect();
            sort_by_rank(&mut ranked);
            let selection = self.selector.select(&ranked);
            let stage = StageReportBuilder::new(clock.elapsed())
                .sentences(selection.len())
                .words(selection.total_words)
                .build();
            observer.on_stage_end(STAGE_SELECT, &stage);
            observer.on_selection(&selection);
            selection
        };
        report.summary = selection.sentences;
        report.total_words = selection.total_words;

        let scores = view.refs.iter().copied().zip(distribution.scores).collect();
        Ok((scores, report))
    }
}

// ============================================================================
// Batch entry point
// ============================================================================

/// Summarize independent topics in parallel with one shared configuration.
///
/// Results are returned in the order of `topics`; one failing topic does not
/// stop the others.
pub fn summarize_topics(topics: &mut [Topic], config: &SummaryConfig) -> Vec<Result<SummaryReport>> {
    let pipeline = LexRankPipeline::from_config(config);
    topics
        .par_iter_mut()
        .map(|topic| pipeline.summarize(topic))
        .collect()
}

// ============================================================================
// PipelineBuilder: fluent construction with custom stages
// ============================================================================

/// Fluent builder for constructing a [`Pipeline`] with custom stages.
///
/// Starts from the stages of the default configuration and allows
/// overriding individual stages.
///
/// ```
/// # use biased_lexrank::pipeline::runner::PipelineBuilder;
/// # use biased_lexrank::summarizer::BudgetedSelector;
/// let pipeline = PipelineBuilder::new()
///     .selector(BudgetedSelector::new().with_word_budget(250))
///     .build();
/// ```
pub struct PipelineBuilder<
    Sim = SimilarityStrategy,
    Bias = BiasStrategy,
    Rnk = PowerIteration,
    Sel = BudgetedSelector,
> {
    similarity: Sim,
    bias: Bias,
    ranker: Rnk,
    selector: Sel,
    config: SummaryConfig,
}

impl PipelineBuilder {
    /// Start building from the stages of the default configuration.
    pub fn new() -> Self {
        Self::from_config(&SummaryConfig::default())
    }

    /// Start building from the stages `config` describes.
    pub fn from_config(config: &SummaryConfig) -> Self {
        let Pipeline {
            similarity,
            bias,
            ranker,
            selector,
            config,
        } = LexRankPipeline::from_config(config);
        PipelineBuilder {
            similarity,
            bias,
            ranker,
            selector,
            config,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<Sim, Bias, Rnk, Sel> PipelineBuilder<Sim, Bias, Rnk, Sel> {
    /// Override the similarity stage.
    pub fn similarity<S: SimilarityBuilder>(self, s: S) -> PipelineBuilder<S, Bias, Rnk, Sel> {
        PipelineBuilder {
            similarity: s,
            bias: self.bias,
            ranker: self.ranker,
            selector: self.selector,
            config: self.config,
        }
    }

    /// Override the bias stage.
    pub fn bias<B: BiasBuilder>(self, b: B) -> PipelineBuilder<Sim, B, Rnk, Sel> {
        PipelineBuilder {
            similarity: self.similarity,
            bias: b,
            ranker: self.ranker,
            selector: self.selector,
            config: self.config,
        }
    }

    /// Override the ranker stage.
    pub fn ranker<R: Ranker>(self, r: R) -> PipelineBuilder<Sim, Bias, R, Sel> {
        PipelineBuilder {
            similarity: self.similarity,
            bias: self.bias,
            ranker: r,
            selector: self.selector,
            config: self.config,
        }
    }

    /// Override the selector stage.
    pub fn selector<S: SentenceSelector>(self, s: S) -> PipelineBuilder<Sim, Bias, Rnk, S> {
        PipelineBuilder {
            similarity: self.similarity,
            bias: self.bias,
            ranker: self.ranker,
            selector: s,
            config: self.config,
        }
    }

    /// Replace the pipeline-level options (filter, narrative, damping).
    ///
    /// Stages already chosen are kept as they are.
    pub fn config(mut self, config: SummaryConfig) -> Self {
        self.config = config;
        self
    }

    /// Consume the builder and produce a [`Pipeline`].
    pub fn build(self) -> Pipeline<Sim, Bias, Rnk, Sel> {
        Pipeline {
            similarity: self.similarity,
            bias: self.bias,
            ranker: self.ranker,
            selector: self.selector,
            config: self.config,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
