//! Pipeline observer hooks for stage timing and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic, and may inspect the intermediate artifacts.

use crate::bias::BiasVector;
use crate::pagerank::StationaryDistribution;
use crate::similarity::SimilarityMatrix;
use crate::summarizer::Selection;
use std::time::{Duration, Instant};

// ============================================================================
// Stage names
// ============================================================================

pub const STAGE_FILTER: &str = "filter";
pub const STAGE_SIMILARITY: &str = "similarity";
pub const STAGE_BIAS: &str = "bias";
pub const STAGE_TRANSITION: &str = "transition";
pub const STAGE_RANK: &str = "rank";
pub const STAGE_SELECT: &str = "select";

// ============================================================================
// StageClock / StageReport
// ============================================================================

/// Wall-clock timer for a single stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock {
    started: Instant,
}

impl StageClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Metrics reported at the end of a stage.
///
/// Every metric is optional; a stage only fills in what it knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    elapsed: Duration,
    sentences: Option<usize>,
    edges: Option<usize>,
    iterations: Option<usize>,
    residual: Option<f64>,
    converged: Option<bool>,
    degenerate: Option<bool>,
    words: Option<usize>,
}

impl StageReport {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            ..Default::default()
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn sentences(&self) -> Option<usize> {
        self.sentences
    }

    pub fn edges(&self) -> Option<usize> {
        self.edges
    }

    pub fn iterations(&self) -> Option<usize> {
        self.iterations
    }

    pub fn residual(&self) -> Option<f64> {
        self.residual
    }

    pub fn converged(&self) -> Option<bool> {
        self.converged
    }

    pub fn degenerate(&self) -> Option<bool> {
        self.degenerate
    }

    pub fn words(&self) -> Option<usize> {
        self.words
    }
}

/// Builder for [`StageReport`].
#[derive(Debug, Clone)]
pub struct StageReportBuilder {
    report: StageReport,
}

impl StageReportBuilder {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            report: StageReport::new(elapsed),
        }
    }

    pub fn sentences(mut self, n: usize) -> Self {
        self.report.sentences = Some(n);
        self
    }

    pub fn edges(mut self, n: usize) -> Self {
        self.report.edges = Some(n);
        self
    }

    pub fn iterations(mut self, n: usize) -> Self {
        self.report.iterations = Some(n);
        self
    }

    pub fn residual(mut self, delta: f64) -> Self {
        self.report.residual = Some(delta);
        self
    }

    pub fn converged(mut self, converged: bool) -> Self {
        self.report.converged = Some(converged);
        self
    }

    pub fn degenerate(mut self, degenerate: bool) -> Self {
        self.report.degenerate = Some(degenerate);
        self
    }

    pub fn words(mut self, n: usize) -> Self {
        self.report.words = Some(n);
        self
    }

    pub fn build(self) -> StageReport {
        self.report
    }
}

// ============================================================================
// PipelineObserver
// ============================================================================

/// Receives callbacks as the pipeline runs. Every hook defaults to a no-op.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    fn on_similarity(&mut self, _similarity: &SimilarityMatrix) {}

    fn on_bias(&mut self, _bias: &BiasVector) {}

    fn on_rank(&mut self, _distribution: &StationaryDistribution) {}

    fn on_selection(&mut self, _selection: &Selection) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Observer that records the report of every finished stage, in order.
#[derive(Debug, Clone, Default)]
pub struct StageTimingObserver {
    reports: Vec<(&'static str, StageReport)>,
}

impl StageTimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[(&'static str, StageReport)] {
        &self.reports
    }

    /// Report of a stage by name, if it ran
    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, report)| report)
    }

    /// Sum of the elapsed time of every recorded stage
    pub fn total_elapsed(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed()).sum()
    }
}

impl PipelineObserver for StageTimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, report.clone()));
    }
}
