//! Summarization pipeline: stage traits, artifacts, the runner and the
//! JSON spec layer that configures it.

pub mod artifacts;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;

pub use artifacts::{QueryContext, SummaryReport, TopicView};
pub use observer::{NoopObserver, PipelineObserver, StageTimingObserver};
pub use runner::{summarize_topics, LexRankPipeline, Pipeline, PipelineBuilder};
pub use spec::{Preset, SummarySpec};
pub use validation::{ValidationEngine, ValidationReport};
