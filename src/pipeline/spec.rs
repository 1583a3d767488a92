//! Summary specification types.
//!
//! A [`SummarySpec`] is a JSON document naming a preset, optional formula
//! overrides and parameter overrides. It is checked by the
//! [`super::validation::ValidationEngine`] and resolved into a
//! [`SummaryConfig`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "preset": "generative",
//!   "formulas": { "bias": "relevance", "similarity": "cosine" },
//!   "params": { "damping": 0.7, "epsilon": 0.01, "word_budget": 250 },
//!   "strict": false
//! }
//! ```
//!
//! Resolution order: preset, then explicit formulas, then explicit params.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::ValidationEngine;
use crate::errors::{LexRankError, Result};
use crate::types::{BiasFormula, LeadSentencePolicy, SimilarityFormula, SummaryConfig};

/// Spec version understood by this crate.
pub const SPEC_VERSION: u32 = 1;

/// Top-level summary specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarySpec {
    /// Spec version (currently `1`).
    pub v: u32,

    /// Optional preset name used as a starting point (e.g., `"relevance"`).
    #[serde(default)]
    pub preset: Option<String>,

    /// Explicit formula selections. Omitted formulas inherit from the preset.
    #[serde(default)]
    pub formulas: FormulaSet,

    /// Explicit parameter overrides. Omitted parameters keep their defaults.
    #[serde(default)]
    pub params: ParamSet,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Formula overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormulaSet {
    #[serde(default)]
    pub bias: Option<BiasFormula>,

    #[serde(default)]
    pub similarity: Option<SimilarityFormula>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Parameter overrides; each mirrors a [`SummaryConfig`] field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamSet {
    #[serde(default)]
    pub damping: Option<f64>,
    #[serde(default)]
    pub intersentence_threshold: Option<f64>,
    #[serde(default)]
    pub redundancy_threshold: Option<f64>,
    #[serde(default)]
    pub epsilon: Option<f64>,
    #[serde(default)]
    pub max_iterations: Option<usize>,
    #[serde(default)]
    pub smoothing_lambda: Option<f64>,
    #[serde(default)]
    pub neighbor_cap: Option<usize>,
    #[serde(default)]
    pub min_sentence_length: Option<usize>,
    #[serde(default)]
    pub include_narrative: Option<bool>,
    #[serde(default)]
    pub word_budget: Option<usize>,
    #[serde(default)]
    pub lead_policy: Option<LeadSentencePolicy>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

// ─── Presets ────────────────────────────────────────────────────────────────

/// Named bias/similarity formula pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Cosine bias over a cosine graph
    Cosine,
    /// Idf-weighted relevance bias over a cosine graph
    Relevance,
    /// Generation-probability bias over a generative graph
    Generative,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Cosine, Preset::Relevance, Preset::Generative];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cosine => "cosine",
            Self::Relevance => "relevance",
            Self::Generative => "generative",
        }
    }

    pub fn bias_formula(&self) -> BiasFormula {
        match self {
            Self::Cosine => BiasFormula::Cosine,
            Self::Relevance => BiasFormula::Relevance,
            Self::Generative => BiasFormula::Generative,
        }
    }

    pub fn similarity_formula(&self) -> SimilarityFormula {
        match self {
            Self::Cosine | Self::Relevance => SimilarityFormula::Cosine,
            Self::Generative => SimilarityFormula::NormalizedGenerative,
        }
    }
}

// ─── Resolution ─────────────────────────────────────────────────────────────

impl SummarySpec {
    /// Parse a spec document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Formulas after applying the preset (if known) and explicit overrides.
    pub fn effective_formulas(&self) -> (BiasFormula, SimilarityFormula) {
        let preset = self.preset.as_deref().and_then(Preset::from_name);
        let bias = self
            .formulas
            .bias
            .or(preset.map(|p| p.bias_formula()))
            .unwrap_or_default();
        let similarity = self
            .formulas
            .similarity
            .or(preset.map(|p| p.similarity_formula()))
            .unwrap_or_default();
        (bias, similarity)
    }

    /// Validate with the default rules and build the configuration.
    ///
    /// Warnings are logged; any error fails with
    /// [`LexRankError::InvalidSpec`] listing every error found.
    pub fn resolve(&self) -> Result<SummaryConfig> {
        let report = ValidationEngine::with_defaults().validate(self);
        for warning in report.warnings() {
            tracing::warn!(code = %warning.code, path = %warning.path, "{}", warning.message);
        }
        if report.has_errors() {
            return Err(LexRankError::InvalidSpec(report.errors().cloned().collect()));
        }

        let (bias, similarity) = self.effective_formulas();
        let mut config = SummaryConfig::default()
            .with_bias_formula(bias)
            .with_similarity_formula(similarity);

        let p = &self.params;
        if let Some(v) = p.damping {
            config.damping = v;
        }
        if let Some(v) = p.intersentence_threshold {
            config.intersentence_threshold = v;
        }
        if let Some(v) = p.redundancy_threshold {
            config.redundancy_threshold = v;
        }
        if let Some(v) = p.epsilon {
            config.epsilon = v;
        }
        if let Some(v) = p.max_iterations {
            config.max_iterations = v;
        }
        if let Some(v) = p.smoothing_lambda {
            config.smoothing_lambda = v;
        }
        if let Some(v) = p.neighbor_cap {
            config.neighbor_cap = v;
        }
        if let Some(v) = p.min_sentence_length {
            config.min_sentence_length = v;
        }
        if let Some(v) = p.include_narrative {
            config.include_narrative = v;
        }
        if let Some(v) = p.word_budget {
            config.word_budget = v;
        }
        if let Some(v) = p.lead_policy {
            config.lead_policy = v;
        }

        config.validate()?;
        Ok(config)
    }
}

impl SummaryConfig {
    /// Parse, validate and resolve a JSON summary spec.
    pub fn from_spec_json(json: &str) -> Result<Self> {
        SummarySpec::from_json(json)?.resolve()
    }
}
