//! Checks a [`SummarySpec`](super::spec::SummarySpec) before it is resolved.
//!
//! Every registered [`ValidationRule`] runs, and all findings land in one
//! [`ValidationReport`], so a bad spec reports each problem in a single pass.
//!
//! ```rust,ignore
//! use biased_lexrank::pipeline::validation::ValidationEngine;
//!
//! let report = ValidationEngine::with_defaults().validate(&spec);
//! for err in report.errors() {
//!     eprintln!("{err}");
//! }
//! ```

use serde::Serialize;

use super::error_code::ErrorCode;
use super::errors::PipelineSpecError;
use super::spec::{Preset, SummarySpec, SPEC_VERSION};
use crate::types::{BiasFormula, SimilarityFormula};

// ─── Severity ───────────────────────────────────────────────────────────────

/// Errors block resolution; warnings are logged and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// One finding about a spec, flattened with its severity when serialized
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(error: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error,
        }
    }

    pub fn warning(error: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Every diagnostic produced for one spec, in rule order
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(move |d| d.severity == severity)
            .map(|d| &d.error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.with_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// No errors; warnings may remain
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A check over one aspect of a [`SummarySpec`].
///
/// Rules hold no state; the engine may be shared between threads.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier, e.g. `"param_ranges"`
    fn name(&self) -> &str;

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Ordered set of [`ValidationRule`]s
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Version, preset, parameter range, formula coherence and unknown-field checks
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(PresetRule));
        engine.add_rule(Box::new(ParamRangesRule));
        engine.add_rule(Box::new(FormulaParamsRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    /// Names of the registered rules, in run order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule against `spec`
    pub fn validate(&self, spec: &SummarySpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Spec version must be supported ──────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        if spec.v == SPEC_VERSION {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("spec version {} is not supported", spec.v),
            )
            .with_hint(format!("Set \"v\" to {SPEC_VERSION}")),
        )]
    }
}

// ─── 2. Preset must be known ────────────────────────────────────────────────

struct PresetRule;

impl ValidationRule for PresetRule {
    fn name(&self) -> &str {
        "preset"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        match spec.preset.as_deref() {
            Some(name) if Preset::from_name(name).is_none() => {
                let known: Vec<&str> = Preset::ALL.iter().map(|p| p.as_str()).collect();
                vec![ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::UnknownPreset,
                        "/preset",
                        format!("unknown preset \"{name}\""),
                    )
                    .with_hint(format!("Use one of: {}", known.join(", "))),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 3. Parameters must lie in their domains ────────────────────────────────

struct ParamRangesRule;

impl ValidationRule for ParamRangesRule {
    fn name(&self) -> &str {
        "param_ranges"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let p = &spec.params;
        let mut out = Vec::new();

        let unit_checks: &[(&str, Option<f64>)] = &[
            ("damping", p.damping),
            ("intersentence_threshold", p.intersentence_threshold),
            ("redundancy_threshold", p.redundancy_threshold),
            ("smoothing_lambda", p.smoothing_lambda),
        ];
        for &(field, value) in unit_checks {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    out.push(ValidationDiagnostic::error(
                        PipelineSpecError::new(
                            ErrorCode::OutOfRange,
                            format!("/params/{field}"),
                            format!("{field} must be between 0 and 1, got {v}"),
                        )
                        .with_hint(format!("Remove {field} to use the default")),
                    ));
                }
            }
        }

        if let Some(eps) = p.epsilon {
            if !(eps.is_finite() && eps > 0.0) {
                out.push(ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::OutOfRange,
                        "/params/epsilon",
                        format!("epsilon must be a positive number, got {eps}"),
                    )
                    .with_hint("Typical values are 0.1 down to 1e-6"),
                ));
            }
        }

        if p.max_iterations == Some(0) {
            out.push(ValidationDiagnostic::error(
                PipelineSpecError::new(
                    ErrorCode::OutOfRange,
                    "/params/max_iterations",
                    "max_iterations must be greater than 0",
                )
                .with_hint("Remove max_iterations to use the default cap"),
            ));
        }

        out
    }
}

// ─── 4. Parameters without effect under the chosen formulas ─────────────────

struct FormulaParamsRule;

impl ValidationRule for FormulaParamsRule {
    fn name(&self) -> &str {
        "formula_params"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let (bias, similarity) = spec.effective_formulas();
        let p = &spec.params;
        let mut out = Vec::new();

        let mut ineffective = |field: &str, reason: String| {
            out.push(ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::IneffectiveParam,
                    format!("/params/{field}"),
                    format!("{field} has no effect: {reason}"),
                )
                .with_hint(format!("Remove {field} or change the formulas")),
            ));
        };

        if p.intersentence_threshold.is_some() && similarity != SimilarityFormula::Cosine {
            ineffective(
                "intersentence_threshold",
                format!("similarity formula is {}", similarity.as_str()),
            );
        }

        if p.neighbor_cap.is_some() && similarity != SimilarityFormula::NormalizedGenerative {
            ineffective(
                "neighbor_cap",
                format!("similarity formula is {}", similarity.as_str()),
            );
        }

        let uses_lambda = bias == BiasFormula::Generative
            || similarity == SimilarityFormula::NormalizedGenerative;
        if p.smoothing_lambda.is_some() && !uses_lambda {
            ineffective(
                "smoothing_lambda",
                "no generative formula is selected".to_string(),
            );
        }

        out
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`
    /// from a `HashMap` of extra fields captured by `#[serde(flatten)]`.
    fn check_unknowns(
        path: &str,
        unknowns: &std::collections::HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    PipelineSpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &SummarySpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        out.extend(Self::check_unknowns("", &spec.unknown_fields, spec.strict));
        out.extend(Self::check_unknowns(
            "/formulas",
            &spec.formulas.unknown_fields,
            spec.strict,
        ));
        out.extend(Self::check_unknowns(
            "/params",
            &spec.params.unknown_fields,
            spec.strict,
        ));
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════
