//! Stable diagnostic codes for summary spec validation.
//!
//! Codes are serialized in `snake_case` and never renamed once published, so
//! callers can match on them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// `v` names a spec version this crate does not understand
    UnsupportedVersion,
    /// `preset` is not one of the known presets
    UnknownPreset,
    /// A parameter lies outside its domain
    OutOfRange,
    /// A parameter has no effect under the selected formulas
    IneffectiveParam,
    /// A field the schema does not recognize
    UnknownField,
    /// Catch-all for failures without a more specific code
    ValidationFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::UnknownPreset => "unknown_preset",
            Self::OutOfRange => "out_of_range",
            Self::IneffectiveParam => "ineffective_param",
            Self::UnknownField => "unknown_field",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
