//! Error type shared by every stage of the colour-matching pipeline.

use super::interpolate::InterpolateError;

/// Failure of a colour-matching computation.
///
/// All variants are local validation failures. A computation is a pure
/// function of its inputs, so an identical retry fails identically.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CmfError {
    /// The requested wavelength domain is malformed or out of bounds.
    #[error("invalid wavelength domain (min {min}, max {max}, step {step}): {reason}")]
    InvalidDomain {
        min: f64,
        max: f64,
        step: f64,
        reason: String,
    },

    /// An observer parameter or an output flag is outside its supported set.
    #[error("parameter `{name}` out of range: {detail}")]
    OutOfRangeParameter { name: String, detail: String },

    /// The standard observers only exist for 2° and 10°.
    #[error("standard observer is only defined for 2° and 10° fields, got {field_size}°")]
    UnsupportedFieldSize { field_size: f64 },

    /// A chromaticity projection met a row whose channel sum is zero.
    #[error("degenerate sample at {wavelength} nm: channel sum is zero")]
    DegenerateSample { wavelength: f64 },

    /// `log` was requested on a non-positive value.
    #[error("cannot take log10 of {value} at {wavelength} nm")]
    InvalidForLog { wavelength: f64, value: f64 },

    /// A reference table could not be turned into an interpolant.
    #[error(transparent)]
    Interpolation(#[from] InterpolateError),

    /// No representation family is registered under this name.
    #[error("unknown representation `{name}`{}", suggestion_suffix(.suggestion))]
    UnknownFamily {
        name: String,
        suggestion: Option<String>,
    },
}

impl CmfError {
    pub(crate) fn out_of_range(name: &str, detail: impl Into<String>) -> Self {
        Self::OutOfRangeParameter {
            name: name.to_owned(),
            detail: detail.into(),
        }
    }

    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDomain { .. } => "InvalidDomain",
            Self::OutOfRangeParameter { .. } => "OutOfRangeParameter",
            Self::UnsupportedFieldSize { .. } => "UnsupportedFieldSize",
            Self::DegenerateSample { .. } => "DegenerateSample",
            Self::InvalidForLog { .. } => "InvalidForLog",
            Self::Interpolation(_) => "Interpolation",
            Self::UnknownFamily { .. } => "UnknownFamily",
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_deref()
        .map(|name| format!(" (did you mean `{name}`?)"))
        .unwrap_or_default()
}

pub type CmfResult<T> = Result<T, CmfError>;
