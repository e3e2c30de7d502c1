//! Wavelength sampling grids.

use serde::Serialize;

use super::error::{CmfError, CmfResult};

/// Allowed interval for the lower domain bound (nm).
pub const MIN_BOUNDS: (f64, f64) = (390.0, 400.0);
/// Allowed interval for the upper domain bound (nm).
pub const MAX_BOUNDS: (f64, f64) = (700.0, 830.0);
/// Allowed interval for the step size (nm).
pub const STEP_BOUNDS: (f64, f64) = (0.1, 5.0);

/// Spacing of the high-resolution companion grid (nm).
pub const FINE_STEP: f64 = 0.1;
/// Spacing of the native physiological tabulation (nm).
pub const MAIN_STEP: f64 = 5.0;
/// Full extent of the physiological model (nm).
pub const MODEL_RANGE: (f64, f64) = (390.0, 830.0);

/// Grid points are snapped to this resolution so repeated additions of the
/// step never accumulate binary rounding noise.
const SNAP: f64 = 1e6;
const CLIP_TOLERANCE: f64 = 1e-6;

/// Requested wavelength domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DomainParams {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for DomainParams {
    fn default() -> Self {
        Self {
            min: 390.0,
            max: 830.0,
            step: 1.0,
        }
    }
}

impl DomainParams {
    #[must_use]
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Same bounds, sampled at the fine 0.1 nm spacing.
    #[must_use]
    pub const fn fine(self) -> Self {
        Self::new(self.min, self.max, FINE_STEP)
    }

    fn invalid(&self, reason: impl Into<String>) -> CmfError {
        CmfError::InvalidDomain {
            min: self.min,
            max: self.max,
            step: self.step,
            reason: reason.into(),
        }
    }

    /// Check bounds and ordering without materialising the grid.
    ///
    /// # Errors
    /// `InvalidDomain` if any value is non-finite, `min >= max`, `step <= 0`
    /// or a bound lies outside its allowed interval.
    pub fn validate(&self) -> CmfResult<()> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(self.invalid("bounds and step must be finite"));
        }
        if self.min >= self.max {
            return Err(self.invalid("min must be smaller than max"));
        }
        if self.step <= 0.0 {
            return Err(self.invalid("step must be positive"));
        }
        check_interval(self.min, MIN_BOUNDS).map_err(|()| {
            self.invalid(format!(
                "min must lie in [{}, {}]",
                MIN_BOUNDS.0, MIN_BOUNDS.1
            ))
        })?;
        check_interval(self.max, MAX_BOUNDS).map_err(|()| {
            self.invalid(format!(
                "max must lie in [{}, {}]",
                MAX_BOUNDS.0, MAX_BOUNDS.1
            ))
        })?;
        check_interval(self.step, STEP_BOUNDS).map_err(|()| {
            self.invalid(format!(
                "step must lie in [{}, {}]",
                STEP_BOUNDS.0, STEP_BOUNDS.1
            ))
        })?;
        Ok(())
    }

    /// Validate and materialise the grid.
    ///
    /// # Errors
    /// See [`DomainParams::validate`].
    pub fn build(&self) -> CmfResult<Domain> {
        self.validate()?;
        Ok(Domain::span(self.min, self.max, self.step))
    }
}

fn check_interval(value: f64, (lo, hi): (f64, f64)) -> Result<(), ()> {
    if value < lo - CLIP_TOLERANCE || value > hi + CLIP_TOLERANCE {
        Err(())
    } else {
        Ok(())
    }
}

/// Materialised, strictly increasing wavelength grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Domain {
    wavelengths: Vec<f64>,
}

impl Domain {
    /// Build a grid without range validation; the caller guarantees
    /// `min < max` and `step > 0`.
    pub(crate) fn span(min: f64, max: f64, step: f64) -> Self {
        let count = ((max - min) / step + CLIP_TOLERANCE).floor() as usize;
        let mut wavelengths = Vec::with_capacity(count + 2);
        for i in 0..=count {
            let value = snap(min + i as f64 * step);
            if value > max + CLIP_TOLERANCE {
                break;
            }
            wavelengths.push(value.min(max));
        }
        match wavelengths.last() {
            Some(&last) if max - last > CLIP_TOLERANCE => wavelengths.push(snap(max)),
            None => wavelengths.push(snap(min)),
            _ => {}
        }
        Self { wavelengths }
    }

    /// The 5 nm grid the physiological tables are tabulated on.
    #[must_use]
    pub fn main() -> Self {
        Self::span(MODEL_RANGE.0, MODEL_RANGE.1, MAIN_STEP)
    }

    /// The full-range 0.1 nm grid.
    #[must_use]
    pub fn model_fine() -> Self {
        Self::span(MODEL_RANGE.0, MODEL_RANGE.1, FINE_STEP)
    }

    #[must_use]
    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> f64 {
        self.wavelengths.first().copied().unwrap_or(f64::NAN)
    }

    #[must_use]
    pub fn last(&self) -> f64 {
        self.wavelengths.last().copied().unwrap_or(f64::NAN)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.wavelengths.iter().copied()
    }
}

fn snap(value: f64) -> f64 {
    (value * SNAP).round() / SNAP
}
