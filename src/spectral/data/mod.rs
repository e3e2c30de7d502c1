//! Tabulated reference data.

pub(crate) mod physiology;
pub(crate) mod standard;

/// Wavelengths of a regular tabulation.
pub(crate) fn knots(start: f64, step: f64, len: usize) -> Vec<f64> {
    (0..len).map(|i| start + step * i as f64).collect()
}
