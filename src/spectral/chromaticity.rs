//! Projection of tristimulus-like tables onto chromaticity coordinates.

use serde::Serialize;

use super::core::Vec3;
use super::error::{CmfError, CmfResult};
use super::table::{SpectralRow, SpectralTable};

/// Channel labels of a projected tristimulus table.
pub const CHROMATICITY_CHANNELS: [&str; 3] = ["x", "y", "z"];

/// Channel sums at or below this magnitude count as zero.
pub const DEGENERATE_SUM: f64 = 1e-300;

/// Chromaticity of one sample, `None` when its channel sum is zero.
#[must_use]
pub fn chromaticity(v: Vec3) -> Option<Vec3> {
    let sum = v.sum();
    if !sum.is_finite() || sum.abs() <= DEGENERATE_SUM {
        return None;
    }
    Some(v.div_scalar(sum))
}

/// Projected table plus the wavelengths that had to be dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub table: SpectralTable,
    /// Wavelengths whose channel sum was zero.
    pub dropped: Vec<f64>,
}

impl Projection {
    #[must_use]
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Divide every row of a three-channel table by its channel sum.
///
/// Rows with a zero sum are left out and listed in
/// [`Projection::dropped`]; they are never filled in.
#[must_use]
pub fn project(table: &SpectralTable, channels: [&'static str; 3]) -> Projection {
    let mut out = SpectralTable::new(&channels);
    let mut dropped = Vec::new();
    for row in &table.rows {
        match chromaticity(row.vec3()) {
            Some(c) => out.rows.push(SpectralRow::new(row.wavelength, c.to_array().to_vec())),
            None => dropped.push(row.wavelength),
        }
    }
    if !dropped.is_empty() {
        log::debug!("chromaticity projection dropped {} degenerate rows", dropped.len());
    }
    Projection {
        table: out,
        dropped,
    }
}

/// Like [`project`] but a zero-sum row is an error.
///
/// # Errors
/// `DegenerateSample` at the first wavelength whose channel sum is zero.
pub fn project_strict(
    table: &SpectralTable,
    channels: [&'static str; 3],
) -> CmfResult<SpectralTable> {
    let projection = project(table, channels);
    match projection.dropped.first() {
        Some(&wavelength) => Err(CmfError::DegenerateSample { wavelength }),
        None => Ok(projection.table),
    }
}

/// The two-coordinate plane of a projected table (first two channels).
#[must_use]
pub fn plane(table: &SpectralTable) -> SpectralTable {
    table.select(&[0, 1])
}
