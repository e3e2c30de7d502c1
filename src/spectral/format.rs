//! Output post-processing: `norm`, `log`, rounding, and the `info` bundle.
//!
//! The steps always run in that order: normalisation first, then the
//! logarithm, then rounding to the family's precision. `info` replaces the
//! table with an [`Info`] bundle.

use serde::Serialize;

use super::core::{Mat3, round_decimals, round_significant};
use super::error::{CmfError, CmfResult};
use super::purple::{PurpleTable, TangentPoint};
use super::table::SpectralTable;

/// Output-shaping flags of one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flags {
    /// log10 of every value.
    pub log: bool,
    /// Full nine-significant-figure precision.
    pub base: bool,
    /// Equal-area normalisation.
    pub norm: bool,
    /// Metadata instead of a table.
    pub info: bool,
}

impl Flags {
    pub const NAMES: [&'static str; 4] = ["log", "base", "norm", "info"];

    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        match name {
            "log" => self.log,
            "base" => self.base,
            "norm" => self.norm,
            "info" => self.info,
            _ => false,
        }
    }

    /// Names of the flags that are set, in canonical order.
    #[must_use]
    pub fn set_names(&self) -> Vec<&'static str> {
        Self::NAMES.into_iter().filter(|name| self.is_set(name)).collect()
    }
}

/// How values are rounded for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Precision {
    Significant(u32),
    Decimals(u32),
}

impl Precision {
    /// Precision requested by the `base` flag.
    pub const BASE: Self = Self::Significant(9);

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Significant(figures) => round_significant(value, figures),
            Self::Decimals(decimals) => round_decimals(value, decimals),
        }
    }
}

/// Replace every value by its base-10 logarithm.
///
/// # Errors
/// `InvalidForLog` at the first non-positive value.
pub fn log10_table(table: &SpectralTable) -> CmfResult<SpectralTable> {
    for row in &table.rows {
        if let Some(&value) = row.values.iter().find(|v| !(**v > 0.0)) {
            return Err(CmfError::InvalidForLog {
                wavelength: row.wavelength,
                value,
            });
        }
    }
    Ok(table.map_values(f64::log10))
}

#[must_use]
pub fn round_table(table: &SpectralTable, precision: Precision) -> SpectralTable {
    table.map_values(|v| precision.apply(v))
}

#[must_use]
pub fn round_purples(table: &PurpleTable, precision: Precision) -> PurpleTable {
    table.map_values(|v| precision.apply(v))
}

/// Scale factors that give every channel the area of `reference`.
///
/// Channels whose area is zero keep a factor of one.
#[must_use]
pub fn equal_area_factors(table: &SpectralTable, reference: usize) -> Vec<f64> {
    let sums = table.channel_sums();
    let target = sums.get(reference).copied().unwrap_or(0.0);
    sums.iter()
        .map(|&sum| {
            if sum.abs() > 0.0 && sum.is_finite() && target.is_finite() {
                target / sum
            } else {
                1.0
            }
        })
        .collect()
}

/// Equal-area normalisation against one reference channel. Applying it to
/// its own output changes nothing beyond floating-point noise.
#[must_use]
pub fn equal_area(table: &SpectralTable, reference: usize) -> SpectralTable {
    let factors = equal_area_factors(table, reference);
    let mut out = table.clone();
    for row in &mut out.rows {
        for (value, factor) in row.values.iter_mut().zip(&factors) {
            *value *= factor;
        }
    }
    out
}

/// Auxiliary metadata returned instead of a table when `info` is set.
///
/// Only the fields relevant to the requested family are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Info {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub norm: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub white: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tg_purple: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xyz_white: Option<[f64; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xyz_tg_purple: Option<Vec<Vec<f64>>>,
    #[serde(rename = "XYZ_tg_purple", skip_serializing_if = "Option::is_none")]
    pub tristimulus_tg_purple: Option<Vec<Vec<f64>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_mat: Option<Mat3>,
}

/// Round a triple.
#[must_use]
pub fn round3(values: [f64; 3], precision: Precision) -> [f64; 3] {
    values.map(|v| precision.apply(v))
}

/// Tangent points as `[wavelength, coordinates...]` rows, the wavelength to
/// one decimal and coordinates to `precision`.
#[must_use]
pub fn tangent_rows(tangents: &[TangentPoint; 2], precision: Precision) -> Vec<Vec<f64>> {
    tangents
        .iter()
        .map(|tangent| {
            let mut row = tangent.to_array();
            row[0] = round_decimals(row[0], 1);
            for value in row.iter_mut().skip(1) {
                *value = precision.apply(*value);
            }
            row
        })
        .collect()
}
