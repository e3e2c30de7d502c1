//! CIE 1931 and CIE 1964 standard colorimetric observers.
//!
//! These are fixed tabulations, so there is no interpolation across field
//! size or age. Resampling between the 5 nm knots is monotone cubic, which
//! returns the published value at every tabulated wavelength.

use serde::Serialize;

use super::core::Vec3;
use super::data::{self, standard};
use super::domain::Domain;
use super::error::{CmfError, CmfResult};
use super::interpolate::MonotoneCubic;
use super::table::SpectralTable;
use super::transform::XYZ_CHANNELS;

/// Published extent of the tabulations (nm).
pub const STANDARD_RANGE: (f64, f64) = (380.0, 830.0);

/// The two field sizes a standard observer exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandardField {
    /// CIE 1931, 2°.
    Two,
    /// CIE 1964, 10°.
    Ten,
}

impl StandardField {
    /// # Errors
    /// `UnsupportedFieldSize` for anything but exactly 2 or 10.
    #[allow(clippy::float_cmp)]
    pub fn from_field_size(field_size: f64) -> CmfResult<Self> {
        if field_size == 2.0 {
            Ok(Self::Two)
        } else if field_size == 10.0 {
            Ok(Self::Ten)
        } else {
            Err(CmfError::UnsupportedFieldSize { field_size })
        }
    }

    #[must_use]
    pub const fn degrees(self) -> f64 {
        match self {
            Self::Two => 2.0,
            Self::Ten => 10.0,
        }
    }

    /// Chromaticity (x, y, z) of the equal-energy stimulus, taken over the
    /// complete 1 nm CIE tabulation rather than any requested sub-range.
    #[must_use]
    pub const fn equal_energy_white(self) -> [f64; 3] {
        match self {
            Self::Two => [0.33331, 0.33329, 0.33340],
            Self::Ten => [0.33330, 0.33333, 0.33337],
        }
    }
}

#[derive(Debug, Clone)]
pub struct StandardObserver {
    field: StandardField,
    channels: [MonotoneCubic; 3],
}

impl StandardObserver {
    /// # Errors
    /// Only if the embedded tabulation is malformed.
    pub fn new(field: StandardField) -> CmfResult<Self> {
        let knots = data::knots(standard::START, standard::STEP, standard::LEN);
        let (x, y, z) = match field {
            StandardField::Two => (&standard::CIE1931_X, &standard::CIE1931_Y, &standard::CIE1931_Z),
            StandardField::Ten => (&standard::CIE1964_X, &standard::CIE1964_Y, &standard::CIE1964_Z),
        };
        Ok(Self {
            field,
            channels: [
                MonotoneCubic::new(&knots, x)?,
                MonotoneCubic::new(&knots, y)?,
                MonotoneCubic::new(&knots, z)?,
            ],
        })
    }

    /// # Errors
    /// Only if the embedded tabulation is malformed.
    pub fn cie1931() -> CmfResult<Self> {
        Self::new(StandardField::Two)
    }

    /// # Errors
    /// Only if the embedded tabulation is malformed.
    pub fn cie1964() -> CmfResult<Self> {
        Self::new(StandardField::Ten)
    }

    #[must_use]
    pub fn field(&self) -> StandardField {
        self.field
    }

    /// Tristimulus values at one wavelength inside [`STANDARD_RANGE`].
    #[must_use]
    pub fn eval(&self, wavelength: f64) -> Vec3 {
        Vec3::new(
            self.channels[0].eval(wavelength),
            self.channels[1].eval(wavelength),
            self.channels[2].eval(wavelength),
        )
    }

    /// Resample onto a grid.
    ///
    /// # Errors
    /// `OutOfRangeParameter` if the grid leaves the published range.
    pub fn sample(&self, domain: &Domain) -> CmfResult<SpectralTable> {
        let (lo, hi) = STANDARD_RANGE;
        if domain.first() < lo - 1e-9 || domain.last() > hi + 1e-9 {
            return Err(CmfError::out_of_range(
                "domain",
                format!(
                    "standard observer is tabulated on [{lo}, {hi}] nm, requested [{}, {}]",
                    domain.first(),
                    domain.last()
                ),
            ));
        }
        Ok(SpectralTable::from_vec3(
            XYZ_CHANNELS,
            domain.iter().map(|w| (w, self.eval(w))),
        ))
    }
}
