//! Age and field-size dependent cone fundamentals.
//!
//! The model corrects a baseline photopigment absorbance for three optical
//! densities: photopigment peak density and macular pigment (both shrink as
//! the field grows) and the crystalline lens (grows with age). The
//! corrections add in log space; the result is splined in log space,
//! peak-normalised, and exponentiated back to linear energy sensitivity.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use super::core::Vec3;
use super::data::{self, physiology};
use super::domain::{Domain, MODEL_RANGE};
use super::error::{CmfError, CmfResult};
use super::interpolate::CubicSpline;
use super::table::SpectralTable;

/// Supported field sizes (degrees of visual angle).
pub const FIELD_SIZE_BOUNDS: (f64, f64) = (1.0, 20.0);
/// Supported observer ages (years).
pub const AGE_BOUNDS: (f64, f64) = (20.0, 80.0);

/// Channel labels of an LMS table.
pub const LMS_CHANNELS: [&str; 3] = ["L", "M", "S"];

/// Observer description shared by every physiological family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObserverParams {
    pub field_size: f64,
    pub age: f64,
}

impl Default for ObserverParams {
    fn default() -> Self {
        Self {
            field_size: 2.0,
            age: 32.0,
        }
    }
}

impl ObserverParams {
    /// # Errors
    /// `OutOfRangeParameter` when field size or age is outside its interval.
    pub fn new(field_size: f64, age: f64) -> CmfResult<Self> {
        let params = Self { field_size, age };
        params.validate()?;
        Ok(params)
    }

    /// # Errors
    /// `OutOfRangeParameter` when field size or age is outside its interval.
    pub fn validate(&self) -> CmfResult<()> {
        check_range("field_size", self.field_size, FIELD_SIZE_BOUNDS)?;
        check_range("age", self.age, AGE_BOUNDS)
    }
}

fn check_range(name: &str, value: f64, (lo, hi): (f64, f64)) -> CmfResult<()> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(CmfError::out_of_range(
            name,
            format!("{value} is outside [{lo}, {hi}]"),
        ))
    }
}

/// Optical densities derived from the observer parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OpticalDensities {
    /// Peak photopigment density of the L and M cones.
    pub photopigment_lm: f64,
    /// Peak photopigment density of the S cones.
    pub photopigment_s: f64,
    /// Peak macular pigment density.
    pub macular_peak: f64,
    /// Multiplier on the age-dependent lens component.
    pub lens_age_factor: f64,
}

impl OpticalDensities {
    #[must_use]
    pub fn for_observer(observer: &ObserverParams) -> Self {
        let f = observer.field_size;
        let age = observer.age;
        let field_decay = (-f / 1.333).exp();
        let lens_age_factor = if age <= 60.0 {
            1.0 + 0.02 * (age - 32.0)
        } else {
            1.56 + 0.0667 * (age - 60.0)
        };
        Self {
            photopigment_lm: 0.38 + 0.54 * field_decay,
            photopigment_s: 0.30 + 0.45 * field_decay,
            macular_peak: 0.485 * (-f / 6.132).exp(),
            lens_age_factor,
        }
    }

    fn lens(&self, index: usize) -> f64 {
        physiology::LENS_DENSITY_AGED[index] * self.lens_age_factor
            + physiology::LENS_DENSITY_STABLE[index]
    }

    fn macular(&self, index: usize) -> f64 {
        physiology::MACULAR_DENSITY[index] * self.macular_peak / physiology::MACULAR_TEMPLATE_PEAK
    }
}

/// log10 energy sensitivity at the tabulated knots, before normalisation.
fn log_sensitivity_knots(densities: &OpticalDensities) -> [Vec<f64>; 3] {
    let absorbance = [
        (&physiology::LOG_ABSORBANCE_L, densities.photopigment_lm),
        (&physiology::LOG_ABSORBANCE_M, densities.photopigment_lm),
        (&physiology::LOG_ABSORBANCE_S, densities.photopigment_s),
    ];
    absorbance.map(|(table, peak_density)| {
        (0..physiology::LEN)
            .map(|i| {
                let wavelength = physiology::START + physiology::STEP * i as f64;
                // 1 - 10^(-D·A), kept accurate where the absorbance is tiny.
                let absorptance =
                    -(-peak_density * 10f64.powf(table[i]) * std::f64::consts::LN_10).exp_m1();
                absorptance.log10() - densities.macular(i) - densities.lens(i) + wavelength.log10()
            })
            .collect()
    })
}

/// Continuous LMS cone fundamentals for one observer.
#[derive(Debug, Clone)]
pub struct ConeFundamentals {
    observer: ObserverParams,
    densities: OpticalDensities,
    log_splines: [CubicSpline; 3],
    log_peaks: [f64; 3],
}

impl ConeFundamentals {
    /// Build the model for a validated observer.
    ///
    /// # Errors
    /// `OutOfRangeParameter` for an unsupported observer.
    pub fn new(observer: ObserverParams) -> CmfResult<Self> {
        observer.validate()?;
        let densities = OpticalDensities::for_observer(&observer);
        let knots = data::knots(physiology::START, physiology::STEP, physiology::LEN);
        let [l, m, s] = log_sensitivity_knots(&densities);
        let log_splines = [
            CubicSpline::natural(&knots, &l)?,
            CubicSpline::natural(&knots, &m)?,
            CubicSpline::natural(&knots, &s)?,
        ];

        let fine = Domain::model_fine();
        let mut log_peaks = [f64::NEG_INFINITY; 3];
        for (peak, spline) in log_peaks.iter_mut().zip(&log_splines) {
            *peak = fine.iter().map(|w| spline.eval(w)).fold(f64::NEG_INFINITY, f64::max);
        }

        log::debug!(
            "cone model for {:?}: densities {:?}, log peaks {:?}",
            observer,
            densities,
            log_peaks
        );

        Ok(Self {
            observer,
            densities,
            log_splines,
            log_peaks,
        })
    }

    #[must_use]
    pub fn observer(&self) -> ObserverParams {
        self.observer
    }

    #[must_use]
    pub fn densities(&self) -> OpticalDensities {
        self.densities
    }

    /// Peak-normalised log10 sensitivities at one wavelength.
    #[must_use]
    pub fn log_eval(&self, wavelength: f64) -> Vec3 {
        let w = wavelength.clamp(MODEL_RANGE.0, MODEL_RANGE.1);
        Vec3::new(
            self.log_splines[0].eval(w) - self.log_peaks[0],
            self.log_splines[1].eval(w) - self.log_peaks[1],
            self.log_splines[2].eval(w) - self.log_peaks[2],
        )
    }

    /// Linear LMS sensitivities at one wavelength.
    #[must_use]
    pub fn eval(&self, wavelength: f64) -> Vec3 {
        let log = self.log_eval(wavelength);
        Vec3::new(10f64.powf(log.x), 10f64.powf(log.y), 10f64.powf(log.z))
    }

    /// Evaluate every grid wavelength, preserving grid order.
    #[must_use]
    pub fn sample_points(&self, domain: &Domain) -> Vec<(f64, Vec3)> {
        #[cfg(feature = "parallel")]
        {
            domain
                .wavelengths()
                .par_iter()
                .map(|&w| (w, self.eval(w)))
                .collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            domain.iter().map(|w| (w, self.eval(w))).collect()
        }
    }

    /// LMS table over a grid.
    #[must_use]
    pub fn sample(&self, domain: &Domain) -> SpectralTable {
        SpectralTable::from_vec3(LMS_CHANNELS, self.sample_points(domain))
    }
}
