//! Linear transforms from cone space: XYZ, MacLeod-Boynton and Maxwellian.

use serde::Serialize;

use super::chromaticity::chromaticity;
use super::cone::ConeFundamentals;
use super::core::{Mat3, Vec3, round_decimals};
use super::domain::Domain;
use super::error::{CmfError, CmfResult};
use super::standard::StandardObserver;

/// Relative L and M weights of the luminous efficiency function.
pub const LM_WEIGHTS: (f64, f64) = (0.689_902_72, 0.348_321_89);

/// Decimal places kept on transform coefficients.
pub const MATRIX_DECIMALS: u32 = 8;

/// Starting guess for the wavelength of minimum x̄ (nm).
const LAMBDA_X_MIN_START: f64 = 502.0;
const FIXED_POINT_LIMIT: usize = 50;
const GOLDEN_TOLERANCE: f64 = 1e-8;
/// Search interval for the S contribution to X.
const A13_BRACKET: (f64, f64) = (0.0, 1.0);

pub const XYZ_CHANNELS: [&str; 3] = ["X", "Y", "Z"];

/// LMS samples of one observer on the grids the fit works with.
struct FitSamples {
    fine: Vec<(f64, Vec3)>,
    main: Vec<Vec3>,
    main_wavelengths: Vec<f64>,
}

impl FitSamples {
    fn new(cones: &ConeFundamentals) -> Self {
        let main_domain = Domain::main();
        let main = cones
            .sample_points(&main_domain)
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        Self {
            fine: cones.sample_points(&Domain::model_fine()),
            main,
            main_wavelengths: main_domain.wavelengths().to_vec(),
        }
    }

    fn main_sum(&self) -> Vec3 {
        self.main.iter().fold(Vec3::ZERO, |acc, v| acc + *v)
    }
}

/// Result of fitting the LMS → XYZ matrix for one observer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XyzTransform {
    /// Rounded transform; `XYZ = matrix · LMS`.
    pub matrix: Mat3,
    /// Wavelength where x̄ reaches its minimum (and is zero).
    pub lambda_x_min: f64,
    /// Summed squared chromaticity distance to the reference locus.
    pub residual: f64,
}

impl XyzTransform {
    /// Fit the XYZ transform for an observer.
    ///
    /// `Y` is the luminance combination of L and M scaled to peak at 1, `Z`
    /// is S scaled to the same area as `Y`, and `X` uses all three cones.
    /// The S weight in `X` minimises the chromaticity distance to the
    /// reference locus; the L and M weights follow from `x̄ = 0` at its
    /// minimum and equal areas under `x̄` and `ȳ`.
    ///
    /// # Errors
    /// `OutOfRangeParameter` if the fit degenerates for this observer.
    pub fn fit(cones: &ConeFundamentals) -> CmfResult<Self> {
        let samples = FitSamples::new(cones);
        let (w_l, w_m) = LM_WEIGHTS;
        let v_max = samples
            .fine
            .iter()
            .map(|(_, lms)| w_l * lms.x + w_m * lms.y)
            .fold(f64::NEG_INFINITY, f64::max);
        let a21 = round_decimals(w_l / v_max, MATRIX_DECIMALS);
        let a22 = round_decimals(w_m / v_max, MATRIX_DECIMALS);

        let sums = samples.main_sum();
        let sum_v = a21 * sums.x + a22 * sums.y;
        let a33 = round_decimals(sum_v / sums.z, MATRIX_DECIMALS);

        let reference = reference_locus(cones.observer().field_size, &samples.main_wavelengths)?;
        let solver = XRowSolver {
            samples: &samples,
            sums,
            sum_v,
        };

        let objective = |a13: f64| -> f64 {
            match solver.solve(a13) {
                Ok((a11, a12, _)) => {
                    let matrix = Mat3::new([[a11, a12, a13], [a21, a22, 0.0], [0.0, 0.0, a33]]);
                    chromaticity_residual(&matrix, &samples.main, &reference)
                }
                Err(_) => f64::INFINITY,
            }
        };
        let a13 = golden_section(objective, A13_BRACKET, GOLDEN_TOLERANCE);
        let a13 = round_decimals(a13, MATRIX_DECIMALS);
        let (a11, a12, lambda_x_min) = solver.solve(a13)?;

        let matrix = Mat3::new([[a11, a12, a13], [a21, a22, 0.0], [0.0, 0.0, a33]])
            .rounded(MATRIX_DECIMALS);
        let residual = chromaticity_residual(&matrix, &samples.main, &reference);

        log::debug!(
            "xyz fit for {:?}: {:?}, x̄ min at {lambda_x_min} nm, residual {residual:e}",
            cones.observer(),
            matrix.rows
        );

        Ok(Self {
            matrix,
            lambda_x_min,
            residual,
        })
    }

    #[must_use]
    pub fn apply(&self, lms: Vec3) -> Vec3 {
        self.matrix.apply(lms)
    }

    /// Luminance weights `(κL, κM)` of the `Y` row.
    #[must_use]
    pub fn luminance_weights(&self) -> (f64, f64) {
        (self.matrix.rows[1][0], self.matrix.rows[1][1])
    }

    /// Matrix with the `X` and `Z` rows rescaled so all three channels have
    /// the area of `Y` over the sampled grid (`lms_sums` are the LMS sums
    /// over that grid).
    #[must_use]
    pub fn equal_area(&self, lms_sums: Vec3) -> Mat3 {
        let xyz = self.matrix.apply(lms_sums);
        let scale = Vec3::new(xyz.y / xyz.x, 1.0, xyz.y / xyz.z);
        Mat3::diagonal(scale).mul_mat(&self.matrix).rounded(MATRIX_DECIMALS)
    }
}

/// Solves the `X` row for a given S weight.
struct XRowSolver<'a> {
    samples: &'a FitSamples,
    sums: Vec3,
    sum_v: f64,
}

impl XRowSolver<'_> {
    /// `(a11, a12, λ_x_min)` such that `x̄(λ_x_min) = 0`, `Σx̄ = Σȳ` on the
    /// main grid, and `λ_x_min` is where the resulting `x̄` is smallest.
    fn solve(&self, a13: f64) -> CmfResult<(f64, f64, f64)> {
        let fine = &self.samples.fine;
        let mut index = fine
            .iter()
            .position(|(w, _)| (*w - LAMBDA_X_MIN_START).abs() < 1e-6)
            .unwrap_or(fine.len() / 2);

        let mut coefficients = self.row_through(a13, fine[index].1)?;
        for _ in 0..FIXED_POINT_LIMIT {
            let (a11, a12) = coefficients;
            let next = argmin(fine.iter().map(|(_, lms)| a11 * lms.x + a12 * lms.y + a13 * lms.z));
            if next == index {
                break;
            }
            index = next;
            coefficients = self.row_through(a13, fine[index].1)?;
        }
        Ok((coefficients.0, coefficients.1, fine[index].0))
    }

    fn row_through(&self, a13: f64, at: Vec3) -> CmfResult<(f64, f64)> {
        // a11·L + a12·M = -a13·S            (zero at λ_x_min)
        // a11·ΣL + a12·ΣM = ΣV - a13·ΣS     (equal area with ȳ)
        let det = at.x * self.sums.y - at.y * self.sums.x;
        if det.abs() < 1e-300 || !det.is_finite() {
            return Err(CmfError::out_of_range(
                "field_size",
                "XYZ fit is singular for this observer",
            ));
        }
        let r1 = -a13 * at.z;
        let r2 = self.sum_v - a13 * self.sums.z;
        Ok((
            (r1 * self.sums.y - at.y * r2) / det,
            (at.x * r2 - self.sums.x * r1) / det,
        ))
    }
}

fn argmin(values: impl Iterator<Item = f64>) -> usize {
    let mut best = (0, f64::INFINITY);
    for (i, v) in values.enumerate() {
        if v < best.1 {
            best = (i, v);
        }
    }
    best.0
}

/// Reference chromaticity locus: CIE 1931 at 2° and below, CIE 1964 at 10°
/// and above, linear in field size in between.
fn reference_locus(field_size: f64, wavelengths: &[f64]) -> CmfResult<Vec<(f64, f64)>> {
    let weight = ((field_size - 2.0) / 8.0).clamp(0.0, 1.0);
    let two = StandardObserver::cie1931()?;
    let ten = StandardObserver::cie1964()?;
    Ok(wavelengths
        .iter()
        .map(|&w| {
            let a = chromaticity(two.eval(w)).unwrap_or(Vec3::ZERO);
            let b = chromaticity(ten.eval(w)).unwrap_or(Vec3::ZERO);
            let c = a.lerp(b, weight);
            (c.x, c.y)
        })
        .collect())
}

fn chromaticity_residual(matrix: &Mat3, lms: &[Vec3], reference: &[(f64, f64)]) -> f64 {
    lms.iter()
        .zip(reference)
        .map(|(sample, (xr, yr))| match chromaticity(matrix.apply(*sample)) {
            Some(c) => (c.x - xr).powi(2) + (c.y - yr).powi(2),
            None => 0.0,
        })
        .sum()
}

/// Minimise a unimodal function on an interval.
fn golden_section(f: impl Fn(f64) -> f64, (mut lo, mut hi): (f64, f64), tolerance: f64) -> f64 {
    let ratio = (5f64.sqrt() - 1.0) / 2.0;
    let mut c = hi - ratio * (hi - lo);
    let mut d = lo + ratio * (hi - lo);
    let mut fc = f(c);
    let mut fd = f(d);
    while (hi - lo).abs() > tolerance {
        if fc < fd {
            hi = d;
            d = c;
            fd = fc;
            c = hi - ratio * (hi - lo);
            fc = f(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + ratio * (hi - lo);
            fd = f(d);
        }
    }
    (lo + hi) / 2.0
}

// ─────────────────────────────────────────────────────────────────────────────
// MacLeod-Boynton
// ─────────────────────────────────────────────────────────────────────────────

pub const MACLEOD_BOYNTON_CHANNELS: [&str; 3] = ["l_mb", "m_mb", "s_mb"];

/// MacLeod-Boynton chromaticity: L and M weighted by their luminance
/// contribution, S scaled so its ratio to luminance peaks at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacLeodBoynton {
    /// `(κL, κM, κS)`.
    pub kappa: Vec3,
}

impl MacLeodBoynton {
    /// # Errors
    /// `OutOfRangeParameter` if the luminance of the model vanishes.
    pub fn new(cones: &ConeFundamentals, xyz: &XyzTransform) -> CmfResult<Self> {
        let (k_l, k_m) = xyz.luminance_weights();
        let max_ratio = cones
            .sample_points(&Domain::main())
            .into_iter()
            .map(|(_, lms)| lms.z / (k_l * lms.x + k_m * lms.y))
            .fold(f64::NEG_INFINITY, f64::max);
        if !(max_ratio.is_finite() && max_ratio > 0.0) {
            return Err(CmfError::out_of_range(
                "field_size",
                "S/V ratio is not positive for this observer",
            ));
        }
        Ok(Self {
            kappa: Vec3::new(k_l, k_m, 1.0 / max_ratio),
        })
    }

    /// Diagonal part of the transform; coordinates are these weighted cone
    /// signals divided by `κL·L + κM·M`.
    #[must_use]
    pub fn matrix(&self) -> Mat3 {
        Mat3::diagonal(self.kappa)
    }

    /// `None` when luminance is zero.
    #[must_use]
    pub fn apply(&self, lms: Vec3) -> Option<Vec3> {
        let weighted = lms.scale(self.kappa);
        let luminance = weighted.x + weighted.y;
        if luminance.abs() <= f64::MIN_POSITIVE || !luminance.is_finite() {
            return None;
        }
        Some(weighted.div_scalar(luminance))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Maxwellian
// ─────────────────────────────────────────────────────────────────────────────

pub const MAXWELLIAN_CHANNELS: [&str; 3] = ["l_mw", "m_mw", "s_mw"];

/// Maxwellian chromaticity: each cone scaled to unit area, then projected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Maxwellian {
    /// `(kL, kM, kS)`, the reciprocal cone areas.
    pub k: Vec3,
}

impl Maxwellian {
    /// Coefficients from LMS sums over the sampled grid.
    ///
    /// # Errors
    /// `OutOfRangeParameter` if any cone area is zero.
    pub fn from_sums(lms_sums: Vec3) -> CmfResult<Self> {
        if [lms_sums.x, lms_sums.y, lms_sums.z]
            .iter()
            .any(|s| !(s.is_finite() && *s > 0.0))
        {
            return Err(CmfError::out_of_range(
                "domain",
                "cone areas must be positive",
            ));
        }
        Ok(Self {
            k: Vec3::new(1.0 / lms_sums.x, 1.0 / lms_sums.y, 1.0 / lms_sums.z),
        })
    }

    #[must_use]
    pub fn matrix(&self) -> Mat3 {
        Mat3::diagonal(self.k)
    }

    /// Area-normalised cone signals (before projection).
    #[must_use]
    pub fn apply(&self, lms: Vec3) -> Vec3 {
        lms.scale(self.k)
    }
}
