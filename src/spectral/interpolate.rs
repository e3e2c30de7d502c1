//! One-dimensional interpolants over tabulated spectra.
//!
//! Two schemes are used. Physiological data is smooth in log space and is
//! interpolated with a natural cubic spline. Tabulated standard observers
//! are linear-space data with long zero tails, so they use a monotone
//! piecewise-cubic Hermite interpolant that never overshoots and reproduces
//! every knot exactly.

/// Error building an interpolant from knot data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolateError {
    #[error("need at least {required} knots, got {actual}")]
    TooFewKnots { required: usize, actual: usize },

    #[error("knot abscissae must be strictly increasing (index {index})")]
    NotIncreasing { index: usize },

    #[error("knot and value counts differ ({knots} vs {values})")]
    LengthMismatch { knots: usize, values: usize },
}

fn check_knots(x: &[f64], y: &[f64], required: usize) -> Result<(), InterpolateError> {
    if x.len() != y.len() {
        return Err(InterpolateError::LengthMismatch {
            knots: x.len(),
            values: y.len(),
        });
    }
    if x.len() < required {
        return Err(InterpolateError::TooFewKnots {
            required,
            actual: x.len(),
        });
    }
    if let Some(index) = x.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolateError::NotIncreasing { index: index + 1 });
    }
    Ok(())
}

/// Index `i` of the interval `[x[i], x[i+1]]` that contains `t`, clamped to
/// the first/last interval outside the knot range.
fn interval(x: &[f64], t: f64) -> usize {
    let upper = x.partition_point(|&knot| knot <= t);
    upper.saturating_sub(1).min(x.len() - 2)
}

/// Exact knot hit, tolerant to snapping noise on the query grid.
fn knot_index(x: &[f64], t: f64) -> Option<usize> {
    let i = interval(x, t);
    if (x[i] - t).abs() < 1e-9 {
        Some(i)
    } else if (x[i + 1] - t).abs() < 1e-9 {
        Some(i + 1)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Natural cubic spline
// ─────────────────────────────────────────────────────────────────────────────

/// C² cubic spline with zero second derivative at both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    second: Vec<f64>,
}

impl CubicSpline {
    /// # Errors
    /// Fails on fewer than three knots, mismatched lengths or non-increasing
    /// abscissae.
    pub fn natural(x: &[f64], y: &[f64]) -> Result<Self, InterpolateError> {
        check_knots(x, y, 3)?;
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        // Thomas algorithm on the interior second derivatives.
        let m = n - 2;
        let mut diag = vec![0.0; m];
        let mut upper = vec![0.0; m];
        let mut rhs = vec![0.0; m];
        for i in 1..n - 1 {
            diag[i - 1] = 2.0 * (h[i - 1] + h[i]);
            upper[i - 1] = h[i];
            rhs[i - 1] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        }
        for i in 1..m {
            let w = h[i] / diag[i - 1];
            diag[i] -= w * upper[i - 1];
            rhs[i] -= w * rhs[i - 1];
        }
        let mut interior = vec![0.0; m];
        interior[m - 1] = rhs[m - 1] / diag[m - 1];
        for i in (0..m - 1).rev() {
            interior[i] = (rhs[i] - upper[i] * interior[i + 1]) / diag[i];
        }

        let mut second = Vec::with_capacity(n);
        second.push(0.0);
        second.extend(interior);
        second.push(0.0);

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            second,
        })
    }

    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        let i = interval(&self.x, t);
        let h = self.x[i + 1] - self.x[i];
        let a = (self.x[i + 1] - t) / h;
        let b = (t - self.x[i]) / h;
        a * self.y[i]
            + b * self.y[i + 1]
            + ((a * a * a - a) * self.second[i] + (b * b * b - b) * self.second[i + 1]) * h * h
                / 6.0
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Monotone cubic (PCHIP)
// ─────────────────────────────────────────────────────────────────────────────

/// Fritsch–Carlson monotone cubic Hermite interpolant.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubic {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
}

impl MonotoneCubic {
    /// # Errors
    /// Fails on fewer than two knots, mismatched lengths or non-increasing
    /// abscissae.
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, InterpolateError> {
        check_knots(x, y, 2)?;
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        let mut slopes = vec![0.0; n];
        if n == 2 {
            slopes[0] = delta[0];
            slopes[1] = delta[0];
        } else {
            for i in 1..n - 1 {
                if delta[i - 1] * delta[i] <= 0.0 {
                    slopes[i] = 0.0;
                } else {
                    let w1 = 2.0 * h[i] + h[i - 1];
                    let w2 = h[i] + 2.0 * h[i - 1];
                    slopes[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
                }
            }
            slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
            slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            slopes,
        })
    }

    /// Evaluate; knots return their tabulated value bit-for-bit.
    #[must_use]
    pub fn eval(&self, t: f64) -> f64 {
        if let Some(k) = knot_index(&self.x, t) {
            return self.y[k];
        }
        let i = interval(&self.x, t);
        let h = self.x[i + 1] - self.x[i];
        let s = (t - self.x[i]) / h;
        let s2 = s * s;
        let s3 = s2 * s;
        let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
        let h10 = s3 - 2.0 * s2 + s;
        let h01 = -2.0 * s3 + 3.0 * s2;
        let h11 = s3 - s2;
        h00 * self.y[i] + h10 * h * self.slopes[i] + h01 * self.y[i + 1] + h11 * h * self.slopes[i + 1]
    }

    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }
}

/// One-sided three-point end slope, limited to preserve monotonicity.
fn end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    if d0 == 0.0 {
        return 0.0;
    }
    let slope = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if slope.signum() != d0.signum() {
        0.0
    } else if d0.signum() != d1.signum() && slope.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        slope
    }
}
