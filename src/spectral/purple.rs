//! Purple-line construction.
//!
//! The purple line is the straight edge that closes the spectrum locus
//! between its short- and long-wavelength extremes. Its end points are the
//! tangent points: the ends of the convex-hull edge that bridges the largest
//! wavelength gap of the locus. Purple stimuli are sampled along that edge,
//! one per complementary wavelength of the requested grid.
//!
//! Purple rows live in their own [`PurpleTable`], ordered by the fraction
//! `t` along the line (`0` at the short-wavelength tangent, `1` at the long
//! one), so they never interleave with spectral rows.

use serde::Serialize;

use super::core::Vec3;
use super::error::{CmfError, CmfResult};
use super::table::SpectralTable;

/// Where the purple line touches the spectrum locus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TangentPoint {
    pub wavelength: f64,
    pub coordinates: Vec<f64>,
}

impl TangentPoint {
    #[must_use]
    pub fn from_row(table: &SpectralTable, index: usize) -> Option<Self> {
        table.rows.get(index).map(|row| Self {
            wavelength: row.wavelength,
            coordinates: row.values.clone(),
        })
    }

    /// `[wavelength, c0, c1, ...]`.
    #[must_use]
    pub fn to_array(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.coordinates.len() + 1);
        out.push(self.wavelength);
        out.extend_from_slice(&self.coordinates);
        out
    }

    fn plane(&self, plane: [usize; 2]) -> [f64; 2] {
        let at = |i: usize| self.coordinates.get(i).copied().unwrap_or(f64::NAN);
        [at(plane[0]), at(plane[1])]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tangent points
// ─────────────────────────────────────────────────────────────────────────────

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

/// Convex hull (monotone chain) over `(point, row index)` pairs, collinear
/// points removed, counter-clockwise.
fn convex_hull(mut points: Vec<([f64; 2], usize)>) -> Vec<([f64; 2], usize)> {
    points.sort_by(|a, b| {
        a.0[0]
            .total_cmp(&b.0[0])
            .then(a.0[1].total_cmp(&b.0[1]))
            .then(a.1.cmp(&b.1))
    });
    points.dedup_by(|a, b| a.0 == b.0);
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<([f64; 2], usize)> = Vec::with_capacity(points.len());
    for p in &points {
        while lower.len() >= 2 && cross(lower[lower.len() - 2].0, lower[lower.len() - 1].0, p.0) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<([f64; 2], usize)> = Vec::with_capacity(points.len());
    for p in points.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2].0, upper[upper.len() - 1].0, p.0) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Row indices `(short, long)` of the tangent points of a locus, looking at
/// channels `plane` of each row.
///
/// # Errors
/// `DegenerateSample` when the locus has fewer than two distinct points.
pub fn tangent_indices(locus: &SpectralTable, plane: [usize; 2]) -> CmfResult<(usize, usize)> {
    let points: Vec<([f64; 2], usize)> = locus
        .rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let a = *row.values.get(plane[0])?;
            let b = *row.values.get(plane[1])?;
            (a.is_finite() && b.is_finite()).then_some(([a, b], i))
        })
        .collect();
    let hull = convex_hull(points);
    if hull.len() < 2 {
        return Err(CmfError::DegenerateSample {
            wavelength: locus.rows.first().map_or(f64::NAN, |row| row.wavelength),
        });
    }

    let wavelength = |i: usize| locus.rows[i].wavelength;
    let mut best: Option<(f64, usize, usize)> = None;
    for k in 0..hull.len() {
        let a = hull[k].1;
        let b = hull[(k + 1) % hull.len()].1;
        let gap = (wavelength(a) - wavelength(b)).abs();
        if best.is_none_or(|(g, _, _)| gap > g) {
            best = Some((gap, a, b));
        }
    }
    let (_, a, b) = best.ok_or(CmfError::DegenerateSample {
        wavelength: wavelength(hull[0].1),
    })?;
    Ok(if wavelength(a) <= wavelength(b) { (a, b) } else { (b, a) })
}

/// Tangent points of a locus, short wavelength first.
///
/// # Errors
/// See [`tangent_indices`].
pub fn tangent_points(locus: &SpectralTable, plane: [usize; 2]) -> CmfResult<[TangentPoint; 2]> {
    let (short, long) = tangent_indices(locus, plane)?;
    let short = TangentPoint::from_row(locus, short);
    let long = TangentPoint::from_row(locus, long);
    match (short, long) {
        (Some(short), Some(long)) => {
            log::debug!(
                "purple line tangent at {} nm and {} nm",
                short.wavelength,
                long.wavelength
            );
            Ok([short, long])
        }
        _ => Err(CmfError::DegenerateSample { wavelength: f64::NAN }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Purple samples
// ─────────────────────────────────────────────────────────────────────────────

/// Position of one purple stimulus on the purple line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PurpleFraction {
    /// Spectral wavelength whose hue is complementary to the purple.
    pub complementary_wavelength: f64,
    /// `0` at the short-wavelength tangent, `1` at the long one.
    pub fraction: f64,
}

/// For every spectral row, extend the line from the row through `white`
/// beyond the white point; keep the rows whose extension hits the purple
/// line. Sorted by ascending fraction.
#[must_use]
pub fn purple_fractions(
    chromaticity: &SpectralTable,
    plane: [usize; 2],
    white: [f64; 2],
    tangents: &[TangentPoint; 2],
) -> Vec<PurpleFraction> {
    let short = tangents[0].plane(plane);
    let long = tangents[1].plane(plane);
    let edge = [long[0] - short[0], long[1] - short[1]];
    let rhs = [short[0] - white[0], short[1] - white[1]];

    let mut out: Vec<PurpleFraction> = chromaticity
        .rows
        .iter()
        .filter_map(|row| {
            let p = [*row.values.get(plane[0])?, *row.values.get(plane[1])?];
            let dir = [white[0] - p[0], white[1] - p[1]];
            // white + s·dir = short + t·edge
            let det = -dir[0] * edge[1] + edge[0] * dir[1];
            if det.abs() < 1e-15 {
                return None;
            }
            let s = (-rhs[0] * edge[1] + edge[0] * rhs[1]) / det;
            let t = (dir[0] * rhs[1] - dir[1] * rhs[0]) / det;
            (s > 0.0 && (0.0..=1.0).contains(&t)).then_some(PurpleFraction {
                complementary_wavelength: row.wavelength,
                fraction: t,
            })
        })
        .collect();
    out.sort_by(|a, b| {
        a.fraction
            .total_cmp(&b.fraction)
            .then(a.complementary_wavelength.total_cmp(&b.complementary_wavelength))
    });
    out
}

/// One purple stimulus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurpleRow {
    pub complementary_wavelength: f64,
    pub fraction: f64,
    pub values: Vec<f64>,
}

/// Purple stimuli in ascending fraction order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurpleTable {
    pub channels: Vec<&'static str>,
    pub rows: Vec<PurpleRow>,
}

impl PurpleTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows as `[complementary_wavelength, v0, v1, ...]`.
    #[must_use]
    pub fn to_arrays(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut out = Vec::with_capacity(row.values.len() + 1);
                out.push(row.complementary_wavelength);
                out.extend_from_slice(&row.values);
                out
            })
            .collect()
    }

    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            channels: self.channels.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| PurpleRow {
                    complementary_wavelength: row.complementary_wavelength,
                    fraction: row.fraction,
                    values: row.values.iter().map(|v| f(*v)).collect(),
                })
                .collect(),
        }
    }
}

/// Tristimulus values of mixtures of the two tangent stimuli with unit
/// total weight, placed at each fraction along the purple line.
#[must_use]
pub fn tristimulus_purples(
    fractions: &[PurpleFraction],
    short_xyz: Vec3,
    long_xyz: Vec3,
    channels: [&'static str; 3],
) -> PurpleTable {
    let short_sum = short_xyz.sum();
    let long_sum = long_xyz.sum();
    let rows = fractions
        .iter()
        .map(|f| {
            let t = f.fraction;
            let denominator = long_sum * (1.0 - t) + t * short_sum;
            let a = if denominator.abs() > 0.0 {
                long_sum * (1.0 - t) / denominator
            } else {
                1.0 - t
            };
            let mix = short_xyz * a + long_xyz * (1.0 - a);
            PurpleRow {
                complementary_wavelength: f.complementary_wavelength,
                fraction: t,
                values: mix.to_array().to_vec(),
            }
        })
        .collect();
    PurpleTable {
        channels: channels.to_vec(),
        rows,
    }
}

/// Chromaticity of a tristimulus purple table; rows with zero sum are
/// dropped.
#[must_use]
pub fn chromaticity_purples(tristimulus: &PurpleTable, channels: [&'static str; 3]) -> PurpleTable {
    let rows = tristimulus
        .rows
        .iter()
        .filter_map(|row| {
            let v = Vec3::new(
                row.values.first().copied()?,
                row.values.get(1).copied()?,
                row.values.get(2).copied()?,
            );
            let c = super::chromaticity::chromaticity(v)?;
            Some(PurpleRow {
                complementary_wavelength: row.complementary_wavelength,
                fraction: row.fraction,
                values: c.to_array().to_vec(),
            })
        })
        .collect();
    PurpleTable {
        channels: channels.to_vec(),
        rows,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Closure
// ─────────────────────────────────────────────────────────────────────────────

/// Spectrum locus closed by the purple line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClosedLoop {
    /// Polygon starting and ending at the short-wavelength tangent.
    pub points: Vec<[f64; 2]>,
    /// Index of the long-wavelength tangent in `points`.
    pub long_junction: usize,
}

/// Short tangent, spectral rows strictly between the tangent wavelengths,
/// long tangent, purple rows back towards the short end, short tangent.
#[must_use]
pub fn closed_loop(
    spectral: &SpectralTable,
    purples: &PurpleTable,
    tangents: &[TangentPoint; 2],
    plane: [usize; 2],
) -> ClosedLoop {
    let [short, long] = tangents;
    let mut points = vec![short.plane(plane)];
    points.extend(
        spectral
            .rows
            .iter()
            .filter(|row| row.wavelength > short.wavelength && row.wavelength < long.wavelength)
            .filter_map(|row| Some([*row.values.get(plane[0])?, *row.values.get(plane[1])?])),
    );
    let long_junction = points.len();
    points.push(long.plane(plane));
    points.extend(
        purples
            .rows
            .iter()
            .rev()
            .filter(|row| row.fraction > 0.0 && row.fraction < 1.0)
            .filter_map(|row| Some([*row.values.get(plane[0])?, *row.values.get(plane[1])?])),
    );
    points.push(short.plane(plane));
    ClosedLoop {
        points,
        long_junction,
    }
}
