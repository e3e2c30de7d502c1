use serde::Serialize;

use super::core::Vec3;

/// One sampled wavelength with its function values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralRow {
    pub wavelength: f64,
    pub values: Vec<f64>,
}

impl SpectralRow {
    #[must_use]
    pub fn new(wavelength: f64, values: Vec<f64>) -> Self {
        Self { wavelength, values }
    }

    /// First three values as a vector; missing channels read as zero.
    #[must_use]
    pub fn vec3(&self) -> Vec3 {
        let at = |i: usize| self.values.get(i).copied().unwrap_or(0.0);
        Vec3::new(at(0), at(1), at(2))
    }
}

/// Rows in ascending wavelength order, all with the same arity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectralTable {
    pub channels: Vec<&'static str>,
    pub rows: Vec<SpectralRow>,
}

impl SpectralTable {
    #[must_use]
    pub fn new(channels: &[&'static str]) -> Self {
        Self {
            channels: channels.to_vec(),
            rows: Vec::new(),
        }
    }

    /// Build a three-channel table from `(wavelength, sample)` pairs.
    #[must_use]
    pub fn from_vec3(
        channels: [&'static str; 3],
        samples: impl IntoIterator<Item = (f64, Vec3)>,
    ) -> Self {
        Self {
            channels: channels.to_vec(),
            rows: samples
                .into_iter()
                .map(|(wavelength, v)| SpectralRow::new(wavelength, v.to_array().to_vec()))
                .collect(),
        }
    }

    pub fn push(&mut self, wavelength: f64, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.channels.len());
        self.rows.push(SpectralRow::new(wavelength, values));
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        self.channels.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn wavelengths(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|row| row.wavelength)
    }

    /// Values of one channel in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows
            .iter()
            .map(move |row| row.values.get(index).copied().unwrap_or(f64::NAN))
    }

    /// Per-channel sums; the discrete integral over the grid.
    #[must_use]
    pub fn channel_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.arity()];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(&row.values) {
                *sum += value;
            }
        }
        sums
    }

    /// Apply `f` to every value, keeping wavelengths and channels.
    #[must_use]
    pub fn map_values(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self {
            channels: self.channels.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| SpectralRow::new(row.wavelength, row.values.iter().map(|v| f(*v)).collect()))
                .collect(),
        }
    }

    /// Keep only the listed channels, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            channels: indices.iter().filter_map(|&i| self.channels.get(i).copied()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    SpectralRow::new(
                        row.wavelength,
                        indices.iter().filter_map(|&i| row.values.get(i).copied()).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Rows as `[wavelength, v0, v1, ...]` arrays, the flat wire layout.
    #[must_use]
    pub fn to_arrays(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                let mut out = Vec::with_capacity(row.values.len() + 1);
                out.push(row.wavelength);
                out.extend_from_slice(&row.values);
                out
            })
            .collect()
    }

    /// Row at an exact wavelength, if sampled.
    #[must_use]
    pub fn row_at(&self, wavelength: f64) -> Option<&SpectralRow> {
        self.rows
            .iter()
            .find(|row| (row.wavelength - wavelength).abs() < 1e-9)
    }
}
