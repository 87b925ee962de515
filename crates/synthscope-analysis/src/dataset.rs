//! Parameter-sweep datasets: `(parameter value, measured value)` pairs.

use crate::error::DatasetError;

/// Minimum number of points a curve fit accepts.
pub const MIN_POINTS: usize = 2;

/// Paired parameter values in [0, 1] and measured values.
///
/// Construction enforces equal lengths, at least [`MIN_POINTS`] rows, finite
/// values and parameter values inside the normalized range. Loaders are
/// expected to drop invalid rows before building a dataset rather than
/// coercing them.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCurveDataset {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl ParameterCurveDataset {
    /// Build a dataset from two equal-length sequences.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, DatasetError> {
        if x.len() != y.len() {
            return Err(DatasetError::LengthMismatch {
                x: x.len(),
                y: y.len(),
            });
        }
        if x.is_empty() {
            return Err(DatasetError::Empty);
        }
        if x.len() < MIN_POINTS {
            return Err(DatasetError::TooFewPoints { found: x.len() });
        }
        if let Some(index) = x
            .iter()
            .zip(&y)
            .position(|(a, b)| !a.is_finite() || !b.is_finite())
        {
            return Err(DatasetError::NonFinite { index });
        }
        if let Some((index, &value)) = x
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(DatasetError::OutOfDomain { index, value });
        }
        Ok(Self { x, y })
    }

    /// Build a dataset from `(x, y)` rows.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, DatasetError> {
        let (x, y) = pairs.iter().copied().unzip();
        Self::new(x, y)
    }

    /// Parameter values.
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Measured values.
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false for a constructed dataset; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Mean of the measured values.
    pub fn mean_y(&self) -> f64 {
        self.y.iter().sum::<f64>() / self.y.len() as f64
    }

    /// Total sum of squares of `y` about its mean.
    pub fn total_sum_of_squares(&self) -> f64 {
        let mean = self.mean_y();
        self.y.iter().map(|v| (v - mean).powi(2)).sum()
    }

    /// Smallest and largest measured value.
    pub fn y_range(&self) -> (f64, f64) {
        self.y
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}
