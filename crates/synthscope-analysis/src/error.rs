//! Error taxonomy for measurement and fitting.
//!
//! Every numerical failure surfaces as an [`AnalysisError`] so the calling
//! workflow can decide whether to abort or continue with partial results.

use crate::curve::CurveKind;
use std::fmt;
use thiserror::Error;

/// Convenience result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Any failure raised by the analysis crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The parameter-curve dataset is empty or degenerate.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// No candidate curve model could be fitted.
    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    /// An audio buffer or response has the wrong shape for the operation.
    #[error("signal shape error: {0}")]
    SignalShape(#[from] SignalShapeError),
}

/// Empty or degenerate parameter-curve input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    /// No data points at all.
    #[error("dataset is empty")]
    Empty,

    /// Fewer points than a curve fit needs.
    #[error("dataset has {found} point(s), at least 2 are required")]
    TooFewPoints {
        /// Number of points supplied.
        found: usize,
    },

    /// The x and y sequences differ in length.
    #[error("x has {x} value(s) but y has {y}")]
    LengthMismatch {
        /// Length of the x sequence.
        x: usize,
        /// Length of the y sequence.
        y: usize,
    },

    /// A NaN or infinite value was found.
    #[error("non-finite value at row {index}")]
    NonFinite {
        /// Row index of the offending value.
        index: usize,
    },

    /// A parameter value lies outside the normalized range [0, 1].
    #[error("parameter value {value} at row {index} is outside [0, 1]")]
    OutOfDomain {
        /// Row index of the offending value.
        index: usize,
        /// The parameter value found.
        value: f64,
    },

    /// Every measured value is identical, so R² is undefined.
    #[error("all measured values are identical; R² is undefined")]
    ConstantResponse,
}

/// One failed candidate in a fit attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct FitAttempt {
    /// Model family that was tried.
    pub kind: CurveKind,
    /// Why it was rejected.
    pub reason: String,
}

/// No candidate model converged.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct FitError {
    /// Every attempted model kind with its failure reason.
    pub attempts: Vec<FitAttempt>,
}

impl FitError {
    /// Create a fit error from the failed attempts.
    pub fn new(attempts: Vec<FitAttempt>) -> Self {
        Self { attempts }
    }
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.attempts.is_empty() {
            return write!(f, "no curve model was attempted");
        }
        write!(f, "no curve model converged (")?;
        for (i, attempt) in self.attempts.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", attempt.kind, attempt.reason)?;
        }
        write!(f, ")")
    }
}

/// Mismatched or empty buffers passed to spectral or correlation routines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalShapeError {
    /// A buffer or response that must hold data is empty.
    #[error("{what} is empty")]
    Empty {
        /// Which input was empty.
        what: &'static str,
    },

    /// Stereo channels have different lengths.
    #[error("channel length mismatch: left has {left} samples, right has {right}")]
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },

    /// Frequency and magnitude arrays differ in length.
    #[error("response length mismatch: {frequencies} frequencies, {magnitudes} magnitudes")]
    ResponseLengthMismatch {
        /// Number of frequency bins.
        frequencies: usize,
        /// Number of magnitude values.
        magnitudes: usize,
    },

    /// Frequencies are not strictly increasing.
    #[error("frequencies must be strictly increasing (violated at bin {index})")]
    UnorderedFrequencies {
        /// First bin that is not above its predecessor.
        index: usize,
    },

    /// Sample rate must be positive and finite.
    #[error("invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// A frequency search band is empty or inverted.
    #[error("invalid frequency band {low} Hz to {high} Hz")]
    InvalidBand {
        /// Lower edge in Hz.
        low: f64,
        /// Upper edge in Hz.
        high: f64,
    },
}

impl SignalShapeError {
    /// Create an empty-input error.
    pub fn empty(what: &'static str) -> Self {
        SignalShapeError::Empty { what }
    }
}

/// Reject non-positive or non-finite sample rates.
pub(crate) fn check_sample_rate(sample_rate: f64) -> std::result::Result<(), SignalShapeError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(())
    } else {
        Err(SignalShapeError::InvalidSampleRate(sample_rate))
    }
}
