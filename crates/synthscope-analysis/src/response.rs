//! Magnitude response estimation and feature extraction.
//!
//! The response of a device under test is estimated by dividing the full
//! spectrum of its output by the spectrum of the stimulus that was played
//! into it:
//!
//! ```text
//! H(f) = R(f) / (S(f) + ε)
//! |H|dB = 20·log10(|H(f)| + ε)
//! ```
//!
//! with ε = 1e-10 keeping silent stimulus bins finite. Only bins strictly
//! between DC and Nyquist are kept.
//!
//! Features:
//!
//! - [`FrequencyResponse::find_cutoff`]: first bin falling below the
//!   passband reference by the threshold (−3 dB by default). Assumes a
//!   low-pass shape; a high-pass response reports its lowest bin.
//! - [`FrequencyResponse::find_resonance_peak`]: global maximum.

use crate::error::{Result, SignalShapeError, check_sample_rate};
use crate::fft::{Fft, bin_frequencies};
use rustfft::num_complex::Complex;

/// Regularization added to the stimulus spectrum and to |H| before the log.
pub const EPSILON: f64 = 1e-10;

/// Default cutoff threshold relative to the passband, in dB.
pub const DEFAULT_CUTOFF_DB: f64 = -3.0;

/// Magnitude response on an ascending frequency grid.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyResponse {
    frequencies: Vec<f64>,
    magnitude_db: Vec<f64>,
}

impl FrequencyResponse {
    /// Wrap precomputed data.
    ///
    /// Frequencies must be strictly increasing and match `magnitude_db` in
    /// length. An empty response is allowed; feature extraction rejects it.
    pub fn new(
        frequencies: Vec<f64>,
        magnitude_db: Vec<f64>,
    ) -> std::result::Result<Self, SignalShapeError> {
        if frequencies.len() != magnitude_db.len() {
            return Err(SignalShapeError::ResponseLengthMismatch {
                frequencies: frequencies.len(),
                magnitudes: magnitude_db.len(),
            });
        }
        if let Some(index) = frequencies.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SignalShapeError::UnorderedFrequencies { index: index + 1 });
        }
        Ok(Self {
            frequencies,
            magnitude_db,
        })
    }

    /// Estimate the response of the system that turned `stimulus` into `response`.
    ///
    /// Both buffers are truncated to the shorter length before a full-length
    /// DFT; no windowing or averaging is applied.
    pub fn estimate(stimulus: &[f64], response: &[f64], sample_rate: f64) -> Result<Self> {
        check_sample_rate(sample_rate)?;
        if stimulus.is_empty() {
            return Err(SignalShapeError::empty("stimulus").into());
        }
        if response.is_empty() {
            return Err(SignalShapeError::empty("response").into());
        }

        let n = stimulus.len().min(response.len());
        if stimulus.len() != response.len() {
            tracing::debug!(
                stimulus = stimulus.len(),
                response = response.len(),
                used = n,
                "truncating to common length"
            );
        }

        let fft = Fft::new(n);
        let stimulus_spectrum = fft.forward(&stimulus[..n]);
        let response_spectrum = fft.forward(&response[..n]);
        let nyquist = sample_rate / 2.0;

        let (frequencies, magnitude_db) = bin_frequencies(n, sample_rate)
            .into_iter()
            .zip(stimulus_spectrum.iter().zip(&response_spectrum))
            .filter(|(f, _)| *f > 0.0 && *f < nyquist)
            .map(|(f, (s, r))| {
                let h = r / (s + Complex::new(EPSILON, 0.0));
                (f, 20.0 * (h.norm() + EPSILON).log10())
            })
            .unzip();

        Ok(Self {
            frequencies,
            magnitude_db,
        })
    }

    /// Frequency grid in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Magnitude in dB per frequency.
    pub fn magnitude_db(&self) -> &[f64] {
        &self.magnitude_db
    }

    /// Number of frequency bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when no bins survived.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `(frequency, magnitude_db)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.magnitude_db.iter().copied())
    }

    /// Frequency where the response first drops `threshold_db` below the passband.
    ///
    /// The passband reference is the maximum over the lowest 10% of bins.
    /// When nothing drops below the threshold, the highest measured
    /// frequency is returned.
    pub fn find_cutoff(&self, threshold_db: f64) -> Result<f64> {
        let last = self.require_bins()?;

        let reference_bins = (self.len() / 10).max(1);
        let reference = self.magnitude_db[..reference_bins]
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let cutoff = self
            .iter()
            .find(|&(_, db)| db - reference < threshold_db)
            .map_or(last, |(f, _)| f);

        tracing::debug!(reference_db = reference, threshold_db, cutoff_hz = cutoff, "cutoff");
        Ok(cutoff)
    }

    /// Frequency and level of the global maximum (first bin on ties).
    pub fn find_resonance_peak(&self) -> Result<(f64, f64)> {
        self.require_bins()?;

        let mut peak = (self.frequencies[0], self.magnitude_db[0]);
        for (f, db) in self.iter().skip(1) {
            if db > peak.1 {
                peak = (f, db);
            }
        }
        Ok(peak)
    }

    /// Magnitude at an arbitrary frequency, linearly interpolated.
    ///
    /// Outside the grid the first or last segment is extended. Returns `None`
    /// for an empty response.
    pub fn magnitude_at(&self, freq_hz: f64) -> Option<f64> {
        match self.len() {
            0 => None,
            1 => Some(self.magnitude_db[0]),
            n => {
                let upper = self
                    .frequencies
                    .partition_point(|&f| f < freq_hz)
                    .clamp(1, n - 1);
                let (f0, f1) = (self.frequencies[upper - 1], self.frequencies[upper]);
                let (m0, m1) = (self.magnitude_db[upper - 1], self.magnitude_db[upper]);
                let t = (freq_hz - f0) / (f1 - f0);
                Some(m0 + t * (m1 - m0))
            }
        }
    }

    fn require_bins(&self) -> Result<f64> {
        self.frequencies
            .last()
            .copied()
            .ok_or_else(|| SignalShapeError::empty("frequency response").into())
    }
}
