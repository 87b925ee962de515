//! Modulation-effect measurement (BBD chorus and friends).
//!
//! Three independent measurements are taken from a recording:
//!
//! - **Delay time**: peak of the cross-correlation between the dry input and
//!   the processed output, searched over non-negative lags only.
//! - **Modulation rate**: the LFO shows up in the stereo difference `L − R`
//!   because the two channels are modulated in opposite phase; the rate is
//!   the strongest spectral line of `L − R` inside a search band.
//! - **Stereo correlation**: Pearson correlation of the two channels after
//!   normalizing each by its standard deviation. 1.0 is mono, 0.0 is fully
//!   decorrelated, −1.0 is polarity-inverted.

use std::fmt;
use std::str::FromStr;

use crate::buffer::AudioBuffer;
use crate::error::{Result, SignalShapeError, check_sample_rate};
use crate::fft::{Fft, bin_frequencies};
use crate::xcorr::{xcorr_full, zero_lag_index};

/// Added to each channel's standard deviation before normalizing. A channel
/// whose deviation does not exceed it is treated as constant.
const STD_EPSILON: f64 = 1e-10;

/// Search limits for [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationSettings {
    /// Largest delay searched, in samples (inclusive).
    pub max_delay_samples: usize,
    /// Band searched for the LFO line, inclusive, in Hz.
    pub search_range_hz: (f64, f64),
}

impl Default for ModulationSettings {
    fn default() -> Self {
        Self {
            max_delay_samples: 1000,
            search_range_hz: (0.1, 2.0),
        }
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModulationMeasurement {
    /// Delay of the processed signal behind the dry reference, when one was given.
    pub delay_ms: Option<f64>,
    /// LFO rate recovered from `L − R` (0.0 for mono).
    pub modulation_rate_hz: f64,
    /// Inter-channel correlation in [−1, 1] (1.0 for mono).
    pub stereo_correlation: f64,
}

/// Delay of `wet` relative to `dry`, in milliseconds.
///
/// The full cross-correlation is searched from lag 0 through
/// `max_delay_samples` inclusive, clamped to the available lags, so a limit
/// of 0 searches lag 0 only. The first maximum wins.
pub fn measure_delay(
    dry: &[f64],
    wet: &[f64],
    sample_rate: f64,
    max_delay_samples: usize,
) -> Result<f64> {
    check_sample_rate(sample_rate)?;
    if dry.is_empty() {
        return Err(SignalShapeError::empty("dry signal").into());
    }
    if wet.is_empty() {
        return Err(SignalShapeError::empty("wet signal").into());
    }

    let correlation = xcorr_full(dry, wet);
    let center = zero_lag_index(dry.len());
    let end = center
        .saturating_add(max_delay_samples)
        .saturating_add(1)
        .min(correlation.len());

    let offset = argmax(&correlation[center..end]);
    let delay_ms = offset as f64 / sample_rate * 1000.0;
    tracing::debug!(delay_samples = offset, delay_ms, "measured delay");
    Ok(delay_ms)
}

/// LFO rate from the strongest line of `L − R` within `search_range_hz`.
///
/// Mono input cannot carry the stereo difference; it logs a warning and
/// returns 0.0. A recording too short to resolve any bin inside the band
/// does the same.
pub fn measure_modulation_rate(
    buffer: &AudioBuffer,
    sample_rate: f64,
    search_range_hz: (f64, f64),
) -> Result<f64> {
    check_sample_rate(sample_rate)?;
    let (low, high) = search_range_hz;
    if !(low.is_finite() && high.is_finite() && low >= 0.0 && low <= high) {
        return Err(SignalShapeError::InvalidBand { low, high }.into());
    }
    buffer.validate()?;

    let Some((left, right)) = buffer.as_stereo() else {
        tracing::warn!("mono signal provided, cannot measure modulation rate");
        return Ok(0.0);
    };
    if left.is_empty() {
        return Err(SignalShapeError::empty("stereo buffer").into());
    }

    let difference: Vec<f64> = left.iter().zip(right).map(|(l, r)| l - r).collect();
    let spectrum = Fft::new(difference.len()).forward(&difference);

    let mut peak: Option<(f64, f64)> = None;
    for (freq, bin) in bin_frequencies(difference.len(), sample_rate)
        .into_iter()
        .zip(&spectrum)
    {
        if freq < low || freq > high {
            continue;
        }
        let magnitude = bin.norm();
        if peak.is_none_or(|(_, best)| magnitude > best) {
            peak = Some((freq, magnitude));
        }
    }

    match peak {
        Some((rate, magnitude)) => {
            tracing::debug!(rate_hz = rate, magnitude, "measured modulation rate");
            Ok(rate)
        }
        None => {
            tracing::warn!(
                low,
                high,
                resolution_hz = sample_rate / difference.len() as f64,
                "recording too short to resolve the modulation band"
            );
            Ok(0.0)
        }
    }
}

/// Correlation between the left and right channels, in [−1, 1].
///
/// Mono input is fully correlated (exactly 1.0). A constant channel has no
/// defined correlation and yields 0.0.
pub fn measure_stereo_correlation(buffer: &AudioBuffer) -> Result<f64> {
    buffer.validate()?;
    let Some((left, right)) = buffer.as_stereo() else {
        return Ok(1.0);
    };
    if left.is_empty() {
        return Err(SignalShapeError::empty("stereo buffer").into());
    }

    let (Some(left), Some(right)) = (normalized(left), normalized(right)) else {
        tracing::debug!("constant channel, correlation undefined");
        return Ok(0.0);
    };

    let n = left.len() as f64;
    let mean_l = left.iter().sum::<f64>() / n;
    let mean_r = right.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_l = 0.0;
    let mut var_r = 0.0;
    for (l, r) in left.iter().zip(&right) {
        let dl = l - mean_l;
        let dr = r - mean_r;
        cov += dl * dr;
        var_l += dl * dl;
        var_r += dr * dr;
    }

    Ok((cov / (var_l.sqrt() * var_r.sqrt())).clamp(-1.0, 1.0))
}

/// Run all modulation measurements on one recording.
///
/// The delay is measured only when a dry reference is supplied, against the
/// first channel of `buffer`.
pub fn analyze(
    buffer: &AudioBuffer,
    dry: Option<&[f64]>,
    sample_rate: f64,
    settings: &ModulationSettings,
) -> Result<ModulationMeasurement> {
    let stereo_correlation = measure_stereo_correlation(buffer)?;
    let modulation_rate_hz = if buffer.channels() > 1 {
        measure_modulation_rate(buffer, sample_rate, settings.search_range_hz)?
    } else {
        0.0
    };
    let delay_ms = dry
        .map(|dry| measure_delay(dry, buffer.left(), sample_rate, settings.max_delay_samples))
        .transpose()?;

    Ok(ModulationMeasurement {
        delay_ms,
        modulation_rate_hz,
        stereo_correlation,
    })
}

/// Published characteristics of a chorus mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChorusExpectation {
    /// Center delay in ms.
    pub delay_ms: f64,
    /// Modulation depth in ms.
    pub depth_ms: f64,
    /// LFO rate in Hz.
    pub rate_hz: f64,
}

impl ChorusExpectation {
    /// Mode I: shallow, faster.
    pub const MODE_I: Self = Self {
        delay_ms: 2.5,
        depth_ms: 0.5,
        rate_hz: 0.65,
    };

    /// Mode II: deeper, slower.
    pub const MODE_II: Self = Self {
        delay_ms: 4.0,
        depth_ms: 0.8,
        rate_hz: 0.50,
    };
}

/// Chorus switch positions of the reference instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChorusMode {
    /// Mode I alone.
    One,
    /// Mode II alone.
    Two,
    /// Both buttons held: Mode I and Mode II together.
    Both,
}

impl ChorusMode {
    /// Every mode, in switch order.
    pub const ALL: [ChorusMode; 3] = [ChorusMode::One, ChorusMode::Two, ChorusMode::Both];

    /// Reference characteristics of this mode. The combined mode has no
    /// published values.
    pub fn expectation(self) -> Option<ChorusExpectation> {
        match self {
            ChorusMode::One => Some(ChorusExpectation::MODE_I),
            ChorusMode::Two => Some(ChorusExpectation::MODE_II),
            ChorusMode::Both => None,
        }
    }
}

impl fmt::Display for ChorusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChorusMode::One => f.write_str("Mode I"),
            ChorusMode::Two => f.write_str("Mode II"),
            ChorusMode::Both => f.write_str("Mode I+II"),
        }
    }
}

/// Unrecognized chorus mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown chorus mode '{0}' (expected 1, 2 or both)")]
pub struct ParseChorusModeError(pub String);

impl FromStr for ChorusMode {
    type Err = ParseChorusModeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "i" | "one" => Ok(ChorusMode::One),
            "2" | "ii" | "two" => Ok(ChorusMode::Two),
            "both" | "1+2" | "i+ii" => Ok(ChorusMode::Both),
            _ => Err(ParseChorusModeError(s.to_string())),
        }
    }
}

/// Divide by the population standard deviation (plus ε); `None` for a constant channel.
fn normalized(channel: &[f64]) -> Option<Vec<f64>> {
    let n = channel.len() as f64;
    let mean = channel.iter().sum::<f64>() / n;
    let std = (channel.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std <= STD_EPSILON {
        return None;
    }
    let scale = std + STD_EPSILON;
    Some(channel.iter().map(|v| v / scale).collect())
}

/// Index of the first maximum (0 for an empty slice).
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
