//! Synthscope Analysis - measurement and curve fitting for analog-modeled synth voices
//!
//! This crate recovers the behavior of a synthesizer signal path from recorded
//! audio and condenses parameter sweeps into compact formulas:
//!
//! - [`curve`] - Parametric curve families (linear, exponential, logarithmic, power)
//! - [`fit`] - Best-model selection by R² over nonlinear least-squares fits
//! - [`lm`] - Levenberg–Marquardt solver backing the fits
//! - [`response`] - Magnitude response estimation, cutoff and resonance extraction
//! - [`sweep`] - Swept synth parameters and how their fits are reported
//! - [`compare`] - A/B comparison of two responses
//! - [`modulation`] - Chorus delay, LFO rate and stereo correlation
//! - [`xcorr`] - Cross-correlation
//! - [`fft`] - FFT wrapper and bin frequencies
//! - [`buffer`] / [`dataset`] - Input containers
//!
//! Every routine is a pure function of its inputs; sample rates are always
//! passed explicitly.
//!
//! ## Curve Fitting
//!
//! ```rust
//! use synthscope_analysis::{CurveKind, CurveSelection, FitOptions, ParameterCurveDataset, fit};
//!
//! // Filter cutoff (Hz) measured at five knob positions
//! let sweep = ParameterCurveDataset::new(
//!     vec![0.0, 0.25, 0.5, 0.75, 1.0],
//!     vec![30.0, 65.0, 180.0, 1500.0, 12000.0],
//! )
//! .unwrap();
//!
//! let best = fit(&sweep, CurveSelection::Auto, &FitOptions::default()).unwrap();
//! assert!(matches!(best.kind(), CurveKind::Exponential | CurveKind::Power));
//! ```
//!
//! ## Filter Response
//!
//! ```rust,ignore
//! use synthscope_analysis::{FrequencyResponse, response::DEFAULT_CUTOFF_DB};
//!
//! let response = FrequencyResponse::estimate(&sweep_in, &sweep_out, 48000.0)?;
//! let cutoff = response.find_cutoff(DEFAULT_CUTOFF_DB)?;
//! let (peak_hz, peak_db) = response.find_resonance_peak()?;
//! ```
//!
//! ## Chorus
//!
//! ```rust,ignore
//! use synthscope_analysis::{AudioBuffer, ModulationSettings, modulation};
//!
//! let wet = AudioBuffer::stereo(left, right)?;
//! let m = modulation::analyze(&wet, Some(&dry), 48000.0, &ModulationSettings::default())?;
//! println!("{:.2} Hz, correlation {:.3}", m.modulation_rate_hz, m.stereo_correlation);
//! ```

pub mod buffer;
pub mod compare;
pub mod curve;
pub mod dataset;
pub mod error;
pub mod fft;
pub mod fit;
pub mod lm;
pub mod modulation;
pub mod response;
pub mod sweep;
pub mod xcorr;

// Re-export main types
pub use buffer::AudioBuffer;
pub use compare::{ResponseComparison, compare_responses};
pub use curve::{CurveKind, CurveModel, CurveSelection, ParseCurveError};
pub use dataset::ParameterCurveDataset;
pub use error::{AnalysisError, DatasetError, FitAttempt, FitError, Result, SignalShapeError};
pub use fft::Fft;
pub use fit::{CandidateFit, FitOptions, FittedCurve, fit, fit_candidates, select_best};
pub use modulation::{
    ChorusExpectation, ChorusMode, ModulationMeasurement, ModulationSettings,
    measure_delay, measure_modulation_rate, measure_stereo_correlation,
};
pub use response::FrequencyResponse;
pub use sweep::SweepParameter;
