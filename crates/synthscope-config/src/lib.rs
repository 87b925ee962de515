//! Measurement profiles for synthscope.
//!
//! A profile collects every tunable of the analysis pipeline in one TOML
//! file: the curve-fit budget and family, the cutoff threshold, the chorus
//! search windows and the reference values each chorus mode is compared
//! against.
//!
//! # Features
//!
//! - **Profiles**: [`MeasurementConfig`] loads and saves TOML, with a default
//!   for every field
//! - **Validation**: [`validate_profile`] reports every out-of-range value
//! - **Paths**: the per-user default profile location (`std` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use synthscope_config::MeasurementConfig;
//!
//! let mut config = MeasurementConfig::load("bench.toml").unwrap();
//! config.fit.max_evaluations = 20_000;
//! config.save("bench.toml").unwrap();
//!
//! let options = config.fit_options();
//! let settings = config.modulation_settings();
//! ```

mod error;
mod profile;

/// Platform-specific profile location.
#[cfg(feature = "std")]
pub mod paths;

/// Profile validation.
pub mod validation;

pub use error::ConfigError;
#[cfg(feature = "std")]
pub use paths::{default_profile_path, load_or_default, resolve_profile, user_config_dir};
pub use profile::{ChorusConfig, FilterConfig, FitConfig, MeasurementConfig, ModeExpectation};
pub use validation::{ValidationError, ValidationResult, validate_profile};
