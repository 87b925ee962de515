//! File boundary for synthscope measurements.
//!
//! This crate provides:
//!
//! - **WAV input**: [`read_wav_buffer`] and [`read_wav_mono`] decode recordings
//!   into analysis buffers; [`write_wav`] writes fixtures
//! - **Sweep CSV**: [`read_dataset`] / [`parse_dataset`] load
//!   `(parameter, measured)` rows, skipping malformed ones
//! - **Response CSV**: [`write_response_csv`] / [`read_response_csv`] for
//!   `frequency_hz,magnitude_db` tables
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use synthscope_analysis::FrequencyResponse;
//! use synthscope_io::{read_wav_mono, write_response_csv};
//!
//! let (sweep_in, spec) = read_wav_mono("sweep.wav")?;
//! let (sweep_out, _) = read_wav_mono("filter_out.wav")?;
//! let response = FrequencyResponse::estimate(&sweep_in, &sweep_out, spec.sample_rate as f64)?;
//! write_response_csv("response.csv", &response)?;
//! ```

use std::path::PathBuf;

mod dataset;
mod response;
mod wav;

pub use dataset::{LoadedDataset, parse_dataset, read_dataset};
pub use response::{read_response_csv, write_response_csv};
pub use wav::{WavSpec, read_wav_buffer, read_wav_mono, write_wav};

/// Error types for file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// A WAV file holds no channels or no frames.
    #[error("WAV file has no audio: {0}")]
    EmptyAudio(PathBuf),

    /// Too few valid rows survived loading.
    #[error("{path}: {source}")]
    Dataset {
        /// File the rows came from.
        path: PathBuf,
        /// Why the rows do not form a dataset.
        #[source]
        source: synthscope_analysis::DatasetError,
    },

    /// A response table is malformed.
    #[error("{path}: {message}")]
    Response {
        /// File the table came from.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for file I/O.
pub type Result<T> = std::result::Result<T, Error>;
