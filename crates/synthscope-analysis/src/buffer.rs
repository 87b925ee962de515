//! Decoded audio buffers handed to the measurement routines.

use crate::error::SignalShapeError;

/// A mono or stereo recording.
///
/// Sample rate is deliberately not stored here; every entry point takes it
/// as an explicit argument.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioBuffer {
    /// Single channel.
    Mono(Vec<f64>),
    /// Two channels of equal length.
    Stereo {
        /// Left channel samples.
        left: Vec<f64>,
        /// Right channel samples.
        right: Vec<f64>,
    },
}

impl AudioBuffer {
    /// Build a stereo buffer, rejecting channels of different length.
    pub fn stereo(left: Vec<f64>, right: Vec<f64>) -> Result<Self, SignalShapeError> {
        if left.len() != right.len() {
            return Err(SignalShapeError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        Ok(AudioBuffer::Stereo { left, right })
    }

    /// Split interleaved `L R L R ...` samples into a stereo buffer.
    ///
    /// A trailing unpaired sample is dropped.
    pub fn from_interleaved(samples: &[f64]) -> Self {
        let (left, right) = samples.chunks_exact(2).map(|frame| (frame[0], frame[1])).unzip();
        AudioBuffer::Stereo { left, right }
    }

    /// Number of channels (1 or 2).
    pub fn channels(&self) -> usize {
        match self {
            AudioBuffer::Mono(_) => 1,
            AudioBuffer::Stereo { .. } => 2,
        }
    }

    /// Number of sample frames.
    pub fn len(&self) -> usize {
        match self {
            AudioBuffer::Mono(samples) => samples.len(),
            AudioBuffer::Stereo { left, .. } => left.len(),
        }
    }

    /// True when the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The first channel (the only one for mono).
    pub fn left(&self) -> &[f64] {
        match self {
            AudioBuffer::Mono(samples) => samples,
            AudioBuffer::Stereo { left, .. } => left,
        }
    }

    /// Both channels, or `None` for a mono buffer.
    pub fn as_stereo(&self) -> Option<(&[f64], &[f64])> {
        match self {
            AudioBuffer::Mono(_) => None,
            AudioBuffer::Stereo { left, right } => Some((left, right)),
        }
    }

    /// Check the channel-length invariant (enum literals bypass [`AudioBuffer::stereo`]).
    pub fn validate(&self) -> Result<(), SignalShapeError> {
        match self {
            AudioBuffer::Stereo { left, right } if left.len() != right.len() => {
                Err(SignalShapeError::ChannelLengthMismatch {
                    left: left.len(),
                    right: right.len(),
                })
            }
            _ => Ok(()),
        }
    }
}
