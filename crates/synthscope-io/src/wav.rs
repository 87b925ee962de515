//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;
use synthscope_analysis::AudioBuffer;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels in the file.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Decode every sample, interleaved, scaled to [-1, 1).
fn read_interleaved(path: &Path) -> Result<(Vec<f64>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let samples: Vec<f64> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = f64::from(1u32 << (spec.bits_per_sample - 1));
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if spec.channels == 0 || samples.is_empty() {
        return Err(Error::EmptyAudio(path.to_path_buf()));
    }

    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = samples.len() / usize::from(spec.channels),
        "decoded WAV"
    );
    Ok((samples, spec))
}

/// Read a WAV file as an analysis buffer.
///
/// Mono files stay mono. Files with more than two channels keep only the
/// first two.
///
/// # Example
/// ```ignore
/// let (buffer, spec) = read_wav_buffer("chorus_mode1.wav")?;
/// println!("{} channel(s) at {} Hz", buffer.channels(), spec.sample_rate);
/// ```
pub fn read_wav_buffer<P: AsRef<Path>>(path: P) -> Result<(AudioBuffer, WavSpec)> {
    let (samples, spec) = read_interleaved(path.as_ref())?;
    let channels = usize::from(spec.channels);

    let buffer = match channels {
        1 => AudioBuffer::Mono(samples),
        2 => AudioBuffer::from_interleaved(&samples),
        _ => {
            let (left, right) = samples
                .chunks_exact(channels)
                .map(|frame| (frame[0], frame[1]))
                .unzip();
            AudioBuffer::Stereo { left, right }
        }
    };

    Ok((buffer, spec))
}

/// Read the first channel of a WAV file.
///
/// Used for sweep recordings, where only one channel carries the signal.
pub fn read_wav_mono<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let (samples, spec) = read_interleaved(path.as_ref())?;
    let channels = usize::from(spec.channels);

    let mono = if channels == 1 {
        samples
    } else {
        samples.iter().step_by(channels).copied().collect()
    };

    Ok((mono, spec))
}

/// Write a buffer to a WAV file.
///
/// The channel count comes from the buffer; `spec.channels` is ignored.
/// 32-bit output is IEEE float, anything else is clipped integer PCM.
///
/// # Example
/// ```ignore
/// let buffer = AudioBuffer::Mono(vec![0.0; 48000]); // 1 second of silence
/// write_wav("output.wav", &buffer, WavSpec::default())?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &AudioBuffer, spec: WavSpec) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.channels() as u16,
        ..spec
    };
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    let frames: Box<dyn Iterator<Item = f64> + '_> = match buffer.as_stereo() {
        Some((left, right)) => Box::new(left.iter().zip(right).flat_map(|(&l, &r)| [l, r])),
        None => Box::new(buffer.left().iter().copied()),
    };

    if spec.bits_per_sample == 32 {
        for sample in frames {
            writer.write_sample(sample as f32)?;
        }
    } else {
        let max_val = f64::from(1u32 << (spec.bits_per_sample - 1));
        for sample in frames {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
