//! FFT wrapper for full-length spectral measurement

use rustfft::{FftPlanner, num_complex::Complex};
use std::sync::Arc;

/// FFT processor planned for a fixed size
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f64>>,
    ifft: Arc<dyn rustfft::Fft<f64>>,
    size: usize,
}

impl Fft {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let ifft = planner.plan_fft_inverse(size);

        Self { fft, ifft, size }
    }

    /// Forward transform of a real signal.
    ///
    /// Returns the full complex spectrum (`size` bins, both halves). Input
    /// shorter than the FFT size is zero-padded, longer input is truncated.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = input
            .iter()
            .take(self.size)
            .map(|&x| Complex::new(x, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.fft.process(&mut buffer);
        buffer
    }

    /// Inverse FFT on a complex buffer (in-place, normalized by `1/size`)
    pub fn inverse_complex(&self, buffer: &mut [Complex<f64>]) {
        self.ifft.process(buffer);

        let scale = 1.0 / self.size as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
    }
}

/// Frequency in Hz of every bin of an `n`-point DFT, in FFT order.
///
/// Bins `0..=(n-1)/2` are non-negative; the upper half holds the negative
/// frequencies.
pub fn bin_frequencies(n: usize, sample_rate: f64) -> Vec<f64> {
    let resolution = sample_rate / n as f64;
    let positive = n.div_ceil(2);
    (0..n)
        .map(|k| {
            if k < positive {
                k as f64 * resolution
            } else {
                (k as f64 - n as f64) * resolution
            }
        })
        .collect()
}
