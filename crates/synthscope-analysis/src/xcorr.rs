//! FFT-based cross-correlation.
//!
//! The cross-correlation of `x` and `y` at lag τ is
//!
//! ```text
//! R_xy(τ) = Σ_{n} x[n] · y[n + τ]
//! ```
//!
//! so when `y[n] = x[n - D]` (y is x delayed by D samples) the peak sits at
//! τ = D.
//!
//! [`xcorr_full`] returns every lag from `-(len(x) - 1)` to `len(y) - 1`, in
//! that order; index `len(x) - 1` is lag zero. It uses the
//! cross-correlation theorem
//!
//! ```text
//! R_xy = IFFT( conj(X(f)) · Y(f) )
//! ```
//!
//! with both inputs zero-padded past `len(x) + len(y) - 1` so the circular
//! result does not wrap.
//!
//! Reference: Oppenheim & Schafer, "Discrete-Time Signal Processing"
//! (3rd ed.), §2.8.

use crate::fft::Fft;

/// Full cross-correlation via FFT, O(n log n).
///
/// Output length is `len(x) + len(y) - 1`; entry `i` holds
/// `R_xy(i - (len(x) - 1))`. Either input empty yields an empty vector.
pub fn xcorr_full(x: &[f64], y: &[f64]) -> Vec<f64> {
    if x.is_empty() || y.is_empty() {
        return Vec::new();
    }

    let full_len = x.len() + y.len() - 1;
    let fft_size = full_len.next_power_of_two();
    let fft = Fft::new(fft_size);

    let mut buf_x = fft.forward(x);
    let buf_y = fft.forward(y);
    for (cx, cy) in buf_x.iter_mut().zip(&buf_y) {
        *cx = cx.conj() * cy;
    }
    fft.inverse_complex(&mut buf_x);

    // Circular layout: lags 0.. at the front, negative lags wrapped to the end
    let negative = x.len() - 1;
    let mut result = Vec::with_capacity(full_len);
    result.extend(buf_x[fft_size - negative..].iter().map(|c| c.re));
    result.extend(buf_x[..y.len()].iter().map(|c| c.re));
    result
}

/// Index of the zero lag in the output of [`xcorr_full`] for an `x` of this length.
pub fn zero_lag_index(x_len: usize) -> usize {
    x_len.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, sr: f64, n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| (2.0 * PI * freq * i as f64 / sr).sin())
            .collect()
    }

    fn delayed(x: &[f64], delay: usize) -> Vec<f64> {
        let mut y = vec![0.0; x.len()];
        y[delay..].copy_from_slice(&x[..x.len() - delay]);
        y
    }

    fn argmax(values: &[f64]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    /// Direct time-domain sum over `-max_lag..=max_lag`; entry `i` is `R_xy(i - max_lag)`.
    fn xcorr_direct(x: &[f64], y: &[f64], max_lag: usize) -> Vec<f64> {
        let max_lag = max_lag as isize;
        (-max_lag..=max_lag)
            .map(|lag| {
                x.iter()
                    .enumerate()
                    .filter_map(|(n, &xn)| {
                        let m = n as isize + lag;
                        usize::try_from(m).ok().and_then(|m| y.get(m)).map(|&ym| xn * ym)
                    })
                    .sum::<f64>()
            })
            .collect()
    }

    #[test]
    fn test_autocorrelation_peak_at_zero() {
        let x = sine(10.0, 1000.0, 512);
        let corr = xcorr_full(&x, &x);
        assert_eq!(corr.len(), 1023);
        assert_eq!(argmax(&corr), zero_lag_index(x.len()));
    }

    #[test]
    fn test_delay_peaks_at_positive_lag() {
        let mut state = 0xDEAD_BEEF_u32;
        let x: Vec<f64> = (0..300)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                f64::from(state as i32) / f64::from(i32::MAX)
            })
            .collect();
        let y = delayed(&x, 20);

        let corr = xcorr_full(&x, &y);
        assert_eq!(argmax(&corr), zero_lag_index(x.len()) + 20);
    }

    #[test]
    fn test_full_matches_direct() {
        let x = sine(5.0, 500.0, 128);
        let y: Vec<f64> = sine(7.0, 500.0, 100).iter().map(|v| v * 0.5 + 0.1).collect();
        let max_lag = 99;

        let direct = xcorr_direct(&x, &y, max_lag);
        let full = xcorr_full(&x, &y);
        let zero = zero_lag_index(x.len());

        for (i, d) in direct.iter().enumerate() {
            let f = full[zero - max_lag + i];
            assert!((d - f).abs() < 1e-9, "lag {}: direct={d}, fft={f}", i as isize - 99);
        }
    }

    #[test]
    fn test_unequal_lengths() {
        let corr = xcorr_full(&[1.0, 2.0, 3.0], &[0.0, 1.0]);
        // lags -2..=1
        let expected = [0.0, 3.0, 2.0, 1.0];
        assert_eq!(corr.len(), expected.len());
        for (got, want) in corr.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{corr:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(xcorr_full(&[], &[1.0]).is_empty());
        assert!(xcorr_full(&[1.0], &[]).is_empty());
    }
}
