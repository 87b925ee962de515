//! Property-based tests for synthscope-analysis invariants.
//!
//! Covers R² bounds, stereo correlation range, delay recovery and response
//! feature extraction using proptest for randomized inputs.

use proptest::prelude::*;
use synthscope_analysis::{
    AudioBuffer, CurveKind, CurveSelection, FitOptions, FrequencyResponse, ParameterCurveDataset,
    compare_responses, fit, measure_delay, measure_stereo_correlation,
};

fn lcg_noise(n: usize, seed: u32) -> Vec<f64> {
    let mut state = seed | 1;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            f64::from(state as i32) / f64::from(i32::MAX)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Exact linear sweeps of any slope and offset are fitted with R² ≈ 1.
    #[test]
    fn linear_sweeps_fit_exactly(
        a in prop_oneof![-500.0f64..-0.5, 0.5f64..500.0],
        b in -100.0f64..100.0,
        points in 3usize..30,
    ) {
        let x: Vec<f64> = (0..points).map(|i| i as f64 / (points - 1) as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| a * v + b).collect();
        let data = ParameterCurveDataset::new(x, y).unwrap();

        let fitted = fit(&data, CurveSelection::Only(CurveKind::Linear), &FitOptions::default()).unwrap();
        prop_assert!(fitted.r_squared() > 0.999_999, "R² = {}", fitted.r_squared());
        prop_assert!((fitted.coefficients()[0] - a).abs() <= 1e-6 * a.abs().max(1.0));
    }

    /// The selected model's R² never exceeds 1.
    #[test]
    fn r_squared_is_at_most_one(
        ys in prop::collection::vec(-1000.0f64..1000.0, 4..12),
    ) {
        let x: Vec<f64> = (0..ys.len()).map(|i| i as f64 / (ys.len() - 1) as f64).collect();
        let data = ParameterCurveDataset::new(x, ys).unwrap();
        prop_assume!(data.total_sum_of_squares() > 1e-6);

        if let Ok(fitted) = fit(&data, CurveSelection::Auto, &FitOptions::default()) {
            prop_assert!(fitted.r_squared() <= 1.0 + 1e-12, "R² = {}", fitted.r_squared());
        }
    }

    /// Stereo correlation always lies in [-1, 1].
    #[test]
    fn stereo_correlation_in_range(
        frames in prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 2..512),
    ) {
        let (left, right): (Vec<f64>, Vec<f64>) = frames.into_iter().unzip();
        let buffer = AudioBuffer::stereo(left, right).unwrap();
        let r = measure_stereo_correlation(&buffer).unwrap();
        prop_assert!((-1.0..=1.0).contains(&r), "correlation {}", r);
    }

    /// A pure delay inside the search window, limit included, is recovered exactly.
    #[test]
    fn pure_delay_recovered(delay in 0usize..=256, seed in any::<u32>()) {
        let sr = 48000.0;
        let dry = lcg_noise(1024, seed);
        let mut wet = vec![0.0; dry.len()];
        wet[delay..].copy_from_slice(&dry[..dry.len() - delay]);

        let ms = measure_delay(&dry, &wet, sr, 256).unwrap();
        let expected = delay as f64 / sr * 1000.0;
        prop_assert!((ms - expected).abs() <= 1000.0 / sr, "{} ms vs {} ms", ms, expected);
    }

    /// The cutoff is always a measured frequency and the peak is the maximum.
    #[test]
    fn features_come_from_the_grid(
        mags in prop::collection::vec(-60.0f64..12.0, 1..200),
    ) {
        let freqs: Vec<f64> = (1..=mags.len()).map(|k| k as f64 * 25.0).collect();
        let response = FrequencyResponse::new(freqs.clone(), mags.clone()).unwrap();

        let cutoff = response.find_cutoff(-3.0).unwrap();
        prop_assert!(freqs.contains(&cutoff));

        let (peak_hz, peak_db) = response.find_resonance_peak().unwrap();
        prop_assert!(freqs.contains(&peak_hz));
        prop_assert!(mags.iter().all(|&m| m <= peak_db));
    }

    /// Comparing a response with itself yields no error.
    #[test]
    fn self_comparison_is_exact(
        mags in prop::collection::vec(-60.0f64..12.0, 2..100),
    ) {
        let freqs: Vec<f64> = (1..=mags.len()).map(|k| k as f64 * 10.0).collect();
        let response = FrequencyResponse::new(freqs, mags).unwrap();
        let cmp = compare_responses(&response, &response).unwrap();
        prop_assert!(cmp.max_error_db < 1e-9);
    }
}
