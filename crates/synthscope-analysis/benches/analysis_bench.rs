//! Criterion benchmarks for synthscope-analysis hot paths
//!
//! Run with: cargo bench -p synthscope-analysis

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use synthscope_analysis::{
    AudioBuffer, CurveKind, CurveSelection, FitOptions, FrequencyResponse, ParameterCurveDataset,
    fit, measure_delay, measure_modulation_rate, xcorr::xcorr_full,
};

const SAMPLE_RATE: f64 = 48000.0;

/// Generate white noise
fn generate_noise(size: usize, seed: u32) -> Vec<f64> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            f64::from(state as i32) / f64::from(i32::MAX)
        })
        .collect()
}

// ============================================================================
// Curve fitting
// ============================================================================

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fit");

    let x: Vec<f64> = (0..=32).map(|i| f64::from(i) / 32.0).collect();
    let y: Vec<f64> = x.iter().map(|v| 20.0 * (6.5 * v).exp() + 10.0).collect();
    let data = ParameterCurveDataset::new(x, y).unwrap();

    for kind in CurveKind::ALL {
        group.bench_function(kind.name(), |b| {
            b.iter(|| {
                let result = fit(
                    black_box(&data),
                    CurveSelection::Only(kind),
                    &FitOptions::default(),
                );
                black_box(result)
            });
        });
    }
    group.bench_function("auto", |b| {
        b.iter(|| black_box(fit(black_box(&data), CurveSelection::Auto, &FitOptions::default())));
    });

    group.finish();
}

// ============================================================================
// Spectral
// ============================================================================

fn bench_response_estimate(c: &mut Criterion) {
    let mut group = c.benchmark_group("Response_Estimate");

    for size in [4096, 16384, 65536] {
        let stimulus = generate_noise(size, 0x1234_5678);
        let response: Vec<f64> = stimulus.iter().map(|v| v * 0.5).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let result = FrequencyResponse::estimate(
                    black_box(&stimulus),
                    black_box(&response),
                    SAMPLE_RATE,
                );
                black_box(result)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Modulation
// ============================================================================

fn bench_xcorr(c: &mut Criterion) {
    let mut group = c.benchmark_group("Xcorr_Full");

    for size in [1024, 8192, 48000] {
        let x = generate_noise(size, 1);
        let y = generate_noise(size, 2);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(xcorr_full(black_box(&x), black_box(&y))));
        });
    }

    group.finish();
}

fn bench_chorus(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chorus");

    let dry = generate_noise(48000, 3);
    let mut wet = vec![0.0; dry.len()];
    wet[120..].copy_from_slice(&dry[..dry.len() - 120]);
    let stereo =
        AudioBuffer::stereo(generate_noise(240_000, 4), generate_noise(240_000, 5)).unwrap();

    group.bench_function("delay_1s", |b| {
        b.iter(|| black_box(measure_delay(black_box(&dry), black_box(&wet), SAMPLE_RATE, 1000)));
    });
    group.bench_function("rate_5s", |b| {
        b.iter(|| black_box(measure_modulation_rate(black_box(&stereo), SAMPLE_RATE, (0.1, 2.0))));
    });

    group.finish();
}

criterion_group!(benches, bench_fit, bench_response_estimate, bench_xcorr, bench_chorus);
criterion_main!(benches);
