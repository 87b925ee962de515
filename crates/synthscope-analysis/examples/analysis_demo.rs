//! Analysis demo: sweep fitting, filter response and chorus measurement.
//!
//! Run with: cargo run -p synthscope-analysis --example analysis_demo

use synthscope_analysis::{
    AudioBuffer, CurveSelection, FitOptions, FrequencyResponse, ModulationSettings,
    ParameterCurveDataset, fit_candidates, modulation,
};
use std::f64::consts::PI;

fn noise(n: usize) -> Vec<f64> {
    let mut state = 0x1234_5678u32;
    (0..n)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            f64::from(state as i32) / f64::from(i32::MAX)
        })
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sample_rate = 48000.0;

    // --- Fit a cutoff sweep ---
    println!("=== Cutoff Sweep Fit ===\n");

    let sweep = ParameterCurveDataset::new(
        vec![0.0, 0.25, 0.5, 0.75, 1.0],
        vec![30.0, 65.0, 180.0, 1500.0, 12000.0],
    )?;

    println!("{:>12} {:>10}  {}", "Model", "R²", "Formula");
    println!("{:->12} {:->10}  {:->30}", "", "", "");
    for candidate in fit_candidates(&sweep, CurveSelection::Auto, &FitOptions::default())? {
        match candidate.outcome {
            Ok(fitted) => println!(
                "{:>12} {:>10.6}  {}",
                candidate.kind,
                fitted.r_squared(),
                fitted.model()
            ),
            Err(reason) => println!("{:>12} {:>10}  {}", candidate.kind, "-", reason),
        }
    }

    // --- One-pole low-pass response ---
    println!("\n=== One-Pole Low-Pass Response ===\n");

    let input = noise(16384);
    let coeff = (-2.0 * PI * 1000.0 / sample_rate).exp();
    let mut state = 0.0;
    let output: Vec<f64> = input
        .iter()
        .map(|&x| {
            state = (1.0 - coeff) * x + coeff * state;
            state
        })
        .collect();

    let response = FrequencyResponse::estimate(&input, &output, sample_rate)?;
    let (peak_hz, peak_db) = response.find_resonance_peak()?;
    println!("Bins:      {}", response.len());
    println!("Cutoff:    {:.1} Hz", response.find_cutoff(-3.0)?);
    println!("Peak:      {:.1} Hz at {:.2} dB", peak_hz, peak_db);

    // --- Chorus-like stereo signal ---
    println!("\n=== Chorus Measurement ===\n");

    let n = 480_000; // 10 s, 0.1 Hz resolution
    let dry = noise(n);
    let delay = 120; // 2.5 ms
    let lfo = |i: usize| 0.2 * (2.0 * PI * 0.65 * i as f64 / sample_rate).sin();
    let wet = |i: usize| if i >= delay { dry[i - delay] } else { 0.0 };
    let left: Vec<f64> = (0..n).map(|i| wet(i) + lfo(i)).collect();
    let right: Vec<f64> = (0..n).map(|i| wet(i) - lfo(i)).collect();
    let buffer = AudioBuffer::stereo(left, right)?;

    let m = modulation::analyze(&buffer, Some(&dry), sample_rate, &ModulationSettings::default())?;
    if let Some(delay_ms) = m.delay_ms {
        println!("Delay:       {:.3} ms", delay_ms);
    }
    println!("Rate:        {:.2} Hz", m.modulation_rate_hz);
    println!("Correlation: {:.3}", m.stereo_correlation);

    Ok(())
}
