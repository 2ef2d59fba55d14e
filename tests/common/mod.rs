use std::f32::consts::PI;

use rustfft::{num_complex::Complex, FftPlanner};

pub fn gen_sine(freq_hz: f32, sr: u32, n: usize, amp: f32) -> Vec<f32> {
    (0..n)
        .map(|i| amp * (2.0 * PI * freq_hz * i as f32 / sr as f32).sin())
        .collect()
}

pub fn rms_diff(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len());
    if a.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    (sum_sq / a.len() as f64).sqrt()
}

pub fn peak(signal: &[f32]) -> f32 {
    signal.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()))
}

/// Index of the strongest positive-frequency bin of an `fft_size`-point
/// transform over `signal[start..start + fft_size]`.
pub fn dominant_bin(signal: &[f32], start: usize, fft_size: usize) -> usize {
    assert!(start + fft_size <= signal.len());
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let mut buf: Vec<Complex<f32>> = signal[start..start + fft_size]
        .iter()
        .map(|&x| Complex::new(x, 0.0))
        .collect();
    fft.process(&mut buf);

    let mut best_bin = 1;
    let mut best_mag = 0.0f32;
    for (bin, value) in buf.iter().enumerate().take(fft_size / 2).skip(1) {
        let mag = value.norm();
        if mag > best_mag {
            best_mag = mag;
            best_bin = bin;
        }
    }
    best_bin
}

/// The bin a tone at `freq_hz` lands on in an `fft_size`-point transform.
pub fn bin_of_freq(freq_hz: f32, sr: u32, fft_size: usize) -> f64 {
    freq_hz as f64 * fft_size as f64 / sr as f64
}
