//! Spectral behavior: pitch stays put while time stretches.

mod common;

use common::{bin_of_freq, dominant_bin, gen_sine};
use paulstretch::{stretch, AudioBlock, StretchConfig};

#[test]
fn test_sine_keeps_spectral_centroid_at_8x() {
    let sr = 44100;
    let input = AudioBlock::from_mono(gen_sine(440.0, sr, 44100, 0.8), sr);
    let config = StretchConfig::new(8.0).with_window_secs(0.25).with_seed(21);
    let output = stretch(&input, &config).unwrap();
    assert_eq!(output.frame_count(), 352800);

    // Probe a 16384-point transform in the middle of the output.
    let fft_size = 16384;
    let start = output.frame_count() / 2 - fft_size / 2;
    let bin = dominant_bin(&output.channels[0], start, fft_size) as f64;
    let expected = bin_of_freq(440.0, sr, fft_size);
    assert!(
        (bin - expected).abs() <= 2.0,
        "dominant bin {} too far from {:.1}",
        bin,
        expected
    );
}

#[test]
fn test_unit_factor_randomizes_phase_not_pitch() {
    let sr = 44100;
    let data = gen_sine(440.0, sr, 44100, 0.8);
    let input = AudioBlock::from_mono(data.clone(), sr);
    let config = StretchConfig::new(1.0).with_window_secs(0.25).with_seed(9);
    let output = stretch(&input, &config).unwrap();

    // Same length, different waveform.
    assert_eq!(output.frame_count(), 44100);
    assert_ne!(output.channels[0], data);

    // The tone stays where it was.
    let fft_size = 16384;
    let bin = dominant_bin(&output.channels[0], 4096, fft_size) as f64;
    let expected = bin_of_freq(440.0, sr, fft_size);
    assert!(
        (bin - expected).abs() <= 2.0,
        "dominant bin {} too far from {:.1}",
        bin,
        expected
    );
}

#[test]
fn test_two_tones_both_survive() {
    let sr = 44100;
    let n = 44100;
    let low = gen_sine(330.0, sr, n, 0.5);
    let high = gen_sine(1320.0, sr, n, 0.5);
    let mixed: Vec<f32> = low.iter().zip(high.iter()).map(|(&a, &b)| a + b).collect();
    let input = AudioBlock::from_mono(mixed, sr);
    let config = StretchConfig::new(4.0).with_window_secs(0.1).with_seed(5);
    let output = stretch(&input, &config).unwrap();

    // Compare the energy near each tone against a quiet reference band.
    let fft_size = 8192;
    let start = output.frame_count() / 2;
    let probe = |freq: f32| -> f64 {
        let segment = &output.channels[0][start..start + fft_size];
        let mut re = 0.0f64;
        let mut im = 0.0f64;
        for (i, &s) in segment.iter().enumerate() {
            let angle = 2.0 * std::f64::consts::PI * freq as f64 * i as f64 / sr as f64;
            re += s as f64 * angle.cos();
            im -= s as f64 * angle.sin();
        }
        (re * re + im * im).sqrt() / fft_size as f64
    };

    let at_330 = probe(330.0);
    let at_1320 = probe(1320.0);
    let at_700 = probe(700.0);
    assert!(at_330 > 10.0 * at_700, "330 Hz buried: {} vs {}", at_330, at_700);
    assert!(at_1320 > 10.0 * at_700, "1320 Hz buried: {} vs {}", at_1320, at_700);
}
