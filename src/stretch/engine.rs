//! Single-threaded reference stretch engine.
//!
//! The parallel dispatcher reproduces this engine's output exactly for a
//! given master seed; this module is the semantic ground truth.

use std::sync::Arc;

use crate::core::cache::PlanCache;
use crate::core::types::AudioBlock;
use crate::core::window::apply_window;
use crate::stretch::params::{DerivedParams, StretchConfig};
use crate::stretch::rephase::{frame_rng, Rephaser};

/// Peak normalization target, leaving headroom below full scale.
pub const PEAK_TARGET: f32 = 0.95;

/// Overlap-adds the first half of `block` plus the second half of the
/// previous block into `output` at `out_pos`, bounds-checked.
#[inline]
pub(crate) fn overlap_add_block(
    output: &mut [f32],
    out_pos: usize,
    block: &[f32],
    rolling_prev: &[f32],
    half_size: usize,
) {
    for j in 0..half_size {
        let Some(slot) = output.get_mut(out_pos + j) else {
            break;
        };
        *slot += block[j] + rolling_prev[half_size + j];
    }
}

/// Scales `samples` so the peak magnitude hits [`PEAK_TARGET`].
/// Silence is left untouched.
pub(crate) fn normalize_peak(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    if peak > 0.0 {
        let gain = PEAK_TARGET / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

/// Stretches a single channel. Calls `on_frame` once per processed frame.
pub(crate) fn stretch_channel(
    input: &[f32],
    params: &DerivedParams,
    rephaser: &mut Rephaser,
    window: &[f32],
    master_seed: u64,
    channel_index: usize,
    mut on_frame: impl FnMut(),
) -> Vec<f32> {
    let mut output = vec![0.0f32; params.output_len];
    if params.frame_count == 0 {
        return output;
    }

    let fft_size = params.fft_size;
    let half_size = params.half_size;
    let mut rolling_prev = vec![0.0f32; fft_size];
    let mut block = vec![0.0f32; fft_size];

    for i in 0..params.frame_count {
        let pos = params.frame_position(i);
        block.copy_from_slice(&input[pos..pos + fft_size]);
        apply_window(&mut block, window);

        let mut rng = frame_rng(master_seed, channel_index, i);
        rephaser.process(&mut block, &mut rng);

        overlap_add_block(&mut output, i * half_size, &block, &rolling_prev, half_size);
        rolling_prev.copy_from_slice(&block);
        on_frame();
    }

    normalize_peak(&mut output);
    output
}

/// Stretches every channel of `input` on the calling thread.
pub(crate) fn stretch_serial(
    input: &AudioBlock,
    config: &StretchConfig,
    params: &DerivedParams,
    cache: &mut PlanCache,
    master_seed: u64,
    progress: &mut dyn FnMut(f32),
) -> AudioBlock {
    let window = cache.window(config.shape, params.fft_size);
    let plan = cache.plan(params.fft_size);
    let mut rephaser = Rephaser::new(plan, Arc::clone(&window));

    let total_frames = (params.frame_count * input.channel_count()).max(1);
    let mut done = 0usize;
    let channels = input
        .channels
        .iter()
        .enumerate()
        .map(|(ch, data)| {
            stretch_channel(data, params, &mut rephaser, &window, master_seed, ch, || {
                done += 1;
                progress(done as f32 / total_frames as f32);
            })
        })
        .collect();

    progress(1.0);
    AudioBlock::new(channels, input.sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_add_respects_output_bounds() {
        let mut output = vec![0.0f32; 3];
        let block = vec![1.0f32; 4];
        let prev = vec![0.5f32; 4];
        overlap_add_block(&mut output, 2, &block, &prev, 2);
        // Only index 2 is writable; block[0] + prev[2] = 1.5.
        assert_eq!(output, vec![0.0, 0.0, 1.5]);
    }

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![0.1, -0.5, 0.25];
        normalize_peak(&mut samples);
        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - PEAK_TARGET).abs() < 1e-6);
        // Quiet signals are normalized up as well.
        assert!(samples[1] < -0.9);
    }

    #[test]
    fn test_normalize_leaves_silence() {
        let mut samples = vec![0.0f32; 16];
        normalize_peak(&mut samples);
        assert!(samples.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_stretch_channel_output_length() {
        let config = StretchConfig::new(4.0).with_window_secs(0.02);
        let params = DerivedParams::new(&config, 44100, 8820);
        let mut cache = PlanCache::new();
        let window = cache.window(config.shape, params.fft_size);
        let plan = cache.plan(params.fft_size);
        let mut rephaser = Rephaser::new(plan, Arc::clone(&window));

        let input: Vec<f32> = (0..8820)
            .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
            .collect();
        let mut frames = 0;
        let output = stretch_channel(&input, &params, &mut rephaser, &window, 1, 0, || {
            frames += 1
        });
        assert_eq!(output.len(), params.output_len);
        assert_eq!(frames, params.frame_count);
        let peak = output.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        assert!((peak - PEAK_TARGET).abs() < 1e-4);
    }

    #[test]
    fn test_short_input_yields_zeros() {
        let config = StretchConfig::new(4.0);
        let params = DerivedParams::new(&config, 44100, 500);
        let mut cache = PlanCache::new();
        let window = cache.window(config.shape, params.fft_size);
        let plan = cache.plan(params.fft_size);
        let mut rephaser = Rephaser::new(plan, Arc::clone(&window));

        let input = vec![0.3f32; 500];
        let output = stretch_channel(&input, &params, &mut rephaser, &window, 1, 0, || {});
        assert_eq!(output.len(), 2000);
        assert!(output.iter().all(|&s| s == 0.0));
    }
}
