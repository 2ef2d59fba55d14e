//! User-facing stretch configuration and the per-call derived parameters.

use crate::core::window::WindowShape;
use crate::error::StretchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default analysis window length in seconds.
pub const DEFAULT_WINDOW_SECS: f64 = 0.25;

/// Parameters for a stretch operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StretchConfig {
    /// Stretch factor (>1.0 = longer; values below 1.0 are allowed but uncommon).
    pub stretch_factor: f64,
    /// Analysis window length in seconds.
    pub window_secs: f64,
    /// Worker thread count; `None` uses the available hardware parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Master seed for the phase randomizer; `None` draws fresh entropy per call.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Analysis/synthesis window shape.
    #[serde(default = "default_shape")]
    pub shape: WindowShape,
}

fn default_shape() -> WindowShape {
    WindowShape::Hann
}

impl StretchConfig {
    /// Creates a config with the given stretch factor and default window.
    pub fn new(stretch_factor: f64) -> Self {
        Self {
            stretch_factor,
            window_secs: DEFAULT_WINDOW_SECS,
            workers: None,
            seed: None,
            shape: WindowShape::Hann,
        }
    }

    /// Sets the analysis window length in seconds.
    pub fn with_window_secs(mut self, window_secs: f64) -> Self {
        self.window_secs = window_secs;
        self
    }

    /// Sets the worker thread count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the master seed, making the phase sequence reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the window shape.
    pub fn with_shape(mut self, shape: WindowShape) -> Self {
        self.shape = shape;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), StretchError> {
        if !self.stretch_factor.is_finite() || self.stretch_factor <= 0.0 {
            return Err(StretchError::InvalidConfig(format!(
                "stretch factor must be finite and positive, got {}",
                self.stretch_factor
            )));
        }
        if !self.window_secs.is_finite() || self.window_secs <= 0.0 {
            return Err(StretchError::InvalidConfig(format!(
                "window length must be finite and positive, got {}",
                self.window_secs
            )));
        }
        if self.workers == Some(0) {
            return Err(StretchError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Writes a stretch profile as JSON.
pub fn write_profile_json(path: &Path, config: &StretchConfig) -> Result<(), StretchError> {
    let json = serde_json::to_string_pretty(config).map_err(|e| {
        StretchError::InvalidFormat(format!("failed to serialize stretch profile: {}", e))
    })?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a stretch profile from JSON.
pub fn read_profile_json(path: &Path) -> Result<StretchConfig, StretchError> {
    let data = std::fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| {
        StretchError::InvalidFormat(format!(
            "failed to parse stretch profile from {}: {}",
            path.display(),
            e
        ))
    })
}

/// Window and hop arithmetic derived once per stretch call.
#[derive(Debug, Clone, Copy)]
pub struct DerivedParams {
    /// Window length in samples before power-of-two rounding.
    pub win_samples: usize,
    /// FFT size: smallest power of two >= `win_samples`.
    pub fft_size: usize,
    /// Half the FFT size; the output placement hop.
    pub half_size: usize,
    /// Analysis hop in input samples; fractional, floored at indexing.
    pub displace: f64,
    /// Output length in frames.
    pub output_len: usize,
    /// Number of full analysis windows that fit in the input.
    pub frame_count: usize,
}

impl DerivedParams {
    /// Computes the derived parameters for one stretch call.
    pub fn new(config: &StretchConfig, sample_rate: u32, input_frames: usize) -> Self {
        let win_samples = (config.window_secs * sample_rate as f64).floor() as usize;
        let fft_size = win_samples.max(2).next_power_of_two();
        let half_size = fft_size / 2;
        let displace = half_size as f64 / config.stretch_factor;
        let output_len = (input_frames as f64 * config.stretch_factor).floor() as usize;

        let fits = |i: usize| frame_position(i, displace) + fft_size <= input_frames;
        let frame_count = if input_frames < fft_size {
            0
        } else {
            // Estimate from the hop arithmetic, then settle the float
            // boundary exactly.
            let mut count = ((input_frames - fft_size) as f64 / displace) as usize + 1;
            while count > 0 && !fits(count - 1) {
                count -= 1;
            }
            while fits(count) {
                count += 1;
            }
            count
        };

        Self {
            win_samples,
            fft_size,
            half_size,
            displace,
            output_len,
            frame_count,
        }
    }

    /// Input sample position where analysis frame `index` begins.
    #[inline]
    pub fn frame_position(&self, index: usize) -> usize {
        frame_position(index, self.displace)
    }
}

#[inline]
fn frame_position(index: usize, displace: f64) -> usize {
    (index as f64 * displace).floor() as usize
}
