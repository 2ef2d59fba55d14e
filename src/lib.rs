#![forbid(unsafe_code)]
//! Extreme audio time stretching using the PaulStretch algorithm.
//!
//! `paulstretch` lengthens audio by an arbitrary factor (typically 2x-50x)
//! without shifting its pitch. Each analysis window keeps its magnitude
//! spectrum but gets fresh random phases, and the rephased windows are
//! overlap-added at a hop compressed by the stretch factor, producing the
//! characteristic smeared, ambient texture of Paul Nasca's original.
//!
//! # Quick Start
//!
//! ```
//! use paulstretch::{AudioBlock, StretchConfig, Stretcher};
//!
//! // 1 second of 440 Hz sine at 44.1 kHz
//! let input = AudioBlock::from_mono(
//!     (0..44100)
//!         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
//!         .collect(),
//!     44100,
//! );
//!
//! let config = StretchConfig::new(8.0).with_window_secs(0.25);
//! let mut stretcher = Stretcher::new(config).unwrap();
//! let output = stretcher.stretch(&input).unwrap();
//! assert_eq!(output.frame_count(), 352800); // 8x longer
//! ```
//!
//! # Determinism
//!
//! Phase randomization is the point of the algorithm, so two runs differ by
//! default. Supplying a seed pins the phase sequence, and the output is then
//! identical across runs and across worker counts:
//!
//! ```
//! use paulstretch::StretchConfig;
//!
//! let config = StretchConfig::new(8.0).with_seed(42).with_workers(4);
//! ```

pub mod core;
pub mod error;
pub mod io;
pub mod stretch;

pub use crate::core::types::{AudioBlock, Sample};
pub use crate::core::window::WindowShape;
pub use error::StretchError;
pub use stretch::params::StretchConfig;

use crate::core::cache::PlanCache;
use crate::stretch::params::DerivedParams;

/// A stretch processor holding the validated config and the window/FFT-plan
/// caches. Caches live for the life of the instance; workers are scoped to
/// each [`stretch`](Stretcher::stretch) call.
pub struct Stretcher {
    config: StretchConfig,
    cache: PlanCache,
}

impl Stretcher {
    /// Creates a stretcher from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StretchError::InvalidConfig`] for a non-finite or
    /// non-positive stretch factor or window length, or zero workers.
    pub fn new(config: StretchConfig) -> Result<Self, StretchError> {
        config.validate()?;
        Ok(Self {
            config,
            cache: PlanCache::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &StretchConfig {
        &self.config
    }

    /// Stretches `input` into a new block of `floor(frames * factor)` frames.
    ///
    /// Channel count and sample rate are preserved; each channel is processed
    /// independently and peak-normalized to 0.95.
    ///
    /// # Errors
    ///
    /// Returns [`StretchError::InvalidInput`] for a malformed block and
    /// [`StretchError::WorkerFailure`] if a parallel worker fails, in which
    /// case no output is produced.
    pub fn stretch(&mut self, input: &AudioBlock) -> Result<AudioBlock, StretchError> {
        self.stretch_with_progress(input, |_| {})
    }

    /// Like [`stretch`](Stretcher::stretch), reporting progress as a
    /// monotonically non-decreasing fraction in [0, 1].
    ///
    /// The sink is called from the calling thread only, at chunk granularity.
    /// Progress is advisory; the stretch completes regardless of what the
    /// sink does with the values.
    pub fn stretch_with_progress(
        &mut self,
        input: &AudioBlock,
        mut on_progress: impl FnMut(f32),
    ) -> Result<AudioBlock, StretchError> {
        input.validate()?;
        let params = DerivedParams::new(&self.config, input.sample_rate, input.frame_count());
        stretch::parallel::stretch_all(
            input,
            &self.config,
            &params,
            &mut self.cache,
            &mut on_progress,
        )
    }

    /// Drops the cached window and FFT-plan tables.
    pub fn clear_caches(&mut self) {
        self.cache.clear();
    }
}

/// Stretches `input` with a one-off processor.
///
/// This is the convenience entry point; construct a [`Stretcher`] to reuse
/// window and FFT-plan caches across calls.
///
/// # Errors
///
/// Returns [`StretchError::InvalidConfig`] or [`StretchError::InvalidInput`]
/// for bad parameters or audio.
///
/// # Example
///
/// ```
/// use paulstretch::{stretch, AudioBlock, StretchConfig};
///
/// let input = AudioBlock::from_mono(
///     (0..44100)
///         .map(|i| (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin())
///         .collect(),
///     44100,
/// );
/// let output = stretch(&input, &StretchConfig::new(4.0)).unwrap();
/// assert_eq!(output.frame_count(), 176400);
/// ```
pub fn stretch(input: &AudioBlock, config: &StretchConfig) -> Result<AudioBlock, StretchError> {
    Stretcher::new(config.clone())?.stretch(input)
}
