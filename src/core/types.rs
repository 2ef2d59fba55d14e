//! Core types shared across the crate: samples and multi-channel audio blocks.

use crate::error::StretchError;

/// A single audio sample (32-bit float, nominal range -1.0 to 1.0).
pub type Sample = f32;

/// A multi-channel audio block holding one dense sample vector per channel.
///
/// All channels share the same length. Samples are nominally in [-1.0, 1.0];
/// the stretch core never clips internally, only the 16-bit WAV encoder does.
#[derive(Debug, Clone)]
pub struct AudioBlock {
    /// Per-channel sample data (planar, not interleaved).
    pub channels: Vec<Vec<Sample>>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioBlock {
    /// Creates a new audio block from planar channel data.
    pub fn new(channels: Vec<Vec<Sample>>, sample_rate: u32) -> Self {
        Self {
            channels,
            sample_rate,
        }
    }

    /// Creates a mono block from a single channel of data.
    pub fn from_mono(data: Vec<Sample>, sample_rate: u32) -> Self {
        Self {
            channels: vec![data],
            sample_rate,
        }
    }

    /// Creates a block by deinterleaving `data` into `channel_count` channels.
    ///
    /// Trailing samples that do not fill a complete frame are dropped.
    pub fn from_interleaved(data: &[Sample], channel_count: usize, sample_rate: u32) -> Self {
        assert!(channel_count > 0, "channel count must be at least 1");
        let frames = data.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in data.chunks_exact(channel_count) {
            for (ch, &sample) in channels.iter_mut().zip(frame.iter()) {
                ch.push(sample);
            }
        }
        Self {
            channels,
            sample_rate,
        }
    }

    /// Returns the number of channels.
    #[inline]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Returns the number of frames (samples per channel).
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, |ch| ch.len())
    }

    /// Returns the duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Interleaves the channels into a single flat vector.
    pub fn to_interleaved(&self) -> Vec<Sample> {
        let frames = self.frame_count();
        let mut out = Vec::with_capacity(frames * self.channel_count());
        for i in 0..frames {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// Checks that the block is well-formed for processing.
    pub fn validate(&self) -> Result<(), StretchError> {
        if self.sample_rate == 0 {
            return Err(StretchError::InvalidInput(
                "sample rate must be positive".to_string(),
            ));
        }
        if self.channels.is_empty() {
            return Err(StretchError::InvalidInput(
                "audio block has no channels".to_string(),
            ));
        }
        let frames = self.frame_count();
        if frames == 0 {
            return Err(StretchError::InvalidInput(
                "audio block has zero-length channels".to_string(),
            ));
        }
        if self.channels.iter().any(|ch| ch.len() != frames) {
            return Err(StretchError::InvalidInput(
                "all channels must have the same length".to_string(),
            ));
        }
        Ok(())
    }
}
