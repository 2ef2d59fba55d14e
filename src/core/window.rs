//! Window functions for spectral analysis.
//!
//! The stretch pipeline windows every block twice: once before the forward
//! FFT and once after the inverse, which tapers block edges and keeps the
//! overlap-add smooth.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Exponent of the legacy Paul window `(1 - t^2)^1.25`.
const PAUL_EXPONENT: f64 = 1.25;

/// Window function shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowShape {
    /// Raised cosine, the canonical choice.
    Hann,
    /// The original PaulStretch input window `(1 - t^2)^1.25`.
    Paul,
}

/// Generates a window of the specified shape and size.
pub fn generate_window(shape: WindowShape, size: usize) -> Vec<f32> {
    match shape {
        WindowShape::Hann => hann_window(size),
        WindowShape::Paul => paul_window(size),
    }
}

/// Returns `Some(trivial_window)` for degenerate sizes (0 or 1), or `None`
/// to indicate the caller should compute the full window.
#[inline]
fn trivial_window(size: usize) -> Option<Vec<f32>> {
    match size {
        0 => Some(vec![]),
        1 => Some(vec![1.0]),
        _ => None,
    }
}

/// Generates a Hann window: `0.5 * (1 - cos(2*pi*i/(N-1)))`.
#[inline]
fn hann_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let x = (2.0 * PI * i as f64) / (n - 1.0);
            (0.5 * (1.0 - x.cos())) as f32
        })
        .collect()
}

/// Generates the Paul window over `t = 2*i/(N-1) - 1`.
#[inline]
fn paul_window(size: usize) -> Vec<f32> {
    if let Some(w) = trivial_window(size) {
        return w;
    }
    let n = size as f64;
    (0..size)
        .map(|i| {
            let t = 2.0 * i as f64 / (n - 1.0) - 1.0;
            (1.0 - t * t).max(0.0).powf(PAUL_EXPONENT) as f32
        })
        .collect()
}

/// Applies a window function to a slice in-place.
#[inline]
pub fn apply_window(data: &mut [f32], window: &[f32]) {
    for (sample, &w) in data.iter_mut().zip(window.iter()) {
        *sample *= w;
    }
}
