//! Core types, FFT, window functions, and plan caches.

pub mod cache;
pub mod fft;
pub mod types;
pub mod window;

pub use cache::PlanCache;
pub use fft::FftPlan;
pub use types::{AudioBlock, Sample};
pub use window::{apply_window, generate_window, WindowShape};
