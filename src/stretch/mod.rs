//! The stretch engines: per-block rephasing, the single-threaded reference
//! loop, and the parallel dispatcher.

pub mod engine;
pub mod parallel;
pub mod params;
pub mod rephase;

pub use params::{DerivedParams, StretchConfig};
pub use rephase::Rephaser;
