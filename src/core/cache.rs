//! Lazily populated caches for window tables and FFT plans.
//!
//! Both artifacts are immutable after construction and shared into worker
//! threads behind `Arc`, so a stretch call never recomputes or copies them
//! per dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::fft::FftPlan;
use crate::core::window::{generate_window, WindowShape};

/// Caches window tables and FFT twiddle tables, keyed by size.
#[derive(Debug, Default)]
pub struct PlanCache {
    windows: HashMap<(WindowShape, usize), Arc<Vec<f32>>>,
    plans: HashMap<usize, Arc<FftPlan>>,
}

impl PlanCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the window for `(shape, size)`, computing it on first use.
    pub fn window(&mut self, shape: WindowShape, size: usize) -> Arc<Vec<f32>> {
        Arc::clone(
            self.windows
                .entry((shape, size))
                .or_insert_with(|| Arc::new(generate_window(shape, size))),
        )
    }

    /// Returns the FFT plan for `size`, computing it on first use.
    pub fn plan(&mut self, size: usize) -> Arc<FftPlan> {
        Arc::clone(
            self.plans
                .entry(size)
                .or_insert_with(|| Arc::new(FftPlan::new(size))),
        )
    }

    /// Drops all cached artifacts.
    pub fn clear(&mut self) {
        self.windows.clear();
        self.plans.clear();
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty() && self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_cached_by_identity() {
        let mut cache = PlanCache::new();
        let a = cache.window(WindowShape::Hann, 1024);
        let b = cache.window(WindowShape::Hann, 1024);
        assert!(Arc::ptr_eq(&a, &b));
        let c = cache.window(WindowShape::Paul, 1024);
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_plan_cached_by_size() {
        let mut cache = PlanCache::new();
        let a = cache.plan(2048);
        let b = cache.plan(2048);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.size(), 2048);
    }

    #[test]
    fn test_clear() {
        let mut cache = PlanCache::new();
        cache.window(WindowShape::Hann, 256);
        cache.plan(256);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
    }
}
