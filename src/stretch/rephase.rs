//! Per-block spectral rephasing.
//!
//! Each analysis block keeps its magnitude spectrum but has every
//! positive-frequency phase replaced with a uniform random draw, which is
//! what smears the signal in time without moving its pitch. The negative
//! frequencies are mirrored so the inverse transform stays real.

use crate::core::fft::FftPlan;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::sync::Arc;

/// Rephases blocks of one FFT size, reusing its scratch buffers across frames.
pub struct Rephaser {
    plan: Arc<FftPlan>,
    window: Arc<Vec<f32>>,
    re: Vec<f32>,
    im: Vec<f32>,
}

impl Rephaser {
    /// Creates a rephaser for the plan's FFT size.
    pub fn new(plan: Arc<FftPlan>, window: Arc<Vec<f32>>) -> Self {
        let n = plan.size();
        debug_assert_eq!(window.len(), n);
        Self {
            plan,
            window,
            re: vec![0.0; n],
            im: vec![0.0; n],
        }
    }

    /// Randomizes the phases of `block` in place and applies the window a
    /// second time. `block` must already carry one pass of the window.
    pub fn process(&mut self, block: &mut [f32], rng: &mut SmallRng) {
        let n = self.plan.size();
        let half = n / 2;
        debug_assert_eq!(block.len(), n);

        self.re.copy_from_slice(block);
        self.im.fill(0.0);
        self.plan.forward(&mut self.re, &mut self.im);

        // Fresh phase per interior bin. DC and Nyquist keep their real
        // forward values; with the mirror below that makes the inverse
        // real-valued to rounding.
        for k in 1..half {
            let m = (self.re[k] * self.re[k] + self.im[k] * self.im[k]).sqrt();
            let phase = rng.gen_range(0.0..TAU);
            self.re[k] = m * phase.cos();
            self.im[k] = m * phase.sin();
        }
        self.im[0] = 0.0;
        self.im[half] = 0.0;

        // Hermitian mirror: X[N-k] = conj(X[k]).
        for k in 1..half {
            self.re[n - k] = self.re[k];
            self.im[n - k] = -self.im[k];
        }

        self.plan.inverse(&mut self.re, &mut self.im);

        for ((out, &r), &w) in block
            .iter_mut()
            .zip(self.re.iter())
            .zip(self.window.iter())
        {
            *out = r * w;
        }
    }
}

/// Derives the RNG for one analysis frame.
///
/// Seeding per `(channel, frame)` rather than per worker means the serial
/// engine and the parallel dispatcher draw identical phase sequences for a
/// given master seed, no matter how frames are chunked across workers.
pub fn frame_rng(master_seed: u64, channel: usize, frame_index: usize) -> SmallRng {
    let mut state = master_seed
        ^ (channel as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (frame_index as u64).wrapping_mul(0xD1B5_4A32_D192_ED03);
    // splitmix64 finalizer to decorrelate neighboring frames
    state = (state ^ (state >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    state = (state ^ (state >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    SmallRng::seed_from_u64(state ^ (state >> 31))
}
