//! Radix-2 Cooley-Tukey FFT over parallel real/imaginary arrays.
//!
//! The transform is decimation-in-time with a precomputed twiddle table,
//! operating in place so the per-frame spectral pipeline allocates nothing.

/// Precomputed twiddle tables for one FFT size.
///
/// Twiddles are stored for angles `-2*pi*k/N`, `0 <= k < N/2`, and stepped
/// across butterfly stages by `N/len`.
#[derive(Debug, Clone)]
pub struct FftPlan {
    size: usize,
    cos: Vec<f32>,
    sin: Vec<f32>,
}

impl FftPlan {
    /// Builds the twiddle tables for a power-of-two `size`.
    ///
    /// # Panics
    ///
    /// Panics if `size` is not a power of two or is smaller than 2.
    pub fn new(size: usize) -> Self {
        assert!(
            size >= 2 && size.is_power_of_two(),
            "FFT size must be a power of two >= 2, got {}",
            size
        );
        let half = size / 2;
        let mut cos = Vec::with_capacity(half);
        let mut sin = Vec::with_capacity(half);
        for k in 0..half {
            let angle = -2.0 * std::f64::consts::PI * k as f64 / size as f64;
            cos.push(angle.cos() as f32);
            sin.push(angle.sin() as f32);
        }
        Self { size, cos, sin }
    }

    /// Returns the transform size N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// In-place forward DFT: `X[k] = sum x[n] * e^(-2*pi*i*k*n/N)`.
    ///
    /// Both slices must have length `size()`.
    pub fn forward(&self, re: &mut [f32], im: &mut [f32]) {
        let n = self.size;
        debug_assert_eq!(re.len(), n);
        debug_assert_eq!(im.len(), n);

        // Bit-reversal permutation.
        let mut j = 0usize;
        for i in 1..n {
            let mut bit = n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j |= bit;
            if i < j {
                re.swap(i, j);
                im.swap(i, j);
            }
        }

        // log2(N) butterfly passes.
        let mut len = 2;
        while len <= n {
            let half_len = len / 2;
            let step = n / len;
            for start in (0..n).step_by(len) {
                let mut tw = 0;
                for k in start..start + half_len {
                    let wr = self.cos[tw];
                    let wi = self.sin[tw];
                    let m = k + half_len;
                    let tr = re[m] * wr - im[m] * wi;
                    let ti = re[m] * wi + im[m] * wr;
                    re[m] = re[k] - tr;
                    im[m] = im[k] - ti;
                    re[k] += tr;
                    im[k] += ti;
                    tw += step;
                }
            }
            len <<= 1;
        }
    }

    /// In-place inverse DFT with 1/N scaling.
    ///
    /// Implemented by conjugating the input, running the forward transform,
    /// then conjugating and scaling the output.
    pub fn inverse(&self, re: &mut [f32], im: &mut [f32]) {
        for v in im.iter_mut() {
            *v = -*v;
        }
        self.forward(re, im);
        let scale = 1.0 / self.size as f32;
        for v in re.iter_mut() {
            *v *= scale;
        }
        for v in im.iter_mut() {
            *v = -*v * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::{num_complex::Complex, FftPlanner};

    fn rms_error(a: &[f32], b: &[f32]) -> f64 {
        let sum: f64 = a
            .iter()
            .zip(b.iter())
            .map(|(&x, &y)| {
                let d = x as f64 - y as f64;
                d * d
            })
            .sum();
        (sum / a.len() as f64).sqrt()
    }

    fn test_signal(n: usize) -> Vec<f32> {
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                (2.0 * std::f32::consts::PI * 13.0 * t).sin()
                    + 0.5 * (2.0 * std::f32::consts::PI * 82.0 * t).cos()
            })
            .collect()
    }

    #[test]
    fn test_roundtrip_recovers_input() {
        for &n in &[256usize, 1024, 4096, 65536] {
            let plan = FftPlan::new(n);
            let original = test_signal(n);
            let mut re = original.clone();
            let mut im = vec![0.0f32; n];
            plan.forward(&mut re, &mut im);
            plan.inverse(&mut re, &mut im);
            assert!(
                rms_error(&re, &original) < 1e-4,
                "roundtrip RMS too large for N={}",
                n
            );
            let max_im = im.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
            assert!(max_im < 1e-3, "imaginary residue {} for N={}", max_im, n);
        }
    }

    #[test]
    fn test_impulse_has_flat_spectrum() {
        let n = 512;
        let plan = FftPlan::new(n);
        let mut re = vec![0.0f32; n];
        let mut im = vec![0.0f32; n];
        re[0] = 1.0;
        plan.forward(&mut re, &mut im);
        for k in 0..n {
            assert!((re[k] - 1.0).abs() < 1e-5);
            assert!(im[k].abs() < 1e-5);
        }
    }

    #[test]
    fn test_sine_concentrates_in_one_bin() {
        let n = 1024;
        let bin = 37;
        let plan = FftPlan::new(n);
        let mut re: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let mut im = vec![0.0f32; n];
        plan.forward(&mut re, &mut im);
        // A pure sine at an exact bin frequency puts N/2 of magnitude there.
        let mag = (re[bin] * re[bin] + im[bin] * im[bin]).sqrt();
        assert!((mag - n as f32 / 2.0).abs() < 0.01 * n as f32);
        let mag_next = (re[bin + 3] * re[bin + 3] + im[bin + 3] * im[bin + 3]).sqrt();
        assert!(mag_next < 1e-2 * mag);
    }

    #[test]
    fn test_matches_rustfft_oracle() {
        let n = 2048;
        let plan = FftPlan::new(n);
        let signal = test_signal(n);

        let mut re = signal.clone();
        let mut im = vec![0.0f32; n];
        plan.forward(&mut re, &mut im);

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(n);
        let mut buf: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buf);

        for k in 0..n {
            assert!(
                (re[k] - buf[k].re).abs() < 1e-2 && (im[k] - buf[k].im).abs() < 1e-2,
                "bin {} diverges from oracle: ({}, {}) vs ({}, {})",
                k,
                re[k],
                im[k],
                buf[k].re,
                buf[k].im
            );
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn test_rejects_non_power_of_two() {
        FftPlan::new(1000);
    }
}
