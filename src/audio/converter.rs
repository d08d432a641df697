//! Signal conversion: peak normalization and sample-rate conversion

use ndarray::{Array1, ArrayView1};
use rustfft::{FftPlanner, num_complex::Complex64};
use crate::error::{CoughAnalyzerError, Result};

pub struct AudioConverter;

impl AudioConverter {
    /// Scale so the largest absolute sample becomes 1.0. Silence is returned unchanged.
    pub fn normalize_energy(signal: ArrayView1<f64>) -> Array1<f64> {
        let peak = signal.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()));
        if peak == 0.0 {
            return signal.to_owned();
        }
        signal.mapv(|x| x / peak)
    }

    /// Resample to `target_rate` with the Fourier method.
    pub fn convert_sample_rate(signal: ArrayView1<f64>, original_rate: u32, target_rate: u32) -> Result<Array1<f64>> {
        if original_rate == target_rate {
            return Ok(signal.to_owned());
        }

        if original_rate == 0 || target_rate == 0 {
            return Err(CoughAnalyzerError::invalid_argument("Sample rates must be positive integers"));
        }

        let new_length = (signal.len() as f64 * target_rate as f64 / original_rate as f64).round() as usize;
        if new_length == 0 {
            return Err(CoughAnalyzerError::invalid_argument("Calculated number of samples is non-positive"));
        }

        log::debug!("Resampling {} samples: {} Hz -> {} Hz ({} samples)",
                    signal.len(), original_rate, target_rate, new_length);

        Ok(Self::resample_fourier(signal, new_length))
    }

    /// Truncate or zero-pad the spectrum to `num` bins and invert.
    ///
    /// The Nyquist bin of an even-length spectrum is doubled when shrinking and
    /// halved when growing, so the shared component keeps its energy.
    fn resample_fourier(signal: ArrayView1<f64>, num: usize) -> Array1<f64> {
        let nx = signal.len();
        let mut planner = FftPlanner::<f64>::new();

        let mut spectrum: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        planner.plan_fft_forward(nx).process(&mut spectrum);

        let shared = num.min(nx);
        let nyquist = shared / 2 + 1;
        let mut half = vec![Complex64::new(0.0, 0.0); num / 2 + 1];
        let copied = nyquist.min(half.len());
        half[..copied].copy_from_slice(&spectrum[..copied]);

        if shared % 2 == 0 {
            let k = shared / 2;
            if k < half.len() {
                if num < nx {
                    half[k] *= 2.0;
                } else if nx < num {
                    half[k] *= 0.5;
                }
            }
        }

        // Rebuild the Hermitian spectrum of a real signal of length `num`.
        let mut full = vec![Complex64::new(0.0, 0.0); num];
        full[..half.len()].copy_from_slice(&half);
        full[0].im = 0.0;
        if num % 2 == 0 {
            full[num / 2].im = 0.0;
        }
        for k in 1..num.div_ceil(2) {
            full[num - k] = full[k].conj();
        }

        planner.plan_fft_inverse(num).process(&mut full);

        // Inverse is unnormalized: 1/num for the transform, num/nx for the rate change.
        full.iter().map(|c| c.re / nx as f64).collect()
    }
}

/// Peak-normalize a signal.
pub fn normalize_energy(signal: ArrayView1<f64>) -> Array1<f64> {
    AudioConverter::normalize_energy(signal)
}

/// Resample a signal from `original_rate` to `target_rate`.
pub fn downsample_signal(signal: ArrayView1<f64>, original_rate: u32, target_rate: u32) -> Result<Array1<f64>> {
    AudioConverter::convert_sample_rate(signal, original_rate, target_rate)
}
