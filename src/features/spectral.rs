//! Frequency-domain band energies

use ndarray::ArrayView1;
use rustfft::{FftPlanner, num_complex::Complex64};

/// Default analysis bands in Hz: 0-400, 400-800, 800-1600, 1600-3200, 3200-Nyquist.
pub fn default_bands(sample_rate: u32) -> Vec<(f64, f64)> {
    vec![
        (0.0, 400.0),
        (400.0, 800.0),
        (800.0, 1600.0),
        (1600.0, 3200.0),
        (3200.0, (sample_rate / 2) as f64),
    ]
}

/// One-sided power spectrum and the frequency of each bin.
pub fn power_spectrum(signal: ArrayView1<f64>, sample_rate: u32) -> (Vec<f64>, Vec<f64>) {
    let n = signal.len();
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut buffer);

    let bins = n / 2 + 1;
    let power = buffer[..bins].iter().map(|c| c.norm_sqr()).collect();
    let freqs = (0..bins).map(|k| k as f64 * sample_rate as f64 / n as f64).collect();
    (power, freqs)
}

/// Share of total spectral power falling in each `[low, high)` band.
///
/// Normalized by the power of the whole spectrum, so bins outside every band
/// still count towards the total.
pub fn calculate_relative_energy(signal: ArrayView1<f64>, sample_rate: u32, bands: &[(f64, f64)]) -> Vec<f64> {
    let (power, freqs) = power_spectrum(signal, sample_rate);

    let total: f64 = power.iter().sum();
    if total == 0.0 {
        return vec![0.0; bands.len()];
    }

    bands
        .iter()
        .map(|&(low, high)| {
            let band_power: f64 = power
                .iter()
                .zip(freqs.iter())
                .filter(|&(_, &f)| f >= low && f < high)
                .map(|(p, _)| p)
                .sum();
            band_power / total
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::f64::consts::PI;

    fn tone(freq: f64, rate: u32, len: usize) -> Array1<f64> {
        (0..len).map(|i| (2.0 * PI * freq * i as f64 / rate as f64).sin()).collect()
    }

    #[test]
    fn test_default_bands() {
        let bands = default_bands(16000);
        assert_eq!(bands.len(), 5);
        assert_eq!(bands[4], (3200.0, 8000.0));
    }

    #[test]
    fn test_full_coverage_sums_to_one() {
        let mut rng = StdRng::seed_from_u64(42);
        let signal: Array1<f64> = (0..16001).map(|_| rng.gen_range(-1.0..1.0)).collect();
        // odd length: the top bin sits below Nyquist, so [0, 8000) covers everything
        let bands = [(0.0, 1000.0), (1000.0, 8000.0)];
        let energies = calculate_relative_energy(signal.view(), 16000, &bands);
        assert_eq!(energies.len(), 2);
        assert!((energies.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_uncovered_bins_count_in_total() {
        let signal = &tone(500.0, 16000, 1600) + &tone(2000.0, 16000, 1600);
        let energies = calculate_relative_energy(signal.view(), 16000, &[(0.0, 1000.0)]);
        assert!((energies[0] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tone_lands_in_its_band() {
        let signal = tone(1000.0, 16000, 1600);
        let energies = calculate_relative_energy(signal.view(), 16000, &default_bands(16000));
        assert!(energies[2] > 0.999);
    }

    #[test]
    fn test_empty_and_silent_signals() {
        let bands = default_bands(16000);
        assert_eq!(calculate_relative_energy(Array1::<f64>::zeros(0).view(), 16000, &bands), vec![0.0; 5]);
        assert_eq!(calculate_relative_energy(Array1::<f64>::zeros(64).view(), 16000, &bands), vec![0.0; 5]);
    }
}
