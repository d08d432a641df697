//! Amplitude contour and shape descriptors
//!
//! The contour is the frame-wise RMS of a signal. Frames start at
//! `0, hop, 2 * hop, ...` and stop before `len - frame_length`, so the last
//! full frame is dropped whenever it would start exactly on that bound.
//! Segment boundaries downstream depend on this indexing.

use ndarray::{s, Array1, ArrayView1};
use std::f64::consts::PI;
use crate::error::{CoughAnalyzerError, Result};
use super::temporal::{is_near_zero, peak_abs};

/// Frame-wise RMS magnitudes. Empty when the signal is shorter than one frame.
pub fn calculate_amplitude_contour(signal: ArrayView1<f64>, frame_length: usize, hop_length: usize) -> Result<Array1<f64>> {
    if frame_length == 0 || hop_length == 0 {
        return Err(CoughAnalyzerError::invalid_argument(
            "frame_length and hop_length must be positive integers",
        ));
    }

    if signal.len() < frame_length {
        return Ok(Array1::zeros(0));
    }

    let contour = (0..signal.len() - frame_length)
        .step_by(hop_length)
        .map(|offset| {
            let frame = signal.slice(s![offset..offset + frame_length]);
            frame.mapv(|x| x * x).mean().map(f64::sqrt).unwrap_or(0.0)
        })
        .collect();

    Ok(contour)
}

/// Scale so the largest magnitude is 1.0; all zeros when the peak vanishes.
pub fn normalize_contour(contour: ArrayView1<f64>) -> Array1<f64> {
    let peak = peak_abs(contour);
    if is_near_zero(peak) {
        return Array1::zeros(contour.len());
    }
    contour.mapv(|x| x / peak)
}

/// Orthonormal DCT-II coefficient `k`, or 0.0 when the contour is too short.
fn dct_coefficient(contour: ArrayView1<f64>, k: usize) -> f64 {
    let n = contour.len();
    if k >= n {
        return 0.0;
    }

    let sum: f64 = contour
        .iter()
        .enumerate()
        .map(|(i, &x)| x * (PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64).cos())
        .sum();

    let scale = if k == 0 { (1.0 / n as f64).sqrt() } else { (2.0 / n as f64).sqrt() };
    scale * sum
}

pub fn calculate_amplitude_contour_slope(contour: ArrayView1<f64>) -> f64 {
    dct_coefficient(contour, 1)
}

pub fn calculate_amplitude_contour_curvature(contour: ArrayView1<f64>) -> f64 {
    dct_coefficient(contour, 2)
}

/// Sample entropy with embedding dimension `m` and relative tolerance `r`.
///
/// Each unordered pair of embedded vectors is compared once. Degenerate inputs
/// (too short, constant, or no matches at either dimension) yield 0.0.
pub fn calculate_sample_entropy(contour: ArrayView1<f64>, m: usize, r: f64) -> f64 {
    if contour.len() <= m + 1 {
        return 0.0;
    }

    let std = contour.std(0.0);
    if is_near_zero(std) {
        return 0.0;
    }
    let tolerance = r * std;

    let phi = |dim: usize| -> f64 {
        let count = contour.len() + 1 - dim;
        let mut matches = 0usize;
        let mut comparisons = 0usize;
        for i in 0..count {
            let template = contour.slice(s![i..i + dim]);
            for j in i + 1..count {
                let candidate = contour.slice(s![j..j + dim]);
                let distance = template
                    .iter()
                    .zip(candidate.iter())
                    .fold(0.0f64, |acc, (a, b)| acc.max((a - b).abs()));
                if distance <= tolerance {
                    matches += 1;
                }
                comparisons += 1;
            }
        }
        if comparisons == 0 {
            0.0
        } else {
            matches as f64 / comparisons as f64
        }
    };

    let phi_m = phi(m);
    let phi_m1 = phi(m + 1);
    if phi_m == 0.0 || phi_m1 == 0.0 {
        return 0.0;
    }

    -(phi_m1 / phi_m).ln()
}

const KURTOSIS_RESOLUTION: f64 = 1e-15;

/// Excess (Fisher) kurtosis with small-sample bias correction.
///
/// The correction needs at least four points; shorter contours get the
/// uncorrected estimate. Constant contours yield 0.0.
pub fn calculate_kurtosis(contour: ArrayView1<f64>) -> f64 {
    let n = contour.len();
    if n == 0 {
        return 0.0;
    }

    let mean = contour.mean().unwrap_or(0.0);
    let m2 = contour.mapv(|x| (x - mean).powi(2)).mean().unwrap_or(0.0);
    let m4 = contour.mapv(|x| (x - mean).powi(4)).mean().unwrap_or(0.0);
    // Variance below float resolution relative to the mean counts as constant.
    if m2 <= (KURTOSIS_RESOLUTION * mean).powi(2) {
        return 0.0;
    }

    let ratio = m4 / (m2 * m2);
    if n <= 3 {
        return ratio - 3.0;
    }

    let n = n as f64;
    ((n * n - 1.0) * ratio - 3.0 * (n - 1.0).powi(2)) / ((n - 2.0) * (n - 3.0))
}

/// Position of the largest magnitude as a fraction of the contour span.
pub fn calculate_crest_factor_position(contour: ArrayView1<f64>) -> f64 {
    if contour.len() <= 1 {
        return 0.0;
    }

    let (crest_index, _) = contour
        .iter()
        .enumerate()
        .fold((0usize, f64::NEG_INFINITY), |(best_i, best), (i, &x)| {
            if x.abs() > best { (i, x.abs()) } else { (best_i, best) }
        });

    crest_index as f64 / (contour.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_contour_empty_for_short_signal() {
        for frame in [4usize, 10, 320] {
            for hop in [1usize, 2, 160] {
                let signal = Array1::<f64>::ones(frame - 1);
                let contour = calculate_amplitude_contour(signal.view(), frame, hop).unwrap();
                assert!(contour.is_empty());
            }
        }
    }

    #[test]
    fn test_contour_drops_final_frame() {
        // offsets 0, 2 only: offset 4 == len - frame is excluded
        let signal = Array1::from(vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let contour = calculate_amplitude_contour(signal.view(), 2, 2).unwrap();
        assert_eq!(contour.to_vec(), vec![1.0, 2.0]);

        let exact = Array1::<f64>::ones(4);
        assert!(calculate_amplitude_contour(exact.view(), 4, 1).unwrap().is_empty());
    }

    #[test]
    fn test_contour_rejects_zero_parameters() {
        let signal = Array1::<f64>::ones(10);
        assert!(calculate_amplitude_contour(signal.view(), 0, 1).is_err());
        assert!(calculate_amplitude_contour(signal.view(), 4, 0).is_err());
    }

    #[test]
    fn test_normalize_contour() {
        let contour = Array1::from(vec![0.2, 0.5, 0.25]);
        let normalized = normalize_contour(contour.view());
        assert!(approx(peak_abs(normalized.view()), 1.0));

        let silent = Array1::from(vec![0.0, 1e-15, 0.0]);
        assert_eq!(normalize_contour(silent.view()).to_vec(), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_dct_slope_and_curvature() {
        // a constant contour has no energy beyond the DC term
        let flat = Array1::from(vec![1.0; 8]);
        assert!(approx(calculate_amplitude_contour_slope(flat.view()), 0.0));
        assert!(approx(calculate_amplitude_contour_curvature(flat.view()), 0.0));

        // decreasing ramp projects positively onto the first cosine
        let falling = Array1::from(vec![1.0, 0.5]);
        assert!(approx(calculate_amplitude_contour_slope(falling.view()), 0.5 / 2f64.sqrt()));
        assert_eq!(calculate_amplitude_contour_curvature(falling.view()), 0.0);

        let rising: Array1<f64> = (0..10).map(|i| i as f64).collect();
        assert!(calculate_amplitude_contour_slope(rising.view()) < 0.0);

        assert_eq!(calculate_amplitude_contour_slope(Array1::<f64>::zeros(0).view()), 0.0);
    }

    #[test]
    fn test_sample_entropy_degenerate() {
        assert_eq!(calculate_sample_entropy(Array1::from(vec![1.0, 2.0, 3.0]).view(), 2, 0.2), 0.0);
        assert_eq!(calculate_sample_entropy(Array1::from(vec![0.5; 20]).view(), 2, 0.2), 0.0);
    }

    #[test]
    fn test_sample_entropy_periodic_is_low() {
        let periodic: Array1<f64> = (0..60).map(|i| if i % 2 == 0 { 1.0 } else { 0.0 }).collect();
        let entropy = calculate_sample_entropy(periodic.view(), 2, 0.2);
        assert!(entropy.is_finite());
        assert!(entropy.abs() < 0.1, "entropy {}", entropy);
    }

    #[test]
    fn test_sample_entropy_hand_computed() {
        // tolerance is below 0.1, so only identical vectors match.
        // m=2: six vectors, 4 of 15 pairs match. m=3: five vectors, 2 of 10 pairs match.
        let contour = Array1::from(vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0]);
        let expected: f64 = -((2.0f64 / 10.0) / (4.0 / 15.0)).ln();
        assert!(approx(calculate_sample_entropy(contour.view(), 2, 0.2), expected));

        // no matches at m + 1
        let unmatched = Array1::from(vec![0.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(calculate_sample_entropy(unmatched.view(), 2, 0.2), 0.0);
    }

    #[test]
    fn test_kurtosis() {
        assert_eq!(calculate_kurtosis(Array1::<f64>::zeros(0).view()), 0.0);
        assert_eq!(calculate_kurtosis(Array1::from(vec![0.3; 10]).view()), 0.0);

        // [1,2,3,4,5]: m2 = 2, m4 = 6.8 -> corrected excess kurtosis of -1.2
        let linear = Array1::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(approx(calculate_kurtosis(linear.view()), -1.2));

        // two points: uncorrected 1 - 3
        assert!(approx(calculate_kurtosis(Array1::from(vec![0.0, 1.0]).view()), -2.0));
    }

    #[test]
    fn test_kurtosis_of_nearly_flat_contour() {
        // variance of 2.5e-15 is tiny but the contour is not constant
        let flat: Array1<f64> = (0..10).map(|i| if i % 2 == 0 { 1.0 } else { 1.0 + 1e-7 }).collect();
        let expected = (99.0 - 3.0 * 81.0) / (8.0 * 7.0);
        assert!((calculate_kurtosis(flat.view()) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_crest_factor_position() {
        assert_eq!(calculate_crest_factor_position(Array1::<f64>::zeros(0).view()), 0.0);
        assert_eq!(calculate_crest_factor_position(Array1::from(vec![0.7]).view()), 0.0);

        let contour = Array1::from(vec![0.1, 0.2, 0.9, 0.3, 0.1]);
        assert!(approx(calculate_crest_factor_position(contour.view()), 0.5));

        let tail = Array1::from(vec![0.1, -0.2, -1.0]);
        assert!(approx(calculate_crest_factor_position(tail.view()), 1.0));

        // ties resolve to the first occurrence
        let tied = Array1::from(vec![1.0, 0.0, 1.0]);
        assert_eq!(calculate_crest_factor_position(tied.view()), 0.0);
    }
}
