//! Time-domain features computed on a whole segment

use ndarray::ArrayView1;

/// Values at or below this magnitude are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

pub(crate) fn is_near_zero(value: f64) -> bool {
    value.abs() <= ZERO_TOLERANCE
}

pub(crate) fn peak_abs(signal: ArrayView1<f64>) -> f64 {
    signal.iter().fold(0.0f64, |acc, &x| acc.max(x.abs()))
}

/// Duration in seconds.
pub fn calculate_length(segment: ArrayView1<f64>, sample_rate: u32) -> f64 {
    if sample_rate == 0 {
        return 0.0;
    }
    segment.len() as f64 / sample_rate as f64
}

pub fn calculate_rms_energy(signal: ArrayView1<f64>) -> f64 {
    signal.mapv(|x| x * x).mean().map(f64::sqrt).unwrap_or(0.0)
}

/// Fraction of adjacent sample pairs whose sign differs.
///
/// Zero has its own sign, so stepping onto or off an exact zero counts.
pub fn calculate_zcr(signal: ArrayView1<f64>) -> f64 {
    if signal.len() < 2 {
        return 0.0;
    }

    let sign = |x: f64| -> i8 {
        if x > 0.0 {
            1
        } else if x < 0.0 {
            -1
        } else {
            0
        }
    };

    let crossings = signal
        .windows(2)
        .into_iter()
        .filter(|pair| sign(pair[0]) != sign(pair[1]))
        .count();

    crossings as f64 / (signal.len() - 1) as f64
}

/// Peak-to-RMS ratio. Infinite for an impulse whose RMS vanishes.
pub fn calculate_crest_factor(signal: ArrayView1<f64>) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }

    let peak = peak_abs(signal);
    if is_near_zero(peak) {
        return 0.0;
    }

    let rms = calculate_rms_energy(signal);
    if is_near_zero(rms) {
        return f64::INFINITY;
    }

    peak / rms
}
