//! Energy-based segmentation
//!
//! Marks frames whose RMS energy exceeds a threshold and keeps contiguous
//! active runs that last at least a minimum duration.

use ndarray::ArrayView1;
use crate::error::Result;
use crate::features::calculate_amplitude_contour;
use crate::features::temporal::peak_abs;

/// Half-open sample interval `[start, end)` over the source signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn duration(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / sample_rate as f64
    }
}

/// Threshold scaled to the loudness of one recording.
///
/// Falls back to the bare ratio for silent signals.
pub fn dynamic_threshold(signal: ArrayView1<f64>, ratio: f64) -> f64 {
    let peak = peak_abs(signal);
    ratio * if peak == 0.0 { 1.0 } else { peak }
}

/// Detect active regions by frame energy.
///
/// Runs of active frames shorter than `floor(min_duration * sample_rate / hop_length)`
/// frames are dropped. A run still open after the last frame ends at `signal.len()`.
pub fn segment_by_energy(
    signal: ArrayView1<f64>,
    sample_rate: u32,
    frame_length: usize,
    hop_length: usize,
    energy_threshold: f64,
    min_duration: f64,
) -> Result<Vec<Segment>> {
    let energy = calculate_amplitude_contour(signal, frame_length, hop_length)?;
    let min_frames = (min_duration * sample_rate as f64 / hop_length as f64).floor() as usize;

    let mut segments = Vec::new();
    let mut run_start: Option<usize> = None;

    for (i, &frame_energy) in energy.iter().enumerate() {
        let active = frame_energy > energy_threshold;
        match (active, run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                if i - start >= min_frames {
                    segments.push(Segment::new(start * hop_length, i * hop_length));
                }
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        if energy.len() - start >= min_frames {
            segments.push(Segment::new(start * hop_length, signal.len()));
        }
    }

    log::debug!(
        "Energy segmentation: {} frames, threshold {:.4}, min {} frames -> {} segments",
        energy.len(), energy_threshold, min_frames, segments.len()
    );

    Ok(segments)
}

/// Placeholder for SNR-based pruning: every segment is kept.
///
/// `snr_threshold_db` is accepted so callers keep a stable signature, but no
/// estimate is computed and no segment is dropped.
pub fn filter_by_snr(_signal: ArrayView1<f64>, segments: &[Segment], snr_threshold_db: f64) -> Vec<Segment> {
    log::trace!("SNR filter disabled (threshold {} dB ignored)", snr_threshold_db);
    segments.to_vec()
}
