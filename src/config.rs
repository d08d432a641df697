//! Configuration management for the feature extraction pipeline

use crate::error::{CoughAnalyzerError, Result};
use clap::{ArgGroup, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Canonical analysis rate (Hz).
pub const TARGET_SAMPLE_RATE: u32 = 16_000;
/// 20 ms analysis window at the canonical rate.
pub const FRAME_LENGTH: usize = 320;
/// 10 ms hop at the canonical rate.
pub const HOP_LENGTH: usize = 160;
pub const MIN_SEGMENT_DURATION: f64 = 0.1;
/// Relative to the peak absolute amplitude of each recording.
pub const ENERGY_THRESHOLD_RATIO: f64 = 0.1;
pub const SNR_THRESHOLD_DB: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub verbose: bool,
    pub audio: AudioConfig,
    pub segmentation: SegmentationConfig,
    pub features: FeatureConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub target_sample_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub frame_length: usize,
    pub hop_length: usize,
    pub min_segment_duration: f64,
    pub energy_threshold_ratio: f64,
    pub snr_threshold_db: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Explicit `[low, high)` bands in Hz. Derived from the target rate when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bands: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub write_segments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            audio: AudioConfig::default(),
            segmentation: SegmentationConfig::default(),
            features: FeatureConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: TARGET_SAMPLE_RATE,
        }
    }
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            frame_length: FRAME_LENGTH,
            hop_length: HOP_LENGTH,
            min_segment_duration: MIN_SEGMENT_DURATION,
            energy_threshold_ratio: ENERGY_THRESHOLD_RATIO,
            snr_threshold_db: SNR_THRESHOLD_DB,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("results"),
            write_segments: true,
        }
    }
}

impl Config {
    /// Get target sample rate (convenience method)
    pub fn sample_rate(&self) -> u32 {
        self.audio.target_sample_rate
    }

    pub fn frame_length(&self) -> usize {
        self.segmentation.frame_length
    }

    pub fn hop_length(&self) -> usize {
        self.segmentation.hop_length
    }

    pub fn output_dir(&self) -> &Path {
        &self.output.output_dir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Spectral bands used for relative energy, in column order.
    pub fn bands(&self) -> Vec<(f64, f64)> {
        self.features
            .bands
            .clone()
            .unwrap_or_else(|| crate::features::spectral::default_bands(self.sample_rate()))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "cough-analyzer", about = "Analyze cough audio files and extract features", version)]
#[command(group(ArgGroup::new("input").required(true).args(["input_file", "input_dir"])))]
pub struct Args {
    #[arg(long = "input-file", help = "Path to a single WAV file to analyze")]
    pub input_file: Option<PathBuf>,

    #[arg(long = "input-dir", help = "Directory containing WAV files to analyze (searched recursively)")]
    pub input_dir: Option<PathBuf>,

    #[arg(short = 'o', long = "output-dir", help = "Directory to store outputs [default: results]")]
    pub output_dir: Option<PathBuf>,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'r', long = "sample-rate", help = "Canonical analysis sample rate (Hz)")]
    pub sample_rate: Option<u32>,

    #[arg(long = "frame-length", help = "Analysis frame length (samples)")]
    pub frame_length: Option<usize>,

    #[arg(long = "hop-length", help = "Analysis hop length (samples)")]
    pub hop_length: Option<usize>,

    #[arg(long = "min-duration", help = "Minimum segment duration (seconds)")]
    pub min_duration: Option<f64>,

    #[arg(long = "energy-ratio", help = "Energy threshold relative to the recording peak (0.0 - 1.0)")]
    pub energy_ratio: Option<f64>,

    #[arg(long = "no-segments", help = "Do not write per-segment WAV files")]
    pub no_segments: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl Config {
    /// Create config from command line arguments and optional config file
    pub fn from_args_and_config(args: &Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(output_dir) = &args.output_dir {
            config.output.output_dir = output_dir.clone();
        }
        if let Some(rate) = args.sample_rate {
            config.audio.target_sample_rate = rate;
        }
        if let Some(frame_length) = args.frame_length {
            config.segmentation.frame_length = frame_length;
        }
        if let Some(hop_length) = args.hop_length {
            config.segmentation.hop_length = hop_length;
        }
        if let Some(min_duration) = args.min_duration {
            config.segmentation.min_segment_duration = min_duration;
        }
        if let Some(ratio) = args.energy_ratio {
            config.segmentation.energy_threshold_ratio = ratio;
        }
        if args.no_segments {
            config.output.write_segments = false;
        }
        config.verbose = config.verbose || args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoughAnalyzerError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| CoughAnalyzerError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        if self.audio.target_sample_rate == 0 {
            return Err(CoughAnalyzerError::config("Sample rate must be greater than 0"));
        }

        let seg = &self.segmentation;
        if seg.frame_length == 0 {
            return Err(CoughAnalyzerError::config("Frame length must be greater than 0"));
        }
        if seg.hop_length == 0 {
            return Err(CoughAnalyzerError::config("Hop length must be greater than 0"));
        }
        if !seg.min_segment_duration.is_finite() || seg.min_segment_duration < 0.0 {
            return Err(CoughAnalyzerError::config("Minimum segment duration must be non-negative"));
        }
        if !(0.0..=1.0).contains(&seg.energy_threshold_ratio) {
            return Err(CoughAnalyzerError::config("Energy threshold ratio must be in range [0.0, 1.0]"));
        }
        if !seg.snr_threshold_db.is_finite() {
            return Err(CoughAnalyzerError::config("SNR threshold must be finite"));
        }

        // Default bands end at Nyquist, so a low target rate can invert the last one.
        let bands = self.bands();
        if bands.is_empty() {
            return Err(CoughAnalyzerError::config("Band list cannot be empty"));
        }
        for &(low, high) in &bands {
            if !(low >= 0.0 && low < high) {
                return Err(CoughAnalyzerError::config(format!(
                    "Invalid band [{}, {}): low must be non-negative and below high", low, high
                )));
            }
        }

        Ok(())
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CoughAnalyzerError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| CoughAnalyzerError::config(format!("Failed to write config file: {}", e)))
    }
}
