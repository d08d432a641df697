//! Feature extraction pipeline
//!
//! Per input file: load, resample, peak-normalize, segment by energy, then
//! extract one feature record per segment. Files are processed one at a time
//! in sorted path order and their records concatenated into one table.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use ndarray::{s, ArrayView1};
use walkdir::WalkDir;
use crate::audio::{load_wav, save_wav, normalize_energy, downsample_signal};
use crate::config::Config;
use crate::error::{CoughAnalyzerError, Result};
use crate::features::{
    self, PhoneticBackend, SilentBackend,
    calculate_amplitude_contour, normalize_contour,
};
use super::record::{FeatureRecord, FeatureTable};
use super::segmenter::{dynamic_threshold, filter_by_snr, segment_by_energy};

pub const FEATURES_FILE: &str = "features.csv";
pub const SEGMENTS_DIR: &str = "segments";

const SAMPLE_ENTROPY_M: usize = 2;
const SAMPLE_ENTROPY_R: f64 = 0.2;

/// Where recordings come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Directory(PathBuf),
}

impl InputSource {
    /// Exactly one of `file` / `dir` must be given.
    pub fn from_options(file: Option<&Path>, dir: Option<&Path>) -> Result<Self> {
        match (file, dir) {
            (Some(_), Some(_)) => Err(CoughAnalyzerError::config(
                "Specify either --input-file or --input-dir, not both",
            )),
            (None, None) => Err(CoughAnalyzerError::config(
                "You must provide --input-file or --input-dir",
            )),
            (Some(file), None) => Ok(InputSource::File(file.to_path_buf())),
            (None, Some(dir)) => Ok(InputSource::Directory(dir.to_path_buf())),
        }
    }

    /// Resolve to the list of WAV files to process, sorted by path.
    pub fn collect_audio_files(&self) -> Result<Vec<PathBuf>> {
        match self {
            InputSource::File(path) => {
                if !path.exists() {
                    return Err(CoughAnalyzerError::config(format!(
                        "Input file not found: {}", path.display()
                    )));
                }
                Ok(vec![path.clone()])
            }
            InputSource::Directory(dir) => {
                if !dir.exists() {
                    return Err(CoughAnalyzerError::config(format!(
                        "Input directory not found: {}", dir.display()
                    )));
                }

                let mut files = Vec::new();
                for entry in WalkDir::new(dir) {
                    let entry = entry?;
                    let is_wav = entry.path().extension().is_some_and(|ext| ext == "wav");
                    if entry.file_type().is_file() && is_wav {
                        files.push(entry.into_path());
                    }
                }
                files.sort();
                Ok(files)
            }
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct PipelineReport {
    pub table: FeatureTable,
    pub files_processed: usize,
    pub csv_path: PathBuf,
    pub processing_time: Duration,
}

impl PipelineReport {
    pub fn segment_count(&self) -> usize {
        self.table.len()
    }
}

pub struct FeaturePipeline {
    config: Config,
    bands: Vec<(f64, f64)>,
    backend: Box<dyn PhoneticBackend>,
}

impl FeaturePipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let bands = config.bands();
        Ok(Self {
            config,
            bands,
            backend: Box::new(SilentBackend),
        })
    }

    /// Replace the phonetic analysis engine.
    pub fn with_backend<B: PhoneticBackend + 'static>(mut self, backend: B) -> Self {
        self.backend = Box::new(backend);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Process every input file and write `features.csv` under the output directory.
    pub fn run(&self, input: &InputSource) -> Result<PipelineReport> {
        let start_time = Instant::now();

        let audio_paths = input.collect_audio_files()?;
        log::info!("Found {} audio file(s)", audio_paths.len());

        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(output_dir)?;

        let mut table = FeatureTable::new(self.bands.len());
        for path in &audio_paths {
            for record in self.process_file(path, output_dir)? {
                table.push(record)?;
            }
        }

        let csv_path = output_dir.join(FEATURES_FILE);
        table.write_csv(&csv_path)?;
        log::info!("Wrote {} feature rows to {}", table.len(), csv_path.display());

        Ok(PipelineReport {
            table,
            files_processed: audio_paths.len(),
            csv_path,
            processing_time: start_time.elapsed(),
        })
    }

    /// Extract feature records for every segment of one recording.
    ///
    /// A recording with no qualifying segments yields an empty list.
    pub fn process_file(&self, audio_path: &Path, output_dir: &Path) -> Result<Vec<FeatureRecord>> {
        let sample_rate = self.config.sample_rate();
        let seg_config = &self.config.segmentation;

        let (signal, original_rate) = load_wav(audio_path)?;
        let signal = downsample_signal(signal.view(), original_rate, sample_rate)?;
        let signal = normalize_energy(signal.view());

        let threshold = dynamic_threshold(signal.view(), seg_config.energy_threshold_ratio);
        let segments = segment_by_energy(
            signal.view(),
            sample_rate,
            seg_config.frame_length,
            seg_config.hop_length,
            threshold,
            seg_config.min_segment_duration,
        )?;
        let segments = filter_by_snr(signal.view(), &segments, seg_config.snr_threshold_db);

        if segments.is_empty() {
            log::warn!("No segments detected in {}", audio_path.display());
            return Ok(Vec::new());
        }
        log::info!("{}: {} segment(s)", audio_path.display(), segments.len());

        let stem = audio_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source_file = audio_path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let segment_dir = output_dir.join(SEGMENTS_DIR);
        if self.config.output.write_segments {
            std::fs::create_dir_all(&segment_dir)?;
        }

        let mut records = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            let segment_signal = normalize_energy(signal.slice(s![segment.start..segment.end]));
            let segment_id = format!("{}_{:02}", stem, index + 1);
            log::debug!(
                "{}: samples [{}, {}), {:.3}s",
                segment_id, segment.start, segment.end, segment.duration(sample_rate)
            );

            if self.config.output.write_segments {
                let segment_path = segment_dir.join(format!("{}.wav", segment_id));
                save_wav(&segment_path, segment_signal.view(), sample_rate)?;
            }

            records.push(self.analyze_segment(segment_id, source_file.clone(), segment_signal.view())?);
        }

        Ok(records)
    }

    /// Compute every feature for one peak-normalized segment.
    pub fn analyze_segment(&self, segment_id: String, source_file: String, segment: ArrayView1<f64>) -> Result<FeatureRecord> {
        let sample_rate = self.config.sample_rate();

        let contour = calculate_amplitude_contour(segment, self.config.frame_length(), self.config.hop_length())?;
        let amplitude_mean = contour.mean().unwrap_or(0.0);
        let normalized = normalize_contour(contour.view());

        let phonetic = self.backend.analyze(segment, sample_rate)?.floored();

        let record = FeatureRecord {
            length: features::calculate_length(segment, sample_rate),
            rms_energy: features::calculate_rms_energy(segment),
            zcr: features::calculate_zcr(segment),
            amplitude_mean,
            phonetic,
            relative_energy: features::calculate_relative_energy(segment, sample_rate, &self.bands),
            amplitude_contour_slope: features::calculate_amplitude_contour_slope(normalized.view()),
            amplitude_contour_curvature: features::calculate_amplitude_contour_curvature(normalized.view()),
            sample_entropy_contour: features::calculate_sample_entropy(normalized.view(), SAMPLE_ENTROPY_M, SAMPLE_ENTROPY_R),
            kurtosis_contour: features::calculate_kurtosis(normalized.view()),
            crest_factor: features::calculate_crest_factor(segment),
            crest_factor_position: features::calculate_crest_factor_position(normalized.view()),
            amplitude_contour: contour.to_vec(),
            segment_id,
            source_file,
        };

        log::debug!(
            "{}: length {:.3}s, rms {:.4}, zcr {:.4}, {} contour frames, backend {}",
            record.segment_id, record.length, record.rms_energy, record.zcr,
            record.amplitude_contour.len(), self.backend.name()
        );

        Ok(record)
    }
}

/// Run the pipeline once with the given configuration and input selection.
pub fn run_pipeline(config: Config, input_file: Option<&Path>, input_dir: Option<&Path>) -> Result<PipelineReport> {
    let input = InputSource::from_options(input_file, input_dir)?;
    FeaturePipeline::new(config)?.run(&input)
}
