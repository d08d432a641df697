//! WAV audio file processing

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use hound::{SampleFormat, WavReader, WavWriter};
use ndarray::{Array1, ArrayView1};
use crate::error::{CoughAnalyzerError, Result};

/// Sample encodings accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int8,
    Int16,
    Int24,
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int8 => "int8",
            AudioFormat::Int16 => "int16",
            AudioFormat::Int24 => "int24",
            AudioFormat::Float32 => "float32",
        }
    }

    pub fn from_spec(spec: &hound::WavSpec) -> Result<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Ok(AudioFormat::Int8),
            (SampleFormat::Int, 16) => Ok(AudioFormat::Int16),
            (SampleFormat::Int, 24) => Ok(AudioFormat::Int24),
            (SampleFormat::Float, 32) => Ok(AudioFormat::Float32),
            (format, bits) => Err(CoughAnalyzerError::audio(format!(
                "Unsupported sample width: {} bits ({:?})", bits, format
            ))),
        }
    }

    /// Divisor mapping integer samples onto [-1.0, 1.0).
    pub fn full_scale(&self) -> f64 {
        match self {
            AudioFormat::Int8 => 128.0,
            AudioFormat::Int16 => 32768.0,
            AudioFormat::Int24 => 8388608.0,
            AudioFormat::Float32 => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub sample_rate: u32,
    /// Channel count of the source file; the decoded data is always mono.
    pub channels: u16,
    pub format: AudioFormat,
    pub total_samples: usize,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_samples: usize) -> Self {
        let duration = if sample_rate == 0 {
            0.0
        } else {
            total_samples as f64 / sample_rate as f64
        };

        Self {
            sample_rate,
            channels,
            format,
            total_samples,
            duration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(CoughAnalyzerError::audio("Sample rate cannot be 0"));
        }

        if self.channels == 0 {
            return Err(CoughAnalyzerError::audio("Channel count cannot be 0"));
        }

        Ok(())
    }
}

/// A decoded recording folded down to a single channel.
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: Array1<f64>,
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .map_err(|e| CoughAnalyzerError::Audio {
                message: format!("Cannot open audio file {}: {}", path.display(), e)
            })?;

        let mut reader = WavReader::new(BufReader::new(file))
            .map_err(|e| CoughAnalyzerError::Audio {
                message: format!("Cannot create WAV reader for {}: {}", path.display(), e)
            })?;

        let spec = reader.spec();
        let format = AudioFormat::from_spec(&spec)?;
        if spec.channels == 0 {
            return Err(CoughAnalyzerError::audio("Channel count cannot be 0"));
        }

        let interleaved = read_interleaved(&mut reader, format)?;

        // Keep every Nth interleaved sample, i.e. the first channel.
        let mono: Vec<f64> = interleaved
            .into_iter()
            .step_by(spec.channels as usize)
            .collect();

        let header = AudioHeader::new(spec.sample_rate, spec.channels, format, mono.len());
        header.validate()?;

        log::debug!("Loaded {}: {} Hz, {} ch", path.display(), header.sample_rate, header.channels);

        Ok(WavAudio {
            header,
            data: Array1::from(mono),
        })
    }

    /// Write as 16-bit mono PCM. Samples are clamped to [-1.0, 1.0] and truncated.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| CoughAnalyzerError::Audio {
                    message: format!("Cannot create output directory: {}", e)
                })?;
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.header.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)
            .map_err(|e| CoughAnalyzerError::Audio {
                message: format!("Cannot create output file {}: {}", path.display(), e)
            })?;

        for &sample in self.data.iter() {
            let clamped = if sample.is_finite() { sample.clamp(-1.0, 1.0) } else { 0.0 };
            writer.write_sample((clamped * 32767.0) as i16)
                .map_err(|e| CoughAnalyzerError::Audio {
                    message: format!("Failed to write sample: {}", e)
                })?;
        }

        writer.finalize()
            .map_err(|e| CoughAnalyzerError::Audio {
                message: format!("Failed to finalize WAV writing: {}", e)
            })?;

        Ok(())
    }

    pub fn new_mono(sample_rate: u32, data: Array1<f64>) -> Self {
        let header = AudioHeader::new(sample_rate, 1, AudioFormat::Int16, data.len());
        WavAudio { header, data }
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn format(&self) -> AudioFormat {
        self.header.format
    }
}

fn read_interleaved<R: std::io::Read>(reader: &mut WavReader<R>, format: AudioFormat) -> Result<Vec<f64>> {
    let scale = format.full_scale();
    match format {
        AudioFormat::Float32 => reader
            .samples::<f32>()
            .map(|s| s.map(|v| v as f64).map_err(CoughAnalyzerError::from))
            .collect(),
        // hound yields 8-bit PCM already re-centered around zero
        AudioFormat::Int8 | AudioFormat::Int16 | AudioFormat::Int24 => reader
            .samples::<i32>()
            .map(|s| s.map(|v| v as f64 / scale).map_err(CoughAnalyzerError::from))
            .collect(),
    }
}

/// Load a WAV file as a mono signal plus its sample rate.
pub fn load_wav<P: AsRef<Path>>(path: P) -> Result<(Array1<f64>, u32)> {
    let audio = WavAudio::from_file(path)?;
    log::debug!("Decoded {} {} samples ({:.3}s)", audio.data.len(), audio.format().name(), audio.duration());
    let rate = audio.sample_rate();
    Ok((audio.data, rate))
}

/// Save a mono signal as 16-bit PCM.
pub fn save_wav<P: AsRef<Path>>(path: P, signal: ArrayView1<f64>, sample_rate: u32) -> Result<()> {
    WavAudio::new_mono(sample_rate, signal.to_owned()).save_to_file(path)
}
