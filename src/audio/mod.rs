//! Audio I/O and signal conditioning
//!
//! WAV decoding to mono floating-point samples, 16-bit PCM encoding,
//! Fourier resampling and peak normalization.

pub mod wav;
pub mod converter;

pub use wav::{WavAudio, AudioFormat, AudioHeader, load_wav, save_wav};
pub use converter::{AudioConverter, normalize_energy, downsample_signal};
