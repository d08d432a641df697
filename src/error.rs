//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum CoughAnalyzerError {
    #[error("Audio error: {message}")]
    Audio { message: String },
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
    #[error("Output error: {message}")]
    Output { message: String },
    #[error("Processing error: {message}")]
    Processing { message: String },
}

impl CoughAnalyzerError {
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self { Self::InvalidArgument { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
    pub fn output<S: Into<String>>(msg: S) -> Self { Self::Output { message: msg.into() } }
    pub fn processing<S: Into<String>>(msg: S) -> Self { Self::Processing { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, CoughAnalyzerError>;

impl From<std::io::Error> for CoughAnalyzerError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<hound::Error> for CoughAnalyzerError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}

impl From<csv::Error> for CoughAnalyzerError {
    fn from(err: csv::Error) -> Self { Self::output(format!("CSV: {}", err)) }
}

impl From<walkdir::Error> for CoughAnalyzerError {
    fn from(err: walkdir::Error) -> Self { Self::io(format!("Directory walk: {}", err)) }
}
