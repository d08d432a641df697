//! Cough Analyzer - Cough Audio Segmentation and Feature Extraction
//!
//! Splits recordings into energy-based segments and writes one row of
//! acoustic features per segment to a CSV table.

pub mod audio;
pub mod config;
pub mod error;
pub mod features;
pub mod processing;

pub use config::{Config, Args};
pub use error::{CoughAnalyzerError, Result};
pub use processing::{FeaturePipeline, InputSource, PipelineReport, run_pipeline};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Install the global logger. `RUST_LOG` directives take precedence over the verbosity flag.
pub fn init_logging(verbose: bool) {
    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
