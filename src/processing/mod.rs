//! Segmentation and Feature Pipeline

pub mod segmenter;
pub mod record;
pub mod pipeline;

pub use segmenter::{Segment, dynamic_threshold, segment_by_energy, filter_by_snr};
pub use record::{FeatureRecord, FeatureTable, FeatureValue, feature_columns};
pub use pipeline::{FeaturePipeline, InputSource, PipelineReport, run_pipeline};
