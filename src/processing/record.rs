//! Per-segment feature records and the CSV feature table

use std::fmt;
use std::path::Path;
use crate::error::{CoughAnalyzerError, Result};
use crate::features::PhoneticFeatures;
use crate::features::phonetic::{F0, HNR, JITTER, SHIMMER};

/// A single cell of the feature table.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Scalar(f64),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(s) => write!(f, "{}", s),
            FeatureValue::Scalar(v) => write!(f, "{}", v),
        }
    }
}

/// Features of one detected segment. Built once, never updated.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub segment_id: String,
    pub source_file: String,
    pub length: f64,
    pub rms_energy: f64,
    pub zcr: f64,
    pub amplitude_mean: f64,
    pub phonetic: PhoneticFeatures,
    pub relative_energy: Vec<f64>,
    pub amplitude_contour: Vec<f64>,
    pub amplitude_contour_slope: f64,
    pub amplitude_contour_curvature: f64,
    pub sample_entropy_contour: f64,
    pub kurtosis_contour: f64,
    pub crest_factor: f64,
    pub crest_factor_position: f64,
}

const LEADING_COLUMNS: [&str; 6] = ["segment_id", "source_file", "length", "rms_energy", "zcr", "amplitude_mean"];
const PHONETIC_COLUMNS: [&str; 4] = [F0, HNR, JITTER, SHIMMER];
const CONTOUR_COLUMNS: [&str; 7] = [
    "amplitude_contour",
    "amplitude_contour_slope",
    "amplitude_contour_curvature",
    "sample_entropy_contour",
    "kurtosis_contour",
    "crest_factor",
    "crest_factor_position",
];

/// Canonical column order for a table with `band_count` spectral bands.
pub fn feature_columns(band_count: usize) -> Vec<String> {
    LEADING_COLUMNS
        .iter()
        .chain(PHONETIC_COLUMNS.iter())
        .map(|c| c.to_string())
        .chain((1..=band_count).map(|i| format!("relative_energy_band_{}", i)))
        .chain(CONTOUR_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

impl FeatureRecord {
    /// `(column, value)` pairs in canonical column order.
    pub fn fields(&self) -> Vec<(String, FeatureValue)> {
        let contour_text = self
            .amplitude_contour
            .iter()
            .map(|v| format!("{:.6}", v))
            .collect::<Vec<_>>()
            .join(" ");

        let values = [
            FeatureValue::Text(self.segment_id.clone()),
            FeatureValue::Text(self.source_file.clone()),
            FeatureValue::Scalar(self.length),
            FeatureValue::Scalar(self.rms_energy),
            FeatureValue::Scalar(self.zcr),
            FeatureValue::Scalar(self.amplitude_mean),
            FeatureValue::Scalar(self.phonetic.f0),
            FeatureValue::Scalar(self.phonetic.hnr),
            FeatureValue::Scalar(self.phonetic.jitter),
            FeatureValue::Scalar(self.phonetic.shimmer),
        ]
        .into_iter()
        .chain(self.relative_energy.iter().map(|&v| FeatureValue::Scalar(v)))
        .chain([
            FeatureValue::Text(contour_text),
            FeatureValue::Scalar(self.amplitude_contour_slope),
            FeatureValue::Scalar(self.amplitude_contour_curvature),
            FeatureValue::Scalar(self.sample_entropy_contour),
            FeatureValue::Scalar(self.kurtosis_contour),
            FeatureValue::Scalar(self.crest_factor),
            FeatureValue::Scalar(self.crest_factor_position),
        ]);

        feature_columns(self.relative_energy.len()).into_iter().zip(values).collect()
    }
}

/// Feature records accumulated across files, in file-then-segment order.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    columns: Vec<String>,
    records: Vec<FeatureRecord>,
}

impl FeatureTable {
    pub fn new(band_count: usize) -> Self {
        Self {
            columns: feature_columns(band_count),
            records: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: FeatureRecord) -> Result<()> {
        let expected = feature_columns(record.relative_energy.len());
        if expected != self.columns {
            return Err(CoughAnalyzerError::processing(format!(
                "Record {} has {} bands, table expects {} columns",
                record.segment_id, record.relative_energy.len(), self.columns.len()
            )));
        }
        self.records.push(record);
        Ok(())
    }

    /// Write header plus one row per record. An empty table still gets its header.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut writer = csv::Writer::from_path(path)?;

        writer.write_record(&self.columns)?;
        for record in &self.records {
            writer.write_record(record.fields().iter().map(|(_, v)| v.to_string()))?;
        }
        writer.flush()?;

        log::debug!("Wrote {} rows to {}", self.records.len(), path.display());
        Ok(())
    }
}
