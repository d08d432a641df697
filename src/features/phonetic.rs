//! Phonetic (voice quality) features supplied by an external acoustic engine
//!
//! Pitch, harmonicity, jitter and shimmer estimation is delegated to whatever
//! engine the caller injects through [`PhoneticBackend`].

use std::collections::BTreeMap;
use ndarray::ArrayView1;
use crate::error::Result;

pub const F0: &str = "F0";
pub const HNR: &str = "HNR";
pub const JITTER: &str = "Jitter";
pub const SHIMMER: &str = "Shimmer";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhoneticFeatures {
    pub f0: f64,
    pub hnr: f64,
    pub jitter: f64,
    pub shimmer: f64,
}

impl PhoneticFeatures {
    /// Build from a keyed mapping; missing keys read as 0.0.
    pub fn from_map(map: &BTreeMap<String, f64>) -> Self {
        let get = |key: &str| map.get(key).copied().unwrap_or(0.0);
        Self {
            f0: get(F0),
            hnr: get(HNR),
            jitter: get(JITTER),
            shimmer: get(SHIMMER),
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        BTreeMap::from([
            (F0.to_string(), self.f0),
            (HNR.to_string(), self.hnr),
            (JITTER.to_string(), self.jitter),
            (SHIMMER.to_string(), self.shimmer),
        ])
    }

    /// Clamp negative (and NaN) engine artifacts to 0.0.
    pub fn floored(self) -> Self {
        let floor = |x: f64| if x > 0.0 { x } else { 0.0 };
        Self {
            f0: floor(self.f0),
            hnr: floor(self.hnr),
            jitter: floor(self.jitter),
            shimmer: floor(self.shimmer),
        }
    }
}

/// Narrow call interface onto an acoustic analysis engine.
pub trait PhoneticBackend {
    fn analyze(&self, signal: ArrayView1<f64>, sample_rate: u32) -> Result<PhoneticFeatures>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> PhoneticBackend for F
where
    F: Fn(ArrayView1<f64>, u32) -> Result<PhoneticFeatures>,
{
    fn analyze(&self, signal: ArrayView1<f64>, sample_rate: u32) -> Result<PhoneticFeatures> {
        self(signal, sample_rate)
    }
}

/// Stand-in used when no acoustic engine is linked: every feature reads 0.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl PhoneticBackend for SilentBackend {
    fn analyze(&self, _signal: ArrayView1<f64>, _sample_rate: u32) -> Result<PhoneticFeatures> {
        Ok(PhoneticFeatures::default())
    }

    fn name(&self) -> &str {
        "silent"
    }
}
