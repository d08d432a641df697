//! Feature Extraction
//!
//! Pure functions over in-memory signals: time-domain statistics, amplitude
//! contour descriptors, spectral band energies, plus the phonetic backend seam.

pub mod temporal;
pub mod contour;
pub mod spectral;
pub mod phonetic;

pub use temporal::{calculate_length, calculate_rms_energy, calculate_zcr, calculate_crest_factor};
pub use contour::{
    calculate_amplitude_contour, normalize_contour, calculate_amplitude_contour_slope,
    calculate_amplitude_contour_curvature, calculate_sample_entropy, calculate_kurtosis,
    calculate_crest_factor_position,
};
pub use spectral::{calculate_relative_energy, default_bands};
pub use phonetic::{PhoneticBackend, PhoneticFeatures, SilentBackend};
