//! Per-channel window features: statistical, temporal and spectral.

mod extractor;
mod layout;
mod spectral;

pub use extractor::FeatureExtractor;
pub use layout::{FeatureKey, FeatureLayout, Slot};
pub use spectral::{band_energies, SPECTRAL_BANDS};

use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

/// Number of features produced per channel per window
pub const FEATURE_COUNT: usize = 22;

/// Per-channel feature, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Feature {
    Mean,
    Std,
    Min,
    Max,
    Median,
    Range,
    Q25,
    Q75,
    Iqr,
    Skewness,
    Kurtosis,
    FirstValue,
    LastValue,
    FirstLastDelta,
    Slope,
    DiffMean,
    DiffStd,
    DiffMax,
    Lag1Autocorr,
    FftBand0Energy,
    FftBand1Energy,
    FftBand2Energy,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Mean,
        Feature::Std,
        Feature::Min,
        Feature::Max,
        Feature::Median,
        Feature::Range,
        Feature::Q25,
        Feature::Q75,
        Feature::Iqr,
        Feature::Skewness,
        Feature::Kurtosis,
        Feature::FirstValue,
        Feature::LastValue,
        Feature::FirstLastDelta,
        Feature::Slope,
        Feature::DiffMean,
        Feature::DiffStd,
        Feature::DiffMax,
        Feature::Lag1Autocorr,
        Feature::FftBand0Energy,
        Feature::FftBand1Energy,
        Feature::FftBand2Energy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Feature::Mean => "mean",
            Feature::Std => "std",
            Feature::Min => "min",
            Feature::Max => "max",
            Feature::Median => "median",
            Feature::Range => "range",
            Feature::Q25 => "q25",
            Feature::Q75 => "q75",
            Feature::Iqr => "iqr",
            Feature::Skewness => "skewness",
            Feature::Kurtosis => "kurtosis",
            Feature::FirstValue => "first_value",
            Feature::LastValue => "last_value",
            Feature::FirstLastDelta => "first_last_delta",
            Feature::Slope => "slope",
            Feature::DiffMean => "diff_mean",
            Feature::DiffStd => "diff_std",
            Feature::DiffMax => "diff_max",
            Feature::Lag1Autocorr => "lag1_autocorr",
            Feature::FftBand0Energy => "fft_band_0_energy",
            Feature::FftBand1Energy => "fft_band_1_energy",
            Feature::FftBand2Energy => "fft_band_2_energy",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    /// Position in [`WindowFeatures`] output order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Spectral band feature for band `i` (0 = lowest frequency)
    pub fn fft_band(i: usize) -> Option<Self> {
        match i {
            0 => Some(Feature::FftBand0Energy),
            1 => Some(Feature::FftBand1Energy),
            2 => Some(Feature::FftBand2Energy),
            _ => None,
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-order feature values for one channel's window. Every value is finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowFeatures {
    values: [f64; FEATURE_COUNT],
}

impl WindowFeatures {
    pub(crate) fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// `(name, value)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::ALL.iter().map(move |f| (f.name(), self.get(*f)))
    }

    /// Names prefixed with `<channel>_`, as the classifier sees them
    pub fn namespaced<'a>(&'a self, channel: &'a str) -> impl Iterator<Item = (String, f64)> + 'a {
        self.iter().map(move |(name, v)| (format!("{}_{}", channel, name), v))
    }
}

impl Serialize for WindowFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
