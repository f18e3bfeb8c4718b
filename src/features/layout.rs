//! Resolution of configured feature names to fixed `(channel, feature)` slots.
//!
//! Feature suffixes are parsed once when the detector is built; channel prefixes are bound
//! against the telemetry's channels before the first window. Assembling a window's vector is
//! then a plain indexed copy.

use super::{Feature, WindowFeatures};
use crate::error::ConfigError;

/// A configured name split into every `<channel>_<feature>` reading it admits.
///
/// Some feature names end in another feature's name (`diff_max` ends in `max`), so
/// `gyro_diff_max` may be channel `gyro` / `diff_max` or channel `gyro_diff` / `max`. The
/// telemetry's channels decide. When both channels exist the per-window mapping holds only
/// one value under that name, written by the later channel, so the later channel wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureKey {
    name: String,
    candidates: Vec<(String, Feature)>,
}

impl FeatureKey {
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        let candidates: Vec<(String, Feature)> = Feature::ALL
            .iter()
            .filter_map(|&f| {
                let prefix = name.strip_suffix(f.name())?.strip_suffix('_')?;
                (!prefix.is_empty()).then(|| (prefix.to_string(), f))
            })
            .collect();
        if candidates.is_empty() {
            return Err(ConfigError::UnknownFeature(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            candidates,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Possible channel prefixes, in per-channel feature order
    pub fn channel_candidates(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|(c, _)| c.as_str())
    }

    fn bind(&self, channels: &[String]) -> Result<Slot, ConfigError> {
        self.candidates
            .iter()
            .filter_map(|(prefix, feature)| {
                channels
                    .iter()
                    .position(|c| c == prefix)
                    .map(|channel| Slot {
                        channel,
                        feature: *feature,
                    })
            })
            .max_by_key(|slot| slot.channel)
            .ok_or_else(|| ConfigError::UnknownChannel {
                feature: self.name.clone(),
                channel: self
                    .channel_candidates()
                    .min_by_key(|c| c.len())
                    .unwrap_or_default()
                    .to_string(),
            })
    }
}

/// Position of one classifier input: a channel index and a per-channel feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub channel: usize,
    pub feature: Feature,
}

/// Classifier input order bound to a concrete channel list.
#[derive(Debug, Clone)]
pub struct FeatureLayout {
    slots: Vec<Slot>,
    /// Channels referenced by at least one slot, ascending
    channels: Vec<usize>,
    /// Per slot, index of its channel within `channels`
    positions: Vec<usize>,
}

impl FeatureLayout {
    pub fn bind(keys: &[FeatureKey], channels: &[String]) -> Result<Self, ConfigError> {
        let slots = keys
            .iter()
            .map(|k| k.bind(channels))
            .collect::<Result<Vec<_>, _>>()?;
        let mut used: Vec<usize> = slots.iter().map(|s| s.channel).collect();
        used.sort_unstable();
        used.dedup();
        let positions = slots
            .iter()
            .map(|s| used.partition_point(|&c| c < s.channel))
            .collect();
        Ok(Self {
            slots,
            channels: used,
            positions,
        })
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn dim(&self) -> usize {
        self.slots.len()
    }

    pub fn referenced_channels(&self) -> &[usize] {
        &self.channels
    }

    /// Fill `out` in classifier order. `features[j]` holds the features of
    /// `referenced_channels()[j]`.
    pub fn assemble(&self, features: &[WindowFeatures], out: &mut Vec<f64>) {
        assert_eq!(
            features.len(),
            self.channels.len(),
            "one feature set per referenced channel"
        );
        out.clear();
        out.extend(
            self.slots
                .iter()
                .zip(&self.positions)
                .map(|(s, &j)| features[j].get(s.feature)),
        );
    }
}
