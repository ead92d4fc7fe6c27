//! Configuration for the Model Registry module.

use std::time::Duration;

use figment::Figment;
use serde::{Deserialize, Serialize};

/// Configuration section key inside the host configuration.
pub const CONFIG_SECTION: &str = "model_registry";

/// Configuration for the Model Registry module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelRegistryConfig {
    /// Whether the periodic consistency sweep runs.
    pub sweep_enabled: bool,

    /// Interval between consistency sweeps.
    #[serde(with = "humantime_duration")]
    pub sweep_interval: Duration,

    /// Maximum number of cached lookups.
    pub cache_max_entries: u64,

    /// Ancestor walks longer than this are truncated.
    pub max_hierarchy_depth: usize,
}

impl Default for ModelRegistryConfig {
    fn default() -> Self {
        Self {
            sweep_enabled: true,
            sweep_interval: Duration::from_secs(60),
            cache_max_entries: 10_000,
            max_hierarchy_depth: 64,
        }
    }
}

impl ModelRegistryConfig {
    /// Extracts the `model_registry` section, falling back to defaults when
    /// the section or individual keys are missing.
    ///
    /// # Errors
    ///
    /// Returns a figment error if the section exists but is invalid.
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        if !figment.contains(CONFIG_SECTION) {
            return Ok(Self::default());
        }
        figment.extract_inner(CONFIG_SECTION)
    }
}

/// Human-readable durations (`"30s"`, `"5m"`) for config fields.
mod humantime_duration {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(super) fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&humantime::format_duration(*value))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(d)?;
        humantime::parse_duration(&raw).map_err(de::Error::custom)
    }
}
