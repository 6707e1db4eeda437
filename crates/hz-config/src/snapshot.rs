//! Configuration snapshots for reproducibility.
//!
//! A snapshot captures the effective configuration at the start of a run so a
//! sample trace can be tied back to the settings that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::ConfigPath;
use crate::settings::Settings;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the configuration.
    pub schema_version: String,

    /// Path where settings were loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// Source of the settings.
    pub source: String,

    /// SHA-256 of the raw file content, when a file was read.
    #[serde(default)]
    pub file_hash: Option<String>,

    /// SHA-256 of the effective settings (after CLI overrides).
    pub settings_hash: String,

    /// Key configuration values for quick reference.
    pub summary: ConfigSummary,
}

/// Summary of key configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub prior_family: String,
    pub horizon: usize,
    pub enforce_ordering: bool,
    pub ensemble_size: usize,
    pub steps: u64,
    pub sampling_interval: u64,
    pub stretch_probability: f64,
}

impl ConfigSnapshot {
    /// Create a snapshot of the effective settings.
    pub fn new(settings: &Settings, path: &ConfigPath, file_content: Option<&str>) -> Self {
        // Serializing a plain struct of numbers and strings cannot fail.
        let canonical = serde_json::to_string(settings).unwrap_or_default();

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: settings.schema_version.clone(),
            path: path.path.as_ref().map(|p| p.display().to_string()),
            source: path.source.to_string(),
            file_hash: file_content.map(hash_content),
            settings_hash: hash_content(&canonical),
            summary: ConfigSummary::from_settings(settings),
        }
    }

    /// Create a snapshot with only defaults (no config file loaded).
    pub fn defaults_only() -> Self {
        Self::new(&Settings::default(), &ConfigPath::default(), None)
    }

    /// Serialize snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot matches another (same effective settings).
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.settings_hash == other.settings_hash
    }

    /// Get a short identifier for this snapshot (first 12 chars of hash).
    pub fn short_id(&self) -> &str {
        &self.settings_hash[..12.min(self.settings_hash.len())]
    }
}

impl ConfigSummary {
    fn from_settings(settings: &Settings) -> Self {
        ConfigSummary {
            prior_family: settings.model.prior.family_name().to_string(),
            horizon: settings.model.horizon,
            enforce_ordering: settings.model.enforce_ordering,
            ensemble_size: settings.sampler.ensemble_size,
            steps: settings.sampler.steps,
            sampling_interval: settings.sampler.sampling_interval,
            stretch_probability: settings.sampler.stretch_probability,
        }
    }
}

/// Hash content with SHA-256 and return hex string.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert!(snapshot.file_hash.is_none());
        assert!(snapshot.path.is_none());
        assert_eq!(snapshot.source, "builtin default");
        assert_eq!(snapshot.summary.prior_family, "log_uniform");
    }

    #[test]
    fn test_snapshot_short_id() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.short_id().len(), 12);
    }

    #[test]
    fn test_snapshot_matches() {
        let s1 = ConfigSnapshot::defaults_only();
        let s2 = ConfigSnapshot::defaults_only();
        assert!(s1.matches(&s2));
    }

    #[test]
    fn test_override_changes_hash() {
        let base = ConfigSnapshot::defaults_only();
        let mut settings = Settings::default();
        settings.sampler.seed = Some(11);
        let changed = ConfigSnapshot::new(&settings, &ConfigPath::default(), None);
        assert!(!base.matches(&changed));
    }

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = ConfigSnapshot::defaults_only();
        let json = snapshot.to_json().unwrap();
        let restored = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snapshot.matches(&restored));
    }
}
