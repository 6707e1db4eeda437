//! Configuration loading for hz-core.
//!
//! Resolves the settings file (CLI → env → XDG → defaults), parses and
//! validates it, and applies per-run CLI overrides.

use std::path::{Path, PathBuf};

use hz_config::{
    resolve_config, validate_settings, ConfigPath, ConfigSnapshot, ConfigSource, Settings,
    ValidationError,
};
use thiserror::Error;

/// Errors loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    ValidationError(#[from] ValidationError),
}

/// Where to look for configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Explicit settings file (`--config`).
    pub config_path: Option<PathBuf>,
}

/// Per-run overrides from the command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub steps: Option<u64>,
    pub ensemble_size: Option<usize>,
    pub sampling_interval: Option<u64>,
    pub seed: Option<u64>,
    pub stretch_probability: Option<f64>,
    pub horizon: Option<usize>,
}

impl SettingsOverrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(steps) = self.steps {
            settings.sampler.steps = steps;
        }
        if let Some(size) = self.ensemble_size {
            settings.sampler.ensemble_size = size;
        }
        if let Some(interval) = self.sampling_interval {
            settings.sampler.sampling_interval = interval;
        }
        if let Some(seed) = self.seed {
            settings.sampler.seed = Some(seed);
        }
        if let Some(p) = self.stretch_probability {
            settings.sampler.stretch_probability = p;
        }
        if let Some(horizon) = self.horizon {
            settings.model.horizon = horizon;
        }
    }
}

/// Effective configuration for a run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub settings: Settings,
    pub path: ConfigPath,
    /// Raw file content, when a file was read.
    pub raw: Option<String>,
}

impl ResolvedConfig {
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(&self.settings, &self.path, self.raw.as_deref())
    }

    pub fn used_defaults(&self) -> bool {
        self.path.source == ConfigSource::BuiltinDefault
    }
}

/// Resolve, parse, override and validate.
pub fn load_config(
    options: &ConfigOptions,
    overrides: &SettingsOverrides,
) -> Result<ResolvedConfig, ConfigError> {
    let path = resolve_config(options.config_path.as_deref());

    let (mut settings, raw) = match &path.path {
        Some(file) => {
            let raw = read_settings_file(file)?;
            let settings =
                serde_json::from_str::<Settings>(&raw).map_err(|source| ConfigError::ParseError {
                    path: file.clone(),
                    source,
                })?;
            (settings, Some(raw))
        }
        None => (Settings::default(), None),
    };

    overrides.apply(&mut settings);
    validate_settings(&settings)?;

    Ok(ResolvedConfig {
        settings,
        path,
        raw,
    })
}

fn read_settings_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_explicit_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let options = ConfigOptions {
            config_path: Some(dir.path().join("nope.json")),
        };
        let err = load_config(&options, &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn overrides_apply_before_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"sampler": {"steps": 50, "seed": 1}}"#).unwrap();
        let options = ConfigOptions {
            config_path: Some(path),
        };

        let overrides = SettingsOverrides {
            seed: Some(99),
            horizon: Some(400),
            ..SettingsOverrides::default()
        };
        let resolved = load_config(&options, &overrides).unwrap();
        assert_eq!(resolved.settings.sampler.steps, 50);
        assert_eq!(resolved.settings.sampler.seed, Some(99));
        assert_eq!(resolved.settings.model.horizon, 400);
        assert!(resolved.raw.is_some());
        assert!(!resolved.used_defaults());
        assert!(resolved.snapshot().file_hash.is_some());

        let bad = SettingsOverrides {
            sampling_interval: Some(0),
            ..SettingsOverrides::default()
        };
        assert!(matches!(
            load_config(&options, &bad),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ nope").unwrap();
        let options = ConfigOptions {
            config_path: Some(path),
        };
        let err = load_config(&options, &SettingsOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }
}
