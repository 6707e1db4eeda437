//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG path → defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file path.
#[derive(Debug, Clone, Default)]
pub struct ConfigPath {
    /// Path to the settings file (or None if not found).
    pub path: Option<PathBuf>,

    /// Source of the settings (for diagnostics).
    pub source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "HZ_CONFIG";
pub const ENV_CONFIG_DIR: &str = "HZ_CONFIG_DIR";

/// Standard config file name.
const CONFIG_FILENAME: &str = "config.json";

/// Application name for XDG directories.
const APP_NAME: &str = "career-hazard";

/// Resolve the settings path using the standard resolution order.
///
/// 1. Explicit CLI path (returned even when missing, so loading reports it)
/// 2. `HZ_CONFIG` environment variable (direct path)
/// 3. `HZ_CONFIG_DIR` environment variable + `config.json`
/// 4. XDG config directory (~/.config/career-hazard/config.json)
/// 5. Built-in defaults (None)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    if let Some(path) = cli_path {
        return ConfigPath {
            path: Some(path.to_path_buf()),
            source: ConfigSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(CONFIG_FILENAME);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(CONFIG_FILENAME);
        if path.exists() {
            return ConfigPath {
                path: Some(path),
                source: ConfigSource::XdgConfig,
            };
        }
    }

    ConfigPath::default()
}

/// Get the XDG config directory for career-hazard.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
