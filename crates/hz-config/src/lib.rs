//! Career hazard configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the model and sampler configuration
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation
//! - Config snapshots tying a sample trace to the settings that produced it

pub mod resolve;
pub mod settings;
pub mod snapshot;
pub mod validate;

pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use settings::{LogBounds, ModelConfig, PriorConfig, SamplerSettings, Settings};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_settings, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
