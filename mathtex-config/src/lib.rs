//! Shared configuration loader for the mathtex toolchain.
//!
//! `defaults/mathtex.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MathtexConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mathtex::{Delimiters, DialogOptions, PluginSettings};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mathtex.default.toml");

/// Top-level configuration consumed by mathtex applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MathtexConfig {
    pub plugin: PluginConfig,
    pub dialog: DialogConfig,
}

/// Mirrors [`PluginSettings`].
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    pub class_name: String,
    pub plugin_url: String,
    pub lib: Option<String>,
    pub config_url: Option<String>,
    pub symbols: SymbolsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SymbolsConfig {
    pub start: String,
    pub end: String,
}

impl From<&PluginConfig> for PluginSettings {
    fn from(config: &PluginConfig) -> Self {
        PluginSettings {
            class_name: config.class_name.clone(),
            symbols: Delimiters::new(config.symbols.start.clone(), config.symbols.end.clone()),
            lib: config.lib.clone(),
            config_url: config.config_url.clone(),
            plugin_url: config.plugin_url.clone(),
        }
    }
}

impl From<PluginConfig> for PluginSettings {
    fn from(config: PluginConfig) -> Self {
        PluginSettings::from(&config)
    }
}

/// Title and size of the editing modal.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl From<&DialogConfig> for DialogOptions {
    fn from(config: &DialogConfig) -> Self {
        DialogOptions {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MathtexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MathtexConfig, ConfigError> {
    Loader::new().build()
}
