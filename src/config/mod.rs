//! Configuration management
//!
//! Settings are merged from defaults, a TOML file, `GDSCAN_*` environment
//! variables and command-line flags, in that order of increasing precedence.

pub mod cli;
pub mod file;
pub mod parser;
pub mod settings;

use tracing::debug;

use crate::error::Result;
use crate::models::config::{PartialSettings, Settings};

pub use cli::{CliArgs, CliConfig};
pub use file::{EnvConfig, FileConfig, DEFAULT_CONFIG_FILE, DEFAULT_ENV_PREFIX};
pub use parser::{create_default_config, find_default_config, parse_config_content, parse_config_file};
pub use settings::SettingsValidator;

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> Result<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;

    /// Get the priority of this source (higher numbers take precedence)
    fn priority(&self) -> u8 {
        10 // Default priority
    }
}

/// Configuration builder for merging multiple sources
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource + ?Sized>(self, source: &S) -> Result<Self> {
        if !source.is_available() {
            return Ok(self);
        }
        debug!("loading settings from {}", source.name());
        Ok(self.merge(source.load()?))
    }

    /// Merge every source in ascending priority order
    pub fn load_all(mut self, sources: &mut [&dyn ConfigSource]) -> Result<Self> {
        sources.sort_by_key(|source| source.priority());
        for source in sources.iter() {
            self = self.load_from(*source)?;
        }
        Ok(self)
    }

    /// Settings merged so far, without validation
    pub fn partial(&self) -> &PartialSettings {
        &self.partial
    }

    /// Build the final settings with validation
    pub fn build(self) -> Result<Settings> {
        let settings = self.partial.to_settings();
        SettingsValidator::validate(&settings)?;
        Ok(settings)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from every source with the standard precedence
pub fn load_config(cli_args: CliArgs) -> Result<Settings> {
    load_config_with_env(cli_args, &EnvConfig::default())
}

/// Like [`load_config`], reading environment overrides from `env_config`
pub fn load_config_with_env(cli_args: CliArgs, env_config: &EnvConfig) -> Result<Settings> {
    let mut builder = ConfigBuilder::new();

    // An explicit config file must exist; the default locations are optional
    match &cli_args.config {
        Some(path) => {
            let file_config = FileConfig::with_path(path);
            builder = builder.merge(file_config.load()?);
        }
        None => {
            if let Some(default_config) = find_default_config()? {
                builder = builder.merge(default_config);
            }
        }
    }

    let cli_config = CliConfig::new(cli_args);
    builder = builder.load_from(env_config)?.load_from(&cli_config)?;

    builder.build()
}
