//! Configuration file and environment sources

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{Result, ScanError};
use crate::models::config::PartialSettings;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".gdscan.toml";

/// Default environment variable prefix
pub const DEFAULT_ENV_PREFIX: &str = "GDSCAN";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 10,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 10,
        }
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a default configuration file at this location
    pub fn create_default(&self) -> Result<()> {
        parser::create_default_config(&self.path)
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(ScanError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
///
/// Reads `<PREFIX>_SOURCE_PATH`, `<PREFIX>_EXCLUDE` (comma separated),
/// `<PREFIX>_MAX_DEPTH`, `<PREFIX>_OUTPUT_FORMAT`, `<PREFIX>_OUTPUT_FILE`,
/// `<PREFIX>_PARALLEL`, `<PREFIX>_INCLUDE_SCENES` and `<PREFIX>_LOG_LEVEL`.
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
    vars: Option<HashMap<String, String>>,
}

const ENV_KEYS: &[&str] = &[
    "SOURCE_PATH",
    "EXCLUDE",
    "MAX_DEPTH",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
    "PARALLEL",
    "INCLUDE_SCENES",
    "LOG_LEVEL",
];

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 20,
            vars: None,
        }
    }

    /// Read from a fixed set of variables instead of the process environment
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut config = Self::new(prefix);
        config.vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        config
    }

    fn var(&self, key: &str) -> Option<String> {
        let name = format!("{}_{}", self.prefix, key);
        match &self.vars {
            Some(vars) => vars.get(&name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        let value = self.var(key)?;
        let parsed = value.trim().parse().ok();
        if parsed.is_none() {
            tracing::warn!("ignoring {}_{}: cannot parse '{}'", self.prefix, key, value);
        }
        parsed
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings {
            source_path: self.var("SOURCE_PATH").map(PathBuf::from),
            output_file: self.var("OUTPUT_FILE").map(PathBuf::from),
            max_depth: self.parsed("MAX_DEPTH"),
            output_format: self.parsed("OUTPUT_FORMAT"),
            log_level: self.var("LOG_LEVEL"),
            ..Default::default()
        };

        if let Some(exclude) = self.var("EXCLUDE") {
            settings.exclude_patterns = Some(
                exclude
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            );
        }

        settings.parallel = self.var("PARALLEL").as_deref().and_then(parse_flag);
        settings.include_scenes = self.var("INCLUDE_SCENES").as_deref().and_then(parse_flag);

        parser::validate_partial_settings(&settings, format!("${}_*", self.prefix))?;
        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
