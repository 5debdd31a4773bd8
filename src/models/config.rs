//! Configuration-related data structures

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration settings for gdscan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root of the Godot project to analyze
    pub source_path: PathBuf,

    /// Glob patterns to exclude from scanning
    pub exclude_patterns: Vec<String>,

    /// Maximum directory depth to traverse
    pub max_depth: Option<usize>,

    /// Whether to follow symbolic links during directory traversal
    pub follow_links: bool,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show detailed progress and debug information
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to extract files in parallel
    pub parallel: bool,

    /// Whether to show progress bars
    pub show_progress: bool,

    /// Whether `.tscn` / `.tres` files are analyzed alongside scripts
    pub include_scenes: bool,

    /// Explicit log filter, overriding the quiet/verbose defaults
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("."),
            exclude_patterns: vec![
                ".godot".to_string(),
                ".import".to_string(),
                ".git".to_string(),
                "addons".to_string(),
            ],
            max_depth: None,
            follow_links: false,
            output_format: OutputFormat::Text,
            output_file: None,
            quiet: false,
            verbose: false,
            use_colors: true,
            parallel: true,
            show_progress: true,
            include_scenes: true,
            log_level: None,
        }
    }
}

impl Settings {
    /// Log filter directive derived from the verbosity settings
    pub fn log_filter(&self) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        if self.quiet {
            "error".to_string()
        } else if self.verbose {
            "debug".to_string()
        } else {
            "warn".to_string()
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per dependency edge
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub source_path: Option<PathBuf>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub parallel: Option<bool>,
    pub show_progress: Option<bool>,
    pub include_scenes: Option<bool>,
    pub log_level: Option<String>,
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        if other.source_path.is_some() {
            self.source_path = other.source_path;
        }
        if other.exclude_patterns.is_some() {
            self.exclude_patterns = other.exclude_patterns;
        }
        if other.max_depth.is_some() {
            self.max_depth = other.max_depth;
        }
        if other.follow_links.is_some() {
            self.follow_links = other.follow_links;
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format;
        }
        if other.output_file.is_some() {
            self.output_file = other.output_file;
        }
        if other.quiet.is_some() {
            self.quiet = other.quiet;
        }
        if other.verbose.is_some() {
            self.verbose = other.verbose;
        }
        if other.use_colors.is_some() {
            self.use_colors = other.use_colors;
        }
        if other.parallel.is_some() {
            self.parallel = other.parallel;
        }
        if other.show_progress.is_some() {
            self.show_progress = other.show_progress;
        }
        if other.include_scenes.is_some() {
            self.include_scenes = other.include_scenes;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(source_path) = &self.source_path {
            settings.source_path = source_path.clone();
        }
        if let Some(exclude_patterns) = &self.exclude_patterns {
            settings.exclude_patterns = exclude_patterns.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(follow_links) = self.follow_links {
            settings.follow_links = follow_links;
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }
        if let Some(include_scenes) = self.include_scenes {
            settings.include_scenes = include_scenes;
        }
        if let Some(log_level) = &self.log_level {
            settings.log_level = Some(log_level.clone());
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_precedence() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(), "warn");

        settings.verbose = true;
        assert_eq!(settings.log_filter(), "debug");

        settings.quiet = true;
        assert_eq!(settings.log_filter(), "error");

        settings.log_level = Some("gdscan=trace".to_string());
        assert_eq!(settings.log_filter(), "gdscan=trace");
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Text.to_string(), "text");
    }

    #[test]
    fn test_merge_later_source_wins() {
        let mut base = PartialSettings {
            source_path: Some(PathBuf::from("/game")),
            quiet: Some(true),
            ..Default::default()
        };
        base.merge_from(PartialSettings {
            quiet: Some(false),
            include_scenes: Some(false),
            ..Default::default()
        });

        let settings = base.to_settings();
        assert_eq!(settings.source_path, PathBuf::from("/game"));
        assert!(!settings.quiet);
        assert!(!settings.include_scenes);
        assert!(settings.parallel);
    }
}
