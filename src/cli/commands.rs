//! Command implementations

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::Args;
use crate::config::{self, CliArgs, DEFAULT_CONFIG_FILE};
use crate::core::Walker;
use crate::error::{ErrorSeverity, Result, ScanError};
use crate::models::analysis::{AnalysisResults, ErrorSeverity as ReportSeverity};
use crate::models::config::Settings;
use crate::output::{create_formatter, create_writer, ProgressReporter};

/// Available commands
#[derive(Debug)]
pub enum Command {
    /// Analyze the project in the configured directory
    Analyze(Box<Args>),
    /// Initialize a default configuration file
    Init,
}

impl Command {
    /// Create a command from parsed arguments
    pub fn from_args(args: Args) -> Self {
        if args.init {
            return Command::Init;
        }
        Command::Analyze(Box::new(args))
    }

    /// Merge every configuration source for an analyze command
    pub fn settings(&self) -> Result<Option<Settings>> {
        match self {
            Command::Analyze(args) => config::load_config(CliArgs::from(args.as_ref())).map(Some),
            Command::Init => Ok(None),
        }
    }
}

/// Write `.gdscan.toml` unless one already exists; returns whether a file was created
pub fn init_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    config::create_default_config(path)?;
    Ok(true)
}

/// Path used by `--init`
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Run discovery and analysis with a progress bar on stderr
pub fn analyze(settings: &Settings) -> Result<AnalysisResults> {
    if settings.verbose {
        debug!("settings: {:#?}", settings);
    }
    info!("scanning {}", settings.source_path.display());

    let reporter = ProgressReporter::new(settings.quiet, settings.verbose, settings.show_progress);
    reporter.start(0, &format!("Scanning {}", settings.source_path.display()));

    let walker = Walker::new(settings.clone());
    let results = walker.analyze_with_progress(|current, total, message| {
        reporter.update(current, total, message);
    })?;

    reporter.finish(&format!(
        "Extracted {} files, {} entities",
        results.summary.total_files, results.summary.total_entities
    ));
    for error in results.errors.iter().filter(|e| e.severity != ReportSeverity::Warning) {
        reporter.print_warning(&format!("{}: {}", error.path.display(), error.error));
    }
    Ok(results)
}

/// Format the results and write them to the configured destination
pub fn write_report(settings: &Settings, results: &AnalysisResults) -> Result<()> {
    let formatter = create_formatter(
        settings.output_format,
        settings.use_colors && settings.output_file.is_none(),
        settings.verbose,
        settings.quiet,
    );
    let content = formatter.format(results)?;
    create_writer(settings.output_file.as_ref()).write(&content)?;

    if let Some(path) = &settings.output_file {
        info!("report written to {}", path.display());
    }
    Ok(())
}

/// Process exit code for a failed run
pub fn exit_code(err: &ScanError) -> i32 {
    match err.severity() {
        ErrorSeverity::Warning => 0,
        ErrorSeverity::Error => 1,
        ErrorSeverity::Critical => 2,
    }
}

/// Process exit code for a finished analysis
pub fn results_exit_code(results: &AnalysisResults) -> i32 {
    if results.has_critical_errors() {
        2
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_args() {
        let init = Command::from_args(Args::parse_from(["gdscan", "--init"]));
        assert!(matches!(init, Command::Init));
        assert!(init.settings().unwrap().is_none());

        let analyze = Command::from_args(Args::parse_from(["gdscan", "--path", "game"]));
        assert!(matches!(analyze, Command::Analyze(_)));
    }

    #[test]
    fn test_init_config_does_not_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".gdscan.toml");

        assert!(init_config(&path).unwrap());
        fs::write(&path, "parallel = false\n").unwrap();
        assert!(!init_config(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "parallel = false\n");
    }

    #[test]
    fn test_analyze_and_write_report() {
        let dir = tempdir().unwrap();
        let project = dir.path().join("game");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("a.gd"), "class_name Foo\nextends Bar\n").unwrap();
        fs::write(project.join("b.gd"), "class_name Bar\n").unwrap();

        let settings = Settings {
            source_path: project,
            output_format: crate::models::config::OutputFormat::Json,
            output_file: Some(dir.path().join("report.json")),
            show_progress: false,
            quiet: true,
            ..Default::default()
        };

        let results = analyze(&settings).unwrap();
        assert_eq!(results_exit_code(&results), 0);
        write_report(&settings, &results).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
        assert_eq!(report["summary"]["total_entities"], 2);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code(&ScanError::permission_denied("x")), 0);
        assert_eq!(exit_code(&ScanError::analysis_error("x")), 1);
        assert_eq!(exit_code(&ScanError::config_error("x")), 2);
    }
}
