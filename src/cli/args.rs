//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// gdscan - dependency scanner for Godot projects
#[derive(Parser, Debug, Clone)]
#[command(name = "gdscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract classes, inheritance and dependencies from GDScript and Godot scene files")]
#[command(long_about = "gdscan walks a Godot project, reads every .gd, .tscn and .tres file and reports \
the classes each file declares, what they extend, which scripts and scenes they load, and which \
known classes they use as types. Dependencies are resolved to project file keys where possible.")]
#[command(after_help = "EXAMPLES:

    # Scan the current directory
    gdscan

    # Scan a project and skip editor plugins and tests
    gdscan --path ./my-game --exclude addons --exclude tests

    # Only look at scripts, two levels deep
    gdscan --no-scenes --max-depth 2

    # Export every dependency edge for a spreadsheet
    gdscan --path ./my-game --output csv --output-file edges.csv

    # Debug the grammar matching of one project
    gdscan --path ./my-game --log-level gdscan=debug --no-progress

    # Create a default .gdscan.toml in the current directory
    gdscan --init
")]
pub struct Args {
    /// Project directory to scan
    #[arg(short, long, value_name = "PATH", help = "Godot project directory to scan (defaults to the current directory)")]
    pub path: Option<PathBuf>,

    /// Exclude files and directories matching these glob patterns
    #[arg(short, long, value_name = "PATTERN", help = "Glob patterns to exclude (repeatable, e.g. --exclude addons --exclude tests)")]
    pub exclude: Vec<String>,

    /// Maximum depth for directory traversal
    #[arg(long, value_name = "DEPTH", help = "Maximum directory depth below the project root")]
    pub max_depth: Option<usize>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, help = "Report format: 'text' for reading, 'json' for tools, 'csv' for one row per dependency edge")]
    pub output: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(long, value_name = "FILE", help = "Write the report to this file instead of stdout")]
    pub output_file: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, help = "Print only a one-line summary and errors")]
    pub quiet: bool,

    /// Show detailed progress and debug information
    #[arg(short, long, help = "List every file and dependency and log at debug level")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output")]
    pub no_colors: bool,

    /// Disable parallel processing
    #[arg(long, help = "Extract files on a single thread")]
    pub no_parallel: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable the progress bar (useful in CI or when redirecting stderr)")]
    pub no_progress: bool,

    /// Skip scene and resource files
    #[arg(long, help = "Skip .tscn and .tres files")]
    pub no_scenes: bool,

    /// Follow symbolic links during directory traversal
    #[arg(long, help = "Follow symbolic links while walking the project")]
    pub follow_links: bool,

    /// Log filter directive
    #[arg(long, value_name = "FILTER", help = "Log filter such as 'warn' or 'gdscan=debug' (RUST_LOG takes precedence)")]
    pub log_level: Option<String>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Configuration file (defaults to .gdscan.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default .gdscan.toml in the current directory and exit")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output, one row per dependency edge
    Csv,
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
