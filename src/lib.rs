//! gdscan - dependency extraction for Godot projects
//!
//! This library scans GDScript (`.gd`) files and Godot text scenes and
//! resources (`.tscn`, `.tres`) with small token-window grammars, and builds
//! a table of files and class entities with their inheritance and curated
//! dependencies.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{AnalysisRun, Analyzer, Walker};
pub use error::{ErrorSeverity, IoResultExt, Result, ResultExt, ScanError};
pub use models::{
    analysis::{AnalysisResults, AnalysisSummary},
    config::Settings,
    record::{EntityRecord, FileRecord, LanguageType, Record, SourceFile},
    table::ResultTable,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
