//! Analysis result structures

use crate::core::analyzer::AnalysisRun;
use crate::error::ScanError;
use crate::models::record::LanguageType;
use crate::models::table::ResultTable;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Report for one scanned file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub key: String,
    pub path: PathBuf,
    pub language: LanguageType,
    pub module_name: Option<String>,
    pub resolved_dependencies: Vec<String>,
    pub unresolved_dependencies: Vec<String>,
}

/// Report for one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityReport {
    pub unique_name: String,
    pub local_name: String,
    pub module_name: Option<String>,
    pub file: String,
    pub inheritance: Vec<String>,
    pub resolved_dependencies: Vec<String>,
    pub unresolved_dependencies: Vec<String>,
}

/// Kind of a dependency edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Dependency,
    Inheritance,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeKind::Dependency => write!(f, "dependency"),
            EdgeKind::Inheritance => write!(f, "inheritance"),
        }
    }
}

/// One edge of the dependency graph, flattened for tabular output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub source_kind: String,
    pub target: String,
    pub kind: EdgeKind,
    pub resolved: bool,
}

/// Collection of all analysis results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub source_root: PathBuf,
    pub files: Vec<FileReport>,
    pub entities: Vec<EntityReport>,
    pub summary: AnalysisSummary,
    pub errors: Vec<AnalysisError>,
}

impl Default for AnalysisResults {
    fn default() -> Self {
        Self::new()
    }
}

fn split_dependencies(table: &ResultTable, dependencies: &[String]) -> (Vec<String>, Vec<String>) {
    dependencies
        .iter()
        .cloned()
        .partition(|dependency| table.contains_key(dependency))
}

fn non_empty(name: &str) -> Option<String> {
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

impl AnalysisResults {
    /// Create a new empty AnalysisResults instance
    pub fn new() -> Self {
        Self {
            source_root: PathBuf::new(),
            files: Vec::new(),
            entities: Vec::new(),
            summary: AnalysisSummary::default(),
            errors: Vec::new(),
        }
    }

    /// Build the report for a finished run
    pub fn from_run(run: &AnalysisRun) -> Self {
        let table = &run.table;
        let mut results = Self::new();
        results.source_root = run.source_root.clone();

        for file in table.files() {
            let (resolved, unresolved) = split_dependencies(table, &file.dependencies);
            results.files.push(FileReport {
                key: file.key.clone(),
                path: file.absolute_path.clone(),
                language: file.language,
                module_name: non_empty(&file.module_name),
                resolved_dependencies: resolved,
                unresolved_dependencies: unresolved,
            });
        }

        for entity in table.entities() {
            let (resolved, unresolved) = split_dependencies(table, &entity.dependencies);
            results.entities.push(EntityReport {
                unique_name: entity.unique_name().to_string(),
                local_name: entity.local_name.clone(),
                module_name: non_empty(&entity.module_name),
                file: entity.file_key.clone(),
                inheritance: entity.inheritance.clone(),
                resolved_dependencies: resolved,
                unresolved_dependencies: unresolved,
            });
        }

        results.summary.parsing_hits = run.statistics.parsing_hits;
        results.summary.parsing_misses = run.statistics.parsing_misses;
        results.set_scan_duration(run.duration);
        results.finalize();
        results
    }

    /// Add an error to the results
    pub fn add_error(&mut self, path: PathBuf, error: &ScanError) {
        let severity = ErrorSeverity::from(error);

        let analysis_error = AnalysisError {
            path,
            error: error.user_message(),
            severity,
        };

        self.summary.update_with_error(&analysis_error);
        self.summary.errors_encountered += 1;
        self.errors.push(analysis_error);
    }

    /// Set the scan duration in the summary
    pub fn set_scan_duration(&mut self, duration: Duration) {
        self.summary.scan_duration = duration;
    }

    /// Every dependency and inheritance edge, files first
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges = Vec::new();

        for file in &self.files {
            for (targets, resolved) in [(&file.resolved_dependencies, true), (&file.unresolved_dependencies, false)] {
                edges.extend(targets.iter().map(|target| DependencyEdge {
                    source: file.key.clone(),
                    source_kind: "file".to_string(),
                    target: target.clone(),
                    kind: EdgeKind::Dependency,
                    resolved,
                }));
            }
        }

        for entity in &self.entities {
            let known = |name: &String| {
                self.entities.iter().any(|e| &e.unique_name == name) || self.files.iter().any(|f| &f.key == name)
            };
            edges.extend(entity.inheritance.iter().map(|parent| DependencyEdge {
                source: entity.unique_name.clone(),
                source_kind: "entity".to_string(),
                target: parent.clone(),
                kind: EdgeKind::Inheritance,
                resolved: known(parent),
            }));
            for (targets, resolved) in [(&entity.resolved_dependencies, true), (&entity.unresolved_dependencies, false)] {
                edges.extend(targets.iter().map(|target| DependencyEdge {
                    source: entity.unique_name.clone(),
                    source_kind: "entity".to_string(),
                    target: target.clone(),
                    kind: EdgeKind::Dependency,
                    resolved,
                }));
            }
        }

        edges
    }

    /// Get critical errors that occurred during analysis
    pub fn critical_errors(&self) -> Vec<&AnalysisError> {
        self.errors
            .iter()
            .filter(|e| matches!(e.severity, ErrorSeverity::Critical))
            .collect()
    }

    /// Check if there were any critical errors
    pub fn has_critical_errors(&self) -> bool {
        self.errors.iter().any(|e| matches!(e.severity, ErrorSeverity::Critical))
    }

    /// Finalize the results (calculate summary statistics)
    pub fn finalize(&mut self) {
        let summary = &mut self.summary;
        summary.total_files = self.files.len();
        summary.gdscript_files = self
            .files
            .iter()
            .filter(|f| f.language == LanguageType::GdScript)
            .count();
        summary.scene_files = summary.total_files - summary.gdscript_files;
        summary.total_entities = self.entities.len();

        let file_deps = self.files.iter().map(|f| (f.resolved_dependencies.len(), f.unresolved_dependencies.len()));
        let entity_deps = self
            .entities
            .iter()
            .map(|e| (e.resolved_dependencies.len(), e.unresolved_dependencies.len()));
        let (resolved, unresolved) = file_deps
            .chain(entity_deps)
            .fold((0, 0), |(r, u), (fr, fu)| (r + fr, u + fu));
        summary.resolved_dependencies = resolved;
        summary.unresolved_dependencies = unresolved;
        summary.total_dependencies = resolved + unresolved;

        // Update error counts
        summary.errors_encountered = self.errors.len();
        summary.warnings_count = self
            .errors
            .iter()
            .filter(|e| matches!(e.severity, ErrorSeverity::Warning))
            .count();
        summary.critical_errors_count = self
            .errors
            .iter()
            .filter(|e| matches!(e.severity, ErrorSeverity::Critical))
            .count();
    }
}

/// Summary statistics from analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_files: usize,
    pub gdscript_files: usize,
    pub scene_files: usize,
    pub total_entities: usize,
    pub total_dependencies: usize,
    pub resolved_dependencies: usize,
    pub unresolved_dependencies: usize,
    pub parsing_hits: usize,
    pub parsing_misses: usize,
    pub scan_duration: Duration,
    pub errors_encountered: usize,
    pub warnings_count: usize,
    pub critical_errors_count: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Default for AnalysisSummary {
    fn default() -> Self {
        Self {
            total_files: 0,
            gdscript_files: 0,
            scene_files: 0,
            total_entities: 0,
            total_dependencies: 0,
            resolved_dependencies: 0,
            unresolved_dependencies: 0,
            parsing_hits: 0,
            parsing_misses: 0,
            scan_duration: Duration::from_secs(0),
            errors_encountered: 0,
            warnings_count: 0,
            critical_errors_count: 0,
            timestamp: chrono::Utc::now(),
        }
    }
}

impl AnalysisSummary {
    /// Update error statistics based on an error
    pub fn update_with_error(&mut self, error: &AnalysisError) {
        match error.severity {
            ErrorSeverity::Warning => self.warnings_count += 1,
            ErrorSeverity::Critical => self.critical_errors_count += 1,
            _ => {} // Regular errors are already counted in errors_encountered
        }
    }

    /// Share of dependencies that name a known file or entity
    pub fn resolution_percentage(&self) -> f64 {
        if self.total_dependencies == 0 {
            return 0.0;
        }
        (self.resolved_dependencies as f64 / self.total_dependencies as f64) * 100.0
    }

    /// Share of grammar applications that matched
    pub fn hit_rate(&self) -> f64 {
        let attempts = self.parsing_hits + self.parsing_misses;
        if attempts == 0 {
            return 0.0;
        }
        (self.parsing_hits as f64 / attempts as f64) * 100.0
    }

    /// Format the scan duration as a human-readable string
    pub fn format_duration(&self) -> String {
        let secs = self.scan_duration.as_secs();
        let millis = self.scan_duration.subsec_millis();

        if secs == 0 {
            format!("{}ms", millis)
        } else if secs < 60 {
            format!("{}.{:03}s", secs, millis)
        } else {
            let mins = secs / 60;
            let secs = secs % 60;
            format!("{}m {}s", mins, secs)
        }
    }
}

/// Error that occurred during analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisError {
    pub path: PathBuf,
    pub error: String,
    pub severity: ErrorSeverity,
}

/// Severity level of analysis errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Warning,  // Log and continue (unreadable file, permission denied)
    Error,    // Log and skip current item
    Critical, // Stop execution (invalid configuration)
}

impl From<&ScanError> for ErrorSeverity {
    fn from(error: &ScanError) -> Self {
        match error.severity() {
            crate::error::ErrorSeverity::Warning => ErrorSeverity::Warning,
            crate::error::ErrorSeverity::Error => ErrorSeverity::Error,
            crate::error::ErrorSeverity::Critical => ErrorSeverity::Critical,
        }
    }
}
