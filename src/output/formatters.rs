//! Output formatting functionality
//!
//! This module provides formatters for different output formats.

use crate::error::{Result, ScanError};
use crate::models::analysis::{AnalysisResults, EntityReport, ErrorSeverity, FileReport};
use ansi_term::Colour::{Blue, Cyan, Green, Purple, Red, Yellow};
use ansi_term::Style;

fn paint(text: impl Into<String>, style: Style, use_colors: bool) -> String {
    let text = text.into();
    if use_colors {
        style.paint(text).to_string()
    } else {
        text
    }
}

fn dependency_lines(output: &mut String, resolved: &[String], unresolved: &[String], use_colors: bool) {
    for dependency in resolved {
        output.push_str(&format!("    -> {}\n", paint(dependency.as_str(), Green.normal(), use_colors)));
    }
    for dependency in unresolved {
        output.push_str(&format!(
            "    -> {} {}\n",
            dependency,
            paint("(external)", Style::new().dimmed(), use_colors)
        ));
    }
}

/// Format one file report as text
pub fn format_file_text(file: &FileReport, use_colors: bool) -> String {
    let mut output = format!(
        "  {} [{}]\n",
        paint(file.key.as_str(), Blue.bold(), use_colors),
        file.language
    );
    if let Some(module) = &file.module_name {
        output.push_str(&format!("    module: {}\n", module));
    }
    dependency_lines(
        &mut output,
        &file.resolved_dependencies,
        &file.unresolved_dependencies,
        use_colors,
    );
    output
}

/// Format one entity report as text
pub fn format_entity_text(entity: &EntityReport, use_colors: bool, verbose: bool) -> String {
    let mut output = format!("  {}", paint(entity.unique_name.as_str(), Cyan.bold(), use_colors));
    if !entity.inheritance.is_empty() {
        output.push_str(&format!(
            " extends {}",
            paint(entity.inheritance.join(", "), Purple.normal(), use_colors)
        ));
    }
    let dependency_count = entity.resolved_dependencies.len() + entity.unresolved_dependencies.len();
    output.push_str(&format!(" ({} deps)\n", dependency_count));

    if verbose {
        output.push_str(&format!(
            "    {}\n",
            paint(format!("declared in {}", entity.file), Style::new().dimmed(), use_colors)
        ));
        dependency_lines(
            &mut output,
            &entity.resolved_dependencies,
            &entity.unresolved_dependencies,
            use_colors,
        );
    }
    output
}

/// Format analysis results as text
pub fn format_results_text(results: &AnalysisResults, use_colors: bool, verbose: bool) -> String {
    let mut output = String::new();
    let summary = &results.summary;

    output.push_str(&format!("{}\n\n", paint("Godot Project Analysis", Blue.bold(), use_colors)));
    if !results.source_root.as_os_str().is_empty() {
        output.push_str(&format!("Source root: {}\n", results.source_root.display()));
    }

    output.push_str(&format!(
        "Files scanned: {} ({} GDScript, {} scene/resource)\n",
        summary.total_files, summary.gdscript_files, summary.scene_files
    ));
    output.push_str(&format!("Entities: {}\n", summary.total_entities));
    output.push_str(&format!(
        "Dependencies: {} ({} resolved, {} external, {:.1}% resolved)\n",
        summary.total_dependencies,
        summary.resolved_dependencies,
        summary.unresolved_dependencies,
        summary.resolution_percentage()
    ));
    output.push_str(&format!(
        "Grammar matches: {} hits, {} misses ({:.1}% hit rate)\n",
        summary.parsing_hits,
        summary.parsing_misses,
        summary.hit_rate()
    ));
    output.push_str(&format!("Scan duration: {}\n", summary.format_duration()));

    if summary.errors_encountered > 0 {
        output.push_str(&format!(
            "\n{}\n",
            paint(
                format!("Errors encountered: {}", summary.errors_encountered),
                Yellow.bold(),
                use_colors
            )
        ));
        output.push_str(&format!("  Warnings: {}\n", summary.warnings_count));
        output.push_str(&format!("  Critical errors: {}\n", summary.critical_errors_count));
    }

    if !results.entities.is_empty() {
        output.push_str("\nEntities:\n");
        for entity in &results.entities {
            output.push_str(&format_entity_text(entity, use_colors, verbose));
        }
    }

    if verbose {
        output.push_str("\nFiles:\n");
        for file in &results.files {
            output.push_str(&format_file_text(file, use_colors));
        }

        if !results.errors.is_empty() {
            output.push_str("\nErrors:\n");
            for error in &results.errors {
                let severity = match error.severity {
                    ErrorSeverity::Warning => paint("WARNING", Yellow.normal(), use_colors),
                    ErrorSeverity::Error => paint("ERROR", Red.normal(), use_colors),
                    ErrorSeverity::Critical => paint("CRITICAL", Red.bold(), use_colors),
                };
                output.push_str(&format!("  [{}] {}: {}\n", severity, error.path.display(), error.error));
            }
        }
    }

    output
}

/// Format analysis results as a single summary line
pub fn format_results_quiet(results: &AnalysisResults) -> String {
    let summary = &results.summary;
    let mut output = format!(
        "Files: {}, entities: {}, dependencies: {} ({} resolved)\n",
        summary.total_files, summary.total_entities, summary.total_dependencies, summary.resolved_dependencies
    );
    if summary.critical_errors_count > 0 {
        output.push_str(&format!("Critical errors: {}\n", summary.critical_errors_count));
    }
    output
}

/// Format analysis results as JSON
pub fn format_results_json(results: &AnalysisResults, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(results)
    } else {
        serde_json::to_string(results)
    };
    json.map_err(|e| ScanError::JsonSerialize { source: e })
}

/// Format analysis results as CSV, one row per dependency edge
pub fn format_results_csv(results: &AnalysisResults) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);

    writer.write_record(["Source", "Source Kind", "Target", "Edge Kind", "Resolved"])?;

    for edge in results.edges() {
        writer.write_record([
            edge.source.as_str(),
            edge.source_kind.as_str(),
            edge.target.as_str(),
            edge.kind.to_string().as_str(),
            if edge.resolved { "true" } else { "false" },
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ScanError::io_error(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScanError::CsvSerialize { source: e })
}
