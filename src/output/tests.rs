//! Tests for output formatting

use crate::core::analyzer::Analyzer;
use crate::error::ScanError;
use crate::models::analysis::AnalysisResults;
use crate::models::config::OutputFormat;
use crate::models::record::SourceFile;
use crate::output::{create_formatter, create_writer, CsvFormatter, FileWriter, Formatter, JsonFormatter, OutputWriter, TextFormatter};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn create_test_results() -> AnalysisResults {
    let root = Path::new("/work/game");
    let sources = vec![
        SourceFile::new(root.join("actor.gd"), "class_name Actor\nextends CharacterBody2D\n"),
        SourceFile::new(
            root.join("player.gd"),
            "class_name Player\nextends Actor\nconst Hud = preload(\"res://ui/hud.gd\")\n",
        ),
        SourceFile::new(
            root.join("main.tscn"),
            "[ext_resource type=\"Script\" path=\"res://player.gd\" id=\"1\"]\n",
        ),
    ];
    let mut results = AnalysisResults::from_run(&Analyzer::new(root).with_parallel(false).run(&sources));
    results.add_error(
        PathBuf::from("/work/game/broken.gd"),
        &ScanError::source_read_error("/work/game/broken.gd", std::io::Error::other("stream did not contain valid UTF-8")),
    );
    results
}

#[test]
fn test_text_formatter_modes() {
    let results = create_test_results();

    let normal = TextFormatter::new(false, false, false).format(&results).unwrap();
    assert!(normal.contains("Godot Project Analysis"));
    assert!(normal.contains("Files scanned: 3 (2 GDScript, 1 scene/resource)"));
    assert!(normal.contains("Player extends Actor"));
    assert!(normal.contains("Errors encountered: 1"));
    assert!(!normal.contains("Files:\n"));

    let verbose = TextFormatter::new(false, true, false).format(&results).unwrap();
    assert!(verbose.contains("Files:\n"));
    assert!(verbose.contains("-> game/player.gd"));
    assert!(verbose.contains("[WARNING]"));

    let quiet = TextFormatter::new(false, false, true).format(&results).unwrap();
    assert!(quiet.starts_with("Files: 3, entities: 2"));
    assert!(!quiet.contains("Godot Project Analysis"));
}

#[test]
fn test_text_formatter_colors() {
    let results = create_test_results();
    let colored = TextFormatter::new(true, false, false).format(&results).unwrap();
    let plain = TextFormatter::new(false, false, false).format(&results).unwrap();
    assert!(colored.contains("\u{1b}["));
    assert!(!plain.contains("\u{1b}["));
}

#[test]
fn test_json_formatter() {
    let results = create_test_results();
    let output = JsonFormatter::new(true).format(&results).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["summary"]["total_files"], 3);
    assert!(parsed["files"].as_array().unwrap().iter().any(|f| f["key"] == "game/main.tscn"));
    assert_eq!(parsed["errors"][0]["severity"], "Warning");

    let compact = JsonFormatter::new(false).format(&results).unwrap();
    assert!(!compact.contains('\n'));
}

#[test]
fn test_csv_formatter_rows_are_edges() {
    let results = create_test_results();
    let output = CsvFormatter::new().format(&results).unwrap();

    let mut reader = csv::Reader::from_reader(output.as_bytes());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "Source");
    assert_eq!(headers.len(), 5);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), results.edges().len());
    assert!(rows
        .iter()
        .any(|r| &r[0] == "game/main.tscn" && &r[2] == "game/player.gd" && &r[4] == "true"));
    assert!(rows
        .iter()
        .any(|r| &r[0] == "Player" && &r[2] == "Actor" && &r[3] == "inheritance"));
}

#[test]
fn test_create_formatter_picks_format() {
    let results = create_test_results();
    let json = create_formatter(OutputFormat::Json, false, false, false)
        .format(&results)
        .unwrap();
    assert!(json.trim_start().starts_with('{'));

    let csv = create_formatter(OutputFormat::Csv, false, false, false)
        .format(&results)
        .unwrap();
    assert!(csv.starts_with("Source,"));
}

#[test]
fn test_file_writer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.txt");

    FileWriter::new(&path).write("report body").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "report body");

    create_writer(Some(&path)).write("replaced").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "replaced");
}

#[test]
fn test_file_writer_missing_directory() {
    let dir = tempdir().unwrap();
    let writer = FileWriter::new(dir.path().join("missing").join("report.txt"));
    assert!(matches!(writer.write("x"), Err(ScanError::OutputWrite { .. })));
}
