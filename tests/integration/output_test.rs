//! Report output for a scanned project

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use gdscan::{
    core::Walker,
    models::{analysis::AnalysisResults, config::{OutputFormat, Settings}},
    output::{create_formatter, create_writer},
};

fn scan(root: &Path) -> AnalysisResults {
    fs::create_dir_all(root.join("ui")).unwrap();
    fs::write(root.join("ui/hud.gd"), "class_name Hud\nextends CanvasLayer\n").unwrap();
    fs::write(
        root.join("ui/hud.tscn"),
        "[ext_resource type=\"Script\" path=\"res://ui/hud.gd\" id=\"1\"]\n",
    )
    .unwrap();
    fs::write(
        root.join("game.gd"),
        "class_name Game\nextends Node\nvar hud : Hud\nconst HudScene = preload(\"res://ui/hud.tscn\")\n",
    )
    .unwrap();

    Walker::new(Settings {
        source_path: root.to_path_buf(),
        show_progress: false,
        ..Default::default()
    })
    .analyze()
    .unwrap()
}

#[test]
fn test_csv_report_to_file() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("shooter");
    let results = scan(&root);

    let report = dir.path().join("edges.csv");
    let content = create_formatter(OutputFormat::Csv, false, false, false).format(&results).unwrap();
    create_writer(Some(&report)).write(&content).unwrap();

    let written = fs::read_to_string(&report).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines[0], "Source,Source Kind,Target,Edge Kind,Resolved");
    assert!(lines.contains(&"shooter/ui/hud.tscn,file,shooter/ui/hud.gd,dependency,true"));
    assert!(lines.contains(&"Game,entity,Hud,dependency,true"));
    assert!(lines.contains(&"Game,entity,shooter/ui/hud.tscn,dependency,true"));
    assert!(lines.contains(&"Hud,entity,CanvasLayer,inheritance,false"));
}

#[test]
fn test_json_report_shape() {
    let dir = TempDir::new().unwrap();
    let results = scan(&dir.path().join("shooter"));

    let content = create_formatter(OutputFormat::Json, false, false, false).format(&results).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(json["summary"]["total_files"], 3);
    assert_eq!(json["summary"]["gdscript_files"], 2);
    assert_eq!(json["summary"]["scene_files"], 1);
    let game = json["entities"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["unique_name"] == "Game")
        .unwrap();
    assert_eq!(game["inheritance"][0], "Node");
    assert_eq!(game["file"], "shooter/game.gd");
}

#[test]
fn test_text_report_mentions_every_entity() {
    let dir = TempDir::new().unwrap();
    let results = scan(&dir.path().join("shooter"));

    let text = create_formatter(OutputFormat::Text, false, true, false).format(&results).unwrap();
    assert!(text.contains("Game extends Node"));
    assert!(text.contains("Hud extends CanvasLayer"));
    assert!(text.contains("shooter/ui/hud.tscn [Godot scene]"));
}
