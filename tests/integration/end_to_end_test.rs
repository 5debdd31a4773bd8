//! End-to-end tests over a small Godot project on disk

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use gdscan::{
    core::Walker,
    models::{analysis::AnalysisResults, config::Settings},
};

/// Write a project named `demo` with scripts, inner classes and scenes
fn create_demo_project(base: &Path) -> std::path::PathBuf {
    let root = base.join("demo");
    for dir in ["actors", "data", "items", "levels", "addons/tool", ".godot/editor"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }

    fs::write(
        root.join("actors/actor.gd"),
        "class_name Actor\n\
         extends CharacterBody2D\n\
         const Stats = preload(\"res://data/stats.gd\")\n\
         \n\
         class Hitbox:\n\
         \tvar owner_actor : Actor\n",
    )
    .unwrap();
    fs::write(
        root.join("actors/player.gd"),
        "class_name Player\n\
         extends Actor\n\
         \n\
         var weapon : Weapon\n\
         \n\
         func _ready():\n\
         \tvar stats = load(\"../data/stats.gd\")\n",
    )
    .unwrap();
    fs::write(root.join("data/stats.gd"), "class_name Stats\nextends Resource\n").unwrap();
    fs::write(
        root.join("items/weapon.gd"),
        "class_name Weapon\n\
         extends Node\n\
         \n\
         class Sword extends Weapon:\n\
         \tpass\n",
    )
    .unwrap();
    fs::write(root.join("levels/level.tscn"), "[gd_scene format=3]\n\n[node name=\"Level\" type=\"Node2D\"]\n").unwrap();
    fs::write(
        root.join("main.tscn"),
        "[gd_scene load_steps=4 format=3 uid=\"uid://b1\"]\n\
         \n\
         [ext_resource type=\"Script\" path=\"res://actors/player.gd\" id=\"1_a\"]\n\
         [ext_resource type=\"PackedScene\" uid=\"uid://c2\" path=\"res://levels/level.tscn\" id=\"2_b\"]\n\
         [ext_resource type=\"Texture2D\" path=\"res://icon.svg\" id=\"3_c\"]\n\
         \n\
         [node name=\"Main\" type=\"Node2D\"]\n",
    )
    .unwrap();
    fs::write(root.join("addons/tool/plugin.gd"), "extends EditorPlugin\n").unwrap();
    fs::write(root.join(".godot/editor/cache.gd"), "extends Node\n").unwrap();
    root
}

fn analyze(root: &Path) -> AnalysisResults {
    let settings = Settings {
        source_path: root.to_path_buf(),
        show_progress: false,
        ..Default::default()
    };
    Walker::new(settings).analyze().unwrap()
}

#[test]
fn test_demo_project_files_and_scene_dependencies() {
    let dir = TempDir::new().unwrap();
    let results = analyze(&create_demo_project(dir.path()));

    let keys: Vec<&str> = results.files.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "demo/actors/actor.gd",
            "demo/actors/player.gd",
            "demo/data/stats.gd",
            "demo/items/weapon.gd",
            "demo/levels/level.tscn",
            "demo/main.tscn",
        ]
    );

    let main = results.files.iter().find(|f| f.key == "demo/main.tscn").unwrap();
    assert_eq!(
        main.resolved_dependencies,
        vec!["demo/actors/player.gd", "demo/levels/level.tscn"]
    );
    assert!(main.unresolved_dependencies.is_empty());

    let actor = results.files.iter().find(|f| f.key == "demo/actors/actor.gd").unwrap();
    assert_eq!(actor.resolved_dependencies, vec!["demo/data/stats.gd"]);
    assert_eq!(actor.unresolved_dependencies, vec!["CharacterBody2D"]);
}

#[test]
fn test_demo_project_entities() {
    let dir = TempDir::new().unwrap();
    let results = analyze(&create_demo_project(dir.path()));

    let names: Vec<&str> = results.entities.iter().map(|e| e.unique_name.as_str()).collect();
    for expected in ["Actor", "Actor.Hitbox", "Player", "Stats", "Weapon", "Weapon.Sword"] {
        assert!(names.contains(&expected), "missing entity {}", expected);
    }
    assert_eq!(results.summary.total_entities, 6);

    let player = results.entities.iter().find(|e| e.unique_name == "Player").unwrap();
    assert_eq!(player.inheritance, vec!["Actor"]);
    assert!(player.resolved_dependencies.contains(&"demo/data/stats.gd".to_string()));
    assert!(player.resolved_dependencies.contains(&"Weapon".to_string()));

    let hitbox = results.entities.iter().find(|e| e.unique_name == "Actor.Hitbox").unwrap();
    assert_eq!(hitbox.resolved_dependencies, vec!["Actor"]);
    assert_eq!(hitbox.file, "demo/actors/actor.gd");

    let sword = results.entities.iter().find(|e| e.unique_name == "Weapon.Sword").unwrap();
    assert_eq!(sword.inheritance, vec!["Weapon"]);
}

#[test]
fn test_malformed_header_counts_a_miss_and_scan_continues() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("broken");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("bad.gd"), "class_name\nextends Node\n").unwrap();
    fs::write(root.join("good.gd"), "class_name Good\nextends Node\n").unwrap();

    let results = analyze(&root);

    assert_eq!(results.summary.total_files, 2);
    assert!(results.summary.parsing_misses >= 1);
    assert!(results.summary.parsing_hits >= 2);
    assert!(results.entities.iter().any(|e| e.unique_name == "Good"));
    assert!(results.errors.is_empty());
}

#[test]
fn test_runs_are_deterministic() {
    let dir = TempDir::new().unwrap();
    let root = create_demo_project(dir.path());

    let first = serde_json::to_value(&analyze(&root).entities).unwrap();
    let serial = Walker::new(Settings {
        source_path: root.clone(),
        parallel: false,
        show_progress: false,
        ..Default::default()
    })
    .analyze()
    .unwrap();

    assert_eq!(first, serde_json::to_value(&serial.entities).unwrap());
}
