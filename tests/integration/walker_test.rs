//! Discovery and loading behaviour of the walker

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use gdscan::{
    core::Walker,
    error::ScanError,
    models::config::Settings,
};

fn settings(root: &Path) -> Settings {
    Settings {
        source_path: root.to_path_buf(),
        show_progress: false,
        ..Default::default()
    }
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    let mut names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn create_tree(root: &Path) {
    for dir in ["scripts/ai", "scenes", "tests", ".import", "docs"] {
        fs::create_dir_all(root.join(dir)).unwrap();
    }
    fs::write(root.join("scripts/enemy.gd"), "class_name Enemy\n").unwrap();
    fs::write(root.join("scripts/ai/brain.gd"), "class_name Brain\n").unwrap();
    fs::write(root.join("scenes/world.tscn"), "[gd_scene format=3]\n").unwrap();
    fs::write(root.join("scenes/theme.tres"), "[gd_resource type=\"Theme\" format=3]\n").unwrap();
    fs::write(root.join("tests/test_enemy.gd"), "extends GutTest\n").unwrap();
    fs::write(root.join(".import/icon.gd"), "extends Node\n").unwrap();
    fs::write(root.join("docs/readme.md"), "# docs\n").unwrap();
    fs::write(root.join("project.godot"), "config_version=5\n").unwrap();
}

#[test]
fn test_discovers_all_godot_sources() {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path());

    let (files, errors) = Walker::new(settings(dir.path())).discover().unwrap();
    assert_eq!(
        file_names(&files),
        vec!["brain.gd", "enemy.gd", "test_enemy.gd", "theme.tres", "world.tscn"]
    );
    assert!(errors.is_empty());
}

#[test]
fn test_user_exclude_patterns() {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path());

    let mut settings = settings(dir.path());
    settings.exclude_patterns = vec!["tests".to_string(), "scripts/ai".to_string(), "*.tres".to_string()];

    let (files, _) = Walker::new(settings).discover().unwrap();
    assert_eq!(file_names(&files), vec!["enemy.gd", "world.tscn"]);
}

#[test]
fn test_scene_switch_and_depth() {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path());

    let mut settings = settings(dir.path());
    settings.include_scenes = false;
    settings.max_depth = Some(2);

    let (files, _) = Walker::new(settings).discover().unwrap();
    assert_eq!(file_names(&files), vec!["enemy.gd", "test_enemy.gd"]);
}

#[test]
fn test_file_as_root_is_invalid() {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path());

    let walker = Walker::new(settings(&dir.path().join("project.godot")));
    assert!(matches!(walker.analyze(), Err(ScanError::InvalidPath { .. })));
}

#[test]
fn test_invalid_utf8_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    create_tree(dir.path());
    fs::write(dir.path().join("scripts/latin1.gd"), b"# caf\xe9\nextends Node\n").unwrap();

    let results = Walker::new(settings(dir.path())).analyze().unwrap();

    assert_eq!(results.summary.total_files, 5);
    assert_eq!(results.errors.len(), 1);
    assert!(results.errors[0].path.ends_with("scripts/latin1.gd"));
    assert_eq!(results.summary.warnings_count, 1);
    assert!(!results.has_critical_errors());
}

#[cfg(unix)]
#[test]
fn test_symlinked_directories_follow_setting() {
    let dir = TempDir::new().unwrap();
    let project = dir.path().join("project");
    let shared = dir.path().join("shared");
    fs::create_dir_all(&project).unwrap();
    fs::create_dir_all(&shared).unwrap();
    fs::write(project.join("main.gd"), "extends Node\n").unwrap();
    fs::write(shared.join("lib.gd"), "class_name Lib\n").unwrap();
    std::os::unix::fs::symlink(&shared, project.join("shared")).unwrap();

    let (files, _) = Walker::new(settings(&project)).discover().unwrap();
    assert_eq!(file_names(&files), vec!["main.gd"]);

    let mut following = settings(&project);
    following.follow_links = true;
    let (files, _) = Walker::new(following).discover().unwrap();
    assert_eq!(file_names(&files), vec!["lib.gd", "main.gd"]);
}
