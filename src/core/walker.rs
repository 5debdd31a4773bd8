//! Directory walking functionality
//!
//! This module discovers GDScript and scene files under the project root
//! with pattern-based exclusion and depth limiting, loads them as text and
//! hands them to the [`Analyzer`].

use crate::core::analyzer::Analyzer;
use crate::error::{IoResultExt, Result, ScanError};
use crate::models::record::{LanguageType, SourceFile};
use crate::models::{analysis::AnalysisResults, config::Settings};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Engine-generated directories that never hold project sources
const GENERATED_DIRS: &[&str] = &[".godot", ".import"];

/// Files found by discovery plus the non-critical errors met on the way
pub type Discovery = (Vec<PathBuf>, Vec<(PathBuf, ScanError)>);

/// Main walker for directory traversal and analysis
pub struct Walker {
    settings: Settings,
}

impl Walker {
    /// Create a new walker with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Get the current settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn checked_root(&self) -> Result<PathBuf> {
        let root = &self.settings.source_path;
        if !root.is_dir() {
            return Err(ScanError::InvalidPath { path: root.clone() });
        }
        fs::canonicalize(root).map_err(|_| ScanError::InvalidPath { path: root.clone() })
    }

    /// Compile exclude patterns into glob patterns
    fn compile_exclude_patterns(&self) -> Result<Vec<Pattern>> {
        self.settings
            .exclude_patterns
            .iter()
            .map(|pattern| Pattern::new(pattern).map_err(ScanError::from))
            .collect()
    }

    /// Check if a path relative to the root matches any exclude pattern
    ///
    /// Patterns are tried against the whole relative path and against every
    /// component, so `addons` excludes `addons/` at any depth.
    pub fn is_excluded(relative: &Path, patterns: &[Pattern]) -> bool {
        let whole = relative.to_string_lossy().replace('\\', "/");
        if patterns.iter().any(|pattern| pattern.matches(&whole)) {
            return true;
        }
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            GENERATED_DIRS.contains(&name.as_ref()) || patterns.iter().any(|pattern| pattern.matches(&name))
        })
    }

    fn classify_walk_error(err: walkdir::Error, root: &Path) -> (PathBuf, ScanError) {
        let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
        let error = match err.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => ScanError::permission_denied(&path),
            _ => ScanError::directory_traversal_error(&path, format!("Failed to read directory: {}", err)),
        };
        (path, error)
    }

    /// Find every `.gd`, `.tscn` and `.tres` file below the source root
    ///
    /// Scene formats are left out when `include_scenes` is off. The result
    /// is sorted so runs are reproducible.
    pub fn discover(&self) -> Result<Discovery> {
        let root = self.checked_root()?;
        let exclude_patterns = self.compile_exclude_patterns()?;

        let mut walk = WalkDir::new(&root).follow_links(self.settings.follow_links);
        if let Some(max_depth) = self.settings.max_depth {
            walk = walk.max_depth(max_depth);
        }

        let keep = |entry: &DirEntry| match entry.path().strip_prefix(&root) {
            Ok(relative) if entry.depth() > 0 => !Self::is_excluded(relative, &exclude_patterns),
            _ => true,
        };

        let mut files = Vec::new();
        let mut errors = Vec::new();
        for entry in walk.into_iter().filter_entry(keep) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let (path, error) = Self::classify_walk_error(err, &root);
                    warn!("{}", error.user_message());
                    errors.push((path, error));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match LanguageType::from_path(entry.path()) {
                Some(LanguageType::GodotScene) if !self.settings.include_scenes => {}
                Some(_) => files.push(entry.into_path()),
                None => {}
            }
        }

        files.sort();
        debug!("discovered {} source files under {}", files.len(), root.display());
        Ok((files, errors))
    }

    /// Read every path as UTF-8 text
    ///
    /// Unreadable files are returned as warnings and left out.
    pub fn load_sources(&self, paths: &[PathBuf]) -> (Vec<SourceFile>, Vec<(PathBuf, ScanError)>) {
        let mut sources = Vec::with_capacity(paths.len());
        let mut errors = Vec::new();
        for path in paths {
            match fs::read_to_string(path).with_file_context(path) {
                Ok(content) => sources.push(SourceFile::new(path.clone(), content)),
                Err(error) => {
                    warn!("{}", error.user_message());
                    errors.push((path.clone(), error));
                }
            }
        }
        (sources, errors)
    }

    fn analyzer(&self, root: &Path) -> Analyzer {
        Analyzer::new(root)
            .with_parallel(self.settings.parallel)
            .with_scenes(self.settings.include_scenes)
    }

    /// Discover, load and analyze the configured project
    pub fn analyze(&self) -> Result<AnalysisResults> {
        self.analyze_with_progress(|_, _, _| {})
    }

    /// Analyze with progress reporting
    ///
    /// `progress_fn` receives `(done, total, message)`; it is called from
    /// worker threads during extraction.
    pub fn analyze_with_progress<F>(&self, progress_fn: F) -> Result<AnalysisResults>
    where
        F: Fn(usize, usize, &str) + Sync,
    {
        let root = self.checked_root()?;
        progress_fn(0, 0, &format!("Scanning directory: {}", root.display()));

        let (paths, walk_errors) = self.discover()?;
        let (sources, read_errors) = self.load_sources(&paths);
        let total = sources.len();
        progress_fn(0, total, &format!("Found {} source files", total));

        let done = AtomicUsize::new(0);
        let on_file = || {
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress_fn(current, total, "Extracting");
        };
        let run = self.analyzer(&root).run_with_progress(&sources, &on_file);

        let mut results = AnalysisResults::from_run(&run);
        for (path, err) in walk_errors.iter().chain(read_errors.iter()) {
            results.add_error(path.clone(), err);
        }
        results.finalize();

        info!(
            "analyzed {} files and {} entities in {}",
            results.summary.total_files,
            results.summary.total_entities,
            results.summary.format_duration()
        );
        progress_fn(total, total, "Analysis complete");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("actors/enemies")).unwrap();
        fs::create_dir_all(root.join(".godot/imported")).unwrap();
        fs::create_dir_all(root.join("addons/tool")).unwrap();
        fs::write(root.join("main.tscn"), "[gd_scene format=3]\n").unwrap();
        fs::write(root.join("actors/actor.gd"), "class_name Actor\n").unwrap();
        fs::write(root.join("actors/enemies/slime.gd"), "extends Actor\n").unwrap();
        fs::write(root.join(".godot/imported/cache.gd"), "extends Node\n").unwrap();
        fs::write(root.join("addons/tool/plugin.gd"), "extends EditorPlugin\n").unwrap();
        fs::write(root.join("icon.svg"), "<svg/>").unwrap();
        dir
    }

    fn settings(root: &Path) -> Settings {
        Settings {
            source_path: root.to_path_buf(),
            ..Default::default()
        }
    }

    fn names(files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_discover_skips_generated_and_excluded_dirs() {
        let dir = project();
        let (files, errors) = Walker::new(settings(dir.path())).discover().unwrap();

        let mut found = names(&files);
        found.sort();
        assert_eq!(found, vec!["actor.gd", "main.tscn", "slime.gd"]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_discover_honours_depth_and_scene_switch() {
        let dir = project();
        let mut settings = settings(dir.path());
        settings.max_depth = Some(2);
        settings.include_scenes = false;

        let (files, _) = Walker::new(settings).discover().unwrap();
        assert_eq!(names(&files), vec!["actor.gd"]);
    }

    #[test]
    fn test_missing_root_is_invalid_path() {
        let walker = Walker::new(settings(Path::new("/definitely/not/here")));
        assert!(matches!(walker.discover(), Err(ScanError::InvalidPath { .. })));
        assert!(matches!(walker.analyze(), Err(ScanError::InvalidPath { .. })));
    }

    #[test]
    fn test_bad_exclude_pattern_is_an_error() {
        let dir = project();
        let mut settings = settings(dir.path());
        settings.exclude_patterns = vec!["[".to_string()];
        assert!(matches!(
            Walker::new(settings).discover(),
            Err(ScanError::GlobPattern { .. })
        ));
    }

    #[test]
    fn test_unreadable_source_becomes_warning() {
        let dir = project();
        let bad = dir.path().join("broken.gd");
        fs::write(&bad, [0xff, 0xfe, 0x00]).unwrap();

        let walker = Walker::new(settings(dir.path()));
        let (sources, errors) = walker.load_sources(&[bad.clone(), dir.path().join("actors/actor.gd")]);
        assert_eq!(sources.len(), 1);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, bad);
        assert!(matches!(&errors[0].1, ScanError::SourceRead { path, .. } if path == &bad));
        assert!(!errors[0].1.is_critical());
    }

    #[test]
    fn test_analyze_reports_progress() {
        let dir = project();
        let calls = AtomicUsize::new(0);
        let results = Walker::new(settings(dir.path()))
            .analyze_with_progress(|_, _, _| {
                calls.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        assert_eq!(results.summary.total_files, 3);
        // scan + found + one per file + complete
        assert_eq!(calls.load(Ordering::Relaxed), 6);
        assert!(results.entities.iter().any(|e| e.local_name == "Actor"));
    }

    #[test]
    fn test_is_excluded_matches_components() {
        let patterns = vec![Pattern::new("addons").unwrap(), Pattern::new("*.tmp.gd").unwrap()];
        assert!(Walker::is_excluded(Path::new("addons/x/y.gd"), &patterns));
        assert!(Walker::is_excluded(Path::new("a/b.tmp.gd"), &patterns));
        assert!(Walker::is_excluded(Path::new(".godot/x.gd"), &patterns));
        assert!(!Walker::is_excluded(Path::new("game/addon.gd"), &patterns));
    }
}
