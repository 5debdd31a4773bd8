//! Lexical path resolution for table keys
//!
//! Keys are `/` separated paths relative to the parent of the analyzed
//! source root, so a project at `/work/game` produces keys like
//! `game/player.gd`. Resolution never touches the file system.

use std::path::{Component, Path};

/// Collapse `.` and `..` segments of a `/` separated path
///
/// Returns `None` when a `..` would climb above the start of the path.
pub fn normalize(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    Some(segments.join("/"))
}

/// Key of a project-rooted literal (`res://<literal>`)
///
/// `root_name` is the last component of the source root, i.e. the first
/// segment every key in the project starts with. Returns `None` when the
/// literal climbs out of the project root.
pub fn resolve_rooted(root_name: &str, literal: &str) -> Option<String> {
    if root_name.is_empty() {
        normalize(literal)
    } else {
        within_root(root_name, normalize(&format!("{}/{}", root_name, literal))?)
    }
}

/// Key of a literal relative to the directory of the referencing file
///
/// `file_directory` is itself in key form (see [`crate::models::record::FileRecord::key_directory`]).
/// The project root is the floor, as for [`resolve_rooted`].
pub fn resolve_file_relative(root_name: &str, file_directory: &str, literal: &str) -> Option<String> {
    let resolved = if file_directory.is_empty() {
        normalize(literal)?
    } else {
        normalize(&format!("{}/{}", file_directory, literal))?
    };

    if root_name.is_empty() {
        Some(resolved)
    } else {
        within_root(root_name, resolved)
    }
}

fn within_root(root_name: &str, key: String) -> Option<String> {
    let inside = key
        .strip_prefix(root_name)
        .is_some_and(|rest| rest.starts_with('/'));
    inside.then_some(key)
}

/// Express `path` as a key relative to `base`
pub fn to_key(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let segments: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Last component of the source root, or empty for a file-system root
pub fn root_name(source_root: &Path) -> String {
    source_root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
