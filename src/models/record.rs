//! File and entity records populated by the extractors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions that already name a concrete project file
pub const KNOWN_EXTENSIONS: [&str; 3] = ["gd", "tscn", "tres"];

/// Source language a record was scanned as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageType {
    /// GDScript (`.gd`)
    GdScript,
    /// Godot text scene or resource (`.tscn`, `.tres`)
    GodotScene,
}

impl LanguageType {
    /// Detect the language from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "gd" => Some(LanguageType::GdScript),
            "tscn" | "tres" => Some(LanguageType::GodotScene),
            _ => None,
        }
    }

    /// Extension appended to dotted dependency names during curation
    pub fn extension(&self) -> &'static str {
        match self {
            LanguageType::GdScript => "gd",
            LanguageType::GodotScene => "tscn",
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageType::GdScript => write!(f, "GDScript"),
            LanguageType::GodotScene => write!(f, "Godot scene"),
        }
    }
}

/// Raw text of one discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub file_name: String,
    pub absolute_path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(absolute_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let absolute_path = absolute_path.into();
        let file_name = absolute_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_name,
            absolute_path,
            content: content.into(),
        }
    }

    pub fn language(&self) -> Option<LanguageType> {
        LanguageType::from_path(&self.absolute_path)
    }
}

/// How a reference was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `load(...)` / `preload(...)`
    Load,
    /// `[ext_resource ...]` header with its declared resource type
    ExtResource { resource_type: String },
}

/// A raw path literal found by a reference grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFact {
    pub kind: ReferenceKind,
    /// Path body with any root marker removed
    pub path: String,
    /// Whether the literal carried the `res://` root marker
    pub rooted: bool,
}

impl ReferenceFact {
    pub fn new(kind: ReferenceKind, path: impl Into<String>, rooted: bool) -> Self {
        Self {
            kind,
            path: path.into(),
            rooted,
        }
    }
}

/// Append `dependency` unless it is already listed
///
/// Returns whether the list changed.
pub fn add_dependency(dependencies: &mut Vec<String>, dependency: impl Into<String>) -> bool {
    let dependency = dependency.into();
    if dependencies.contains(&dependency) {
        false
    } else {
        dependencies.push(dependency);
        true
    }
}

/// One scanned source file
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the parent of the source root, `/` separated
    pub key: String,
    pub absolute_path: PathBuf,
    pub file_name: String,
    /// `class_name` for scripts, file stem for scenes; empty when unknown
    pub module_name: String,
    pub language: LanguageType,
    pub tokens: Vec<String>,
    /// Raw text, kept for line-based scope splitting
    pub source: String,
    pub dependencies: Vec<String>,
}

impl FileRecord {
    pub fn new(
        key: impl Into<String>,
        absolute_path: impl Into<PathBuf>,
        file_name: impl Into<String>,
        language: LanguageType,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            key: key.into(),
            absolute_path: absolute_path.into(),
            file_name: file_name.into(),
            module_name: String::new(),
            language,
            tokens,
            source: String::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn add_dependency(&mut self, dependency: impl Into<String>) -> bool {
        add_dependency(&mut self.dependencies, dependency)
    }

    /// Directory of the file's key, used for file-relative references
    pub fn key_directory(&self) -> &str {
        match self.key.rfind('/') {
            Some(index) => &self.key[..index],
            None => "",
        }
    }
}

/// A named declaration discovered inside a file
#[derive(Debug, Clone)]
pub struct EntityRecord {
    pub local_name: String,
    pub module_name: String,
    unique_name: String,
    /// Parent names, raw until linked against siblings
    pub inheritance: Vec<String>,
    pub dependencies: Vec<String>,
    /// Key of the owning [`FileRecord`]
    pub file_key: String,
    pub language: LanguageType,
    pub tokens: Vec<String>,
}

impl EntityRecord {
    /// Create an entity whose unique name is fixed from here on
    pub fn new(
        local_name: impl Into<String>,
        module_name: impl Into<String>,
        unique_name: impl Into<String>,
        file_key: impl Into<String>,
        language: LanguageType,
        tokens: Vec<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            module_name: module_name.into(),
            unique_name: unique_name.into(),
            inheritance: Vec::new(),
            dependencies: Vec::new(),
            file_key: file_key.into(),
            language,
            tokens,
        }
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn add_dependency(&mut self, dependency: impl Into<String>) -> bool {
        add_dependency(&mut self.dependencies, dependency)
    }

    /// Whether `name` refers to this entity
    pub fn is_named(&self, name: &str) -> bool {
        name == self.unique_name || name == self.local_name
    }
}

/// Entry of the result table
#[derive(Debug, Clone)]
pub enum Record {
    File(FileRecord),
    Entity(EntityRecord),
}

impl Record {
    pub fn key(&self) -> &str {
        match self {
            Record::File(file) => &file.key,
            Record::Entity(entity) => entity.unique_name(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Record::File(_) => "file",
            Record::Entity(_) => "entity",
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Record::File(_))
    }
}
