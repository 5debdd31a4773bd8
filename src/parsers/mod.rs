//! Parsing functionality for Godot project sources
//!
//! This module provides the token stream cursor, the window grammar
//! matcher, and one extractor per source language (GDScript scripts and
//! Godot text scenes/resources).

pub mod gdscript;
pub mod godot_grammars;
pub mod grammar;
pub mod scene;
pub mod scope;
pub mod tokenizer;
pub mod type_usage;

pub use gdscript::GdScriptParser;
pub use grammar::{Grammar, ParseFailure, ParseResults, Pattern};
pub use scene::SceneParser;
pub use scope::{CommentMarkers, Scope, ScopeSplitter, ScopingMode};
pub use tokenizer::{materialize_window, preprocess, read_ahead, TokenMappings, Window};
pub use type_usage::detect_type_usages;

use crate::core::curator::DependencyCurator;
use crate::models::record::{EntityRecord, FileRecord, LanguageType, SourceFile};
use crate::models::statistics::StatisticsSink;

/// Owned result of extracting one file in the first phase
#[derive(Debug, Clone)]
pub struct FileExtraction {
    pub file: FileRecord,
    /// Entities known from file-level facts alone
    pub entities: Vec<EntityRecord>,
}

/// Per-language extractor
///
/// Implementations never fail: grammar mismatches are counted through the
/// statistics sink and the scan moves on.
pub trait SourceParser: Send + Sync {
    fn language(&self) -> LanguageType;

    /// Phase one: tokenize the file and collect its file-level facts
    fn extract_file(
        &self,
        source: &SourceFile,
        key: &str,
        curator: &DependencyCurator,
        stats: &dyn StatisticsSink,
    ) -> FileExtraction;

    /// Phase two: entities declared inside an already extracted file, named but not yet linked
    fn extract_entities(&self, file: &FileRecord, stats: &dyn StatisticsSink) -> Vec<EntityRecord>;
}
