//! Godot text scene / resource extraction
//!
//! Only `[ext_resource]` headers carry dependencies, and only when they
//! point at a script or another packed scene.

use tracing::debug;

use super::godot_grammars::{ext_resource, EXT_RESOURCE_KEYWORD, FOREIGN_SCHEMES, PATH, RESOURCE_TYPE, ROOT};
use super::grammar::Grammar;
use super::tokenizer::{preprocess, read_ahead, TokenMappings};
use super::{FileExtraction, SourceParser};
use crate::core::curator::DependencyCurator;
use crate::models::record::{EntityRecord, FileRecord, LanguageType, ReferenceFact, ReferenceKind, SourceFile};
use crate::models::statistics::{StatKey, StatisticsSink};

/// Resource types that become dependencies
pub const DEPENDENCY_RESOURCE_TYPES: [&str; 2] = ["Script", "PackedScene"];

const HEADER_OPEN: &str = "[";

/// Parser for `.tscn` / `.tres` files
#[derive(Debug, Clone)]
pub struct SceneParser {
    mappings: TokenMappings,
    resource: Grammar,
}

impl Default for SceneParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneParser {
    pub fn new() -> Self {
        Self {
            mappings: TokenMappings::godot(),
            resource: ext_resource(),
        }
    }

    /// Script and scene references declared by `[ext_resource]` headers
    pub fn extract_resources(&self, tokens: &[String], stats: &dyn StatisticsSink) -> Vec<ReferenceFact> {
        let mut references = Vec::new();

        for window in read_ahead(tokens) {
            if window.anchor != HEADER_OPEN || window.peek(0) != Some(EXT_RESOURCE_KEYWORD) {
                continue;
            }

            let results = match self.resource.parse(&window.materialize(self.resource.terminal())) {
                Ok(results) => results,
                Err(failure) => {
                    stats.increment(StatKey::ParsingMisses);
                    debug!("unparsed ext_resource header: {}", failure);
                    continue;
                }
            };
            stats.increment(StatKey::ParsingHits);

            let (Some(resource_type), Some(path)) = (results.get(RESOURCE_TYPE), results.get(PATH)) else {
                continue;
            };
            if !DEPENDENCY_RESOURCE_TYPES.contains(&resource_type) {
                continue;
            }

            let root = results.get(ROOT);
            if root.is_some_and(|scheme| FOREIGN_SCHEMES.contains(&scheme)) {
                debug!("skipping non-project resource path '{}'", path);
                continue;
            }

            debug!("found {} resource '{}'", resource_type, path);
            references.push(ReferenceFact::new(
                ReferenceKind::ExtResource {
                    resource_type: resource_type.to_string(),
                },
                path,
                root.is_some(),
            ));
        }

        references
    }
}

impl SourceParser for SceneParser {
    fn language(&self) -> LanguageType {
        LanguageType::GodotScene
    }

    fn extract_file(
        &self,
        source: &SourceFile,
        key: &str,
        curator: &DependencyCurator,
        stats: &dyn StatisticsSink,
    ) -> FileExtraction {
        let tokens = preprocess(&source.content, &self.mappings);
        let references = self.extract_resources(&tokens, stats);

        let mut file = FileRecord::new(
            key,
            source.absolute_path.clone(),
            source.file_name.clone(),
            LanguageType::GodotScene,
            tokens,
        );
        file.module_name = source
            .absolute_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        for reference in &references {
            let dependency = curator.resolve_reference(file.key_directory(), reference);
            file.add_dependency(dependency);
        }

        FileExtraction {
            file,
            entities: Vec::new(),
        }
    }

    fn extract_entities(&self, _file: &FileRecord, _stats: &dyn StatisticsSink) -> Vec<EntityRecord> {
        Vec::new()
    }
}
