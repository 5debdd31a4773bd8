//! GDScript extraction
//!
//! File level: `class_name` / `extends` from the preamble plus every
//! `load` / `preload` path. Entity level: one entity per inner `class`,
//! named `Module.Inner` when the file declares a `class_name`.

use tracing::{debug, warn};

use super::godot_grammars::{
    class_header, class_identity, entity_header, inheritance, load_reference, BODY_START_KEYWORDS,
    CLASS_KEYWORD, CLASS_NAME_KEYWORD, EXTENDS_KEYWORD, LOAD_KEYWORDS, NAME, PARENT, PATH, ROOT,
};
use super::grammar::Grammar;
use super::scope::{CommentMarkers, ScopeSplitter, ScopingMode};
use super::tokenizer::{preprocess, read_ahead, TokenMappings};
use super::{FileExtraction, SourceParser};
use crate::core::curator::DependencyCurator;
use crate::models::record::{
    add_dependency, EntityRecord, FileRecord, LanguageType, ReferenceFact, ReferenceKind, SourceFile,
};
use crate::models::statistics::{StatKey, StatisticsSink};

/// Number of look-ahead tokens shown when a header cannot be parsed
const SNIPPET_TOKENS: usize = 10;

/// Parser for `.gd` files
#[derive(Debug, Clone)]
pub struct GdScriptParser {
    mappings: TokenMappings,
    identity: Grammar,
    inheritance: Grammar,
    header: Grammar,
    load: Grammar,
    splitter: ScopeSplitter,
}

impl Default for GdScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Preamble facts of one script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Preamble {
    class_name: Option<String>,
    extends: Option<String>,
}

impl GdScriptParser {
    pub fn new() -> Self {
        let mappings = TokenMappings::godot();
        let splitter = ScopeSplitter::new(
            &[CLASS_KEYWORD],
            entity_header(),
            CommentMarkers::line_only("#"),
            ScopingMode::Indentation,
            mappings.clone(),
        );

        Self {
            mappings,
            identity: class_identity(),
            inheritance: inheritance(),
            header: class_header(),
            load: load_reference(),
            splitter,
        }
    }

    /// `module.local`, or just `local` when the module is unknown
    pub fn unique_entity_name(module_name: &str, local_name: &str) -> String {
        if module_name.is_empty() {
            local_name.to_string()
        } else {
            format!("{}.{}", module_name, local_name)
        }
    }

    /// Scan the preamble for `class_name` and `extends`
    fn scan_preamble(&self, tokens: &[String], stats: &dyn StatisticsSink) -> Preamble {
        let mut preamble = Preamble::default();

        for window in read_ahead(tokens) {
            if window.anchor == CLASS_NAME_KEYWORD {
                match self.identity.parse(&window.materialize(self.identity.terminal())) {
                    Ok(results) => {
                        stats.increment(StatKey::ParsingHits);
                        preamble.class_name = results.get(NAME).map(str::to_string);
                        debug!("found class_name {:?}", preamble.class_name);
                        if preamble.extends.is_some() {
                            break;
                        }
                    }
                    Err(_) => stats.increment(StatKey::ParsingMisses),
                }
                continue;
            }

            if window.anchor == EXTENDS_KEYWORD {
                match self.inheritance.parse(&window.materialize(self.inheritance.terminal())) {
                    Ok(results) => {
                        stats.increment(StatKey::ParsingHits);
                        preamble.extends = results.get(PARENT).map(str::to_string);
                        debug!("found extends {:?}", preamble.extends);
                        if preamble.class_name.is_some() {
                            break;
                        }
                    }
                    Err(_) => stats.increment(StatKey::ParsingMisses),
                }
                continue;
            }

            if BODY_START_KEYWORDS.contains(&window.anchor) {
                break;
            }
        }

        preamble
    }

    /// Every `load` / `preload` reference in the stream
    pub fn extract_loads(&self, tokens: &[String], stats: &dyn StatisticsSink) -> Vec<ReferenceFact> {
        let mut references = Vec::new();

        for window in read_ahead(tokens) {
            if !LOAD_KEYWORDS.contains(&window.anchor) {
                continue;
            }
            match self.load.parse(&window.materialize(self.load.terminal())) {
                Ok(results) => {
                    stats.increment(StatKey::ParsingHits);
                    if let Some(path) = results.get(PATH) {
                        debug!("found {} of '{}'", window.anchor, path);
                        references.push(ReferenceFact::new(
                            ReferenceKind::Load,
                            path,
                            results.contains(ROOT),
                        ));
                    }
                }
                Err(_) => stats.increment(StatKey::ParsingMisses),
            }
        }

        references
    }

    /// Count and log a top-level `class` anchor the splitter could not name
    fn report_rejected_header(&self, file_key: &str, tokens: &[String], stats: &dyn StatisticsSink) {
        let Some(window) = read_ahead(tokens).next() else {
            return;
        };
        match self.header.parse(&window.materialize(self.header.terminal())) {
            Ok(_) => stats.increment(StatKey::ParsingHits),
            Err(failure) => {
                stats.increment(StatKey::ParsingMisses);
                warn!("could not parse class header in '{}': {}", file_key, failure);
                warn!("next tokens: {}", window.truncated(SNIPPET_TOKENS));
            }
        }
    }

    /// Record the parent declared by the entity's own `class` header
    ///
    /// Headers of nested classes inside the entity are parsed (and counted)
    /// too, but only a header naming this entity contributes a parent.
    pub fn add_inheritance_to_entity(&self, entity: &mut EntityRecord, stats: &dyn StatisticsSink) {
        for window in read_ahead(&entity.tokens) {
            if window.anchor != CLASS_KEYWORD {
                continue;
            }

            let results = match self.header.parse(&window.materialize(self.header.terminal())) {
                Ok(results) => results,
                Err(failure) => {
                    stats.increment(StatKey::ParsingMisses);
                    warn!(
                        "could not parse class header in entity '{}': {}",
                        entity.unique_name(),
                        failure
                    );
                    warn!("next tokens: {}", window.truncated(SNIPPET_TOKENS));
                    continue;
                }
            };

            stats.increment(StatKey::ParsingHits);
            if results.get(NAME) != Some(entity.local_name.as_str()) {
                continue;
            }
            if let Some(parent) = results.get(PARENT) {
                debug!("entity '{}' extends '{}'", entity.unique_name(), parent);
                add_dependency(&mut entity.inheritance, parent);
            }
        }
    }
}

impl SourceParser for GdScriptParser {
    fn language(&self) -> LanguageType {
        LanguageType::GdScript
    }

    fn extract_file(
        &self,
        source: &SourceFile,
        key: &str,
        curator: &DependencyCurator,
        stats: &dyn StatisticsSink,
    ) -> FileExtraction {
        let tokens = preprocess(&source.content, &self.mappings);
        let preamble = self.scan_preamble(&tokens, stats);
        let references = self.extract_loads(&tokens, stats);

        let mut file = FileRecord::new(
            key,
            source.absolute_path.clone(),
            source.file_name.clone(),
            LanguageType::GdScript,
            tokens,
        )
        .with_source(source.content.clone());
        file.module_name = preamble.class_name.clone().unwrap_or_default();

        let loads: Vec<String> = references
            .iter()
            .map(|reference| curator.resolve_reference(file.key_directory(), reference))
            .collect();

        if let Some(extends) = &preamble.extends {
            file.add_dependency(extends.clone());
        }
        for load in &loads {
            file.add_dependency(load.clone());
        }

        // A named script is itself an entity
        let mut entities = Vec::new();
        if let Some(class_name) = preamble.class_name {
            let mut entity = EntityRecord::new(
                class_name.clone(),
                class_name.clone(),
                class_name,
                key,
                LanguageType::GdScript,
                file.tokens.clone(),
            );
            if let Some(extends) = preamble.extends {
                entity.inheritance.push(extends);
            }
            for load in loads {
                entity.add_dependency(load);
            }
            entities.push(entity);
        }

        FileExtraction { file, entities }
    }

    fn extract_entities(&self, file: &FileRecord, stats: &dyn StatisticsSink) -> Vec<EntityRecord> {
        let split = self.splitter.split(&file.source);
        for tokens in &split.rejected {
            self.report_rejected_header(&file.key, tokens, stats);
        }

        split
            .scopes
            .into_iter()
            .map(|scope| {
                let unique_name = Self::unique_entity_name(&file.module_name, &scope.name);
                let mut entity = EntityRecord::new(
                    scope.name,
                    file.module_name.clone(),
                    unique_name,
                    file.key.clone(),
                    LanguageType::GdScript,
                    scope.tokens,
                );
                self.add_inheritance_to_entity(&mut entity, stats);
                entity
            })
            .collect()
    }
}
