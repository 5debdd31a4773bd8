//! Two-phase analysis run
//!
//! Phase one extracts every file independently (optionally on the rayon
//! pool) and inserts the owned results serially. Phase two works on the
//! completed table: entity extraction and sibling linking per file, then
//! dependency curation, then type-usage inference.

use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::core::curator::DependencyCurator;
use crate::core::linker::link_siblings;
use crate::models::record::{LanguageType, SourceFile};
use crate::models::statistics::{Statistics, StatisticsSnapshot};
use crate::models::table::ResultTable;
use crate::parsers::{detect_type_usages, FileExtraction, GdScriptParser, SceneParser, SourceParser};
use crate::utils::path_resolver::to_key;

/// Everything one run produced
#[derive(Debug)]
pub struct AnalysisRun {
    pub source_root: PathBuf,
    pub table: ResultTable,
    pub statistics: StatisticsSnapshot,
    pub duration: Duration,
}

/// Runs the extraction pipeline for one source root
pub struct Analyzer {
    source_root: PathBuf,
    parallel: bool,
    include_scenes: bool,
    curator: DependencyCurator,
    gdscript: GdScriptParser,
    scene: SceneParser,
}

impl Analyzer {
    /// Create an analyzer for the project at `source_root`
    pub fn new(source_root: &Path) -> Self {
        Self {
            source_root: source_root.to_path_buf(),
            parallel: true,
            include_scenes: true,
            curator: DependencyCurator::new(source_root),
            gdscript: GdScriptParser::new(),
            scene: SceneParser::new(),
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_scenes(mut self, include_scenes: bool) -> Self {
        self.include_scenes = include_scenes;
        self
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    fn parser_for(&self, language: LanguageType) -> &dyn SourceParser {
        match language {
            LanguageType::GdScript => &self.gdscript,
            LanguageType::GodotScene => &self.scene,
        }
    }

    /// Table key of a source, relative to the parent of the source root
    fn key_for(&self, source: &SourceFile) -> String {
        let base = self.source_root.parent().unwrap_or(&self.source_root);
        to_key(&source.absolute_path, base).unwrap_or_else(|| {
            warn!(
                "{} lies outside {}, keying it by its full path",
                source.absolute_path.display(),
                self.source_root.display()
            );
            source.absolute_path.to_string_lossy().replace('\\', "/")
        })
    }

    fn extract(&self, source: &SourceFile, stats: &Statistics) -> Option<FileExtraction> {
        let language = source.language()?;
        if language == LanguageType::GodotScene && !self.include_scenes {
            return None;
        }
        let key = self.key_for(source);
        debug!("extracting {} as {}", key, language);
        Some(self.parser_for(language).extract_file(source, &key, &self.curator, stats))
    }

    /// Run both phases over the loaded sources
    pub fn run(&self, sources: &[SourceFile]) -> AnalysisRun {
        self.run_with_progress(sources, &|| {})
    }

    /// Like [`Analyzer::run`], calling `on_file` after each phase-one extraction
    pub fn run_with_progress(&self, sources: &[SourceFile], on_file: &(dyn Fn() + Sync)) -> AnalysisRun {
        let start = Instant::now();
        let stats = Statistics::new();
        let mut table = ResultTable::new();

        // Phase one
        let extract_one = |source: &SourceFile| {
            let extraction = self.extract(source, &stats);
            on_file();
            extraction
        };
        let extractions: Vec<FileExtraction> = if self.parallel {
            sources.par_iter().filter_map(extract_one).collect()
        } else {
            sources.iter().filter_map(extract_one).collect()
        };

        for extraction in extractions {
            table.insert_file(extraction.file);
            for entity in extraction.entities {
                table.insert_entity(entity);
            }
        }
        info!("extracted {} files", table.files().count());

        // Phase two: entities and sibling links, file by file
        for key in table.file_keys() {
            let mut entities = match table.file(&key) {
                Some(file) => self.parser_for(file.language).extract_entities(file, &stats),
                None => continue,
            };
            link_siblings(&mut entities);
            for entity in entities {
                table.insert_entity(entity);
            }
        }

        let curated = self.curator.curate_file_dependencies(&mut table);
        debug!("{} file dependencies matched known files", curated);

        let known_entities: BTreeSet<String> = table.entity_keys().into_iter().collect();
        let mut usages = 0;
        for key in &known_entities {
            if let Some(entity) = table.entity_mut(key) {
                usages += detect_type_usages(entity, &known_entities);
            }
        }
        debug!("{} type usages detected", usages);

        AnalysisRun {
            source_root: self.source_root.clone(),
            table,
            statistics: stats.snapshot(),
            duration: start.elapsed(),
        }
    }
}
