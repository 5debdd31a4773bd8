//! Dependency curation
//!
//! Raw reference literals are first resolved to table keys by path
//! arithmetic, then matched against the keys of every known file.

use std::path::Path;
use tracing::debug;

use crate::models::record::{add_dependency, LanguageType, ReferenceFact, KNOWN_EXTENSIONS};
use crate::models::table::ResultTable;
use crate::utils::path_resolver::{resolve_file_relative, resolve_rooted, root_name};

/// Resolves dependency literals against one source root
#[derive(Debug, Clone)]
pub struct DependencyCurator {
    root_name: String,
}

impl DependencyCurator {
    pub fn new(source_root: &Path) -> Self {
        Self {
            root_name: root_name(source_root),
        }
    }

    /// First segment shared by every key in the project
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Turn a reference literal into a key relative to the source root's parent
    ///
    /// `file_directory` is the key directory of the referencing file. Paths
    /// that would climb out of the project root stay as written.
    pub fn resolve_reference(&self, file_directory: &str, fact: &ReferenceFact) -> String {
        let resolved = if fact.rooted {
            resolve_rooted(&self.root_name, &fact.path)
        } else {
            resolve_file_relative(&self.root_name, file_directory, &fact.path)
        };

        resolved.unwrap_or_else(|| {
            debug!("leaving unresolvable reference '{}' as written", fact.path);
            if fact.rooted {
                format!("res://{}", fact.path)
            } else {
                fact.path.clone()
            }
        })
    }

    /// Match one dependency against the known file keys
    ///
    /// Dotted names get their dots turned into slashes and the language
    /// extension appended first. The first key containing the candidate wins.
    pub fn curate_dependency(&self, dependency: &str, language: LanguageType, known_files: &[String]) -> String {
        let candidate = if has_known_extension(dependency) {
            dependency.to_string()
        } else {
            format!("{}.{}", dependency.replace('.', "/"), language.extension())
        };

        match known_files.iter().find(|key| key.contains(&candidate)) {
            Some(key) => {
                if key != dependency {
                    debug!("curated dependency '{}' to '{}'", dependency, key);
                }
                key.clone()
            }
            None => dependency.to_string(),
        }
    }

    /// Second curation pass over every file record in the table
    ///
    /// Returns the number of dependencies that now name a known file.
    pub fn curate_file_dependencies(&self, table: &mut ResultTable) -> usize {
        let known_files = table.file_keys();
        let mut matched = 0;

        for key in &known_files {
            let Some(file) = table.file_mut(key) else {
                continue;
            };

            let mut curated = Vec::with_capacity(file.dependencies.len());
            for dependency in &file.dependencies {
                let resolved = self.curate_dependency(dependency, file.language, &known_files);
                if known_files.contains(&resolved) {
                    matched += 1;
                }
                add_dependency(&mut curated, resolved);
            }
            file.dependencies = curated;
        }

        matched
    }
}

fn has_known_extension(dependency: &str) -> bool {
    Path::new(dependency)
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| KNOWN_EXTENSIONS.contains(&extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{FileRecord, ReferenceKind};

    fn curator() -> DependencyCurator {
        DependencyCurator::new(Path::new("/work/game"))
    }

    fn load(path: &str, rooted: bool) -> ReferenceFact {
        ReferenceFact::new(ReferenceKind::Load, path, rooted)
    }

    #[test]
    fn test_rooted_and_file_relative_forms_agree() {
        let curator = curator();
        let rooted = curator.resolve_reference("game/other", &load("sub/thing.gd", true));
        let relative = curator.resolve_reference("game/sub", &load("thing.gd", false));
        let climbing = curator.resolve_reference("game/other", &load("../sub/thing.gd", false));

        assert_eq!(rooted, "game/sub/thing.gd");
        assert_eq!(rooted, relative);
        assert_eq!(rooted, climbing);
    }

    #[test]
    fn test_escaping_reference_stays_literal() {
        let curator = curator();
        assert_eq!(curator.resolve_reference("game", &load("../../x.gd", false)), "../../x.gd");
        assert_eq!(
            curator.resolve_reference("game", &load("../other_project/x.gd", false)),
            "../other_project/x.gd"
        );
        assert_eq!(
            curator.resolve_reference("game", &load("../other_project/x.gd", true)),
            "res://../other_project/x.gd"
        );
    }

    #[test]
    fn test_curate_dotted_name() {
        let curator = curator();
        let known = vec!["game/enemies/boss.gd".to_string(), "game/player.gd".to_string()];

        assert_eq!(
            curator.curate_dependency("enemies.boss", LanguageType::GdScript, &known),
            "game/enemies/boss.gd"
        );
        assert_eq!(
            curator.curate_dependency("game/player.gd", LanguageType::GodotScene, &known),
            "game/player.gd"
        );
        assert_eq!(curator.curate_dependency("Node2D", LanguageType::GdScript, &known), "Node2D");
    }

    #[test]
    fn test_containment_prefers_first_key_in_order() {
        // Suffix ambiguity: "foo.gd" is contained in "barfoo.gd" too
        let curator = curator();
        let known = vec!["game/barfoo.gd".to_string(), "game/foo.gd".to_string()];
        assert_eq!(
            curator.curate_dependency("foo", LanguageType::GdScript, &known),
            "game/barfoo.gd"
        );
    }

    #[test]
    fn test_curate_file_dependencies_rewrites_and_dedupes() {
        let mut table = ResultTable::new();
        let mut hud = FileRecord::new("game/ui/hud.gd", "/work/game/ui/hud.gd", "hud.gd", LanguageType::GdScript, vec![]);
        hud.add_dependency("ui.theme");
        hud.add_dependency("game/ui/theme.gd");
        hud.add_dependency("Control");
        table.insert_file(hud);
        table.insert_file(FileRecord::new(
            "game/ui/theme.gd",
            "/work/game/ui/theme.gd",
            "theme.gd",
            LanguageType::GdScript,
            vec![],
        ));

        let matched = curator().curate_file_dependencies(&mut table);
        assert_eq!(matched, 2);

        let hud = table.file("game/ui/hud.gd").unwrap();
        assert_eq!(hud.dependencies, vec!["game/ui/theme.gd", "Control"]);
    }
}
