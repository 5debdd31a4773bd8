//! Type-usage inference over entity token streams

use std::collections::BTreeSet;
use tracing::debug;

use super::godot_grammars::{type_chain, SEGMENT};
use super::tokenizer::NEWLINE;
use crate::models::record::{add_dependency, EntityRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Annotation,
    Assignment,
}

/// Marker at `index` and the index of the token it applies to
fn marker_at(tokens: &[String], index: usize) -> Option<(Marker, usize)> {
    match tokens[index].as_str() {
        ":" | "->" => Some((Marker::Annotation, index + 1)),
        // `->` arrives split because `>` is padded
        "-" if tokens.get(index + 1).map(String::as_str) == Some(">") => Some((Marker::Annotation, index + 2)),
        "=" => Some((Marker::Assignment, index + 1)),
        _ => None,
    }
}

/// Append every known entity named after a `:`, `->` or `=` marker
///
/// Markers are examined by index without consuming the following token, so
/// `:=` still gets its `=` handled. For assignments followed by a call
/// parenthesis the trailing `.method` is dropped. Returns the number of new
/// dependencies.
pub fn detect_type_usages(entity: &mut EntityRecord, known_entities: &BTreeSet<String>) -> usize {
    let grammar = type_chain();
    let tokens = &entity.tokens;
    let mut added = 0;

    for index in 0..tokens.len() {
        let Some((marker, target)) = marker_at(tokens, index) else {
            continue;
        };
        let Some(next) = tokens.get(target) else {
            continue;
        };
        if next == NEWLINE {
            continue;
        }
        let Ok(results) = grammar.parse(next) else {
            continue;
        };

        let mut segments = results.get_all(SEGMENT);
        if marker == Marker::Assignment && tokens.get(target + 1).map(String::as_str) == Some("(") {
            segments.truncate(segments.len().saturating_sub(2));
        }
        let type_name = segments.concat();

        if type_name.is_empty() || entity.is_named(&type_name) {
            continue;
        }
        if known_entities.contains(&type_name) && add_dependency(&mut entity.dependencies, type_name.as_str()) {
            debug!("detected type usage of '{}' in '{}'", type_name, entity.unique_name());
            added += 1;
        }
    }

    added
}
