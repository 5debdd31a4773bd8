//! Sibling inheritance linking
//!
//! Runs after every entity of one file has been created and named.

use std::collections::HashMap;
use tracing::debug;

use crate::models::record::EntityRecord;

/// Rewrite parent names that match a sibling's local name to its unique name
///
/// Only inheritance lists change; names of the entities themselves are
/// never touched. Parents with no sibling match are left as written.
pub fn link_siblings(entities: &mut [EntityRecord]) -> usize {
    let mut siblings: HashMap<String, String> = HashMap::new();
    for entity in entities.iter() {
        siblings
            .entry(entity.local_name.clone())
            .or_insert_with(|| entity.unique_name().to_string());
    }

    let mut linked = 0;
    for entity in entities.iter_mut() {
        for parent in entity.inheritance.iter_mut() {
            if let Some(unique_name) = siblings.get(parent.as_str()) {
                if parent != unique_name {
                    debug!("linked parent '{}' to '{}'", parent, unique_name);
                    *parent = unique_name.clone();
                    linked += 1;
                }
            }
        }
    }
    linked
}
