//! Result table for one analysis run
//!
//! Records are keyed by unique name in a `BTreeMap`, so iteration order (and
//! with it the first-match rule of dependency curation) is deterministic.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::record::{EntityRecord, FileRecord, Record};

#[derive(Debug, Default)]
pub struct ResultTable {
    records: BTreeMap<String, Record>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file record under its key
    ///
    /// Returns `false` when the key is already held by an entity.
    pub fn insert_file(&mut self, record: FileRecord) -> bool {
        self.insert(Record::File(record))
    }

    /// Insert an entity record under its unique name
    ///
    /// Returns `false` when the key is already held by a file.
    pub fn insert_entity(&mut self, record: EntityRecord) -> bool {
        self.insert(Record::Entity(record))
    }

    fn insert(&mut self, record: Record) -> bool {
        let key = record.key().to_string();

        if let Some(existing) = self.records.get(&key) {
            if existing.is_file() != record.is_file() {
                warn!(
                    "refusing to replace {} '{}' with {} of the same name",
                    existing.kind_name(),
                    key,
                    record.kind_name()
                );
                return false;
            }
            debug!("replacing {} '{}'", existing.kind_name(), key);
        }

        self.records.insert(key, record);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn file(&self, key: &str) -> Option<&FileRecord> {
        match self.records.get(key) {
            Some(Record::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn file_mut(&mut self, key: &str) -> Option<&mut FileRecord> {
        match self.records.get_mut(key) {
            Some(Record::File(file)) => Some(file),
            _ => None,
        }
    }

    pub fn entity(&self, key: &str) -> Option<&EntityRecord> {
        match self.records.get(key) {
            Some(Record::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    pub fn entity_mut(&mut self, key: &str) -> Option<&mut EntityRecord> {
        match self.records.get_mut(key) {
            Some(Record::Entity(entity)) => Some(entity),
            _ => None,
        }
    }

    /// All file records in key order
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.values().filter_map(|record| match record {
            Record::File(file) => Some(file),
            Record::Entity(_) => None,
        })
    }

    /// All entity records in key order
    pub fn entities(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.values().filter_map(|record| match record {
            Record::Entity(entity) => Some(entity),
            Record::File(_) => None,
        })
    }

    pub fn file_keys(&self) -> Vec<String> {
        self.files().map(|file| file.key.clone()).collect()
    }

    pub fn entity_keys(&self) -> Vec<String> {
        self.entities().map(|entity| entity.unique_name().to_string()).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
