//! Exposed-field to storage-field mapping tables.
//!
//! A [`MappingTable`] describes, for one pair of shapes, how every sortable
//! field of the exposed view model translates into storage columns. Tables
//! are assembled once at startup into a [`MappingRegistry`] and shared
//! read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// A named data shape taking part in field mapping.
pub trait Shape {
    /// Stable identifier used as the registry key.
    const SHAPE: &'static str;
}

/// A shape backed by storage, declaring the columns it can be ordered by.
pub trait StorageShape: Shape {
    const SORTABLE_FIELDS: &'static [&'static str];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapePair {
    pub exposed: &'static str,
    pub storage: &'static str,
}

impl ShapePair {
    pub fn of<E: Shape, S: StorageShape>() -> Self {
        Self {
            exposed: E::SHAPE,
            storage: S::SHAPE,
        }
    }
}

impl fmt::Display for ShapePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.exposed, self.storage)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("no field mapping registered for {pair}")]
    NotFound { pair: ShapePair },

    #[error("field mapping for {pair} is already registered")]
    AlreadyRegistered { pair: ShapePair },

    #[error("exposed field '{field}' maps to no storage fields")]
    EmptyStorageFields { field: String },

    #[error("exposed field '{field}' is mapped more than once")]
    DuplicateField { field: String },

    #[error("storage shape '{storage}' has no sortable field '{field}'")]
    UnknownStorageField {
        storage: &'static str,
        field: &'static str,
    },

    #[error(
        "table built for storage shape '{found}' registered under '{expected}'"
    )]
    StorageShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// One exposed field and the storage fields it expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    exposed: String,
    storage_fields: Vec<&'static str>,
    reverse: bool,
}

impl MappingEntry {
    /// Field name as it was registered, before normalization.
    pub fn exposed(&self) -> &str {
        &self.exposed
    }

    /// Never empty.
    pub fn storage_fields(&self) -> &[&'static str] {
        &self.storage_fields
    }

    /// Whether ordering by this field runs opposite to its storage fields
    /// (an age ascends as the birth date descends).
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }
}

#[derive(Debug, Clone)]
pub struct MappingTable {
    storage: &'static str,
    entries: HashMap<String, MappingEntry>,
}

impl MappingTable {
    pub fn builder<S: StorageShape>() -> MappingTableBuilder {
        MappingTableBuilder {
            storage: S::SHAPE,
            sortable: S::SORTABLE_FIELDS,
            pending: Vec::new(),
        }
    }

    pub fn storage_shape(&self) -> &'static str {
        self.storage
    }

    /// Case-insensitive lookup of an exposed field.
    pub fn get(&self, exposed: &str) -> Option<&MappingEntry> {
        self.entries.get(&normalize(exposed))
    }

    pub fn contains(&self, exposed: &str) -> bool {
        self.get(exposed).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub struct MappingTableBuilder {
    storage: &'static str,
    sortable: &'static [&'static str],
    pending: Vec<MappingEntry>,
}

impl MappingTableBuilder {
    pub fn map(self, exposed: &str, storage_fields: &[&'static str]) -> Self {
        self.push(exposed, storage_fields, false)
    }

    pub fn map_reversed(
        self,
        exposed: &str,
        storage_fields: &[&'static str],
    ) -> Self {
        self.push(exposed, storage_fields, true)
    }

    fn push(
        mut self,
        exposed: &str,
        storage_fields: &[&'static str],
        reverse: bool,
    ) -> Self {
        self.pending.push(MappingEntry {
            exposed: exposed.trim().to_string(),
            storage_fields: storage_fields.to_vec(),
            reverse,
        });
        self
    }

    /// Validates every entry against the storage shape and freezes the table.
    pub fn build(self) -> Result<MappingTable, MappingError> {
        let mut entries = HashMap::with_capacity(self.pending.len());

        for entry in self.pending {
            if entry.storage_fields.is_empty() {
                return Err(MappingError::EmptyStorageFields {
                    field: entry.exposed,
                });
            }

            if let Some(unknown) = entry
                .storage_fields
                .iter()
                .find(|field| !self.sortable.contains(*field))
            {
                return Err(MappingError::UnknownStorageField {
                    storage: self.storage,
                    field: *unknown,
                });
            }

            let key = normalize(&entry.exposed);
            if entries.contains_key(&key) {
                return Err(MappingError::DuplicateField {
                    field: entry.exposed,
                });
            }
            entries.insert(key, entry);
        }

        Ok(MappingTable {
            storage: self.storage,
            entries,
        })
    }
}

/// Process-wide set of mapping tables, keyed by shape pair.
///
/// Populated during startup, then wrapped in an `Arc` and only read.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    tables: HashMap<ShapePair, Arc<MappingTable>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<E: Shape, S: StorageShape>(
        &mut self,
        table: MappingTable,
    ) -> Result<(), MappingError> {
        let pair = ShapePair::of::<E, S>();
        if table.storage != S::SHAPE {
            return Err(MappingError::StorageShapeMismatch {
                expected: S::SHAPE,
                found: table.storage,
            });
        }
        if self.tables.contains_key(&pair) {
            return Err(MappingError::AlreadyRegistered { pair });
        }
        self.tables.insert(pair, Arc::new(table));
        Ok(())
    }

    pub fn resolve<E: Shape, S: StorageShape>(
        &self,
    ) -> Result<Arc<MappingTable>, MappingError> {
        self.resolve_pair(ShapePair::of::<E, S>())
    }

    pub fn resolve_pair(
        &self,
        pair: ShapePair,
    ) -> Result<Arc<MappingTable>, MappingError> {
        self.tables
            .get(&pair)
            .cloned()
            .ok_or(MappingError::NotFound { pair })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

fn normalize(field: &str) -> String {
    field.trim().to_lowercase()
}
