//! Whole-collection reads and writes with corruption handling
//!
//! A collection is a JSON array stored under a single key. A value that does
//! not parse, or whose elements fail their schema, is never discarded: the raw
//! value is copied to `{key}-corrupt-backup` (unless a backup already exists)
//! and the read reports `Unreadable` so callers can refuse to overwrite it.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::backend::KeyValueStore;
use super::Result;

/// Suffix appended to a collection key to form its backup key
const CORRUPT_BACKUP_SUFFIX: &str = "-corrupt-backup";

/// Structural rules a persisted type enforces beyond its JSON shape
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaViolation(pub String);

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A type that can be stored in a collection
pub trait Schema: Serialize + DeserializeOwned {
    fn validate(&self) -> std::result::Result<(), SchemaViolation>;
}

/// Outcome of reading a collection
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionRead<T> {
    /// Absent (read as empty) or successfully parsed
    Readable(Vec<T>),
    /// Present but corrupted; the raw value has been preserved
    Unreadable,
}

impl<T> CollectionRead<T> {
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::Readable(_))
    }

    pub fn into_readable(self) -> Option<Vec<T>> {
        match self {
            Self::Readable(items) => Some(items),
            Self::Unreadable => None,
        }
    }

    /// Degrade to an empty collection; only for read-only callers
    pub fn or_empty(self) -> Vec<T> {
        self.into_readable().unwrap_or_default()
    }
}

enum Corruption {
    Json(serde_json::Error),
    Schema { index: usize, violation: SchemaViolation },
}

impl fmt::Display for Corruption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Corruption::Json(e) => write!(f, "invalid JSON: {}", e),
            Corruption::Schema { index, violation } => {
                write!(f, "element {} failed validation: {}", index, violation)
            }
        }
    }
}

/// Collection-level access to a key-value backend
#[derive(Clone)]
pub struct DurableStore {
    backend: Arc<dyn KeyValueStore>,
}

impl DurableStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    /// Key under which a corrupted value of `key` is preserved
    pub fn backup_key(key: &str) -> String {
        format!("{}{}", key, CORRUPT_BACKUP_SUFFIX)
    }

    /// Read and validate the collection stored under `key`
    pub fn read_collection<T: Schema>(&self, key: &str) -> Result<CollectionRead<T>> {
        let raw = match self.backend.get(key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(CollectionRead::Readable(Vec::new())),
        };

        match Self::parse::<T>(&raw) {
            Ok(items) => Ok(CollectionRead::Readable(items)),
            Err(cause) => {
                self.backup_corrupted(key, &raw, &cause)?;
                Ok(CollectionRead::Unreadable)
            }
        }
    }

    /// Replace the collection stored under `key` in a single write.
    ///
    /// Callers must have seen a `Readable` result for `key` first.
    pub fn write_collection<T: Schema>(&self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.backend.set(key, &json)
    }

    pub fn remove_key(&self, key: &str) -> Result<()> {
        self.backend.remove(key)
    }

    fn parse<T: Schema>(raw: &str) -> std::result::Result<Vec<T>, Corruption> {
        let items: Vec<T> = serde_json::from_str(raw).map_err(Corruption::Json)?;
        for (index, item) in items.iter().enumerate() {
            item.validate()
                .map_err(|violation| Corruption::Schema { index, violation })?;
        }
        Ok(items)
    }

    fn backup_corrupted(&self, key: &str, raw: &str, cause: &Corruption) -> Result<()> {
        let backup_key = Self::backup_key(key);
        let has_backup = matches!(self.backend.get(&backup_key)?, Some(existing) if !existing.is_empty());

        if has_backup {
            log::error!(
                "[storage] Corrupted data detected for \"{}\" ({}). Refusing to overwrite existing data; backup \"{}\" already exists and was kept.",
                key,
                cause,
                backup_key
            );
        } else {
            self.backend.set(&backup_key, raw)?;
            log::error!(
                "[storage] Corrupted data detected for \"{}\" ({}). Refusing to overwrite existing data; raw value copied to \"{}\".",
                key,
                cause,
                backup_key
            );
        }

        Ok(())
    }
}
