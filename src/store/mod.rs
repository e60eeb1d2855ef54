//! Durable key-value storage for the vocabulary collections
//!
//! This module provides:
//! - The platform key-value contract (`get`/`set`/`remove`, no transactions)
//! - File and in-memory backends
//! - Whole-collection reads and writes with corruption detection and
//!   backup-on-corruption

pub mod backend;
pub mod collection;

use thiserror::Error;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use collection::{CollectionRead, DurableStore, Schema, SchemaViolation};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StoreError>;
