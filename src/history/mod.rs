//! Translation history
//!
//! This module provides:
//! - The persisted translation record
//! - History CRUD with de-duplication by word and corruption guards

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{HistoryStorage, HISTORY_KEY};
