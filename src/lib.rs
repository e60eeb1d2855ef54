//! Vocabulary builder core
//!
//! Translated words are kept in a local history and reviewed later as
//! spaced-repetition flashcards. Both collections live in a key-value store
//! that is never overwritten once it has been found corrupted.

pub mod config;
pub mod flashcards;
pub mod history;
pub mod store;
pub mod translate;
pub mod validation;
pub mod vocabulary;

pub use config::Config;
pub use vocabulary::Vocabulary;

/// Current time in milliseconds since the epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
