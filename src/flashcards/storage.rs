//! Storage operations for review progress
//!
//! All progress records live in one JSON array under [`FLASHCARDS_KEY`], one
//! record per word.

use std::collections::HashMap;

use crate::store::{DurableStore, Result};

use super::models::ReviewProgress;

pub const FLASHCARDS_KEY: &str = "vocabuilder-flashcards";

/// Storage manager for per-word review progress
#[derive(Clone)]
pub struct ProgressStorage {
    store: DurableStore,
}

impl ProgressStorage {
    pub fn new(store: DurableStore) -> Self {
        Self { store }
    }

    /// All progress keyed by word. A corrupted store reads as empty.
    pub fn get_all(&self) -> Result<HashMap<String, ReviewProgress>> {
        let records = self
            .store
            .read_collection::<ReviewProgress>(FLASHCARDS_KEY)?
            .or_empty();
        Ok(records.into_iter().map(|p| (p.word.clone(), p)).collect())
    }

    pub fn get(&self, word: &str) -> Result<Option<ReviewProgress>> {
        Ok(self.get_all()?.remove(word))
    }

    /// Insert or replace the progress for `progress.word`.
    ///
    /// Returns `false` without writing when the stored progress is corrupted.
    pub fn save(&self, progress: &ReviewProgress) -> Result<bool> {
        let Some(mut records) = self
            .store
            .read_collection::<ReviewProgress>(FLASHCARDS_KEY)?
            .into_readable()
        else {
            log::warn!(
                "Not saving review progress of \"{}\": flashcard storage is unreadable",
                progress.word
            );
            return Ok(false);
        };

        // Later duplicates of a word would win on load, so drop them here
        let mut seen = false;
        records.retain_mut(|existing| {
            if existing.word != progress.word {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *existing = progress.clone();
            true
        });
        if !seen {
            records.push(progress.clone());
        }

        self.store.write_collection(FLASHCARDS_KEY, &records)?;
        Ok(true)
    }
}
