//! Entry point used by front ends
//!
//! Wires the history and progress repositories to one backend and exposes
//! the operations a front end needs: history CRUD, session building, rating.

use std::collections::HashSet;
use std::sync::Arc;

use rand::Rng;

use crate::config::{Config, ConfigError};
use crate::flashcards::{
    self, build_session, ProgressStorage, Rating, ReviewProgress, ReviewSession, ReviewStats,
    Session, SESSION_SIZE,
};
use crate::history::{HistoryStorage, TranslationRecord};
use crate::store::{DurableStore, FileStore, KeyValueStore, Result};

pub struct Vocabulary {
    history: HistoryStorage,
    progress: ProgressStorage,
    session_size: usize,
}

impl Vocabulary {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        let store = DurableStore::new(backend);
        Self {
            history: HistoryStorage::new(store.clone()),
            progress: ProgressStorage::new(store),
            session_size: SESSION_SIZE,
        }
    }

    /// Open the file-backed store described by `config`
    pub fn open(config: &Config) -> std::result::Result<Self, ConfigError> {
        let data_dir = config.resolve_data_dir()?;
        let mut vocabulary = Self::new(Arc::new(FileStore::new(data_dir)));
        vocabulary.session_size = config.session_size;
        Ok(vocabulary)
    }

    pub fn with_session_size(mut self, session_size: usize) -> Self {
        self.session_size = session_size;
        self
    }

    pub fn history(&self) -> &HistoryStorage {
        &self.history
    }

    pub fn progress(&self) -> &ProgressStorage {
        &self.progress
    }

    // ==================== History ====================

    pub fn list_history(&self) -> Result<Vec<TranslationRecord>> {
        self.history.list()
    }

    pub fn search_history(&self, query: &str) -> Result<Vec<TranslationRecord>> {
        self.history.search(query)
    }

    pub fn save_translation(&self, record: &TranslationRecord) -> Result<bool> {
        self.history.save(record)
    }

    pub fn delete_translation(&self, id: &str) -> Result<bool> {
        self.history.delete_by_id(id)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.history.clear()
    }

    // ==================== Review ====================

    pub fn build_session(&self, now: i64) -> Result<Session> {
        self.build_session_with_rng(now, &mut rand::thread_rng())
    }

    pub fn build_session_with_rng<R: Rng + ?Sized>(&self, now: i64, rng: &mut R) -> Result<Session> {
        let history = self.history.list()?;
        let progress = self.progress.get_all()?;
        let session = build_session(&history, progress, now, self.session_size, rng);
        log::info!(
            "Built review session with {} of {} words",
            session.cards.len(),
            history.len()
        );
        Ok(session)
    }

    /// Build a session and load it into a fresh review state machine
    pub fn start_review(&self, now: i64) -> Result<ReviewSession> {
        let session = self.build_session(now)?;
        Ok(ReviewSession::loaded(session))
    }

    pub fn save_progress(&self, progress: &ReviewProgress) -> Result<bool> {
        self.progress.save(progress)
    }

    pub fn apply_rating(&self, progress: &ReviewProgress, rating: Rating, now: i64) -> ReviewProgress {
        flashcards::apply_rating(progress, rating, now)
    }

    /// Rate a word outside of a session and persist the result.
    ///
    /// `Ok(None)` when the word is not in history or progress storage refused
    /// the write.
    pub fn rate_word(&self, word: &str, rating: Rating, now: i64) -> Result<Option<ReviewProgress>> {
        if self.history.find_by_word(word)?.is_none() {
            return Ok(None);
        }
        let existing = self
            .progress
            .get(word)?
            .unwrap_or_else(|| ReviewProgress::fresh(word));
        let updated = self.apply_rating(&existing, rating, now);
        Ok(self.progress.save(&updated)?.then_some(updated))
    }

    pub fn review_stats(&self, now: i64) -> Result<ReviewStats> {
        let history = self.history.list()?;
        let progress = self.progress.get_all()?;

        let mut stats = ReviewStats {
            total_words: history.len(),
            ..ReviewStats::default()
        };

        for record in &history {
            match progress.get(&record.word) {
                None => stats.unseen += 1,
                Some(p) if p.is_due(now) => stats.due += 1,
                Some(_) => stats.scheduled += 1,
            }
        }

        let words: HashSet<&str> = history.iter().map(|t| t.word.as_str()).collect();
        stats.orphaned_progress = progress
            .keys()
            .filter(|word| !words.contains(word.as_str()))
            .count();

        Ok(stats)
    }
}
