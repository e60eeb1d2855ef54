//! Single-flight word lookups
//!
//! Each lookup takes a ticket. Starting a new lookup cancels the previous
//! ticket's token, and a result is only accepted if its ticket is still the
//! active one when it completes. Superseded results, successful or not, are
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::history::{HistoryStorage, TranslationRecord};
use crate::store::StoreError;
use crate::validation::normalize_word_input;

use super::models::{TranslateError, TranslationFields};

/// The external translation provider
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a normalized word. Implementations should stop early once
    /// `cancel` fires; the result is discarded either way.
    async fn translate(
        &self,
        word: &str,
        api_key: &str,
        cancel: CancellationToken,
    ) -> Result<TranslationFields, TranslateError>;
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The translation, and whether it made it into history
    Translated { record: TranslationRecord, saved: bool },
    /// A newer lookup started before this one completed
    Superseded,
}

/// Handle for one in-flight lookup
#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

struct ActiveRequest {
    generation: u64,
    token: CancellationToken,
}

/// Keeps at most one lookup live and auto-saves results to history
pub struct LookupCoordinator {
    translator: Arc<dyn Translator>,
    api_key: String,
    history: HistoryStorage,
    next_generation: AtomicU64,
    active: Mutex<Option<ActiveRequest>>,
}

impl LookupCoordinator {
    pub fn new(translator: Arc<dyn Translator>, api_key: String, history: HistoryStorage) -> Self {
        Self {
            translator,
            api_key,
            history,
            next_generation: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    fn active(&self) -> std::sync::MutexGuard<'_, Option<ActiveRequest>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Start a new request, cancelling the one in flight
    pub fn begin(&self) -> RequestTicket {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let token = CancellationToken::new();

        let previous = self.active().replace(ActiveRequest {
            generation,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
            log::debug!("Lookup {} superseded by {}", previous.generation, generation);
        }

        RequestTicket { generation, token }
    }

    /// Cancel the in-flight request without starting another
    pub fn cancel(&self) {
        if let Some(previous) = self.active().take() {
            previous.token.cancel();
            log::debug!("Lookup {} cancelled", previous.generation);
        }
    }

    fn holds(active: &Option<ActiveRequest>, ticket: &RequestTicket) -> bool {
        !ticket.token.is_cancelled()
            && active
                .as_ref()
                .map_or(false, |a| a.generation == ticket.generation)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        Self::holds(&self.active(), ticket)
    }

    /// Retire `ticket`; `false` if it was superseded in the meantime
    fn finish(&self, ticket: &RequestTicket) -> bool {
        let mut active = self.active();
        let current = Self::holds(&active, ticket);
        if current {
            *active = None;
        }
        current
    }

    /// Translate `raw` and save the result to history.
    ///
    /// Provider errors are returned as-is; nothing is retried.
    pub async fn lookup(&self, raw: &str) -> Result<LookupOutcome, LookupError> {
        let ticket = self.begin();

        let Some(word) = normalize_word_input(raw) else {
            self.finish(&ticket);
            return Err(TranslateError::InvalidWordInput.into());
        };

        let result = tokio::select! {
            biased;
            _ = ticket.token.cancelled() => None,
            result = self.translator.translate(word, &self.api_key, ticket.token.clone()) => Some(result),
        };

        if !self.finish(&ticket) {
            log::debug!("Discarding result of superseded lookup for \"{}\"", word);
            return Ok(LookupOutcome::Superseded);
        }
        let fields = match result {
            Some(result) => result?,
            None => return Ok(LookupOutcome::Superseded),
        };

        let record = TranslationRecord::new(word, fields, crate::now_millis());
        let saved = self.history.save(&record)?;
        if !saved {
            log::warn!("Translation of \"{}\" shown but not saved", word);
        }

        Ok(LookupOutcome::Translated { record, saved })
    }
}
