//! Review sessions
//!
//! Selection is priority ordered (overdue words first, then unseen words),
//! presentation order is shuffled. The review itself is a small state machine:
//! `Loading -> Studying -> Done`.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::history::TranslationRecord;
use crate::store::StoreError;

use super::algorithm::apply_rating;
use super::models::{Rating, ReviewProgress};
use super::storage::ProgressStorage;

/// Default number of cards in a session
pub const SESSION_SIZE: usize = 10;

/// Cards selected for one review pass, with a snapshot of their progress
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub cards: Vec<TranslationRecord>,
    /// Word -> progress; absent means the word is new
    pub progress: HashMap<String, ReviewProgress>,
}

/// Pick up to `limit` cards: due words (most overdue first), then unseen
/// words. Words scheduled for the future are left out.
pub fn select_cards(
    history: &[TranslationRecord],
    progress: &HashMap<String, ReviewProgress>,
    now: i64,
    limit: usize,
) -> Vec<TranslationRecord> {
    let mut due: Vec<(&TranslationRecord, i64)> = history
        .iter()
        .filter_map(|t| {
            progress
                .get(&t.word)
                .filter(|p| p.is_due(now))
                .map(|p| (t, p.next_review_date))
        })
        .collect();
    due.sort_by_key(|(_, next_review_date)| *next_review_date);

    let unseen = history.iter().filter(|t| !progress.contains_key(&t.word));

    due.into_iter()
        .map(|(t, _)| t)
        .chain(unseen)
        .take(limit)
        .cloned()
        .collect()
}

/// Build a session and shuffle its presentation order
pub fn build_session<R: Rng + ?Sized>(
    history: &[TranslationRecord],
    progress: HashMap<String, ReviewProgress>,
    now: i64,
    limit: usize,
    rng: &mut R,
) -> Session {
    let mut cards = select_cards(history, &progress, now, limit);
    cards.shuffle(rng);
    Session { cards, progress }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Studying,
    Done,
}

/// Running count of each rating given in a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub again: usize,
    pub good: usize,
    pub easy: usize,
}

impl Tally {
    fn record(&mut self, rating: Rating) {
        match rating {
            Rating::Again => self.again += 1,
            Rating::Good => self.good += 1,
            Rating::Easy => self.easy += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.again + self.good + self.easy
    }
}

/// Final state of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub tally: Tally,
    /// Nothing was due and there were no new words
    pub was_empty: bool,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Loaded(Session),
    Reveal,
    Rate { rating: Rating, updated: ReviewProgress },
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::Loaded(_) => "loaded",
            SessionEvent::Reveal => "reveal",
            SessionEvent::Rate { .. } => "rate",
        }
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot handle \"{event}\" while {phase:?}")]
    InvalidTransition { event: &'static str, phase: Phase },

    #[error("Cannot rate before the answer is revealed")]
    NotRevealed,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

/// Result of rating the current card
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    /// Progress persisted and the session advanced
    Saved(ReviewProgress),
    /// Flashcard storage is corrupted; nothing was written and the session
    /// did not advance
    NotSaved,
}

/// State of one review pass
#[derive(Debug, Clone)]
pub struct ReviewSession {
    phase: Phase,
    cards: Vec<TranslationRecord>,
    progress: HashMap<String, ReviewProgress>,
    current_index: usize,
    revealed: bool,
    tally: Tally,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            cards: Vec::new(),
            progress: HashMap::new(),
            current_index: 0,
            revealed: false,
            tally: Tally::default(),
        }
    }

    /// A review that has already handled the "loaded" event
    pub fn loaded(session: Session) -> Self {
        let mut review = Self::new();
        review.load(session);
        review
    }

    fn load(&mut self, session: Session) {
        self.phase = if session.cards.is_empty() {
            Phase::Done
        } else {
            Phase::Studying
        };
        self.cards = session.cards;
        self.progress = session.progress;
        self.current_index = 0;
        self.revealed = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn cards(&self) -> &[TranslationRecord] {
        &self.cards
    }

    pub fn current_card(&self) -> Option<&TranslationRecord> {
        match self.phase {
            Phase::Studying => self.cards.get(self.current_index),
            _ => None,
        }
    }

    /// Progress snapshot of the current card, `None` for a new word
    pub fn current_progress(&self) -> Option<&ReviewProgress> {
        self.current_card().and_then(|card| self.progress.get(&card.word))
    }

    pub fn is_current_new(&self) -> bool {
        self.current_card().is_some()
            && self.current_progress().map_or(true, ReviewProgress::is_new)
    }

    /// 1-based position and session length, e.g. `(3, 10)`
    pub fn position(&self) -> Option<(usize, usize)> {
        self.current_card()
            .map(|_| (self.current_index + 1, self.cards.len()))
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        match self.phase {
            Phase::Done => Some(SessionSummary {
                tally: self.tally,
                was_empty: self.tally.total() == 0,
            }),
            _ => None,
        }
    }

    /// Apply one event to the state machine
    pub fn apply(&mut self, event: SessionEvent) -> Result<(), SessionError> {
        let name = event.name();
        match (self.phase, event) {
            (Phase::Loading, SessionEvent::Loaded(session)) => {
                self.load(session);
                Ok(())
            }
            (Phase::Studying, SessionEvent::Reveal) => {
                self.revealed = true;
                Ok(())
            }
            (Phase::Studying, SessionEvent::Rate { .. }) if !self.revealed => {
                Err(SessionError::NotRevealed)
            }
            (Phase::Studying, SessionEvent::Rate { rating, updated }) => {
                self.tally.record(rating);
                self.progress.insert(updated.word.clone(), updated);
                self.revealed = false;

                let next = self.current_index + 1;
                if next >= self.cards.len() {
                    self.phase = Phase::Done;
                } else {
                    self.current_index = next;
                }
                Ok(())
            }
            (phase, _) => Err(SessionError::InvalidTransition { event: name, phase }),
        }
    }

    /// Rate the current card, persist the new progress, then advance.
    ///
    /// When the flashcard store is corrupted nothing changes and
    /// `RateOutcome::NotSaved` is returned.
    pub fn rate(
        &mut self,
        rating: Rating,
        now: i64,
        storage: &ProgressStorage,
    ) -> Result<RateOutcome, SessionError> {
        let card = match self.current_card() {
            Some(card) => card,
            None => {
                return Err(SessionError::InvalidTransition {
                    event: "rate",
                    phase: self.phase,
                })
            }
        };
        if !self.revealed {
            return Err(SessionError::NotRevealed);
        }

        let existing = self
            .progress
            .get(&card.word)
            .cloned()
            .unwrap_or_else(|| ReviewProgress::fresh(card.word.clone()));
        let updated = apply_rating(&existing, rating, now);

        if !storage.save(&updated)? {
            return Ok(RateOutcome::NotSaved);
        }

        self.apply(SessionEvent::Rate {
            rating,
            updated: updated.clone(),
        })?;
        Ok(RateOutcome::Saved(updated))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::flashcards::models::DAY_MS;
    use crate::flashcards::storage::FLASHCARDS_KEY;
    use crate::store::{DurableStore, KeyValueStore, MemoryStore};

    const NOW: i64 = 1_700_000_000_000;

    fn record(word: &str) -> TranslationRecord {
        TranslationRecord {
            id: format!("{}-id", word),
            word: word.to_string(),
            translation: format!("{}-uk", word),
            part_of_speech: "noun".to_string(),
            example: String::new(),
            example_translation: String::new(),
            timestamp: 0,
        }
    }

    fn scheduled(word: &str, next_review_date: i64) -> (String, ReviewProgress) {
        (
            word.to_string(),
            ReviewProgress {
                repetitions: 2,
                interval: 6,
                next_review_date,
                ..ReviewProgress::fresh(word)
            },
        )
    }

    fn words(cards: &[TranslationRecord]) -> Vec<&str> {
        cards.iter().map(|t| t.word.as_str()).collect()
    }

    #[test]
    fn test_select_due_unseen_and_future() {
        let history = vec![record("a"), record("b"), record("c"), record("d")];
        let progress: HashMap<_, _> = [
            scheduled("a", NOW - 2 * DAY_MS),
            scheduled("c", NOW),
            scheduled("d", NOW + DAY_MS),
        ]
        .into_iter()
        .collect();

        let selected = select_cards(&history, &progress, NOW, SESSION_SIZE);
        assert_eq!(words(&selected), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_select_orders_due_by_date() {
        let history = vec![record("x"), record("y"), record("z")];
        let progress: HashMap<_, _> = [
            scheduled("x", NOW - DAY_MS),
            scheduled("y", NOW - 3 * DAY_MS),
            scheduled("z", NOW - 2 * DAY_MS),
        ]
        .into_iter()
        .collect();

        let selected = select_cards(&history, &progress, NOW, SESSION_SIZE);
        assert_eq!(words(&selected), vec!["y", "z", "x"]);
    }

    #[test]
    fn test_select_truncates_with_due_priority() {
        let history: Vec<_> = (0..15).map(|i| record(&format!("w{}", i))).collect();
        // The last three are due; they must survive truncation
        let progress: HashMap<_, _> = (12..15)
            .map(|i| scheduled(&format!("w{}", i), NOW - i as i64))
            .collect();

        let selected = select_cards(&history, &progress, NOW, SESSION_SIZE);
        assert_eq!(selected.len(), SESSION_SIZE);
        assert_eq!(words(&selected[..3]), vec!["w14", "w13", "w12"]);
        assert_eq!(words(&selected[3..]), vec!["w0", "w1", "w2", "w3", "w4", "w5", "w6"]);
    }

    #[test]
    fn test_build_session_shuffles_selection_only() {
        let history: Vec<_> = (0..12).map(|i| record(&format!("w{}", i))).collect();
        let progress = HashMap::new();
        let mut rng = StdRng::seed_from_u64(7);

        let session = build_session(&history, progress.clone(), NOW, SESSION_SIZE, &mut rng);

        let mut got: Vec<_> = words(&session.cards).into_iter().map(String::from).collect();
        got.sort();
        let mut expected: Vec<_> = (0..10).map(|i| format!("w{}", i)).collect();
        expected.sort();
        assert_eq!(got, expected);
        assert_eq!(session.progress, progress);
    }

    #[test]
    fn test_empty_history_gives_empty_session() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = build_session(&[], HashMap::new(), NOW, SESSION_SIZE, &mut rng);
        assert!(session.cards.is_empty());
    }

    fn create_test_storage() -> (ProgressStorage, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let storage = ProgressStorage::new(DurableStore::new(backend.clone()));
        (storage, backend)
    }

    fn loaded(cards: Vec<TranslationRecord>) -> ReviewSession {
        let mut review = ReviewSession::new();
        review
            .apply(SessionEvent::Loaded(Session {
                cards,
                progress: HashMap::new(),
            }))
            .unwrap();
        review
    }

    #[test]
    fn test_loaded_empty_goes_to_done() {
        let review = loaded(Vec::new());
        assert_eq!(review.phase(), Phase::Done);
        assert_eq!(
            review.summary(),
            Some(SessionSummary {
                tally: Tally::default(),
                was_empty: true
            })
        );
    }

    #[test]
    fn test_loaded_constructor_matches_loaded_event() {
        let review = ReviewSession::loaded(Session {
            cards: vec![record("a")],
            progress: HashMap::new(),
        });
        assert_eq!(review.phase(), Phase::Studying);
        assert_eq!(review.current_card().map(|t| t.word.as_str()), Some("a"));

        // A second "loaded" is still rejected
        let mut review = review;
        assert!(matches!(
            review.apply(SessionEvent::Loaded(Session::default())),
            Err(SessionError::InvalidTransition { event: "loaded", .. })
        ));
        assert!(ReviewSession::loaded(Session::default()).summary().is_some());
    }

    #[test]
    fn test_reveal_keeps_index() {
        let mut review = loaded(vec![record("a"), record("b")]);
        assert_eq!(review.phase(), Phase::Studying);
        assert_eq!(review.position(), Some((1, 2)));
        assert!(!review.is_revealed());

        review.apply(SessionEvent::Reveal).unwrap();
        assert!(review.is_revealed());
        assert_eq!(review.position(), Some((1, 2)));
    }

    #[test]
    fn test_full_review_flow() {
        let (storage, _backend) = create_test_storage();
        let mut review = loaded(vec![record("a"), record("b")]);
        assert!(review.is_current_new());

        review.apply(SessionEvent::Reveal).unwrap();
        let outcome = review.rate(Rating::Good, NOW, &storage).unwrap();
        let RateOutcome::Saved(saved) = outcome else {
            panic!("expected progress to be saved");
        };
        assert_eq!(saved.word, "a");
        assert_eq!(saved.repetitions, 1);
        assert_eq!(storage.get("a").unwrap(), Some(saved));

        assert_eq!(review.phase(), Phase::Studying);
        assert_eq!(review.position(), Some((2, 2)));
        assert!(!review.is_revealed());

        review.apply(SessionEvent::Reveal).unwrap();
        review.rate(Rating::Again, NOW, &storage).unwrap();

        assert_eq!(review.phase(), Phase::Done);
        assert_eq!(review.current_card(), None);
        let summary = review.summary().unwrap();
        assert_eq!(summary.tally, Tally { again: 1, good: 1, easy: 0 });
        assert!(!summary.was_empty);
    }

    #[test]
    fn test_rate_uses_snapshot_progress() {
        let (storage, _backend) = create_test_storage();
        let mut review = ReviewSession::new();
        review
            .apply(SessionEvent::Loaded(Session {
                cards: vec![record("a")],
                progress: [scheduled("a", NOW)].into_iter().collect(),
            }))
            .unwrap();
        assert!(!review.is_current_new());

        review.apply(SessionEvent::Reveal).unwrap();
        let outcome = review.rate(Rating::Good, NOW, &storage).unwrap();
        // repetitions 2, interval 6, ease 2.5 -> 15 days
        assert!(matches!(outcome, RateOutcome::Saved(ref p) if p.interval == 15 && p.repetitions == 3));
    }

    #[test]
    fn test_rate_on_corrupted_storage_does_not_advance() {
        let (storage, backend) = create_test_storage();
        backend.set(FLASHCARDS_KEY, "{broken").unwrap();

        let mut review = loaded(vec![record("a"), record("b")]);
        review.apply(SessionEvent::Reveal).unwrap();

        let outcome = review.rate(Rating::Easy, NOW, &storage).unwrap();
        assert_eq!(outcome, RateOutcome::NotSaved);
        assert_eq!(review.position(), Some((1, 2)));
        assert!(review.is_revealed());
        assert_eq!(review.tally().total(), 0);
        assert_eq!(backend.get(FLASHCARDS_KEY).unwrap().as_deref(), Some("{broken"));
    }

    #[test]
    fn test_invalid_transitions_are_rejected() {
        let (storage, _backend) = create_test_storage();
        let mut review = ReviewSession::new();

        assert!(matches!(
            review.apply(SessionEvent::Reveal),
            Err(SessionError::InvalidTransition { phase: Phase::Loading, .. })
        ));
        assert!(review.rate(Rating::Good, NOW, &storage).is_err());

        let mut review = loaded(vec![record("a")]);
        assert!(matches!(
            review.rate(Rating::Good, NOW, &storage),
            Err(SessionError::NotRevealed)
        ));
        assert!(matches!(
            review.apply(SessionEvent::Loaded(Session::default())),
            Err(SessionError::InvalidTransition { phase: Phase::Studying, .. })
        ));
        assert_eq!(review.phase(), Phase::Studying);
        assert!(storage.get_all().unwrap().is_empty());
    }
}
