//! Flashcard review with spaced repetition
//!
//! This module provides:
//! - Per-word review progress storage
//! - SM-2 spaced repetition algorithm
//! - Session selection and the review state machine

pub mod algorithm;
pub mod models;
pub mod session;
pub mod storage;

pub use algorithm::apply_rating;
pub use models::*;
pub use session::{
    build_session, select_cards, Phase, RateOutcome, ReviewSession, Session, SessionError,
    SessionEvent, SessionSummary, Tally, SESSION_SIZE,
};
pub use storage::{ProgressStorage, FLASHCARDS_KEY};
