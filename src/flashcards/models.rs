//! Data models for the flashcard system

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{Schema, SchemaViolation};

/// Minimum ease factor allowed
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Maximum ease factor, also the starting value
pub const MAX_EASE_FACTOR: f64 = 2.5;

/// Milliseconds in one day
pub const DAY_MS: i64 = 86_400_000;

/// How well a word was recalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    /// Forgot
    Again,
    /// Recalled
    Good,
    /// Instant recall
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Again, Rating::Good, Rating::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Again => "again",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    /// Accepts the rating name or its keyboard shortcut (1-3)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "again" | "1" => Ok(Rating::Again),
            "good" | "2" => Ok(Rating::Good),
            "easy" | "3" => Ok(Rating::Easy),
            other => Err(format!(
                "unknown rating {:?} (expected again, good, easy or 1-3)",
                other
            )),
        }
    }
}

/// Spaced repetition state for one word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewProgress {
    /// Matches `TranslationRecord::word`
    pub word: String,
    /// SM-2 ease factor, within [1.3, 2.5]
    pub ease_factor: f64,
    /// Current interval in days
    pub interval: u32,
    /// Consecutive successful reviews
    pub repetitions: u32,
    /// Milliseconds since the epoch
    pub next_review_date: i64,
}

impl ReviewProgress {
    /// State of a word that has never been reviewed
    pub fn fresh(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ease_factor: MAX_EASE_FACTOR,
            interval: 1,
            repetitions: 0,
            next_review_date: 0,
        }
    }

    /// Shown with a "New" badge during review
    pub fn is_new(&self) -> bool {
        self.repetitions == 0
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.next_review_date <= now
    }
}

impl Schema for ReviewProgress {
    fn validate(&self) -> Result<(), SchemaViolation> {
        if self.word.is_empty() {
            return Err(SchemaViolation("progress has an empty word".to_string()));
        }
        if !self.ease_factor.is_finite()
            || !(MIN_EASE_FACTOR..=MAX_EASE_FACTOR).contains(&self.ease_factor)
        {
            return Err(SchemaViolation(format!(
                "ease factor {} of \"{}\" is outside [{}, {}]",
                self.ease_factor, self.word, MIN_EASE_FACTOR, MAX_EASE_FACTOR
            )));
        }
        if self.interval < 1 {
            return Err(SchemaViolation(format!("interval of \"{}\" is 0", self.word)));
        }
        Ok(())
    }
}

/// Counts of words by review state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_words: usize,
    /// Never reviewed
    pub unseen: usize,
    /// Next review date has passed
    pub due: usize,
    /// Next review date is in the future
    pub scheduled: usize,
    /// Progress records whose word is no longer in history
    pub orphaned_progress: usize,
}
