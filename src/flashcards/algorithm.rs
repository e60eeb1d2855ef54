//! SM-2 Spaced Repetition Algorithm
//!
//! Three-button variant of SuperMemo 2:
//! - again: start over tomorrow and lower the ease factor
//! - good: 1 day, then 6 days, then grow by the ease factor
//! - easy: as good, stretched by 1.3, and raise the ease factor
//!
//! Intervals are rounded half away from zero (`f64::round`), before the easy
//! multiplier is applied and again after it.

use super::models::{Rating, ReviewProgress, DAY_MS, MAX_EASE_FACTOR, MIN_EASE_FACTOR};

/// Ease factor lost on "again"
const AGAIN_EASE_PENALTY: f64 = 0.2;

/// Ease factor gained on "easy"
const EASY_EASE_BONUS: f64 = 0.15;

/// Interval stretch applied on "easy"
const EASY_INTERVAL_MULTIPLIER: f64 = 1.3;

/// Second successful review interval
const SECOND_INTERVAL: u32 = 6;

fn round_interval(days: f64) -> u32 {
    (days.round() as u32).max(1)
}

/// Calculate the progress after a review.
///
/// Returns a new record; `progress` is left untouched.
pub fn apply_rating(progress: &ReviewProgress, rating: Rating, now: i64) -> ReviewProgress {
    let (repetitions, interval, ease_factor) = match rating {
        Rating::Again => (
            0,
            1,
            (progress.ease_factor - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR),
        ),
        Rating::Good | Rating::Easy => {
            let mut interval = match progress.repetitions {
                0 => 1,
                1 => SECOND_INTERVAL,
                _ => round_interval(progress.interval as f64 * progress.ease_factor),
            };
            let mut ease_factor = progress.ease_factor;

            if rating == Rating::Easy {
                interval = round_interval(interval as f64 * EASY_INTERVAL_MULTIPLIER);
                ease_factor = (ease_factor + EASY_EASE_BONUS).min(MAX_EASE_FACTOR);
            }

            (progress.repetitions.saturating_add(1), interval, ease_factor)
        }
    };

    ReviewProgress {
        word: progress.word.clone(),
        ease_factor: ease_factor.clamp(MIN_EASE_FACTOR, MAX_EASE_FACTOR),
        interval,
        repetitions,
        next_review_date: now.saturating_add(i64::from(interval).saturating_mul(DAY_MS)),
    }
}

/// The interval each rating would produce, in `Rating::ALL` order
pub fn preview_intervals(progress: &ReviewProgress) -> [u32; 3] {
    Rating::ALL.map(|rating| apply_rating(progress, rating, 0).interval)
}

/// Format an interval in days to a human-readable string
pub fn format_interval(days: u32) -> String {
    if days == 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}
