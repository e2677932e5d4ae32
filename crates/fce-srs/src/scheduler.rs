//! Card scheduling.
//!
//! A simplified SM-2: the learner only tells us whether the answer was right or
//! wrong, and the card's ease factor, interval and repetition count evolve from
//! that single bit.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Offset, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Ease factor every new card starts with.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;
/// Added to the ease factor on every correct answer. There is no upper bound.
pub const EASE_BONUS: f64 = 0.1;
/// Subtracted from the ease factor on every incorrect answer.
pub const EASE_PENALTY: f64 = 0.2;
/// Floor applied to the ease factor after a penalty.
pub const MIN_EASE_FACTOR: f64 = 1.3;

const FIRST_INTERVAL_DAYS: u32 = 1;
const SECOND_INTERVAL_DAYS: u32 = 6;
const RELEARN_INTERVAL_DAYS: u32 = 1;

/// The learner's self-assessment of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
}

impl ReviewOutcome {
    pub const fn is_correct(self) -> bool {
        matches!(self, Self::Correct)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }
}

impl From<bool> for ReviewOutcome {
    fn from(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Incorrect }
    }
}

/// Computes the next scheduling state of a card.
///
/// Intervals are whole days counted from the start of the day on which the
/// review happens. Where a day starts is decided by a fixed UTC offset, UTC by
/// default, so that "tomorrow" matches the learner's calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    offset: FixedOffset,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl Scheduler {
    /// Scheduler whose days start at midnight in the given offset.
    pub const fn with_utc_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Scheduler for an offset expressed in minutes east of UTC.
    ///
    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn from_offset_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::with_utc_offset)
    }

    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Midnight of the calendar day containing `now`, as a UTC instant.
    pub fn start_of_day(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_midnight = now
            .with_timezone(&self.offset)
            .date_naive()
            .and_time(NaiveTime::MIN);
        let shift = Duration::seconds(i64::from(self.offset.local_minus_utc()));

        (local_midnight - shift).and_utc()
    }

    /// Compute the card's state after a review at `now`.
    ///
    /// # Arguments
    ///
    /// * `card` - The card being reviewed; it is not modified
    /// * `outcome` - Whether the learner answered correctly
    /// * `now` - The moment of the review
    ///
    /// # Returns
    ///
    /// A new `Card` with `last_reviewed = now` and updated ease factor,
    /// interval, repetitions and next review date.
    ///
    /// # Algorithm
    ///
    /// * Correct: repetitions + 1. The interval is 1 day on the first
    ///   consecutive success, 6 days on the second, and
    ///   `round(previous interval * ease factor)` afterwards, using the ease
    ///   factor from before this review. Then ease factor + 0.1.
    /// * Incorrect: repetitions reset to 0, ease factor - 0.2 floored at 1.3,
    ///   interval 1 day.
    ///
    /// The next review is the start of today plus the interval.
    ///
    /// The input is not validated: out-of-range values (a negative ease factor,
    /// say) are carried through or clamped, never rejected.
    pub fn schedule(&self, card: &Card, outcome: ReviewOutcome, now: DateTime<Utc>) -> Card {
        let now = now.trunc_subsecs(3);
        let mut next = Card {
            last_reviewed: Some(now),
            ..card.clone()
        };

        match outcome {
            ReviewOutcome::Correct => {
                next.repetitions = card.repetitions.saturating_add(1);
                next.interval = next_interval(next.repetitions, card.interval, card.ease_factor);
                next.ease_factor = card.ease_factor + EASE_BONUS;
            }
            ReviewOutcome::Incorrect => {
                next.repetitions = 0;
                next.ease_factor = (card.ease_factor - EASE_PENALTY).max(MIN_EASE_FACTOR);
                next.interval = RELEARN_INTERVAL_DAYS;
            }
        }

        next.next_review = Some(add_days(self.start_of_day(now), next.interval));
        next
    }
}

/// Schedule a card with days aligned to UTC midnight.
///
/// Shorthand for `Scheduler::default().schedule(card, outcome, now)`.
pub fn schedule(card: &Card, outcome: ReviewOutcome, now: DateTime<Utc>) -> Card {
    Scheduler::default().schedule(card, outcome, now)
}

fn next_interval(repetition: u32, previous_interval: u32, ease_factor: f64) -> u32 {
    match repetition {
        1 => FIRST_INTERVAL_DAYS,
        2 => SECOND_INTERVAL_DAYS,
        // `as` saturates: negative or NaN products land on 0, huge ones on u32::MAX
        _ => (f64::from(previous_interval) * ease_factor).round() as u32,
    }
}

fn add_days(day_start: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    day_start
        .checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
