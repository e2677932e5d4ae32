//! Review statistics aggregation.
//!
//! Everything here is derived from the stored daily records and the card
//! collection; nothing is persisted besides the per-day counters that
//! [`record_review`] updates.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use fce_db::ReviewStats;
use fce_srs::{Card, Deck, ReviewOutcome, Scheduler, is_due, upcoming_count};
use serde::Serialize;

/// Repetition count at which a card is shown as mastered
pub const MASTERED_REPETITIONS: u32 = 4;

/// Length of the daily activity series
pub const DAILY_SERIES_DAYS: i64 = 7;

/// Horizon for the upcoming-reviews count
pub const UPCOMING_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub cards_reviewed: u32,
    /// Percentage of correct answers, rounded; 0 on days without reviews
    pub accuracy: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CardStatusCounts {
    pub new: usize,
    pub due: usize,
    pub learning: usize,
    pub mastered: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_reviews: u32,
    pub correct_rate: u32,
    pub average_daily_reviews: u32,
    pub active_decks: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub today: ReviewStats,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub card_status: CardStatusCounts,
    pub performance: PerformanceMetrics,
    pub due_count: usize,
    pub upcoming_count: usize,
}

fn percentage(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    (f64::from(part) * 100.0 / f64::from(whole)).round() as u32
}

/// Distinct calendar days with a record, ascending
fn active_days(stats: &[ReviewStats], scheduler: &Scheduler) -> BTreeSet<DateTime<Utc>> {
    stats
        .iter()
        .map(|record| scheduler.start_of_day(record.date))
        .collect()
}

/// Today's record, or an empty one dated at the start of today
pub fn today(stats: &[ReviewStats], scheduler: &Scheduler, now: DateTime<Utc>) -> ReviewStats {
    let day = scheduler.start_of_day(now);
    stats
        .iter()
        .find(|record| scheduler.start_of_day(record.date) == day)
        .cloned()
        .unwrap_or_else(|| ReviewStats::empty(day))
}

/// Count one review against today's record, creating it if needed.
///
/// Returns the updated record.
pub fn record_review(
    stats: &mut Vec<ReviewStats>,
    scheduler: &Scheduler,
    outcome: ReviewOutcome,
    now: DateTime<Utc>,
) -> ReviewStats {
    let day = scheduler.start_of_day(now);
    let index = match stats
        .iter()
        .position(|record| scheduler.start_of_day(record.date) == day)
    {
        Some(index) => index,
        None => {
            stats.push(ReviewStats::empty(day));
            stats.len() - 1
        }
    };

    let record = &mut stats[index];
    record.cards_reviewed = record.cards_reviewed.saturating_add(1);
    match outcome {
        ReviewOutcome::Correct => record.correct_answers = record.correct_answers.saturating_add(1),
        ReviewOutcome::Incorrect => {
            record.incorrect_answers = record.incorrect_answers.saturating_add(1)
        }
    }
    record.clone()
}

/// The last seven calendar days, oldest first, with missing days filled in.
///
/// Empty until the first review is recorded.
pub fn daily_series(
    stats: &[ReviewStats],
    scheduler: &Scheduler,
    now: DateTime<Utc>,
) -> Vec<DailyActivity> {
    if stats.is_empty() {
        return Vec::new();
    }

    let today = scheduler.start_of_day(now);

    (0..DAILY_SERIES_DAYS)
        .rev()
        .map(|back| {
            let date = today - Duration::days(back);
            let (correct, incorrect) = stats
                .iter()
                .filter(|record| scheduler.start_of_day(record.date) == date)
                .fold((0u32, 0u32), |(c, i), record| {
                    (
                        c.saturating_add(record.correct_answers),
                        i.saturating_add(record.incorrect_answers),
                    )
                });
            let total = correct.saturating_add(incorrect);

            DailyActivity {
                date,
                cards_reviewed: total,
                accuracy: percentage(correct, total),
            }
        })
        .collect()
}

/// Classify every card as new, due, mastered or learning (first match wins).
pub fn card_status_counts(cards: &[Card], now: DateTime<Utc>) -> CardStatusCounts {
    let mut counts = CardStatusCounts::default();

    for card in cards {
        if card.last_reviewed.is_none() {
            counts.new += 1;
        } else if card.next_review.is_some_and(|next| next <= now) {
            counts.due += 1;
        } else if card.repetitions >= MASTERED_REPETITIONS {
            counts.mastered += 1;
        } else {
            counts.learning += 1;
        }
    }

    counts
}

/// Consecutive study days ending today, or yesterday if nothing was studied yet today.
pub fn current_streak(stats: &[ReviewStats], scheduler: &Scheduler, now: DateTime<Utc>) -> u32 {
    let days = active_days(stats, scheduler);
    let today = scheduler.start_of_day(now);
    let yesterday = today - Duration::days(1);

    let mut cursor = if days.contains(&today) {
        today
    } else if days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

pub fn longest_streak(stats: &[ReviewStats], scheduler: &Scheduler) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<DateTime<Utc>> = None;

    for day in active_days(stats, scheduler) {
        run = match previous {
            Some(prev) if prev + Duration::days(1) == day => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(day);
    }

    longest
}

pub fn performance_metrics(
    stats: &[ReviewStats],
    decks: &[Deck],
    scheduler: &Scheduler,
) -> PerformanceMetrics {
    if stats.is_empty() {
        return PerformanceMetrics::default();
    }

    let total_reviews = stats
        .iter()
        .fold(0u32, |sum, record| sum.saturating_add(record.cards_reviewed));
    let total_correct = stats
        .iter()
        .fold(0u32, |sum, record| sum.saturating_add(record.correct_answers));
    let active_days = u32::try_from(active_days(stats, scheduler).len()).unwrap_or(u32::MAX);

    PerformanceMetrics {
        total_reviews,
        correct_rate: percentage(total_correct, total_reviews),
        average_daily_reviews: (f64::from(total_reviews) / f64::from(active_days)).round() as u32,
        active_decks: decks
            .iter()
            .filter(|deck| deck.last_reviewed.is_some())
            .count(),
    }
}

pub fn summary(
    stats: &[ReviewStats],
    cards: &[Card],
    decks: &[Deck],
    scheduler: &Scheduler,
    now: DateTime<Utc>,
) -> StatsSummary {
    StatsSummary {
        today: today(stats, scheduler, now),
        current_streak: current_streak(stats, scheduler, now),
        longest_streak: longest_streak(stats, scheduler),
        card_status: card_status_counts(cards, now),
        performance: performance_metrics(stats, decks, scheduler),
        due_count: cards.iter().filter(|card| is_due(card, now)).count(),
        upcoming_count: upcoming_count(cards, now, UPCOMING_DAYS),
    }
}
