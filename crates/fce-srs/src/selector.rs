//! Due-set selection and the session queues built on top of it.
//!
//! Every function here borrows the card collection and returns references into
//! it; reordering a queue never reorders the collection itself.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::card::Card;
use crate::id::DeckId;

/// Cards drawn into one challenge round.
pub const CHALLENGE_ROUND_SIZE: usize = 10;
/// Cards whose answer is this long or longer are left out of challenge rounds.
pub const CHALLENGE_MAX_BACK_LEN: usize = 100;

/// A card is due when it was never scheduled or its next review has arrived.
pub fn is_due(card: &Card, now: DateTime<Utc>) -> bool {
    card.next_review.is_none_or(|next| next <= now)
}

/// Cards that are due at `now`, optionally restricted to one deck.
///
/// The result keeps collection order. Callers wanting a presentation order
/// derive it with [`shuffled`].
pub fn due_cards<'a>(cards: &'a [Card], deck: Option<&DeckId>, now: DateTime<Utc>) -> Vec<&'a Card> {
    cards
        .iter()
        .filter(|card| deck.is_none_or(|id| card.deck_id == *id))
        .filter(|card| is_due(card, now))
        .collect()
}

/// A freshly shuffled copy of a queue.
pub fn shuffled<'a, R: Rng + ?Sized>(queue: &[&'a Card], rng: &mut R) -> Vec<&'a Card> {
    let mut order = queue.to_vec();
    order.shuffle(rng);
    order
}

/// Random pick of cards for a challenge round, ignoring due dates.
///
/// Only cards with a short enough answer qualify; at most
/// [`CHALLENGE_ROUND_SIZE`] are returned.
pub fn challenge_cards<'a, R: Rng + ?Sized>(cards: &'a [Card], rng: &mut R) -> Vec<&'a Card> {
    let pool: Vec<&Card> = cards
        .iter()
        .filter(|card| card.back.chars().count() < CHALLENGE_MAX_BACK_LEN)
        .collect();

    pool.choose_multiple(rng, CHALLENGE_ROUND_SIZE)
        .copied()
        .collect()
}

/// Number of cards coming up within the next `days` days.
///
/// Unscheduled cards count as upcoming; cards already due do not.
pub fn upcoming_count(cards: &[Card], now: DateTime<Utc>, days: i64) -> usize {
    let horizon = now
        .checked_add_signed(Duration::days(days))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    cards
        .iter()
        .filter(|card| match card.next_review {
            None => true,
            Some(next) => next > now && next <= horizon,
        })
        .count()
}
