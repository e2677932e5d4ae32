use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::id::DeckId;

/// A named grouping of cards.
///
/// Cards reference their deck through [`Card::deck_id`]; a deck never holds its
/// cards, so membership is resolved with [`Deck::cards`] over the flat collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    /// Set once at creation
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Last time any card of this deck was reviewed
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed: Option<DateTime<Utc>>,
}

impl Deck {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: DeckId::generate(),
            name: name.into(),
            created_at: now.trunc_subsecs(3),
            last_reviewed: None,
        }
    }

    /// Record that one of this deck's cards was reviewed at `now`.
    pub fn mark_reviewed(&mut self, now: DateTime<Utc>) {
        self.last_reviewed = Some(now.trunc_subsecs(3));
    }

    /// Cards of the flat collection that belong to this deck.
    pub fn cards<'a>(&'a self, cards: &'a [Card]) -> impl Iterator<Item = &'a Card> + 'a {
        cards.iter().filter(move |card| card.deck_id == self.id)
    }
}
