//! Card record and its single creation path.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{CardId, DeckId};
use crate::scheduler::INITIAL_EASE_FACTOR;

/// A reviewable flashcard together with its scheduling state.
///
/// Timestamps are stored as epoch milliseconds and nullable fields are always
/// written out as `null`, so a card survives a save/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique card identifier
    pub id: CardId,
    /// Question side, never validated by the scheduler
    pub front: String,
    /// Answer side, never validated by the scheduler
    pub back: String,
    /// Owning deck (looked up by key, decks do not contain cards)
    pub deck_id: DeckId,
    /// Free-form labels, only used for filtering
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the card was last reviewed, `None` if never
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the card is next due, `None` counts as due
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub next_review: Option<DateTime<Utc>>,
    /// SM-2 ease factor, never below [`MIN_EASE_FACTOR`](crate::MIN_EASE_FACTOR)
    /// after a review
    pub ease_factor: f64,
    /// Days between the last review and the next one
    pub interval: u32,
    /// Consecutive correct reviews since the last miss
    pub repetitions: u32,
}

/// Freshly authored card content, before it has any review history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub front: String,
    pub back: String,
    pub deck_id: DeckId,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewCard {
    pub fn new(front: impl Into<String>, back: impl Into<String>, deck_id: DeckId) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
            deck_id,
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

impl Card {
    /// Create a card in the canonical starting state.
    ///
    /// This is the only way cards come into existence, bulk imports included:
    /// the card gets a fresh id, ease 2.5, no interval, no repetitions, no
    /// review history and is due immediately at `now`.
    pub fn initialize(new: NewCard, now: DateTime<Utc>) -> Self {
        Self {
            id: CardId::generate(),
            front: new.front,
            back: new.back,
            deck_id: new.deck_id,
            tags: new.tags,
            last_reviewed: None,
            next_review: Some(now.trunc_subsecs(3)),
            ease_factor: INITIAL_EASE_FACTOR,
            interval: 0,
            repetitions: 0,
        }
    }

    /// Whether the card has never been reviewed.
    pub fn is_new(&self) -> bool {
        self.last_reviewed.is_none()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
