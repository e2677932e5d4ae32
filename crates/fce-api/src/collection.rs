//! The learner's collection and every operation that mutates it.
//!
//! `Collection` owns the persisted [`AppState`] and is the only place that
//! writes to it. Scheduling and due-set selection are delegated to `fce_srs`;
//! this module commits their results and keeps the daily review counters.
//!
//! Input is assumed to be validated already (see [`crate::validation`]); the
//! collection only enforces referential rules such as "a card's deck exists".

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use fce_db::{AppState, ReviewStats};
use fce_srs::{Card, CardId, Deck, DeckId, NewCard, ReviewOutcome, Scheduler, due_cards};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, stats::service as stats};

/// Decks with their cards, as exported and re-imported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckBundle {
    pub decks: Vec<Deck>,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub decks_added: usize,
    pub cards_added: usize,
    /// Ids already present in the collection
    pub cards_skipped: usize,
    /// Cards whose deck exists neither in the collection nor in the import
    pub orphaned_cards: usize,
}

/// Editable content of a card. `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardContent {
    pub front: Option<String>,
    pub back: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReceipt {
    pub card: Card,
    pub today: ReviewStats,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    state: AppState,
    scheduler: Scheduler,
}

impl Collection {
    pub fn new(state: AppState, scheduler: Scheduler) -> Self {
        Self { state, scheduler }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn decks(&self) -> &[Deck] {
        &self.state.decks
    }

    pub fn cards(&self) -> &[Card] {
        &self.state.cards
    }

    pub fn review_stats(&self) -> &[ReviewStats] {
        &self.state.review_stats
    }

    pub fn deck(&self, id: &DeckId) -> Option<&Deck> {
        self.state.decks.iter().find(|deck| deck.id == *id)
    }

    pub fn card(&self, id: &CardId) -> Option<&Card> {
        self.state.cards.iter().find(|card| card.id == *id)
    }

    pub fn current_deck_id(&self) -> Option<&DeckId> {
        self.state.current_deck_id.as_ref()
    }

    fn require_deck(&self, id: &DeckId) -> Result<&Deck, ApiError> {
        self.deck(id).ok_or_else(|| ApiError::deck_not_found(id))
    }

    fn card_mut(&mut self, id: &CardId) -> Result<&mut Card, ApiError> {
        self.state
            .cards
            .iter_mut()
            .find(|card| card.id == *id)
            .ok_or_else(|| ApiError::card_not_found(id))
    }

    /// Create a deck and make it the current one.
    pub fn add_deck(&mut self, name: String, now: DateTime<Utc>) -> Deck {
        let deck = Deck::new(name, now);
        self.state.current_deck_id = Some(deck.id.clone());
        self.state.decks.push(deck.clone());
        deck
    }

    pub fn rename_deck(&mut self, id: &DeckId, name: String) -> Result<Deck, ApiError> {
        let deck = self
            .state
            .decks
            .iter_mut()
            .find(|deck| deck.id == *id)
            .ok_or_else(|| ApiError::deck_not_found(id))?;
        deck.name = name;
        Ok(deck.clone())
    }

    /// Delete a deck together with its cards.
    ///
    /// Returns the number of cards removed.
    pub fn delete_deck(&mut self, id: &DeckId) -> Result<usize, ApiError> {
        self.require_deck(id)?;

        self.state.decks.retain(|deck| deck.id != *id);
        let before = self.state.cards.len();
        self.state.cards.retain(|card| card.deck_id != *id);
        if self.state.current_deck_id.as_ref() == Some(id) {
            self.state.current_deck_id = None;
        }

        Ok(before - self.state.cards.len())
    }

    pub fn set_current_deck(&mut self, id: Option<DeckId>) -> Result<(), ApiError> {
        if let Some(id) = &id {
            self.require_deck(id)?;
        }
        self.state.current_deck_id = id;
        Ok(())
    }

    pub fn add_card(&mut self, new: NewCard, now: DateTime<Utc>) -> Result<Card, ApiError> {
        self.require_deck(&new.deck_id)?;

        let card = Card::initialize(new, now);
        self.state.cards.push(card.clone());
        Ok(card)
    }

    /// Add several cards at once. Nothing is added if any deck is missing.
    pub fn add_cards(
        &mut self,
        batch: Vec<NewCard>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Card>, ApiError> {
        if let Some(missing) = batch.iter().find(|new| self.deck(&new.deck_id).is_none()) {
            return Err(ApiError::deck_not_found(&missing.deck_id));
        }

        let cards: Vec<Card> = batch
            .into_iter()
            .map(|new| Card::initialize(new, now))
            .collect();
        self.state.cards.extend(cards.iter().cloned());
        Ok(cards)
    }

    /// Replace a card's front, back or tags. Scheduling state is left alone.
    pub fn update_card_content(
        &mut self,
        id: &CardId,
        content: CardContent,
    ) -> Result<Card, ApiError> {
        let card = self.card_mut(id)?;

        if let Some(front) = content.front {
            card.front = front;
        }
        if let Some(back) = content.back {
            card.back = back;
        }
        if let Some(tags) = content.tags {
            card.tags = tags;
        }

        Ok(card.clone())
    }

    pub fn delete_card(&mut self, id: &CardId) -> Result<Card, ApiError> {
        let index = self
            .state
            .cards
            .iter()
            .position(|card| card.id == *id)
            .ok_or_else(|| ApiError::card_not_found(id))?;
        Ok(self.state.cards.remove(index))
    }

    pub fn add_tag(&mut self, id: &CardId, tag: String) -> Result<Card, ApiError> {
        let card = self.card_mut(id)?;
        if !card.has_tag(&tag) {
            card.tags.push(tag);
        }
        Ok(card.clone())
    }

    pub fn remove_tag(&mut self, id: &CardId, tag: &str) -> Result<Card, ApiError> {
        let card = self.card_mut(id)?;
        card.tags.retain(|t| t != tag);
        Ok(card.clone())
    }

    /// Every tag used by any card, sorted and without duplicates.
    pub fn all_tags(&self) -> Vec<String> {
        self.state
            .cards
            .iter()
            .flat_map(|card| card.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cards due at `now`, in collection order.
    pub fn due_cards(&self, deck: Option<&DeckId>, now: DateTime<Utc>) -> Vec<&Card> {
        due_cards(&self.state.cards, deck, now)
    }

    /// Apply one review: reschedule the card, touch its deck and count the
    /// review in today's statistics.
    pub fn review_card(
        &mut self,
        id: &CardId,
        outcome: ReviewOutcome,
        now: DateTime<Utc>,
    ) -> Result<ReviewReceipt, ApiError> {
        let scheduler = self.scheduler;
        let card = self.card_mut(id)?;
        *card = scheduler.schedule(card, outcome, now);
        let card = card.clone();

        if let Some(deck) = self
            .state
            .decks
            .iter_mut()
            .find(|deck| deck.id == card.deck_id)
        {
            deck.mark_reviewed(now);
        }

        let today = stats::record_review(&mut self.state.review_stats, &scheduler, outcome, now);

        tracing::debug!(
            card_id = %card.id,
            outcome = outcome.as_str(),
            interval = card.interval,
            ease_factor = card.ease_factor,
            "Card reviewed"
        );

        Ok(ReviewReceipt { card, today })
    }

    /// Merge previously exported decks and cards into the collection.
    ///
    /// Records are kept as exported, review history included. Decks and cards
    /// whose id is already present are skipped, as are cards pointing at a
    /// deck that exists nowhere.
    pub fn import(&mut self, bundle: DeckBundle) -> ImportSummary {
        let mut summary = ImportSummary::default();

        let mut deck_ids: HashSet<DeckId> =
            self.state.decks.iter().map(|deck| deck.id.clone()).collect();
        for deck in bundle.decks {
            if deck_ids.insert(deck.id.clone()) {
                self.state.decks.push(deck);
                summary.decks_added += 1;
            }
        }

        let mut card_ids: HashSet<CardId> =
            self.state.cards.iter().map(|card| card.id.clone()).collect();
        for card in bundle.cards {
            if !deck_ids.contains(&card.deck_id) {
                summary.orphaned_cards += 1;
            } else if card_ids.insert(card.id.clone()) {
                self.state.cards.push(card);
                summary.cards_added += 1;
            } else {
                summary.cards_skipped += 1;
            }
        }

        tracing::info!(
            decks_added = summary.decks_added,
            cards_added = summary.cards_added,
            cards_skipped = summary.cards_skipped,
            orphaned_cards = summary.orphaned_cards,
            "Import merged"
        );
        summary
    }

    pub fn export_deck(&self, id: &DeckId) -> Result<DeckBundle, ApiError> {
        let deck = self.require_deck(id)?;
        Ok(DeckBundle {
            decks: vec![deck.clone()],
            cards: deck.cards(&self.state.cards).cloned().collect(),
        })
    }

    /// Drop everything and start from an empty collection.
    pub fn reset(&mut self) {
        self.state = AppState::default();
    }
}
