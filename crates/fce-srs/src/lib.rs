//! SRS (Spaced Repetition System) library for the flashcard engine
//!
//! This crate provides the core scheduling algorithm (a SuperMemo-2 derivative),
//! the due-set selection used by every review mode, and the card/deck records
//! both of them operate on.
//!
//! Nothing in here reads the clock or touches storage: every operation takes the
//! current timestamp as an argument and returns new values, leaving it to the
//! caller to persist them.

pub mod card;
pub mod deck;
pub mod id;
pub mod scheduler;
pub mod selector;

pub use card::{Card, NewCard};
pub use deck::Deck;
pub use id::{CardId, DeckId};
pub use scheduler::{
    EASE_BONUS, EASE_PENALTY, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR, ReviewOutcome, Scheduler,
    schedule,
};
pub use selector::{challenge_cards, due_cards, is_due, shuffled, upcoming_count};
