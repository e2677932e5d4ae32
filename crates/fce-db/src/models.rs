use chrono::{DateTime, Utc};
use fce_srs::{Card, Deck, DeckId};
use serde::{Deserialize, Deserializer, Serialize};

/// Daily review aggregate - one record per calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    /// Start of the day this record covers
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    /// Reviews recorded on that day
    pub cards_reviewed: u32,
    /// Reviews answered correctly
    pub correct_answers: u32,
    /// Reviews answered incorrectly
    pub incorrect_answers: u32,
}

impl ReviewStats {
    /// Empty record for the day starting at `date`
    pub fn empty(date: DateTime<Utc>) -> Self {
        Self {
            date,
            cards_reviewed: 0,
            correct_answers: 0,
            incorrect_answers: 0,
        }
    }
}

/// Whole application state, persisted as a single blob
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// All decks
    pub decks: Vec<Deck>,
    /// All cards, flat; each one points at its deck by id
    #[serde(deserialize_with = "skip_null_entries")]
    pub cards: Vec<Card>,
    /// Daily review aggregates
    pub review_stats: Vec<ReviewStats>,
    /// Deck selected in the client, if any
    pub current_deck_id: Option<DeckId>,
}

/// Stored card arrays may contain `null` holes; they are dropped.
fn skip_null_entries<'de, D>(deserializer: D) -> Result<Vec<Card>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries: Vec<Option<Card>> = Vec::deserialize(deserializer)?;
    Ok(entries.into_iter().flatten().collect())
}
