//! Input checks at the HTTP boundary.
//!
//! The scheduler accepts any card content; these limits only keep obviously
//! broken input out of the collection.

use fce_srs::{Card, MIN_EASE_FACTOR, NewCard};
use validator::ValidateLength;

use crate::{collection::DeckBundle, error::ApiError};

const MAX_DECK_NAME_LEN: u64 = 100;
const MAX_TAG_LEN: u64 = 50;

/// Validate a deck name and return it trimmed
///
/// # Examples
/// ```
/// use fce_api::validation::validate_deck_name;
///
/// assert_eq!(validate_deck_name("  Spanish ").unwrap(), "Spanish");
/// assert!(validate_deck_name("   ").is_err());
/// ```
pub fn validate_deck_name(name: &str) -> Result<String, ApiError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ApiError::Validation("Deck name cannot be empty".to_string()));
    }

    if !name.validate_length(None, Some(MAX_DECK_NAME_LEN), None) {
        return Err(ApiError::Validation(format!(
            "Deck name must be at most {MAX_DECK_NAME_LEN} characters long"
        )));
    }

    Ok(name.to_string())
}

/// Validate one side of a card (`side` is used in the error message)
pub fn validate_card_side(side: &str, text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::Validation(format!("Card {side} cannot be empty")));
    }

    Ok(())
}

/// Validate a tag and return it trimmed
pub fn validate_tag(tag: &str) -> Result<String, ApiError> {
    let tag = tag.trim();

    if !tag.validate_length(Some(1), Some(MAX_TAG_LEN), None) {
        return Err(ApiError::Validation(format!(
            "Tag must be between 1 and {MAX_TAG_LEN} characters long"
        )));
    }

    Ok(tag.to_string())
}

/// Validate and normalize a tag list: trimmed, duplicates dropped, order kept
pub fn validate_tags(tags: &[String]) -> Result<Vec<String>, ApiError> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());

    for tag in tags {
        let tag = validate_tag(tag)?;
        if !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }

    Ok(normalized)
}

/// Validate authored card content, normalizing its tags
pub fn validate_new_card(card: NewCard) -> Result<NewCard, ApiError> {
    validate_card_side("front", &card.front)?;
    validate_card_side("back", &card.back)?;
    let tags = validate_tags(&card.tags)?;

    Ok(NewCard { tags, ..card })
}

/// Check a card carried over from an export still holds a schedule the
/// scheduler could have produced
pub fn validate_imported_card(card: &Card) -> Result<(), ApiError> {
    if !card.ease_factor.is_finite() || card.ease_factor < MIN_EASE_FACTOR {
        return Err(ApiError::Validation(format!(
            "Card {} has ease factor {}, expected at least {MIN_EASE_FACTOR}",
            card.id, card.ease_factor
        )));
    }

    if card.last_reviewed.is_some() && card.next_review.is_none() {
        return Err(ApiError::Validation(format!(
            "Card {} was reviewed but has no next review date",
            card.id
        )));
    }

    Ok(())
}

/// Validate every card of an import; one bad record rejects the whole bundle
pub fn validate_bundle(bundle: DeckBundle) -> Result<DeckBundle, ApiError> {
    bundle.cards.iter().try_for_each(validate_imported_card)?;
    Ok(bundle)
}
