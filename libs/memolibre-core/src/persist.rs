//! JSON import and export of decks.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::settings::normalize_deck_settings;
use crate::types::Deck;

const FALLBACK_FILE_STEM: &str = "FlashCardDeck";

/// Load a deck document. Known settings bags are normalized on the way in.
pub fn deck_from_json(json: &str) -> Result<Deck> {
    let deck: Deck = serde_json::from_str(json)?;
    tracing::debug!(deck = %deck.deck_name, cards = deck.cards.len(), "deck loaded");
    Ok(normalize_deck_settings(&deck))
}

/// Serialize a deck as pretty-printed JSON. Undo/redo stacks are written in
/// their `"n:action|..."` string form.
pub fn deck_to_json(deck: &Deck) -> Result<String> {
    Ok(serde_json::to_string_pretty(deck)?)
}

/// File name for an exported deck, e.g. `2024-03-05_14:07_Spanish.json`.
pub fn export_file_name(deck: &Deck, now: DateTime<Utc>) -> String {
    let stem = match deck.deck_name.trim() {
        "" => FALLBACK_FILE_STEM,
        name => name,
    };
    format!("{}_{stem}.json", now.format("%Y-%m-%d_%H:%M"))
}
