//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod fixtures;

use memolibre_core::Deck;

/// Card numbers in deck order.
pub fn numbers(deck: &Deck) -> Vec<u32> {
    deck.cards.iter().map(|c| c.card_number).collect()
}

/// Front sides in deck order.
pub fn fronts(deck: &Deck) -> Vec<&str> {
    deck.cards.iter().map(|c| c.front_side.as_str()).collect()
}
