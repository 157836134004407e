//! Test fixtures and factory functions for creating decks.

use chrono::NaiveDate;

use memolibre_core::{Card, Deck};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Generate deck text with a specified number of cards under one heading.
pub fn sample_deck_text(num_cards: usize) -> String {
    let body = (1..=num_cards)
        .map(|i| format!("Back {i}\nFront {i}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!("# Sample\n{body}")
}

/// A dormant card numbered `number` with `Front n` / `Back n` sides.
pub fn card(number: u32) -> Card {
    Card::draft(number, format!("Front {number}"), format!("Back {number}"), today())
}

/// Deck of `n` cards, each carrying the repetition value at its index in `values`
/// (0 when `values` is shorter).
pub fn deck_with_values(n: u32, values: &[u32]) -> Deck {
    let mut deck = Deck::new("Fixture", "Info");
    deck.cards = (1..=n)
        .map(|i| {
            let mut card = card(i);
            card.repetition_value = values.get(i as usize - 1).copied().unwrap_or(0);
            card
        })
        .collect();
    deck
}
