//! Structural card edits: add, remove, replace, and renumbering.
//!
//! Card numbers are positions. Every structural edit renumbers the whole deck
//! to `1..=N` and then remaps notable-card references from old to new
//! numbers. A reference whose target no longer exists is left as it was.

use std::collections::HashMap;

use crate::error::{DeckError, Result};
use crate::selection::CardSelection;
use crate::types::{Card, Deck};

fn front_side_taken(deck: &Deck, front_side: &str, replaced: Option<u32>) -> bool {
    deck.cards
        .iter()
        .filter(|c| Some(c.card_number) != replaced)
        .any(|c| c.front_side.trim() == front_side)
}

/// `replaced` names the card being overwritten, which may keep its own front side.
fn check_front_side(deck: &Deck, card: &Card, replaced: Option<u32>) -> Result<()> {
    let front_side = card.front_side.trim();
    if front_side.is_empty() || front_side_taken(deck, front_side, replaced) {
        return Err(DeckError::validation("Front side must be unique and non-empty"));
    }
    Ok(())
}

/// Renumber `cards` to `1..=N` in order and remap notable-card references.
///
/// `inserted` marks a card that had no previous position, so its number is
/// not treated as an old number.
fn renumber(mut cards: Vec<Card>, inserted: Option<usize>) -> Vec<Card> {
    let mut mapping: HashMap<u32, u32> = HashMap::with_capacity(cards.len());
    for (idx, card) in cards.iter().enumerate() {
        if Some(idx) != inserted {
            mapping.entry(card.card_number).or_insert(idx as u32 + 1);
        }
    }

    for (idx, card) in cards.iter_mut().enumerate() {
        card.card_number = idx as u32 + 1;
        for reference in card.notable_cards.iter_mut() {
            match mapping.get(&reference.0) {
                Some(&new_number) => reference.0 = new_number,
                None => tracing::warn!(
                    card = card.card_number,
                    reference = reference.0,
                    "notable card reference does not resolve after renumbering"
                ),
            }
        }
    }
    cards
}

/// Insert `card` before the first card numbered `>= card.card_number`
/// (or at the end), then renumber.
pub fn add_card(deck: &Deck, card: Card) -> Result<Deck> {
    check_front_side(deck, &card, None)?;

    let mut cards = deck.cards.clone();
    let index = cards
        .iter()
        .position(|c| c.card_number >= card.card_number)
        .unwrap_or(cards.len());
    cards.insert(index, card);

    let mut updated = deck.clone();
    updated.cards = renumber(cards, Some(index));
    tracing::debug!(position = index + 1, total = updated.cards.len(), "card added");
    Ok(updated)
}

/// Remove the cards named by `card_input` (`"A-B"` or `"1,4,7"`), then renumber.
pub fn remove_cards(deck: &Deck, card_input: &str) -> Result<Deck> {
    let selection = CardSelection::parse(card_input);
    if selection.is_empty() {
        return Err(DeckError::validation("No valid card numbers provided"));
    }

    let cards: Vec<Card> = deck
        .cards
        .iter()
        .filter(|c| !selection.contains(c.card_number))
        .cloned()
        .collect();
    let removed = deck.cards.len() - cards.len();

    let mut updated = deck.clone();
    updated.cards = renumber(cards, None);
    tracing::debug!(removed, total = updated.cards.len(), "cards removed");
    Ok(updated)
}

/// Replace the card carrying the same number as `card`.
pub fn update_card(deck: &Deck, card: Card) -> Result<Deck> {
    let index = deck
        .card_index(card.card_number)
        .ok_or(DeckError::CardNotFound(card.card_number))?;
    check_front_side(deck, &card, Some(card.card_number))?;

    let mut updated = deck.clone();
    updated.cards[index] = card;
    Ok(updated)
}

/// Highest card number in the deck, or 0 when it is empty.
pub fn get_highest_card_number(deck: &Deck) -> u32 {
    deck.cards.iter().map(|c| c.card_number).max().unwrap_or(0)
}

/// Number proposed for a card appended to the deck.
pub fn next_card_number(deck: &Deck) -> u32 {
    get_highest_card_number(deck) + 1
}

pub fn edit_deck_name(deck: &Deck, deck_name: &str) -> Result<Deck> {
    if deck_name.trim().is_empty() {
        return Err(DeckError::validation("No new deck name provided"));
    }
    let mut updated = deck.clone();
    updated.deck_name = deck_name.to_string();
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardRef;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn deck_of(n: u32) -> Deck {
        let mut deck = Deck::new("d", "i");
        deck.cards = (1..=n)
            .map(|i| Card::draft(i, format!("front {i}"), format!("back {i}"), today()))
            .collect();
        deck
    }

    fn numbers(deck: &Deck) -> Vec<u32> {
        deck.cards.iter().map(|c| c.card_number).collect()
    }

    fn fronts(deck: &Deck) -> Vec<&str> {
        deck.cards.iter().map(|c| c.front_side.as_str()).collect()
    }

    #[test]
    fn add_to_empty_deck() {
        let deck = add_card(&Deck::new("d", "i"), Card::draft(1, "A", "B", today())).unwrap();
        assert_eq!(numbers(&deck), vec![1]);
    }

    #[test]
    fn add_inserts_before_matching_number() {
        let deck = add_card(&deck_of(3), Card::draft(2, "new", "x", today())).unwrap();
        assert_eq!(numbers(&deck), vec![1, 2, 3, 4]);
        assert_eq!(fronts(&deck), vec!["front 1", "new", "front 2", "front 3"]);
    }

    #[test]
    fn add_appends_past_the_end() {
        let deck = add_card(&deck_of(2), Card::draft(10, "new", "x", today())).unwrap();
        assert_eq!(numbers(&deck), vec![1, 2, 3]);
        assert_eq!(deck.cards[2].front_side, "new");
    }

    #[test]
    fn add_rejects_duplicate_or_empty_front() {
        let deck = deck_of(2);
        let dup = add_card(&deck, Card::draft(3, " front 1 ", "x", today())).unwrap_err();
        assert_eq!(dup.to_string(), "Front side must be unique and non-empty");
        assert!(add_card(&deck, Card::draft(3, "   ", "x", today())).is_err());
    }

    #[test]
    fn add_rejects_front_of_card_at_insertion_number() {
        let deck = deck_of(3);
        let err = add_card(&deck, Card::draft(2, "front 2", "x", today())).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(fronts(&deck), vec!["front 1", "front 2", "front 3"]);
    }

    #[test]
    fn add_remaps_notable_cards() {
        let mut deck = deck_of(3);
        deck.cards[0].notable_cards = vec![CardRef(3), CardRef(2)];
        let updated = add_card(&deck, Card::draft(2, "new", "x", today())).unwrap();
        // old 3 is now 4, old 2 is now 3
        assert_eq!(updated.cards[0].notable_cards, vec![CardRef(4), CardRef(3)]);
    }

    #[test]
    fn remove_list_renumbers() {
        let deck = remove_cards(&deck_of(5), "2,4").unwrap();
        assert_eq!(numbers(&deck), vec![1, 2, 3]);
        assert_eq!(fronts(&deck), vec!["front 1", "front 3", "front 5"]);
    }

    #[test]
    fn remove_range() {
        let deck = remove_cards(&deck_of(6), "2-5").unwrap();
        assert_eq!(fronts(&deck), vec!["front 1", "front 6"]);
    }

    #[test]
    fn remove_with_nothing_valid_fails() {
        let err = remove_cards(&deck_of(3), "x, 5-1").unwrap_err();
        assert_eq!(err.to_string(), "No valid card numbers provided");
    }

    #[test]
    fn remove_keeps_dangling_references() {
        let mut deck = deck_of(4);
        deck.cards[0].notable_cards = vec![CardRef(2), CardRef(4)];
        let updated = remove_cards(&deck, "2").unwrap();
        // 2 is gone and stays as-is, 4 became 3
        assert_eq!(updated.cards[0].notable_cards, vec![CardRef(2), CardRef(3)]);
    }

    #[test]
    fn update_replaces_in_place() {
        let deck = deck_of(3);
        let mut card = deck.cards[1].clone();
        card.primary_info = "note".into();
        let updated = update_card(&deck, card).unwrap();
        assert_eq!(updated.cards[1].primary_info, "note");

        let mut clash = deck.cards[1].clone();
        clash.front_side = "front 3".into();
        assert!(update_card(&deck, clash).unwrap_err().is_validation());

        let missing = Card::draft(9, "z", "z", today());
        assert!(matches!(update_card(&deck, missing), Err(DeckError::CardNotFound(9))));
    }

    #[test]
    fn highest_and_next_number() {
        assert_eq!(get_highest_card_number(&Deck::default()), 0);
        assert_eq!(next_card_number(&Deck::default()), 1);
        assert_eq!(get_highest_card_number(&deck_of(4)), 4);
    }

    #[test]
    fn edit_deck_name_requires_text() {
        assert_eq!(edit_deck_name(&deck_of(1), "Verbs").unwrap().deck_name, "Verbs");
        assert!(edit_deck_name(&deck_of(1), " ").is_err());
    }
}
