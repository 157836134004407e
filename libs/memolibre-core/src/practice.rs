//! Grading practiced cards, undo/redo, and choosing the next card.
//!
//! The undo and redo stacks live in the deck's `practiceHistory` settings so
//! they survive export and import. Session tallies (practiced card numbers,
//! positive count) belong to the caller and are passed in explicitly.

use std::collections::HashSet;

use crate::error::{DeckError, Result};
use crate::types::{Card, Deck, HistoryEntry, PracticeAction};

fn graded(deck: &Deck, card_number: u32, apply: impl FnOnce(&mut Card)) -> Result<Deck> {
    let index = deck
        .card_index(card_number)
        .ok_or(DeckError::CardNotFound(card_number))?;
    let mut updated = deck.clone();
    apply(&mut updated.cards[index]);
    Ok(updated)
}

fn apply_grade(card: &mut Card, action: PracticeAction) {
    match action {
        PracticeAction::Known => card.repetition_value = card.repetition_value.saturating_add(1),
        PracticeAction::Forgotten => card.repetition_value = card.repetition_value.saturating_sub(1).max(1),
    }
    card.record_outcome(action.outcome());
}

fn revert_grade(card: &mut Card, action: PracticeAction) {
    match action {
        PracticeAction::Known => card.repetition_value = card.repetition_value.saturating_sub(1),
        PracticeAction::Forgotten => card.repetition_value = card.repetition_value.saturating_add(1),
    }
    // Assumes the front entry is the one this action pushed.
    if !card.repetition_history.is_empty() {
        card.repetition_history.remove(0);
    }
}

/// Grade a card known without touching the undo history.
pub fn mark_card_as_known(deck: &Deck, card_number: u32) -> Result<Deck> {
    graded(deck, card_number, |c| apply_grade(c, PracticeAction::Known))
}

/// Grade a card forgotten without touching the undo history. A forgotten
/// card never drops below 1, so grading never makes a card dormant.
pub fn mark_card_as_forgotten(deck: &Deck, card_number: u32) -> Result<Deck> {
    graded(deck, card_number, |c| apply_grade(c, PracticeAction::Forgotten))
}

/// Grade a card and record the action on the undo stack. Clears the redo stack.
pub fn perform_practice_action(deck: &Deck, card_number: u32, action: PracticeAction) -> Result<Deck> {
    let mut updated = graded(deck, card_number, |c| apply_grade(c, action))?;
    let history = &mut updated.settings.practice_history;
    history.push_undo(HistoryEntry::new(card_number, action));
    history.redo_stack.clear();
    tracing::debug!(card_number, action = action.as_str(), "card graded");
    Ok(updated)
}

/// Result of undoing or redoing a graded action.
#[derive(Debug, Clone)]
pub struct HistoryStep {
    pub deck: Deck,
    /// The card whose grading was reverted or reapplied, as it is in `deck`.
    /// `None` when the stack was empty and nothing happened.
    pub card: Option<Card>,
    /// The caller's positive tally after the step.
    pub positive_count: i32,
    /// Card of the action now on top of the undo stack, as it is in `deck`.
    pub previous_card: Option<Card>,
}

impl HistoryStep {
    fn unchanged(deck: &Deck, positive_count: i32) -> Self {
        Self {
            deck: deck.clone(),
            card: None,
            positive_count,
            previous_card: None,
        }
    }
}

fn top_of_undo(deck: &Deck) -> Result<Option<Card>> {
    match deck.settings.practice_history.undo_stack.last() {
        None => Ok(None),
        Some(entry) => deck
            .card(entry.card_number)
            .cloned()
            .map(Some)
            .ok_or(DeckError::CardNotFound(entry.card_number)),
    }
}

/// Revert the most recent graded action and move it to the redo stack.
pub fn undo_last_action(deck: &Deck, positive_count: i32) -> Result<HistoryStep> {
    let Some(&entry) = deck.settings.practice_history.undo_stack.last() else {
        return Ok(HistoryStep::unchanged(deck, positive_count));
    };

    let mut updated = graded(deck, entry.card_number, |c| revert_grade(c, entry.action))?;
    let history = &mut updated.settings.practice_history;
    history.undo_stack.pop();
    history.redo_stack.push(entry);

    let previous_card = top_of_undo(&updated)?;
    let card = updated.card(entry.card_number).cloned();
    tracing::debug!(card_number = entry.card_number, action = entry.action.as_str(), "action undone");
    Ok(HistoryStep {
        deck: updated,
        card,
        positive_count: positive_count - entry.action.tally_delta(),
        previous_card,
    })
}

/// Reapply the most recently undone action and move it back to the undo stack.
pub fn redo_last_action(deck: &Deck, positive_count: i32) -> Result<HistoryStep> {
    let Some(&entry) = deck.settings.practice_history.redo_stack.last() else {
        return Ok(HistoryStep::unchanged(deck, positive_count));
    };

    let mut updated = graded(deck, entry.card_number, |c| apply_grade(c, entry.action))?;
    let history = &mut updated.settings.practice_history;
    history.redo_stack.pop();
    history.push_undo(entry);

    let previous_card = top_of_undo(&updated)?;
    let card = updated.card(entry.card_number).cloned();
    tracing::debug!(card_number = entry.card_number, action = entry.action.as_str(), "action redone");
    Ok(HistoryStep {
        deck: updated,
        card,
        positive_count: positive_count + entry.action.tally_delta(),
        previous_card,
    })
}

/// Choose the next card to practice.
///
/// Only circulating cards are eligible. The last `min_cards_before_repeat`
/// entries of `practiced_card_history` are skipped unless that would leave
/// nothing. Among the rest, the lowest repetition value wins, then the
/// lowest history score, then the lowest card number.
pub fn select_next_card<'a>(
    deck: &'a Deck,
    min_cards_before_repeat: usize,
    practiced_card_history: &[u32],
) -> Option<&'a Card> {
    let eligible: Vec<&Card> = deck.cards.iter().filter(|c| c.is_in_circulation()).collect();
    if eligible.is_empty() {
        return None;
    }

    let window = min_cards_before_repeat.min(practiced_card_history.len());
    let recent: HashSet<u32> = practiced_card_history[practiced_card_history.len() - window..]
        .iter()
        .copied()
        .collect();

    eligible
        .iter()
        .filter(|c| !recent.contains(&c.card_number))
        .min_by_key(|c| rank(c))
        .or_else(|| eligible.iter().min_by_key(|c| rank(c)))
        .copied()
}

/// Ordering key for selection: seen least, then weakest, then lowest number.
fn rank(card: &Card) -> (u32, u32, u32) {
    (card.repetition_value, card.history_score(), card.card_number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PracticeHistory, REPETITION_HISTORY_LIMIT, UNDO_STACK_LIMIT};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn deck_with_values(values: &[u32]) -> Deck {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut deck = Deck::new("d", "i");
        deck.cards = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut card = Card::draft(i as u32 + 1, format!("f{i}"), "b", today);
                card.repetition_value = v;
                card
            })
            .collect();
        deck
    }

    #[test]
    fn known_increments_and_records() {
        let deck = mark_card_as_known(&deck_with_values(&[2]), 1).unwrap();
        assert_eq!(deck.cards[0].repetition_value, 3);
        assert_eq!(deck.cards[0].repetition_history, vec![1, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn known_saturates_at_max() {
        let deck = mark_card_as_known(&deck_with_values(&[u32::MAX]), 1).unwrap();
        assert_eq!(deck.cards[0].repetition_value, u32::MAX);
        assert_eq!(deck.cards[0].repetition_history[0], 1);
    }

    #[test]
    fn forgotten_floors_at_one() {
        let deck = mark_card_as_forgotten(&deck_with_values(&[1]), 1).unwrap();
        assert_eq!(deck.cards[0].repetition_value, 1);
        let deck = mark_card_as_forgotten(&deck_with_values(&[0]), 1).unwrap();
        assert_eq!(deck.cards[0].repetition_value, 1);
        let deck = mark_card_as_forgotten(&deck_with_values(&[4]), 1).unwrap();
        assert_eq!(deck.cards[0].repetition_value, 3);
        assert_eq!(deck.cards[0].repetition_history[0], 0);
    }

    #[test]
    fn grading_unknown_card_fails() {
        let err = perform_practice_action(&deck_with_values(&[1]), 5, PracticeAction::Known).unwrap_err();
        assert!(matches!(err, DeckError::CardNotFound(5)));
    }

    #[test]
    fn history_stays_bounded() {
        let mut deck = deck_with_values(&[1]);
        for i in 0..50 {
            let action = if i % 3 == 0 { PracticeAction::Forgotten } else { PracticeAction::Known };
            deck = perform_practice_action(&deck, 1, action).unwrap();
        }
        assert_eq!(deck.cards[0].repetition_history.len(), REPETITION_HISTORY_LIMIT);
    }

    #[test]
    fn perform_pushes_undo_and_clears_redo() {
        let mut deck = deck_with_values(&[1, 1]);
        deck.settings.practice_history = PracticeHistory {
            undo_stack: vec![],
            redo_stack: vec![HistoryEntry::new(2, PracticeAction::Known)],
        };
        let deck = perform_practice_action(&deck, 1, PracticeAction::Forgotten).unwrap();
        let history = &deck.settings.practice_history;
        assert_eq!(history.undo_stack, vec![HistoryEntry::new(1, PracticeAction::Forgotten)]);
        assert!(history.redo_stack.is_empty());
    }

    #[test]
    fn undo_stack_capped() {
        let mut deck = deck_with_values(&[1]);
        for _ in 0..(UNDO_STACK_LIMIT + 10) {
            deck = perform_practice_action(&deck, 1, PracticeAction::Known).unwrap();
        }
        assert_eq!(deck.settings.practice_history.undo_stack.len(), UNDO_STACK_LIMIT);
    }

    #[test]
    fn undo_known_restores_card() {
        let original = deck_with_values(&[2, 1]);
        let graded = perform_practice_action(&original, 1, PracticeAction::Known).unwrap();
        let step = undo_last_action(&graded, 1).unwrap();
        assert_eq!(step.deck.cards, original.cards);
        assert_eq!(step.positive_count, 0);
        assert_eq!(step.card.unwrap().card_number, 1);
        assert!(step.previous_card.is_none());
        assert_eq!(
            step.deck.settings.practice_history.redo_stack,
            vec![HistoryEntry::new(1, PracticeAction::Known)]
        );
    }

    #[test]
    fn undo_forgotten_adds_back() {
        let original = deck_with_values(&[3]);
        let graded = perform_practice_action(&original, 1, PracticeAction::Forgotten).unwrap();
        let step = undo_last_action(&graded, -1).unwrap();
        assert_eq!(step.deck.cards, original.cards);
        assert_eq!(step.positive_count, 0);
    }

    #[test]
    fn undo_on_empty_stack_is_noop() {
        let deck = deck_with_values(&[1]);
        let step = undo_last_action(&deck, 4).unwrap();
        assert_eq!(step.deck, deck);
        assert!(step.card.is_none());
        assert_eq!(step.positive_count, 4);
    }

    #[test]
    fn undo_reports_previous_card() {
        let deck = deck_with_values(&[1, 1]);
        let deck = perform_practice_action(&deck, 2, PracticeAction::Known).unwrap();
        let deck = perform_practice_action(&deck, 1, PracticeAction::Known).unwrap();
        let step = undo_last_action(&deck, 2).unwrap();
        let previous = step.previous_card.unwrap();
        assert_eq!(previous.card_number, 2);
        assert_eq!(previous.repetition_value, 2);
    }

    #[test]
    fn undo_of_deleted_card_is_an_error() {
        let mut deck = deck_with_values(&[1]);
        deck.settings.practice_history.undo_stack = vec![HistoryEntry::new(9, PracticeAction::Known)];
        assert!(matches!(undo_last_action(&deck, 0), Err(DeckError::CardNotFound(9))));
    }

    #[test]
    fn redo_reapplies() {
        let original = deck_with_values(&[2]);
        let graded = perform_practice_action(&original, 1, PracticeAction::Known).unwrap();
        let undone = undo_last_action(&graded, 1).unwrap();
        let redone = redo_last_action(&undone.deck, undone.positive_count).unwrap();
        assert_eq!(redone.deck.cards, graded.cards);
        assert_eq!(redone.positive_count, 1);
        assert_eq!(redone.deck.settings.practice_history, graded.settings.practice_history);
        assert_eq!(redone.previous_card.unwrap().card_number, 1);
    }

    #[test]
    fn redo_on_empty_stack_is_noop() {
        let deck = deck_with_values(&[1]);
        let step = redo_last_action(&deck, 0).unwrap();
        assert!(step.card.is_none());
        assert_eq!(step.deck, deck);
    }

    #[test]
    fn select_none_when_all_dormant() {
        assert!(select_next_card(&deck_with_values(&[0, 0]), 0, &[]).is_none());
    }

    #[test]
    fn select_prefers_low_value_then_score_then_number() {
        let mut deck = deck_with_values(&[3, 2, 2, 0]);
        deck.cards[1].repetition_history = vec![1, 1, 0];
        deck.cards[2].repetition_history = vec![1, 0, 0];
        assert_eq!(select_next_card(&deck, 0, &[]).unwrap().card_number, 3);

        let tie = deck_with_values(&[1, 1]);
        assert_eq!(select_next_card(&tie, 0, &[]).unwrap().card_number, 1);
    }

    #[test]
    fn select_skips_recent_window() {
        let deck = deck_with_values(&[1, 1, 1]);
        assert_eq!(select_next_card(&deck, 2, &[3, 1, 2]).unwrap().card_number, 3);
        // window larger than history uses the whole history
        assert_eq!(select_next_card(&deck, 10, &[1]).unwrap().card_number, 2);
        // a zero window excludes nothing
        assert_eq!(select_next_card(&deck, 0, &[1, 2]).unwrap().card_number, 1);
    }

    #[test]
    fn select_falls_back_when_window_excludes_everything() {
        let deck = deck_with_values(&[1, 0, 1]);
        assert_eq!(select_next_card(&deck, 5, &[1, 3]).unwrap().card_number, 1);
    }
}
