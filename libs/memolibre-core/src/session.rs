//! Caller-side practice session.
//!
//! The session holds what the practice screen tracks between calls (current
//! and previous card, cards practiced so far, tallies). It is a plain value:
//! every method returns a new deck and a new session.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matching::{check_answer, AnswerCheck};
use crate::practice::{perform_practice_action, redo_last_action, select_next_card, undo_last_action};
use crate::settings::min_cards_before_repeat;
use crate::types::{Card, Deck, PracticeAction};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeSession {
    pub current_card: Option<Card>,
    pub previous_card: Option<Card>,
    pub show_back_side: bool,
    /// Card numbers in the order they were graded this session.
    pub practiced_card_history: Vec<u32>,
    pub practice_count: u32,
    /// Known grades minus forgotten grades.
    pub positive_count: i32,
}

/// Deck and session after a session step.
#[derive(Debug, Clone)]
pub struct SessionStep {
    pub deck: Deck,
    pub session: PracticeSession,
}

impl PracticeSession {
    /// Fresh session showing the first card to practice.
    pub fn start(deck: &Deck) -> Self {
        Self {
            current_card: select_next_card(deck, min_cards_before_repeat(deck), &[]).cloned(),
            ..Default::default()
        }
    }

    fn unchanged(&self, deck: &Deck) -> SessionStep {
        SessionStep {
            deck: deck.clone(),
            session: self.clone(),
        }
    }

    fn next_card(deck: &Deck, history: &[u32]) -> Option<Card> {
        select_next_card(deck, min_cards_before_repeat(deck), history).cloned()
    }

    /// Show the back side of the current card.
    pub fn reveal(&self) -> Self {
        Self {
            show_back_side: true,
            ..self.clone()
        }
    }

    /// Grade the current card and move on to the next one.
    pub fn grade(&self, deck: &Deck, action: PracticeAction) -> Result<SessionStep> {
        let Some(current) = &self.current_card else {
            return Ok(self.unchanged(deck));
        };

        let updated = perform_practice_action(deck, current.card_number, action)?;
        let mut history = self.practiced_card_history.clone();
        history.push(current.card_number);

        let session = Self {
            previous_card: updated.card(current.card_number).cloned(),
            current_card: Self::next_card(&updated, &history),
            show_back_side: false,
            practiced_card_history: history,
            practice_count: self.practice_count + 1,
            positive_count: self.positive_count + action.tally_delta(),
        };
        Ok(SessionStep {
            deck: updated,
            session,
        })
    }

    /// Grade the current card from a typed answer.
    pub fn answer(&self, deck: &Deck, typed: &str) -> Result<(SessionStep, Option<AnswerCheck>)> {
        let Some(current) = &self.current_card else {
            return Ok((self.unchanged(deck), None));
        };

        let check = check_answer(typed, &current.back_side);
        let action = if check.is_correct {
            PracticeAction::Known
        } else {
            PracticeAction::Forgotten
        };
        Ok((self.grade(deck, action)?, Some(check)))
    }

    /// Undo the last grading and show the reverted card again, back side up.
    pub fn undo(&self, deck: &Deck) -> Result<SessionStep> {
        if self.practiced_card_history.is_empty() {
            return Ok(self.unchanged(deck));
        }

        let step = undo_last_action(deck, self.positive_count)?;
        let Some(reverted) = step.card else {
            return Ok(self.unchanged(deck));
        };

        let mut history = self.practiced_card_history.clone();
        history.pop();
        let session = Self {
            current_card: Some(reverted),
            previous_card: step.previous_card,
            show_back_side: true,
            practiced_card_history: history,
            practice_count: self.practice_count.saturating_sub(1),
            positive_count: step.positive_count,
        };
        Ok(SessionStep {
            deck: step.deck,
            session,
        })
    }

    /// Reapply the last undone grading and move on to the next card.
    pub fn redo(&self, deck: &Deck) -> Result<SessionStep> {
        let step = redo_last_action(deck, self.positive_count)?;
        let Some(applied) = step.card else {
            return Ok(self.unchanged(deck));
        };

        let mut history = self.practiced_card_history.clone();
        history.push(applied.card_number);
        let session = Self {
            current_card: Self::next_card(&step.deck, &history),
            previous_card: step.previous_card,
            show_back_side: false,
            practiced_card_history: history,
            practice_count: self.practice_count + 1,
            positive_count: step.positive_count,
        };
        Ok(SessionStep {
            deck: step.deck,
            session,
        })
    }

    pub fn can_undo(&self, deck: &Deck) -> bool {
        !self.practiced_card_history.is_empty() && deck.settings.practice_history.can_undo()
    }

    pub fn can_redo(&self, deck: &Deck) -> bool {
        deck.settings.practice_history.can_redo()
    }
}
