//! Moving cards in and out of practice circulation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{Card, Deck};

/// Which cards a circulation change applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CirculationTarget {
    /// Exactly these card numbers.
    Cards(Vec<u32>),
    /// Every card in circulation, one step at a time.
    All,
    /// Up to `n` cards chosen by card number.
    Count(u32),
}

impl CirculationTarget {
    /// Pick the mode from the argument shape used by the circulation page:
    /// a non-empty list wins, otherwise a missing `n` means all cards.
    pub fn from_args(n: Option<u32>, card_numbers: &[u32]) -> Self {
        if !card_numbers.is_empty() {
            Self::Cards(card_numbers.to_vec())
        } else {
            match n {
                None => Self::All,
                Some(n) => Self::Count(n),
            }
        }
    }
}

/// Bring cards into circulation or make them show up less often.
///
/// - `Cards`: dormant cards in the list go to 1.
/// - `All`: every circulating card goes up by one.
/// - `Count(n)`: the `n` dormant cards with the lowest numbers go to 1.
pub fn increase_circulation(deck: &Deck, target: &CirculationTarget) -> Deck {
    let mut updated = deck.clone();
    let changed = match target {
        CirculationTarget::Cards(numbers) => set_where(&mut updated.cards, 1, |c| {
            c.repetition_value == 0 && numbers.contains(&c.card_number)
        }),
        CirculationTarget::All => {
            let mut changed = 0;
            for card in updated.cards.iter_mut().filter(|c| c.is_in_circulation()) {
                card.repetition_value = card.repetition_value.saturating_add(1);
                changed += 1;
            }
            changed
        }
        CirculationTarget::Count(n) => {
            let mut dormant: Vec<usize> = indices_where(&updated.cards, |c| c.repetition_value == 0);
            dormant.sort_by_key(|&i| updated.cards[i].card_number);
            apply_first(&mut updated.cards, &dormant, *n, 1)
        }
    };
    tracing::debug!(?target, changed, "circulation increased");
    updated
}

/// Take cards out of circulation or make them show up more often.
///
/// - `Cards`: circulating cards in the list go to 0.
/// - `All`: every card above 1 goes down by one; nothing becomes dormant.
/// - `Count(n)`: the `n` circulating cards with the highest numbers go to 0.
pub fn decrease_circulation(deck: &Deck, target: &CirculationTarget) -> Deck {
    let mut updated = deck.clone();
    let changed = match target {
        CirculationTarget::Cards(numbers) => set_where(&mut updated.cards, 0, |c| {
            c.is_in_circulation() && numbers.contains(&c.card_number)
        }),
        CirculationTarget::All => {
            let mut changed = 0;
            for card in updated.cards.iter_mut().filter(|c| c.repetition_value > 1) {
                card.repetition_value -= 1;
                changed += 1;
            }
            changed
        }
        CirculationTarget::Count(n) => {
            let mut circulating: Vec<usize> = indices_where(&updated.cards, Card::is_in_circulation);
            circulating.sort_by_key(|&i| std::cmp::Reverse(updated.cards[i].card_number));
            apply_first(&mut updated.cards, &circulating, *n, 0)
        }
    };
    tracing::debug!(?target, changed, "circulation decreased");
    updated
}

fn indices_where(cards: &[Card], pred: impl Fn(&Card) -> bool) -> Vec<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, c)| pred(c))
        .map(|(i, _)| i)
        .collect()
}

fn set_where(cards: &mut [Card], value: u32, pred: impl Fn(&Card) -> bool) -> usize {
    let mut changed = 0;
    for card in cards.iter_mut().filter(|c| pred(c)) {
        card.repetition_value = value;
        changed += 1;
    }
    changed
}

fn apply_first(cards: &mut [Card], order: &[usize], n: u32, value: u32) -> usize {
    let take = order.len().min(n as usize);
    for &i in &order[..take] {
        cards[i].repetition_value = value;
    }
    take
}

/// Overview shown on the circulation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CirculationStats {
    pub total_cards: usize,
    pub cards_in_circulation: usize,
    /// 0 when no card is in circulation.
    pub highest_card_in_circulation: u32,
    /// Number of cards per repetition value, ascending by value.
    pub repetition_counts: BTreeMap<u32, usize>,
}

pub fn circulation_stats(deck: &Deck) -> CirculationStats {
    let mut repetition_counts = BTreeMap::new();
    for card in &deck.cards {
        *repetition_counts.entry(card.repetition_value).or_insert(0) += 1;
    }
    let circulating = deck.cards.iter().filter(|c| c.is_in_circulation());

    CirculationStats {
        total_cards: deck.cards.len(),
        cards_in_circulation: circulating.clone().count(),
        highest_card_in_circulation: circulating.map(|c| c.card_number).max().unwrap_or(0),
        repetition_counts,
    }
}
