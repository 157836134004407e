//! Plain-text deck parser.
//!
//! # Format
//! ```text
//! # Spanish
//! ## Verbs
//! to eat
//! comer
//! (first conjugation)
//!
//! to live
//! vivir
//! ```
//!
//! Hash lines are headings: the first one names the deck, the second one
//! becomes the deck info, and the headings in scope when a card is emitted
//! become its tags. Other lines form cards separated by blank lines: back
//! side first, then front side, then any number of secondary info lines.
//! Only a blank line or the end of input emits a card.

use std::collections::HashSet;

use crate::settings::{normalize, SettingsKind};
use crate::types::{Card, Deck, SettingsBag, DEFAULT_REVIEW_DATE, INITIAL_REPETITION_HISTORY};

pub const DEFAULT_DECK_NAME: &str = "My Deck";
pub const DEFAULT_DECK_INFO: &str = "My Info";

/// Parse deck text into a new deck. Never fails: headings that skip levels
/// are accepted and truncate the heading scope instead.
pub fn parse_deck(content: &str) -> Deck {
    let mut parser = Parser::new();
    for (idx, line) in content.lines().enumerate() {
        parser.process_line(line, idx + 1);
    }
    parser.finalize()
}

/// Create a deck from user text, with default practice and app settings.
/// Blank text gives an empty deck named [`DEFAULT_DECK_NAME`].
pub fn create_new_deck(content: &str) -> Deck {
    let mut deck = parse_deck(content);
    deck.settings.practice = normalize(SettingsKind::Practice, &SettingsBag::new());
    deck.settings.app = normalize(SettingsKind::App, &SettingsBag::new());
    deck
}

#[derive(Default)]
struct CardBuilder {
    back_side: Option<String>,
    front_side: Option<String>,
    secondary_info: Vec<String>,
    start_line: usize,
}

impl CardBuilder {
    fn push(&mut self, text: &str, line_num: usize) {
        if self.back_side.is_none() {
            self.back_side = Some(text.to_string());
            self.start_line = line_num;
        } else if self.front_side.is_none() {
            self.front_side = Some(text.to_string());
        } else {
            self.secondary_info.push(text.to_string());
        }
    }

    fn build(self, card_number: u32, tags: Vec<String>) -> Option<Card> {
        let back_side = self.back_side.filter(|s| !s.is_empty())?;
        let front_side = self.front_side.filter(|s| !s.is_empty())?;

        Some(Card {
            card_number,
            card_name: String::new(),
            front_side,
            back_side,
            primary_info: String::new(),
            secondary_info: self.secondary_info.join("\n"),
            notable_cards: Vec::new(),
            date_of_last_review: DEFAULT_REVIEW_DATE.to_string(),
            repetition_value: 0,
            repetition_history: INITIAL_REPETITION_HISTORY.to_vec(),
            tags,
        })
    }
}

struct Parser {
    deck: Deck,
    deck_name: Option<String>,
    deck_info: Option<String>,
    headings: Vec<String>,
    current: CardBuilder,
    front_sides: HashSet<String>,
}

impl Parser {
    fn new() -> Self {
        Self {
            deck: Deck::default(),
            deck_name: None,
            deck_info: None,
            headings: Vec::new(),
            current: CardBuilder::default(),
            front_sides: HashSet::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_num: usize) {
        match Self::parse_line(line) {
            LineType::Heading { depth, text } => self.handle_heading(depth, text),
            LineType::Text(text) => self.current.push(text, line_num),
            LineType::Empty => self.flush_card(),
        }
    }

    fn parse_line(line: &str) -> LineType<'_> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            LineType::Empty
        } else if trimmed.starts_with('#') {
            let text = trimmed.trim_start_matches('#');
            LineType::Heading {
                depth: trimmed.len() - text.len(),
                text: text.trim(),
            }
        } else {
            LineType::Text(trimmed)
        }
    }

    fn handle_heading(&mut self, depth: usize, text: &str) {
        // Pending card lines stay pending; tags are taken when the card is emitted.
        self.headings.truncate(depth - 1);
        self.headings.push(text.to_string());

        if self.deck_name.is_none() {
            self.deck_name = Some(text.to_string());
        } else if self.deck_info.is_none() {
            self.deck_info = Some(text.to_string());
        }
        // An empty heading names the deck but is not a tag.
        if text.is_empty() {
            return;
        }
        self.deck
            .tags
            .entry(text.to_string())
            .or_insert_with(|| text.to_string());
    }

    fn active_tags(&self) -> Vec<String> {
        self.headings.iter().filter(|h| !h.is_empty()).cloned().collect()
    }

    fn flush_card(&mut self) {
        let builder = std::mem::take(&mut self.current);
        let start_line = builder.start_line;
        let card_number = self.deck.cards.len() as u32 + 1;

        let Some(card) = builder.build(card_number, self.active_tags()) else {
            return;
        };
        if !self.front_sides.insert(card.front_side.clone()) {
            tracing::warn!(line = start_line, front_side = %card.front_side, "skipping card with duplicate front side");
            return;
        }
        self.deck.cards.push(card);
    }

    fn finalize(mut self) -> Deck {
        self.flush_card();

        let mut deck = self.deck;
        deck.deck_name = self.deck_name.unwrap_or_else(|| DEFAULT_DECK_NAME.to_string());
        deck.deck_info = self.deck_info.unwrap_or_else(|| DEFAULT_DECK_INFO.to_string());
        tracing::debug!(cards = deck.cards.len(), tags = deck.tags.len(), "deck text parsed");
        deck
    }
}

enum LineType<'a> {
    Heading { depth: usize, text: &'a str },
    Text(&'a str),
    Empty,
}
