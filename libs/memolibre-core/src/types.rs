//! Core types for the deck document.
//!
//! The JSON shape of [`Deck`] and [`Card`] is the file format the
//! application imports and exports, so field names are camelCase on the wire.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of outcomes kept in a card's repetition history.
pub const REPETITION_HISTORY_LIMIT: usize = 20;

/// Maximum number of entries kept on the undo stack.
pub const UNDO_STACK_LIMIT: usize = 100;

/// Review date given to cards that were never reviewed.
pub const DEFAULT_REVIEW_DATE: &str = "2000-12-31";

/// Repetition history a freshly created card starts with.
pub const INITIAL_REPETITION_HISTORY: [u8; 5] = [0, 0, 0, 0, 0];

/// A string-to-string settings bag. All values are strings by convention.
pub type SettingsBag = BTreeMap<String, String>;

/// Reference from one card to another by number.
///
/// Unlike [`Card::card_number`], which is purely positional, a reference is
/// meant to follow its card across renumbering. That is best-effort only: a
/// reference whose target was removed keeps its old number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardRef(pub u32);

/// A single flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// 1-based position in the deck.
    pub card_number: u32,
    #[serde(default)]
    pub card_name: String,
    pub front_side: String,
    pub back_side: String,
    #[serde(default)]
    pub primary_info: String,
    #[serde(default)]
    pub secondary_info: String,
    #[serde(default)]
    pub notable_cards: Vec<CardRef>,
    #[serde(default = "default_review_date")]
    pub date_of_last_review: String,
    /// 0 means dormant; higher values are shown less often.
    #[serde(default)]
    pub repetition_value: u32,
    /// Outcomes (1 known, 0 forgotten), most recent first.
    #[serde(default)]
    pub repetition_history: Vec<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_review_date() -> String {
    DEFAULT_REVIEW_DATE.to_string()
}

impl Card {
    /// Create a dormant card with empty optional fields, reviewed `today`.
    pub fn draft(
        card_number: u32,
        front_side: impl Into<String>,
        back_side: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            card_number,
            card_name: String::new(),
            front_side: front_side.into(),
            back_side: back_side.into(),
            primary_info: String::new(),
            secondary_info: String::new(),
            notable_cards: Vec::new(),
            date_of_last_review: today.format("%Y-%m-%d").to_string(),
            repetition_value: 0,
            repetition_history: INITIAL_REPETITION_HISTORY.to_vec(),
            tags: Vec::new(),
        }
    }

    pub fn is_in_circulation(&self) -> bool {
        self.repetition_value > 0
    }

    /// Sum of the repetition history, i.e. how many recent reviews were known.
    pub fn history_score(&self) -> u32 {
        self.repetition_history.iter().map(|&v| u32::from(v)).sum()
    }

    /// Push an outcome to the front of the history, dropping the oldest ones.
    pub(crate) fn record_outcome(&mut self, outcome: u8) {
        self.repetition_history.insert(0, outcome);
        self.repetition_history.truncate(REPETITION_HISTORY_LIMIT);
    }

    /// Parse the review date, if it is a valid `YYYY-MM-DD` date.
    pub fn last_review(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_of_last_review, "%Y-%m-%d").ok()
    }
}

/// Grading applied to a practiced card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeAction {
    Known,
    Forgotten,
}

impl PracticeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Known => "known",
            Self::Forgotten => "forgotten",
        }
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "known" => Some(Self::Known),
            "forgotten" => Some(Self::Forgotten),
            _ => None,
        }
    }

    /// Outcome recorded in the repetition history.
    pub fn outcome(self) -> u8 {
        match self {
            Self::Known => 1,
            Self::Forgotten => 0,
        }
    }

    /// Contribution of this action to the caller's positive tally.
    pub fn tally_delta(self) -> i32 {
        match self {
            Self::Known => 1,
            Self::Forgotten => -1,
        }
    }
}

/// One entry of the undo or redo stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    pub card_number: u32,
    pub action: PracticeAction,
}

impl HistoryEntry {
    pub fn new(card_number: u32, action: PracticeAction) -> Self {
        Self {
            card_number,
            action,
        }
    }

    /// Parse the `"cardNumber:action"` wire form.
    pub fn parse(s: &str) -> Option<Self> {
        let (number, action) = s.trim().split_once(':')?;
        Some(Self {
            card_number: number.trim().parse().ok()?,
            action: PracticeAction::parse(action.trim())?,
        })
    }
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.card_number, self.action.as_str())
    }
}

/// Undo and redo stacks of graded actions. The top of each stack is the
/// last element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPracticeHistory", into = "RawPracticeHistory")]
pub struct PracticeHistory {
    pub undo_stack: Vec<HistoryEntry>,
    pub redo_stack: Vec<HistoryEntry>,
}

impl PracticeHistory {
    /// Push onto the undo stack, evicting the oldest entry past the limit.
    pub(crate) fn push_undo(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);
        if self.undo_stack.len() > UNDO_STACK_LIMIT {
            let excess = self.undo_stack.len() - UNDO_STACK_LIMIT;
            self.undo_stack.drain(..excess);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

/// Wire form of [`PracticeHistory`]: `"n:action"` entries joined by `|`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawPracticeHistory {
    #[serde(rename = "undoStack", default)]
    undo_stack: String,
    #[serde(rename = "redoStack", default)]
    redo_stack: String,
}

fn decode_stack(name: &str, raw: &str) -> Vec<HistoryEntry> {
    raw.split('|')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| {
            let entry = HistoryEntry::parse(s);
            if entry.is_none() {
                tracing::warn!(stack = name, entry = s, "dropping malformed practice history entry");
            }
            entry
        })
        .collect()
}

fn encode_stack(stack: &[HistoryEntry]) -> String {
    stack
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

impl From<RawPracticeHistory> for PracticeHistory {
    fn from(raw: RawPracticeHistory) -> Self {
        Self {
            undo_stack: decode_stack("undoStack", &raw.undo_stack),
            redo_stack: decode_stack("redoStack", &raw.redo_stack),
        }
    }
}

impl From<PracticeHistory> for RawPracticeHistory {
    fn from(history: PracticeHistory) -> Self {
        Self {
            undo_stack: encode_stack(&history.undo_stack),
            redo_stack: encode_stack(&history.redo_stack),
        }
    }
}

/// Named settings bags stored with a deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSettings {
    #[serde(rename = "practice-settings", default)]
    pub practice: SettingsBag,
    #[serde(rename = "app-settings", default)]
    pub app: SettingsBag,
    #[serde(rename = "search", default)]
    pub search: SettingsBag,
    #[serde(rename = "tag-search", default)]
    pub tag_search: SettingsBag,
    #[serde(rename = "practiceHistory", default)]
    pub practice_history: PracticeHistory,
    /// Bags this library does not know about, kept as loaded.
    #[serde(flatten)]
    pub other: BTreeMap<String, SettingsBag>,
}

/// A full study set: cards, tag definitions and settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub deck_name: String,
    pub deck_info: String,
    #[serde(default)]
    pub settings: DeckSettings,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new(deck_name: impl Into<String>, deck_info: impl Into<String>) -> Self {
        Self {
            deck_name: deck_name.into(),
            deck_info: deck_info.into(),
            ..Default::default()
        }
    }

    /// Look up a card by number.
    pub fn card(&self, card_number: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.card_number == card_number)
    }

    pub(crate) fn card_index(&self, card_number: u32) -> Option<usize> {
        self.cards.iter().position(|c| c.card_number == card_number)
    }
}
