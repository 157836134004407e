//! Deck state-transition engine for the memolibre flashcard app.
//!
//! Provides:
//! - Plain-text deck parser (headings become tags)
//! - Practice grading with bounded undo/redo and next-card selection
//! - Card add/remove/update with positional renumbering
//! - Circulation, tag and settings editing
//! - Card and tag search, JSON import/export
//!
//! Every operation takes a `&Deck` and returns a new deck; the input is
//! never modified.

pub mod cards;
pub mod circulation;
pub mod error;
pub mod matching;
pub mod parser;
pub mod persist;
pub mod practice;
pub mod search;
pub mod selection;
pub mod session;
pub mod settings;
pub mod tags;
pub mod types;

pub use cards::{add_card, edit_deck_name, get_highest_card_number, next_card_number, remove_cards, update_card};
pub use circulation::{circulation_stats, decrease_circulation, increase_circulation, CirculationStats, CirculationTarget};
pub use error::{DeckError, Result};
pub use matching::{check_answer, AnswerCheck};
pub use parser::{create_new_deck, parse_deck};
pub use persist::{deck_from_json, deck_to_json, export_file_name};
pub use practice::{
    mark_card_as_forgotten, mark_card_as_known, perform_practice_action, redo_last_action, select_next_card,
    undo_last_action, HistoryStep,
};
pub use search::{search_cards, search_tags, SearchCriteria, TagMatch, TagSort};
pub use selection::CardSelection;
pub use session::{PracticeSession, SessionStep};
pub use settings::{min_cards_before_repeat, normalize_deck_settings, update_settings, SettingsKind};
pub use tags::{add_tag, delete_tag, edit_tag, parse_tag_list, tag_usage_count};
pub use types::{Card, CardRef, Deck, DeckSettings, HistoryEntry, PracticeAction, PracticeHistory, SettingsBag};
