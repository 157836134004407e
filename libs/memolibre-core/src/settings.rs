//! Settings normalization.
//!
//! Every bag is rebuilt from its static defaults; only recognized keys from
//! the input are overlaid, and only when their value passes validation.
//! Normalization never fails.

use crate::types::{Deck, SettingsBag};

/// The settings bags that have a normalization schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsKind {
    App,
    Practice,
    Search,
    TagSearch,
}

const PRACTICE_DEFAULTS: &[(&str, &str)] = &[
    ("frontSideFontSize", "16px"),
    ("backSideFontSize", "16px"),
    ("notableCardsFontSize", "14px"),
    ("tagsFontSize", "14px"),
    ("primaryInfoFontSize", "14px"),
    ("secondaryInfoFontSize", "14px"),
    ("cardNumberFontSize", "12px"),
    ("cardNameFontSize", "12px"),
    ("dateOfLastReviewFontSize", "12px"),
    ("repetitionValueFontSize", "12px"),
    ("repetitionHistoryFontSize", "12px"),
    ("tagValueFontSize", "16px"),
    ("showFrontSideLabel", "true"),
    ("showBackSideLabel", "true"),
    ("showCardNumberLabel", "true"),
    ("showCardNameLabel", "true"),
    ("showNotableCardsLabel", "true"),
    ("showTagsLabel", "true"),
    ("showDateOfLastReviewLabel", "true"),
    ("showRepetitionValueLabel", "true"),
    ("showRepetitionHistoryLabel", "true"),
    ("showPrimaryInfoLabel", "true"),
    ("showSecondaryInfoLabel", "true"),
    ("frontSideFontFamily", "Arial"),
    ("backSideFontFamily", "Arial"),
    ("tagInteractionLocked", "false"),
    ("minCardsBeforeRepeat", "0"),
];

const APP_DEFAULTS: &[(&str, &str)] = &[("showTooltips", "true"), ("autoSave", "false")];

const SEARCH_DEFAULTS: &[(&str, &str)] = &[
    ("cardNumberSearch", ""),
    ("frontSideRegex", ""),
    ("backSideRegex", ""),
    ("tagsRegex", ""),
];

const TAG_SEARCH_DEFAULTS: &[(&str, &str)] = &[("tagRegex", "")];

const BOOLEAN_KEYS: &[&str] = &["tagInteractionLocked", "autoSave", "showTooltips"];

impl SettingsKind {
    pub const ALL: [SettingsKind; 4] = [Self::Practice, Self::App, Self::Search, Self::TagSearch];

    /// Key of the bag inside the deck's settings document.
    pub fn bag_name(&self) -> &'static str {
        match self {
            Self::App => "app-settings",
            Self::Practice => "practice-settings",
            Self::Search => "search",
            Self::TagSearch => "tag-search",
        }
    }

    fn default_pairs(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::App => APP_DEFAULTS,
            Self::Practice => PRACTICE_DEFAULTS,
            Self::Search => SEARCH_DEFAULTS,
            Self::TagSearch => TAG_SEARCH_DEFAULTS,
        }
    }

    /// Default mapping for this bag.
    pub fn defaults(&self) -> SettingsBag {
        self.default_pairs()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// How a recognized key's value is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    FontSize,
    Boolean,
    FontFamily,
    Count,
    FreeText,
}

fn categorize(key: &str) -> Category {
    if key.ends_with("FontSize") {
        Category::FontSize
    } else if (key.starts_with("show") && key.ends_with("Label")) || BOOLEAN_KEYS.contains(&key) {
        Category::Boolean
    } else if key.ends_with("FontFamily") {
        Category::FontFamily
    } else if key == "minCardsBeforeRepeat" {
        Category::Count
    } else {
        Category::FreeText
    }
}

fn is_pixel_size(value: &str) -> bool {
    value
        .strip_suffix("px")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Validate a single value, returning the normalized form or `None` to keep the default.
fn validate(key: &str, value: &str) -> Option<String> {
    match categorize(key) {
        Category::FontSize => is_pixel_size(value).then(|| value.to_string()),
        Category::Boolean => matches!(value, "true" | "false").then(|| value.to_string()),
        Category::FontFamily => (!value.is_empty()).then(|| value.to_string()),
        Category::Count => value.trim().parse::<u64>().ok().map(|n| n.to_string()),
        Category::FreeText => Some(value.trim().to_string()),
    }
}

/// Merge `raw` over the defaults of `kind`, dropping unknown keys and
/// replacing invalid values with their defaults.
pub fn normalize(kind: SettingsKind, raw: &SettingsBag) -> SettingsBag {
    let mut normalized = kind.defaults();
    for (key, slot) in normalized.iter_mut() {
        if let Some(value) = raw.get(key).and_then(|v| validate(key, v)) {
            *slot = value;
        }
    }
    normalized
}

fn bag_mut(deck: &mut Deck, kind: SettingsKind) -> &mut SettingsBag {
    match kind {
        SettingsKind::App => &mut deck.settings.app,
        SettingsKind::Practice => &mut deck.settings.practice,
        SettingsKind::Search => &mut deck.settings.search,
        SettingsKind::TagSearch => &mut deck.settings.tag_search,
    }
}

/// The stored bag of `kind` (not normalized).
pub fn bag(deck: &Deck, kind: SettingsKind) -> &SettingsBag {
    match kind {
        SettingsKind::App => &deck.settings.app,
        SettingsKind::Practice => &deck.settings.practice,
        SettingsKind::Search => &deck.settings.search,
        SettingsKind::TagSearch => &deck.settings.tag_search,
    }
}

/// Replace the bag of `kind` with the normalized form of `raw`.
pub fn update_settings(deck: &Deck, kind: SettingsKind, raw: &SettingsBag) -> Deck {
    let mut updated = deck.clone();
    *bag_mut(&mut updated, kind) = normalize(kind, raw);
    tracing::debug!(bag = kind.bag_name(), "settings updated");
    updated
}

/// Normalize every known bag. Practice history and unknown bags are kept.
pub fn normalize_deck_settings(deck: &Deck) -> Deck {
    let mut updated = deck.clone();
    for kind in SettingsKind::ALL {
        let bag = bag_mut(&mut updated, kind);
        *bag = normalize(kind, bag);
    }
    updated
}

/// The recency window used when selecting the next practice card.
pub fn min_cards_before_repeat(deck: &Deck) -> usize {
    normalize(SettingsKind::Practice, &deck.settings.practice)
        .get("minCardsBeforeRepeat")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
