//! Card and tag search.

use std::cmp::Reverse;
use std::ops::RangeInclusive;

use regex::Regex;
use serde::Serialize;

use crate::error::{DeckError, Result};
use crate::selection::parse_number_search;
use crate::settings::{normalize, SettingsKind};
use crate::tags::tag_usage_count;
use crate::types::{Card, Deck, SettingsBag};

/// Criteria of the card search page. Empty fields place no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub card_number_search: String,
    pub front_side_regex: String,
    pub back_side_regex: String,
    pub tags_regex: String,
}

impl SearchCriteria {
    /// Build from a `search` settings bag, normalizing it first.
    pub fn from_settings(bag: &SettingsBag) -> Self {
        let normalized = normalize(SettingsKind::Search, bag);
        let field = |key: &str| normalized.get(key).cloned().unwrap_or_default();
        Self {
            card_number_search: field("cardNumberSearch"),
            front_side_regex: field("frontSideRegex"),
            back_side_regex: field("backSideRegex"),
            tags_regex: field("tagsRegex"),
        }
    }
}

fn compile(pattern: &str) -> Result<Option<Regex>> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|e| DeckError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

struct CompiledCriteria {
    numbers: Option<RangeInclusive<u32>>,
    front: Option<Regex>,
    back: Option<Regex>,
    tags: Option<Regex>,
}

impl CompiledCriteria {
    fn matches(&self, card: &Card) -> bool {
        self.numbers
            .as_ref()
            .map_or(true, |r| r.contains(&card.card_number))
            && self.front.as_ref().map_or(true, |re| re.is_match(&card.front_side))
            && self.back.as_ref().map_or(true, |re| re.is_match(&card.back_side))
            && self
                .tags
                .as_ref()
                .map_or(true, |re| card.tags.iter().any(|t| re.is_match(t)))
    }
}

/// Cards matching every non-empty criterion, in deck order.
pub fn search_cards<'a>(deck: &'a Deck, criteria: &SearchCriteria) -> Result<Vec<&'a Card>> {
    let compiled = CompiledCriteria {
        numbers: parse_number_search(&criteria.card_number_search),
        front: compile(&criteria.front_side_regex)?,
        back: compile(&criteria.back_side_regex)?,
        tags: compile(&criteria.tags_regex)?,
    };
    Ok(deck.cards.iter().filter(|c| compiled.matches(c)).collect())
}

/// Ordering of tag search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagSort {
    #[default]
    Alphabetical,
    /// Most used first; ties alphabetical.
    ByUsage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagMatch {
    pub key: String,
    pub value: String,
    pub usage: usize,
}

/// Tag definitions whose key matches `pattern` (everything when empty).
pub fn search_tags(deck: &Deck, pattern: &str, sort: TagSort) -> Result<Vec<TagMatch>> {
    let regex = compile(pattern)?;
    let mut matches: Vec<TagMatch> = deck
        .tags
        .iter()
        .filter(|(key, _)| regex.as_ref().map_or(true, |re| re.is_match(key)))
        .map(|(key, value)| TagMatch {
            key: key.clone(),
            value: value.clone(),
            usage: tag_usage_count(deck, key),
        })
        .collect();

    // Keys come out of the map sorted; a stable sort keeps that for ties.
    if sort == TagSort::ByUsage {
        matches.sort_by_key(|m| Reverse(m.usage));
    }
    Ok(matches)
}
