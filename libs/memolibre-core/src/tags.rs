//! Tag definitions and their use on cards.

use crate::error::{DeckError, Result};
use crate::types::Deck;

/// Strip all whitespace from a user-entered key and validate it.
fn clean_key(key: &str) -> Result<String> {
    let cleaned: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(DeckError::validation("Tag key cannot be empty"));
    }
    if !cleaned.chars().all(|c| ('\x21'..='\x7e').contains(&c)) {
        return Err(DeckError::validation(
            "Tag key must contain only visible ASCII characters (excluding whitespace)",
        ));
    }
    Ok(cleaned)
}

/// Add a new tag definition.
pub fn add_tag(deck: &Deck, key: &str, value: &str) -> Result<Deck> {
    let key = clean_key(key)?;
    if deck.tags.contains_key(&key) {
        return Err(DeckError::validation("Tag key already exists"));
    }

    let mut updated = deck.clone();
    tracing::debug!(%key, "tag added");
    updated.tags.insert(key, value.to_string());
    Ok(updated)
}

/// Change a tag's key and value, rewriting the key on every card that uses it.
pub fn edit_tag(deck: &Deck, old_key: &str, new_key: &str, new_value: &str) -> Result<Deck> {
    let new_key = clean_key(new_key)?;
    if new_key != old_key && deck.tags.contains_key(&new_key) {
        return Err(DeckError::validation("Tag key already exists"));
    }

    let mut updated = deck.clone();
    if new_key != old_key {
        updated.tags.remove(old_key);
        for tag in updated.cards.iter_mut().flat_map(|c| c.tags.iter_mut()) {
            if tag == old_key {
                *tag = new_key.clone();
            }
        }
        tracing::debug!(old_key, %new_key, "tag renamed");
    }
    updated.tags.insert(new_key, new_value.to_string());
    Ok(updated)
}

/// Remove a tag definition that no card references anymore.
pub fn delete_tag(deck: &Deck, key: &str) -> Result<Deck> {
    let in_use = tag_usage_count(deck, key);
    if in_use > 0 {
        return Err(DeckError::Validation(format!(
            "Cannot delete tag \"{key}\" because it is used by {in_use} card(s)"
        )));
    }

    let mut updated = deck.clone();
    updated.tags.remove(key);
    tracing::debug!(key, "tag deleted");
    Ok(updated)
}

/// Number of cards carrying `key`.
pub fn tag_usage_count(deck: &Deck, key: &str) -> usize {
    deck.cards
        .iter()
        .filter(|c| c.tags.iter().any(|t| t == key))
        .count()
}

/// Split a comma-separated tag list as typed into the card form.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
