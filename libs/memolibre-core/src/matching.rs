//! Answer checking for typed practice mode.

use serde::{Deserialize, Serialize};

/// Result of comparing a typed answer with a card's back side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// Normalized typed answer (for display).
    pub typed_normalized: String,
    /// Normalized back side (for display).
    pub expected_normalized: String,
}

/// Compare a typed answer with the back side, ignoring case and
/// surrounding or repeated whitespace.
pub fn check_answer(typed: &str, back_side: &str) -> AnswerCheck {
    let typed_normalized = normalize_whitespace(typed);
    let expected_normalized = normalize_whitespace(back_side);
    AnswerCheck {
        is_correct: typed_normalized.to_lowercase() == expected_normalized.to_lowercase(),
        typed_normalized,
        expected_normalized,
    }
}

/// Normalize whitespace in a string (trim and collapse multiple spaces).
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
