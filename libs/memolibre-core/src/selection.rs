//! Card-number selections typed by the user: `"3-9"`, `"1,4,7"`, or a mix.

use std::ops::RangeInclusive;

/// A set of card numbers, stored as inclusive ranges so large ranges stay cheap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSelection {
    ranges: Vec<RangeInclusive<u32>>,
}

impl CardSelection {
    /// Parse a comma-separated list whose items are numbers or `A-B` ranges.
    ///
    /// Items that do not parse, and ranges with `A > B`, are skipped.
    pub fn parse(input: &str) -> Self {
        let mut ranges = Vec::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match parse_item(part) {
                Some(range) => ranges.push(range),
                None => tracing::debug!(item = part, "skipping unparseable card selection item"),
            }
        }
        Self { ranges }
    }

    pub fn from_numbers(numbers: &[u32]) -> Self {
        Self {
            ranges: numbers.iter().map(|&n| n..=n).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn contains(&self, card_number: u32) -> bool {
        self.ranges.iter().any(|r| r.contains(&card_number))
    }
}

fn parse_item(part: &str) -> Option<RangeInclusive<u32>> {
    match part.split_once('-') {
        Some((start, end)) => {
            let start: u32 = start.trim().parse().ok()?;
            let end: u32 = end.trim().parse().ok()?;
            (start <= end).then_some(start..=end)
        }
        None => {
            let n: u32 = part.parse().ok()?;
            Some(n..=n)
        }
    }
}

/// The card-number search field: a single `A-B` range or a single number.
/// Anything else places no constraint.
pub fn parse_number_search(input: &str) -> Option<RangeInclusive<u32>> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    parse_item(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list() {
        let selection = CardSelection::parse("2, 4,4");
        assert!(selection.contains(2));
        assert!(selection.contains(4));
        assert!(!selection.contains(3));
    }

    #[test]
    fn parse_range() {
        let selection = CardSelection::parse("10-12");
        assert!(!selection.contains(9));
        assert!(selection.contains(10));
        assert!(selection.contains(12));
        assert!(!selection.contains(13));
    }

    #[test]
    fn parse_mixed_and_skips_invalid() {
        let selection = CardSelection::parse("1, x, 5-3, 7-8, -2");
        assert!(selection.contains(1));
        assert!(!selection.contains(4));
        assert!(selection.contains(7));
        assert!(selection.contains(8));
        assert!(!selection.contains(2));
    }

    #[test]
    fn empty_when_nothing_parses() {
        assert!(CardSelection::parse("").is_empty());
        assert!(CardSelection::parse("abc, 9-1").is_empty());
    }

    #[test]
    fn huge_range_is_cheap() {
        let selection = CardSelection::parse("1-4000000000");
        assert!(selection.contains(3_999_999_999));
    }

    #[test]
    fn number_search() {
        assert_eq!(parse_number_search(" 5 "), Some(5..=5));
        assert_eq!(parse_number_search("2-6"), Some(2..=6));
        assert_eq!(parse_number_search("6-2"), None);
        assert_eq!(parse_number_search("five"), None);
        assert_eq!(parse_number_search(""), None);
    }
}
