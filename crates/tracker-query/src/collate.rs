//! Hebrew-aware string collation
//!
//! Names are compared the way a Hebrew locale orders them:
//! - Vowel points and cantillation marks are ignored
//! - Final letter forms sort with their base letter (ם with מ, ך with כ, ...)
//! - Latin letters compare case-insensitively
//! - Script groups order as: punctuation and spaces, digits, Hebrew, Latin,
//!   everything else
//!
//! Strings that are equal after folding are ordered by their marks
//! (unpointed first), then by case (lowercase first), then by code point,
//! so the result is a total order.

use serde::Serialize;
use std::cmp::Ordering;

/// Script group of a folded character, in sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
enum Group {
    Separator,
    Digit,
    Hebrew,
    Latin,
    Other,
}

/// Precomputed sort key for one string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CollationKey {
    folded: Vec<(Group, char)>,
    /// Marks attached to each base character
    marks: Vec<Vec<char>>,
    /// Uppercase flag of each base character
    upper: Vec<bool>,
    raw: String,
}

impl CollationKey {
    /// Build the key for `value`
    #[must_use]
    pub fn new(value: &str) -> Self {
        let folded = value
            .chars()
            .filter(|c| !is_mark(*c))
            .flat_map(char::to_lowercase)
            .map(|c| {
                let c = fold_final(c);
                (group_of(c), c)
            })
            .collect();
        let mut marks: Vec<Vec<char>> = Vec::new();
        let mut upper = Vec::new();
        for c in value.chars() {
            if is_mark(c) {
                match marks.last_mut() {
                    Some(last) => last.push(c),
                    None => marks.push(vec![c]),
                }
            } else {
                marks.push(Vec::new());
                upper.push(c.is_uppercase());
            }
        }
        Self {
            folded,
            marks,
            upper,
            raw: value.to_string(),
        }
    }

    /// The original string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded
            .cmp(&other.folded)
            .then_with(|| self.marks.cmp(&other.marks))
            .then_with(|| self.upper.cmp(&other.upper))
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two strings by collation order
#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}

/// Hebrew points, cantillation and other combining marks in the Hebrew block
fn is_mark(c: char) -> bool {
    matches!(c, '\u{0591}'..='\u{05BD}' | '\u{05BF}' | '\u{05C1}'..='\u{05C2}' | '\u{05C4}'..='\u{05C5}' | '\u{05C7}')
}

fn fold_final(c: char) -> char {
    match c {
        'ך' => 'כ',
        'ם' => 'מ',
        'ן' => 'נ',
        'ף' => 'פ',
        'ץ' => 'צ',
        other => other,
    }
}

fn group_of(c: char) -> Group {
    match c {
        '0'..='9' => Group::Digit,
        'א'..='ת' => Group::Hebrew,
        'a'..='z' => Group::Latin,
        c if c.is_whitespace() || c.is_ascii_punctuation() => Group::Separator,
        _ => Group::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_alphabetical() {
        assert_eq!(compare("אבי", "בני"), Ordering::Less);
        assert_eq!(compare("תמר", "דנה"), Ordering::Greater);
    }

    #[test]
    fn final_forms_sort_with_base_letter() {
        // ם (final) must not sort after every other letter
        assert_eq!(compare("שלום", "שלומי"), Ordering::Less);
        assert_eq!(compare("כהן", "כהנא"), Ordering::Less);
    }

    #[test]
    fn points_are_ignored() {
        assert_eq!(
            CollationKey::new("שָׁלוֹם").folded,
            CollationKey::new("שלום").folded
        );
        assert_eq!(compare("שָׁלוֹם", "שלומי"), Ordering::Less);
    }

    #[test]
    fn latin_is_case_insensitive_and_after_hebrew() {
        assert_eq!(compare("apple", "Banana"), Ordering::Less);
        assert_eq!(compare("Zeta", "אלפא"), Ordering::Greater);
        assert_eq!(compare("2024 תכנון", "אפיון"), Ordering::Less);
    }

    #[test]
    fn folded_ties_put_lowercase_first() {
        assert_eq!(compare("dana", "Dana"), Ordering::Less);

        let mut names = vec!["DANA", "Dana", "dana"];
        names.sort_by(|a, b| compare(a, b));
        assert_eq!(names, vec!["dana", "Dana", "DANA"]);
    }

    #[test]
    fn folded_ties_put_unpointed_first() {
        assert_eq!(compare("שלום", "שָׁלוֹם"), Ordering::Less);
    }

    #[test]
    fn total_order_on_folded_ties() {
        assert_ne!(compare("Dana", "dana"), Ordering::Equal);
        assert_eq!(compare("dana", "dana"), Ordering::Equal);
        assert_eq!(compare("", "א"), Ordering::Less);
    }
}
