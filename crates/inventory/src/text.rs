//! Text validity and canonical names.
//!
//! Canonical names are the comparison key for sets and items: "Café", " CAFE "
//! and "cafe" all collapse to `cafe`.

use serde_json::Value;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Whether a JSON value is usable text: a string with at least one visible character.
///
/// Non-string values (null, numbers, objects, arrays, booleans) are never valid.
pub fn is_valid_text(value: &Value) -> bool {
    value.as_str().is_some_and(is_valid_str)
}

/// String form of [`is_valid_text`].
pub fn is_valid_str(s: &str) -> bool {
    s.chars().any(|c| !is_invisible(c))
}

/// Characters without a visual representation.
fn is_invisible(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(
            c,
            '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}'
        )
}

/// Canonical form of a user-supplied name.
///
/// Returns an empty string when `raw` is not valid text; callers treat that
/// as "reject". Idempotent: `normalize_name(&normalize_name(s)) == normalize_name(s)`.
pub fn normalize_name(raw: &str) -> String {
    if !is_valid_str(raw) {
        return String::new();
    }

    let lowered = raw.trim().to_lowercase();
    let folded: String = strip_latin_diacritics(lowered.nfd())
        .map(fold_stroked)
        .nfc()
        .collect();

    let folded = folded.trim();
    if is_valid_str(folded) {
        folded.to_string()
    } else {
        String::new()
    }
}

/// Drops accents from Latin letters only. Marks on other scripts (dakuten,
/// Devanagari vowel signs, the Cyrillic breve in `й`) distinguish letters and stay.
fn strip_latin_diacritics(decomposed: impl Iterator<Item = char>) -> impl Iterator<Item = char> {
    let mut after_latin = false;
    decomposed.filter(move |&c| {
        if is_combining_mark(c) {
            return !(after_latin && is_diacritic(c));
        }
        after_latin = is_latin(c);
        true
    })
}

fn is_diacritic(c: char) -> bool {
    matches!(
        c,
        '\u{0300}'..='\u{036F}'
            | '\u{1AB0}'..='\u{1AFF}'
            | '\u{1DC0}'..='\u{1DFF}'
            | '\u{20D0}'..='\u{20FF}'
            | '\u{FE20}'..='\u{FE2F}'
    )
}

fn is_latin(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            '\u{00C0}'..='\u{024F}'
                | '\u{1E00}'..='\u{1EFF}'
                | '\u{2C60}'..='\u{2C7F}'
                | '\u{A720}'..='\u{A7FF}'
                | '\u{AB30}'..='\u{AB6F}'
                | '\u{FF21}'..='\u{FF3A}'
                | '\u{FF41}'..='\u{FF5A}'
        )
}

/// Letters whose diacritic is part of the glyph and survives decomposition.
fn fold_stroked(c: char) -> char {
    match c {
        'ø' => 'o',
        'ł' => 'l',
        'đ' => 'd',
        'ħ' => 'h',
        'ı' => 'i',
        other => other,
    }
}

/// Canonical equality. Names without a canonical form never match anything.
pub fn names_match(a: &str, b: &str) -> bool {
    let a = normalize_name(a);
    !a.is_empty() && a == normalize_name(b)
}

/// Canonical substring test used by search.
pub fn contains_normalized(haystack: &str, query: &str) -> bool {
    let query = normalize_name(query);
    !query.is_empty() && normalize_name(haystack).contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_strings_are_not_text() {
        for value in [json!(null), json!(42), json!(1.5), json!({"a": 1}), json!(["x"]), json!(true)] {
            assert!(!is_valid_text(&value), "{value}");
        }
    }

    #[test]
    fn blank_and_invisible_strings_are_not_text() {
        for s in ["", "   ", "\t\n", "\u{0007}", "\u{200B}\u{FEFF}", " \u{00AD} "] {
            assert!(!is_valid_text(&json!(s)), "{s:?}");
        }
    }

    #[test]
    fn ordinary_words_are_text() {
        assert!(is_valid_text(&json!("Widget")));
        assert!(is_valid_str("  padded  "));
        assert!(is_valid_str("箱"));
    }

    #[test]
    fn folds_case_and_accents() {
        assert_eq!(normalize_name("Café"), normalize_name("cafe"));
        assert_eq!(normalize_name("  ÀÉÎÕÜ ñ  "), "aeiou n");
        assert_eq!(normalize_name("Smørrebrød"), "smorrebrod");
        assert_eq!(normalize_name("Łódź"), "lodz");
    }

    #[test]
    fn keeps_internal_spacing_and_order() {
        assert_eq!(normalize_name(" Big   Box  2 "), "big   box  2");
    }

    #[test]
    fn invalid_input_has_no_canonical_form() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" \t "), "");
    }

    #[test]
    fn a_lone_combining_mark_is_kept() {
        assert_eq!(normalize_name("\u{0301}"), "\u{0301}");
        assert!(names_match("\u{0301}", " \u{0301} "));
    }

    #[test]
    fn marks_outside_latin_text_are_significant() {
        assert!(!names_match("ガラス", "カラス"));
        assert_eq!(normalize_name("ガラス"), "ガラス");
        assert!(!names_match("काम", "कम"));
        assert!(!names_match("Йод", "Иод"));
        assert_eq!(normalize_name("Ελλάδα"), "ελλάδα");
    }

    #[test]
    fn composed_and_decomposed_forms_agree() {
        assert_eq!(normalize_name("e\u{0301}"), normalize_name("\u{00E9}"));
        assert_eq!(normalize_name("한국"), "한국");
    }

    #[test]
    fn names_match_is_canonical() {
        assert!(names_match("Café", "CAFE "));
        assert!(!names_match("Café", "Coffee"));
        assert!(!names_match("", ""));
    }

    #[test]
    fn contains_normalized_ignores_case_and_accents() {
        assert!(contains_normalized("Crème Brûlée", "brulee"));
        assert!(!contains_normalized("Crème Brûlée", "tart"));
        assert!(!contains_normalized("anything", "  "));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: normalization is idempotent.
            #[test]
            fn normalize_is_idempotent(s in "\\PC{0,32}") {
                let once = normalize_name(&s);
                prop_assert_eq!(normalize_name(&once), once);
            }

            /// Property: normalization is idempotent on any string, controls included.
            #[test]
            fn normalize_is_idempotent_on_arbitrary_strings(s in any::<String>()) {
                let once = normalize_name(&s);
                prop_assert_eq!(normalize_name(&once), once);
            }

            /// Property: the canonical form ignores surrounding whitespace and case.
            #[test]
            fn normalize_ignores_padding_and_case(s in "[A-Za-z][A-Za-z0-9 ]{0,30}") {
                let padded = format!("  {}  ", s.to_uppercase());
                prop_assert_eq!(normalize_name(&padded), normalize_name(&s));
            }
        }
    }
}
