//! Matching and stripping of the opening formula (basmala).
//!
//! The formula is recognised only at the very start of a text. Between the
//! base letters of each word any number of vowel marks (U+064B..U+065F),
//! superscript alef (U+0670) or tatweel (U+0640) may appear, and the article
//! of words two to four may be written with a bare alef or an alef wasla.

use std::sync::LazyLock;

use mushaf_model::NormalizationResult;
use regex::Regex;

/// The formula as rendered on the standalone line above a chapter.
pub const FORMULA_TEXT: &str = "بِسْمِ ٱللَّٰهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ";

/// Marks allowed between base letters.
const MARKS: &str = r"[\x{064B}-\x{065F}\x{0670}\x{0640}]*";

/// Whitespace class; the byte order mark counts as whitespace in source texts.
const SPACE: &str = r"[\s\x{FEFF}]";

/// Bare alef or alef wasla.
const ALEF: &str = r"[\x{0627}\x{0671}]";

static FORMULA_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    let word = |letters: &[char]| -> String {
        letters
            .iter()
            .map(|letter| format!("{letter}{MARKS}"))
            .collect()
    };
    let pattern = format!(
        "^{SPACE}*{bism}{SPACE}+{ALEF}{allah}{SPACE}+{ALEF}{rahman}{SPACE}+{ALEF}{rahim}{SPACE}*",
        bism = word(&['\u{0628}', '\u{0633}', '\u{0645}']),
        allah = word(&['\u{0644}', '\u{0644}', '\u{0647}']),
        rahman = word(&['\u{0644}', '\u{0631}', '\u{062D}', '\u{0645}', '\u{0646}']),
        rahim = word(&['\u{0644}', '\u{0631}', '\u{062D}', '\u{064A}', '\u{0645}']),
    );
    Regex::new(&pattern).expect("opening formula pattern is valid")
});

fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{FEFF}'
}

/// Returns the byte length of the formula prefix (including surrounding
/// whitespace) when `text` starts with it.
pub fn formula_prefix_len(text: &str) -> Option<usize> {
    FORMULA_PREFIX.find(text).map(|found| found.end())
}

/// True when `text` opens with the formula.
pub fn starts_with_formula(text: &str) -> bool {
    formula_prefix_len(text).is_some()
}

/// Strip the formula from the start of `text`.
///
/// The remainder is trimmed on both ends. Texts without the formula are
/// returned untouched with `was_stripped == false`.
pub fn strip_formula(text: &str) -> NormalizationResult {
    match formula_prefix_len(text) {
        Some(end) => NormalizationResult {
            text: text[end..].trim_matches(is_space).to_string(),
            was_stripped: true,
        },
        None => NormalizationResult::unchanged(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTHMANI_OPENING_OF_2: &str = "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ الٓمٓ";

    #[test]
    fn strips_uthmani_prefix() {
        let result = strip_formula(UTHMANI_OPENING_OF_2);
        assert!(result.was_stripped);
        assert_eq!(result.text, "الٓمٓ");
    }

    #[test]
    fn strips_bare_letters() {
        let result = strip_formula("بسم الله الرحمن الرحيم قل هو الله أحد");
        assert_eq!(result.text, "قل هو الله أحد");
    }

    #[test]
    fn formula_only_leaves_empty_text() {
        let result = strip_formula(FORMULA_TEXT);
        assert!(result.is_formula_only());
    }

    #[test]
    fn tolerates_tatweel_and_multiple_spaces() {
        let text = "بـِسْمِ   ٱللَّـهِ\tٱلرَّحْمَـٰنِ  ٱلرَّحِيـمِ وَٱلضُّحَىٰ";
        assert_eq!(strip_formula(text).text, "وَٱلضُّحَىٰ");
    }

    #[test]
    fn leading_byte_order_mark_is_skipped() {
        let text = format!("\u{FEFF}{UTHMANI_OPENING_OF_2}");
        let result = strip_formula(&text);
        assert!(result.was_stripped);
        assert_eq!(result.text, "الٓمٓ");
    }

    #[test]
    fn formula_in_the_middle_is_ignored() {
        let text = "إِنَّهُۥ مِن سُلَيْمَٰنَ وَإِنَّهُۥ بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ";
        let result = strip_formula(text);
        assert!(!result.was_stripped);
        assert_eq!(result.text, text);
    }

    #[test]
    fn words_must_be_separated() {
        assert!(!starts_with_formula("بسمالله الرحمن الرحيم"));
    }

    #[test]
    fn hamza_alef_is_not_the_article() {
        assert!(!starts_with_formula("بسم ألله الرحمن الرحيم"));
    }

    #[test]
    fn empty_text_is_unchanged() {
        assert_eq!(strip_formula(""), NormalizationResult::unchanged(""));
    }
}
