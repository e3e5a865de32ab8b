//! Diacritic-insensitive ordering and search over the reciter roster.
//!
//! Names are compared at base strength: combining marks, tatweel and case
//! are ignored, the alef variants share one weight, and teh marbuta sorts
//! as teh. Arabic letters sort ahead of other scripts, as in the Arabic
//! locale.

use std::cmp::Ordering;

use mushaf_model::{Reciter, ReciterId};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const TATWEEL: char = '\u{0640}';

fn is_arabic_mark(ch: char) -> bool {
    matches!(ch, '\u{064B}'..='\u{065F}' | '\u{0670}') || ch == TATWEEL
}

/// Compatibility-decomposed name with every mark removed and whitespace
/// collapsed to single spaces.
pub fn sort_key(value: &str) -> String {
    let stripped: String = value
        .nfkd()
        .filter(|ch| !is_arabic_mark(*ch) && !is_combining_mark(*ch))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fold letters that differ only below base strength.
fn fold_base(ch: char) -> char {
    match ch {
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' => '\u{0627}',
        '\u{0649}' => '\u{064A}',
        '\u{0629}' => '\u{062A}',
        _ => ch.to_lowercase().next().unwrap_or(ch),
    }
}

fn script_rank(ch: char) -> u8 {
    if ch.is_whitespace() {
        0
    } else if ch.is_numeric() {
        1
    } else if matches!(ch, '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}') {
        2
    } else {
        3
    }
}

/// Folded key used for both comparison and search.
fn base_key(value: &str) -> Vec<char> {
    sort_key(value).chars().map(fold_base).collect()
}

/// Compare two names at base strength.
pub fn compare_base(left: &str, right: &str) -> Ordering {
    let left = base_key(left);
    let right = base_key(right);
    left.iter()
        .map(|ch| (script_rank(*ch), *ch))
        .cmp(right.iter().map(|ch| (script_rank(*ch), *ch)))
}

/// Stable sort by name; equal names keep their fetch order.
pub fn sort_reciters(reciters: &mut [Reciter]) {
    reciters.sort_by(|a, b| compare_base(&a.name, &b.name));
}

/// Base-strength substring match over the name and narration line.
pub fn matches_search(reciter: &Reciter, query: &str) -> bool {
    let needle: String = base_key(query).into_iter().collect();
    if needle.is_empty() {
        return true;
    }
    let name: String = base_key(&reciter.name).into_iter().collect();
    if name.contains(&needle) {
        return true;
    }
    reciter.bio.as_deref().is_some_and(|bio| {
        let bio: String = base_key(bio).into_iter().collect();
        bio.contains(&needle)
    })
}

pub fn filter_reciters<'a>(reciters: &'a [Reciter], query: &str) -> Vec<&'a Reciter> {
    reciters
        .iter()
        .filter(|reciter| matches_search(reciter, query))
        .collect()
}

/// First reciter whose name contains the query, for jump-to-reciter.
pub fn first_name_match<'a>(reciters: &'a [Reciter], query: &str) -> Option<&'a Reciter> {
    let needle: String = base_key(query).into_iter().collect();
    if needle.is_empty() {
        return None;
    }
    reciters.iter().find(|reciter| {
        base_key(&reciter.name)
            .into_iter()
            .collect::<String>()
            .contains(&needle)
    })
}

/// Curated subset in the order of `ids`; missing ids are skipped.
///
/// When none of the ids resolve, the first `fallback_count` reciters are used.
pub fn featured<'a>(
    reciters: &'a [Reciter],
    ids: &[ReciterId],
    fallback_count: usize,
) -> Vec<&'a Reciter> {
    let picked: Vec<&Reciter> = ids
        .iter()
        .filter_map(|id| reciters.iter().find(|reciter| reciter.id == *id))
        .collect();
    if picked.is_empty() {
        reciters.iter().take(fallback_count).collect()
    } else {
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_strips_marks_and_spaces() {
        assert_eq!(sort_key("  مُحَمَّد   صِدِّيق\tالمنشاوي "), "محمد صديق المنشاوي");
        assert_eq!(sort_key("عبـــدالباسط"), "عبدالباسط");
    }

    #[test]
    fn sort_key_decomposes_hamza_forms() {
        // U+0623 decomposes to alef + hamza above, and the mark is dropped.
        assert_eq!(sort_key("أحمد"), "احمد");
    }

    #[test]
    fn base_compare_ignores_case_and_accents() {
        assert_eq!(compare_base("Élan", "elan"), Ordering::Equal);
        assert_eq!(compare_base("ٱحمد", "احمد"), Ordering::Equal);
        assert_eq!(compare_base("مصطفى", "مصطفي"), Ordering::Equal);
    }

    #[test]
    fn teh_marbuta_shares_teh_weight() {
        assert_eq!(compare_base("حمزة", "حمزت"), Ordering::Equal);
        assert_eq!(compare_base("فاطمة", "فاطمث"), Ordering::Less);
    }

    #[test]
    fn arabic_sorts_before_latin() {
        assert_eq!(compare_base("ياسر", "Abdullah"), Ordering::Less);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(compare_base("محمد", "محمد أيوب"), Ordering::Less);
    }
}
