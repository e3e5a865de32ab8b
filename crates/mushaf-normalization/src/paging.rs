//! Display paging for a fetched chapter.
//!
//! Decides whether a chapter gets the standalone formula line, strips the
//! formula from the first raw verse and assigns dense display numbers.

use std::fmt;

use mushaf_model::{ChapterOrdinal, ChapterText, Verse};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::basmala::{FORMULA_TEXT, strip_formula};

/// Chapter that canonically does not open with the formula.
const WITHOUT_FORMULA: u16 = 9;

/// Chapter whose first verse is the formula itself.
const OPENING_CHAPTER: u16 = 1;

/// Which chapters are excluded from stripping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasmalaPolicy {
    /// Chapters 1 and 9 are left verbatim. Chapter 1 keeps the formula as
    /// its verse 1 and gets no standalone line.
    #[default]
    PreserveOpening,
    /// Only chapter 9 is left verbatim. Chapter 1 loses its first verse to
    /// the standalone line and is renumbered from its second raw verse.
    StripEverywhere,
}

impl BasmalaPolicy {
    pub const ALL: [BasmalaPolicy; 2] = [Self::PreserveOpening, Self::StripEverywhere];

    /// True when the chapter is never stripped and gets no standalone line.
    pub fn excludes(self, ordinal: ChapterOrdinal) -> bool {
        let ordinal = ordinal.get();
        match self {
            Self::PreserveOpening => ordinal == WITHOUT_FORMULA || ordinal == OPENING_CHAPTER,
            Self::StripEverywhere => ordinal == WITHOUT_FORMULA,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PreserveOpening => "preserve-opening",
            Self::StripEverywhere => "strip-everywhere",
        }
    }
}

impl fmt::Display for BasmalaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Turns raw chapter payloads into display sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerseNormalizer {
    policy: BasmalaPolicy,
}

impl VerseNormalizer {
    pub fn new(policy: BasmalaPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> BasmalaPolicy {
        self.policy
    }

    /// Whether the chapter is rendered with the standalone formula line.
    pub fn shows_formula_line(&self, ordinal: ChapterOrdinal) -> bool {
        !self.policy.excludes(ordinal)
    }

    /// Normalize a chapter without translations.
    pub fn normalize<S: AsRef<str>>(&self, ordinal: ChapterOrdinal, texts: &[S]) -> ChapterText {
        self.normalize_with_translations::<S, S>(ordinal, texts, None)
    }

    /// Normalize a chapter, attaching translations by raw position.
    ///
    /// Translations are aligned with the raw payload, so a dropped first
    /// verse also drops its translation.
    pub fn normalize_with_translations<S, T>(
        &self,
        ordinal: ChapterOrdinal,
        texts: &[S],
        translations: Option<&[T]>,
    ) -> ChapterText
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let Some(first) = texts.first() else {
            return ChapterText::empty(ordinal);
        };

        let eligible = self.shows_formula_line(ordinal);
        let mut first_text = first.as_ref().to_string();
        let mut start_index = 0;
        if eligible {
            let stripped = strip_formula(&first_text);
            if stripped.is_formula_only() {
                start_index = 1;
            } else if stripped.was_stripped {
                first_text = stripped.text;
            }
            debug!(
                chapter = %ordinal,
                stripped = stripped.was_stripped,
                start_index,
                "normalized first verse"
            );
        }

        let verses = texts
            .iter()
            .enumerate()
            .skip(start_index)
            .map(|(source_index, raw)| {
                let text = if source_index == 0 {
                    first_text.clone()
                } else {
                    raw.as_ref().to_string()
                };
                Verse {
                    source_index,
                    display_index: source_index - start_index,
                    text,
                    translation: translations
                        .and_then(|all| all.get(source_index))
                        .map(|translation| translation.as_ref().to_string()),
                }
            })
            .collect();

        ChapterText {
            ordinal,
            formula_line: eligible.then(|| FORMULA_TEXT.to_string()),
            verses,
        }
    }
}
