use serde::{Deserialize, Serialize};

use crate::ids::ChapterOrdinal;

/// One verse as delivered by the text source, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerse {
    /// Position reported by the source (1-based).
    pub position_in_chapter: u32,
    pub text: String,
}

impl RawVerse {
    pub fn new(position_in_chapter: u32, text: impl Into<String>) -> Self {
        Self {
            position_in_chapter,
            text: text.into(),
        }
    }
}

/// Outcome of stripping the opening formula from a single text.
///
/// When `was_stripped` is true, `text` is strictly shorter than the input and
/// has no leading whitespace. An empty `text` with `was_stripped` set means the
/// input was the formula alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationResult {
    pub text: String,
    pub was_stripped: bool,
}

impl NormalizationResult {
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            was_stripped: false,
        }
    }

    /// True when the caller must drop the verse instead of showing it empty.
    pub fn is_formula_only(&self) -> bool {
        self.was_stripped && self.text.is_empty()
    }
}

/// A verse placed in the display sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 0-based position within the fetched payload.
    pub source_index: usize,
    /// 0-based position after normalization; restarts at 0 per chapter.
    pub display_index: usize,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl Verse {
    /// 1-based number shown next to the verse.
    pub fn display_number(&self) -> usize {
        self.display_index + 1
    }
}

/// A normalized chapter ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterText {
    pub ordinal: ChapterOrdinal,
    /// Standalone formula line rendered ahead of the verses, if the chapter is eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula_line: Option<String>,
    pub verses: Vec<Verse>,
}

impl ChapterText {
    pub fn empty(ordinal: ChapterOrdinal) -> Self {
        Self {
            ordinal,
            formula_line: None,
            verses: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}
