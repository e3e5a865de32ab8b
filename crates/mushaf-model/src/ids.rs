#![deny(unsafe_code)]

use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Number of chapters in the catalog.
pub const CHAPTER_COUNT: u16 = 114;

/// A validated 1-based chapter ordinal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "u16", into = "u16")]
pub struct ChapterOrdinal(u16);

impl ChapterOrdinal {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(CHAPTER_COUNT);

    pub fn new(value: impl Into<i64>) -> Result<Self, ModelError> {
        let value = value.into();
        if (1..=i64::from(CHAPTER_COUNT)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(ModelError::InvalidOrdinal(value))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }

    /// Following chapter, wrapping from the last back to the first.
    #[must_use]
    pub fn next_wrapping(self) -> Self {
        if self.0 >= CHAPTER_COUNT {
            Self::FIRST
        } else {
            Self(self.0 + 1)
        }
    }

    /// Preceding chapter, wrapping from the first to the last.
    #[must_use]
    pub fn prev_wrapping(self) -> Self {
        if self.0 <= 1 { Self::LAST } else { Self(self.0 - 1) }
    }

    /// Zero-padded three digit form used in audio file names (`001`..`114`).
    pub fn padded(self) -> String {
        format!("{:03}", self.0)
    }
}

impl TryFrom<u16> for ChapterOrdinal {
    type Error = ModelError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ChapterOrdinal> for u16 {
    fn from(value: ChapterOrdinal) -> Self {
        value.0
    }
}

impl FromStr for ChapterOrdinal {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: i64 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::Message(format!("not a chapter number: {s}")))?;
        Self::new(parsed)
    }
}

impl fmt::Display for ChapterOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ReciterId(pub u32);

impl fmt::Display for ReciterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
