use serde::{Deserialize, Serialize};

use crate::ids::ChapterOrdinal;

/// Revelation place reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevelationType {
    Meccan,
    Medinan,
    #[default]
    Unknown,
}

impl RevelationType {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "meccan" => Self::Meccan,
            "medinan" => Self::Medinan,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Meccan => "Meccan",
            Self::Medinan => "Medinan",
            Self::Unknown => "-",
        }
    }
}

/// Chapter metadata from the catalog. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub ordinal: ChapterOrdinal,
    /// Name in the source script.
    pub primary_name: String,
    /// Transliterated name.
    pub secondary_name: String,
    /// English rendering of the name, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_name: Option<String>,
    pub verse_count: u32,
    #[serde(default)]
    pub revelation_type: RevelationType,
}

impl Chapter {
    /// `"{ordinal}. {primary} - {secondary}"`, the label used in chapter pickers.
    pub fn label(&self) -> String {
        format!(
            "{}. {} - {}",
            self.ordinal, self.primary_name, self.secondary_name
        )
    }

    /// Case-insensitive match against either name or the ordinal.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.primary_name.to_lowercase().contains(&query)
            || self.secondary_name.to_lowercase().contains(&query)
            || self
                .translated_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
            || self.ordinal.to_string() == query
    }
}
