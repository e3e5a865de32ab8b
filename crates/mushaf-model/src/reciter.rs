use serde::{Deserialize, Serialize};

use crate::ids::{ChapterOrdinal, ReciterId};

/// One recording set of a reciter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moshaf {
    pub id: u32,
    pub name: String,
    /// Base URL that per-chapter audio file names are appended to.
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surah_total: Option<u32>,
    /// Chapters covered by this recording set, when the roster lists them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surah_list: Vec<u16>,
}

impl Moshaf {
    /// True when the set covers the chapter, or when coverage is not listed.
    pub fn covers(&self, ordinal: ChapterOrdinal) -> bool {
        self.surah_list.is_empty() || self.surah_list.contains(&ordinal.get())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reciter {
    pub id: ReciterId,
    pub name: String,
    /// Narration line (rewaya) shown under the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub moshaf: Vec<Moshaf>,
}

impl Reciter {
    pub fn primary_moshaf(&self) -> Option<&Moshaf> {
        self.moshaf.first()
    }

    /// Audio base URL of the first recording set, if it has one.
    pub fn audio_server(&self) -> Option<&str> {
        self.primary_moshaf()
            .map(|moshaf| moshaf.server.as_str())
            .filter(|server| !server.trim().is_empty())
    }
}
