//! Endpoint and edition configuration.

use serde::{Deserialize, Serialize};

/// Base URL of the text API.
pub const DEFAULT_TEXT_API: &str = "https://api.alquran.cloud/v1";

/// Base URL of the recitation API.
pub const DEFAULT_AUDIO_API: &str = "https://www.mp3quran.net/api/v3";

/// Where the remote data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    /// Text API base, without trailing slash.
    pub text_api: String,
    /// Recitation API base, without trailing slash.
    pub audio_api: String,
    /// Language requested for reciter names.
    pub language: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            text_api: DEFAULT_TEXT_API.to_string(),
            audio_api: DEFAULT_AUDIO_API.to_string(),
            language: "ar".to_string(),
        }
    }
}

impl Endpoints {
    pub fn chapter_list_url(&self) -> String {
        format!("{}/surah", self.text_api.trim_end_matches('/'))
    }

    pub fn chapter_url(&self, ordinal: u16, edition: &str) -> String {
        format!(
            "{}/surah/{}/{}",
            self.text_api.trim_end_matches('/'),
            ordinal,
            edition
        )
    }

    pub fn reciters_url(&self) -> String {
        format!(
            "{}/reciters?language={}",
            self.audio_api.trim_end_matches('/'),
            self.language
        )
    }
}

/// Text editions requested for each chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Editions {
    /// Source-script text edition.
    pub text: String,
    /// Tried once when the text edition request fails.
    pub fallback_text: Option<String>,
    /// Translation edition fetched alongside the text.
    pub translation: String,
}

impl Default for Editions {
    fn default() -> Self {
        Self {
            text: "quran-uthmani".to_string(),
            fallback_text: Some("ar.alafasy".to_string()),
            translation: "en.asad".to_string(),
        }
    }
}
