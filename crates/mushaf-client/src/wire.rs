//! JSON shapes of the remote APIs and their conversion into model types.

use mushaf_model::{Chapter, ChapterOrdinal, Moshaf, RawVerse, Reciter, ReciterId, RevelationType};
use serde::Deserialize;

use crate::error::{ClientError, Result};

/// Envelope used by every text API response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Chapter entry of the catalog endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireChapter {
    pub number: i64,
    pub name: String,
    pub english_name: String,
    #[serde(default)]
    pub english_name_translation: Option<String>,
    pub number_of_ayahs: u32,
    #[serde(default)]
    pub revelation_type: Option<String>,
}

impl WireChapter {
    pub fn into_chapter(self) -> Result<Chapter> {
        let ordinal = ChapterOrdinal::new(self.number)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Ok(Chapter {
            ordinal,
            primary_name: self.name,
            secondary_name: self.english_name,
            translated_name: self.english_name_translation,
            verse_count: self.number_of_ayahs,
            revelation_type: self
                .revelation_type
                .as_deref()
                .map(RevelationType::from_label)
                .unwrap_or_default(),
        })
    }
}

/// One edition of one chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct WireChapterText {
    pub ayahs: Vec<WireAyah>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAyah {
    pub text: String,
    pub number_in_surah: u32,
}

impl From<WireAyah> for RawVerse {
    fn from(ayah: WireAyah) -> Self {
        RawVerse::new(ayah.number_in_surah, ayah.text)
    }
}

/// The roster endpoint has been seen both wrapped and as a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WireRoster {
    Wrapped { reciters: Vec<WireReciter> },
    Bare(Vec<WireReciter>),
}

impl WireRoster {
    pub fn into_reciters(self) -> Vec<WireReciter> {
        match self {
            Self::Wrapped { reciters } | Self::Bare(reciters) => reciters,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireReciter {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub rewaya: Option<String>,
    #[serde(default)]
    pub moshaf: Vec<WireMoshaf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMoshaf {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub surah_total: Option<u32>,
    /// Comma separated chapter numbers, e.g. `"1,2,3"`.
    #[serde(default)]
    pub surah_list: Option<String>,
}

impl From<WireReciter> for Reciter {
    fn from(wire: WireReciter) -> Self {
        Reciter {
            id: ReciterId(wire.id),
            name: wire.name.trim().to_string(),
            bio: wire.rewaya.filter(|rewaya| !rewaya.trim().is_empty()),
            moshaf: wire.moshaf.into_iter().map(Moshaf::from).collect(),
        }
    }
}

impl From<WireMoshaf> for Moshaf {
    fn from(wire: WireMoshaf) -> Self {
        Moshaf {
            id: wire.id,
            name: wire.name,
            server: wire.server,
            surah_total: wire.surah_total,
            surah_list: wire
                .surah_list
                .as_deref()
                .map(parse_surah_list)
                .unwrap_or_default(),
        }
    }
}

/// Parse `"1,2,114"`; entries that are not chapter numbers are skipped.
pub fn parse_surah_list(list: &str) -> Vec<u16> {
    list.split(',')
        .filter_map(|entry| entry.trim().parse::<ChapterOrdinal>().ok())
        .map(ChapterOrdinal::get)
        .collect()
}

/// Parse the catalog endpoint body.
pub fn parse_chapter_list(body: &str) -> Result<Vec<Chapter>> {
    let envelope: Envelope<Vec<WireChapter>> = serde_json::from_str(body)?;
    envelope
        .data
        .into_iter()
        .map(WireChapter::into_chapter)
        .collect()
}

/// Parse one chapter edition body into raw verses, in payload order.
pub fn parse_chapter_verses(body: &str) -> Result<Vec<RawVerse>> {
    let envelope: Envelope<WireChapterText> = serde_json::from_str(body)?;
    Ok(envelope.data.ayahs.into_iter().map(RawVerse::from).collect())
}

/// Parse the roster endpoint body, in fetch order.
pub fn parse_reciter_roster(body: &str) -> Result<Vec<Reciter>> {
    let roster: WireRoster = serde_json::from_str(body)?;
    Ok(roster
        .into_reciters()
        .into_iter()
        .map(Reciter::from)
        .collect())
}
