//! Chapter catalog and verse text source.

use mushaf_model::{Chapter, ChapterOrdinal, RawVerse};
use tracing::{info, warn};

use crate::client::MushafClient;
use crate::error::Result;
use crate::wire::{parse_chapter_list, parse_chapter_verses};

/// Both editions of one chapter, each in payload order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterPayload {
    pub ordinal: ChapterOrdinal,
    pub text: Vec<RawVerse>,
    pub translation: Vec<RawVerse>,
}

impl ChapterPayload {
    pub fn texts(&self) -> Vec<&str> {
        self.text.iter().map(|verse| verse.text.as_str()).collect()
    }

    pub fn translations(&self) -> Vec<&str> {
        self.translation
            .iter()
            .map(|verse| verse.text.as_str())
            .collect()
    }
}

impl MushafClient {
    /// Fetch the full chapter catalog.
    pub async fn fetch_chapter_list(&self) -> Result<Vec<Chapter>> {
        let body = self.get_text(&self.endpoints.chapter_list_url()).await?;
        let chapters = parse_chapter_list(&body)?;
        info!(count = chapters.len(), "chapter catalog loaded");
        Ok(chapters)
    }

    /// Fetch one edition of one chapter.
    pub async fn fetch_chapter_verses(
        &self,
        ordinal: ChapterOrdinal,
        edition: &str,
    ) -> Result<Vec<RawVerse>> {
        let url = self.endpoints.chapter_url(ordinal.get(), edition);
        let body = self.get_text(&url).await?;
        parse_chapter_verses(&body)
    }

    /// Text edition with a single fallback to the alternate edition.
    async fn fetch_text_edition(&self, ordinal: ChapterOrdinal) -> Result<Vec<RawVerse>> {
        match self.fetch_chapter_verses(ordinal, &self.editions.text).await {
            Ok(verses) => Ok(verses),
            Err(error) => match &self.editions.fallback_text {
                Some(fallback) => {
                    warn!(
                        chapter = %ordinal,
                        edition = %self.editions.text,
                        %fallback,
                        %error,
                        "text edition failed, trying fallback"
                    );
                    self.fetch_chapter_verses(ordinal, fallback).await
                }
                None => Err(error),
            },
        }
    }

    /// Fetch text and translation concurrently; either failing fails the load.
    pub async fn fetch_chapter(&self, ordinal: ChapterOrdinal) -> Result<ChapterPayload> {
        let (text, translation) = tokio::try_join!(
            self.fetch_text_edition(ordinal),
            self.fetch_chapter_verses(ordinal, &self.editions.translation),
        )?;
        info!(
            chapter = %ordinal,
            verses = text.len(),
            translated = translation.len(),
            "chapter text loaded"
        );
        Ok(ChapterPayload {
            ordinal,
            text,
            translation,
        })
    }
}
