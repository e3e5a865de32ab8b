//! Persisted user preferences.
//!
//! Settings are loaded from disk at startup and saved when changed. A
//! missing or unreadable file yields the defaults.

use std::path::{Path, PathBuf};

use mushaf_client::{Editions, Endpoints};
use mushaf_model::ReciterId;
use mushaf_normalization::BasmalaPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roster ids shown by `reciters --featured` unless configured otherwise.
pub const DEFAULT_FEATURED_IDS: [u32; 12] = [54, 102, 4, 123, 51, 5, 106, 112, 62, 35, 92, 93];

/// Number of reciters shown when no featured id resolves.
pub const DEFAULT_FEATURED_FALLBACK: usize = 12;

/// Playback rates outside this range are clamped.
pub const RATE_RANGE: std::ops::RangeInclusive<f32> = 0.25..=4.0;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to create config directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Application settings, stored as TOML in the user's config directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub reader: ReaderSettings,
    pub playback: PlaybackSettings,
    pub reciters: ReciterSettings,
    pub endpoints: Endpoints,
}

impl Settings {
    /// Load settings from the default path, migrating and re-saving if needed.
    pub fn load() -> Self {
        let path = Self::config_path();
        let mut settings = Self::load_from(&path);
        if settings.migrate()
            && let Err(error) = settings.save_to(&path)
        {
            tracing::warn!(%error, "could not save migrated settings");
        }
        settings
    }

    /// Load settings from a specific path without migrating.
    pub fn load_from(path: &Path) -> Self {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| match toml::from_str(&content) {
                Ok(settings) => Some(settings),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "ignoring invalid settings file");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Repair combinations older versions could persist.
    ///
    /// Returns true when anything changed.
    pub fn migrate(&mut self) -> bool {
        let playback = &mut self.playback;
        let mut changed = false;
        if playback.repeat_chapter && playback.auto_next_chapter {
            playback.auto_next_chapter = false;
            changed = true;
        }
        if !RATE_RANGE.contains(&playback.rate) {
            let rate = playback.rate;
            playback.set_rate(rate);
            changed = true;
        }
        changed
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("net", "Mushaf", "mushaf")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Text and translation editions to request.
    pub fn editions(&self) -> Editions {
        Editions {
            text: self.reader.text_edition.clone(),
            fallback_text: self.reader.fallback_text_edition.clone(),
            translation: self.reader.translation_edition.clone(),
        }
    }
}

/// Reading preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    pub show_translation: bool,
    pub basmala_policy: BasmalaPolicy,
    pub text_edition: String,
    pub fallback_text_edition: Option<String>,
    pub translation_edition: String,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        let editions = Editions::default();
        Self {
            show_translation: true,
            basmala_policy: BasmalaPolicy::default(),
            text_edition: editions.text,
            fallback_text_edition: editions.fallback_text,
            translation_edition: editions.translation,
        }
    }
}

/// Playback preferences.
///
/// `repeat_chapter` and `auto_next_chapter` are never both set; use the
/// setters to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub repeat_chapter: bool,
    pub auto_next_chapter: bool,
    pub rate: f32,
    pub last_reciter: Option<ReciterId>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            repeat_chapter: false,
            auto_next_chapter: false,
            rate: 1.0,
            last_reciter: None,
        }
    }
}

impl PlaybackSettings {
    pub fn set_repeat_chapter(&mut self, enabled: bool) {
        self.repeat_chapter = enabled;
        if enabled {
            self.auto_next_chapter = false;
        }
    }

    pub fn set_auto_next_chapter(&mut self, enabled: bool) {
        self.auto_next_chapter = enabled;
        if enabled {
            self.repeat_chapter = false;
        }
    }

    /// Store `rate` clamped to [`RATE_RANGE`]; non-finite values reset to 1.
    pub fn set_rate(&mut self, rate: f32) {
        self.rate = if rate.is_finite() {
            rate.clamp(*RATE_RANGE.start(), *RATE_RANGE.end())
        } else {
            1.0
        };
    }
}

/// Reciter grid preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciterSettings {
    pub featured_ids: Vec<ReciterId>,
    pub featured_fallback_count: usize,
}

impl Default for ReciterSettings {
    fn default() -> Self {
        Self {
            featured_ids: DEFAULT_FEATURED_IDS.into_iter().map(ReciterId).collect(),
            featured_fallback_count: DEFAULT_FEATURED_FALLBACK,
        }
    }
}
