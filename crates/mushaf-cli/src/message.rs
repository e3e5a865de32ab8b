//! Messages and effects of the dispatch loop.
//!
//! User input and completed requests both arrive as [`Message`]s.
//! [`update`](crate::update::update) turns each into state changes plus
//! [`Effect`]s, which the runtime executes.

use mushaf_client::{ChapterPayload, ClientError};
use mushaf_model::{Chapter, ChapterOrdinal, Reciter, ReciterId};

use crate::playback::SourceToken;
use crate::state::RequestToken;

#[derive(Debug)]
pub enum Message {
    // Chapter index
    LoadCatalog,
    CatalogLoaded {
        token: RequestToken,
        result: Result<Vec<Chapter>, ClientError>,
    },
    FilterChapters(String),

    // Verse panel
    SelectChapter(ChapterOrdinal),
    ChapterLoaded {
        token: RequestToken,
        result: Result<ChapterPayload, ClientError>,
    },
    NextChapter,
    PreviousChapter,
    /// Highlight by 0-based display index.
    SelectVerse(usize),
    /// Highlight by 1-based verse number.
    GoToVerse(usize),
    ToggleTranslation,

    // Reciter grid
    LoadRoster,
    RosterLoaded {
        token: RequestToken,
        result: Result<Vec<Reciter>, ClientError>,
    },
    SearchReciters(String),
    SelectReciter(ReciterId),
    /// Select the first reciter whose name contains the query.
    JumpToReciter(String),

    Playback(PlaybackMessage),

    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackMessage {
    /// Play the selected chapter with the selected reciter.
    Play,
    Toggle,
    /// The transport reached the end of this source.
    Ended(SourceToken),
    SeekPercent(f64),
    SetRate(f32),
    ToggleRepeat,
    ToggleAutoNext,
}

/// Work requested by [`update`](crate::update::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchCatalog(RequestToken),
    FetchChapter {
        token: RequestToken,
        ordinal: ChapterOrdinal,
    },
    FetchRoster(RequestToken),
    SaveSettings,
    Quit,
}

/// Panel affected by a message, used to decide what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Index,
    Reader,
    Reciters,
    Player,
    None,
}

impl Message {
    pub fn view(&self) -> View {
        match self {
            Self::CatalogLoaded { .. } | Self::FilterChapters(_) => View::Index,
            Self::ChapterLoaded { .. }
            | Self::SelectVerse(_)
            | Self::GoToVerse(_)
            | Self::ToggleTranslation => View::Reader,
            Self::RosterLoaded { .. }
            | Self::SearchReciters(_)
            | Self::SelectReciter(_)
            | Self::JumpToReciter(_) => View::Reciters,
            Self::Playback(_) => View::Player,
            Self::LoadCatalog
            | Self::SelectChapter(_)
            | Self::NextChapter
            | Self::PreviousChapter
            | Self::LoadRoster
            | Self::Quit => View::None,
        }
    }
}
