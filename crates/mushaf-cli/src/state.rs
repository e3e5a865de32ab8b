//! Application state.
//!
//! Everything the reader shows lives in [`AppState`], owned by the dispatch
//! loop and mutated only through [`update`](crate::update::update).

use mushaf_model::{Chapter, ChapterOrdinal, ChapterText, Reciter, ReciterId};
use mushaf_normalization::{BasmalaPolicy, VerseNormalizer};

use crate::playback::{AudioTransport, PlaybackController};
use crate::settings::Settings;

/// Tags one outgoing request; results carrying an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Issues strictly increasing request tokens.
#[derive(Debug, Default)]
pub struct RequestCounter {
    last: u64,
}

impl RequestCounter {
    pub fn issue(&mut self) -> RequestToken {
        self.last += 1;
        RequestToken(self.last)
    }
}

/// Lifecycle of one remotely loaded panel.
///
/// `Idle → Loading → Displayed | Failed`, and back to `Loading` on the next
/// request. A new request while `Loading` replaces the token, so the older
/// response no longer matches.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading(RequestToken),
    Displayed(T),
    /// Holds the message shown to the user.
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> LoadState<T> {
    /// True when a response tagged `token` should be applied.
    pub fn is_awaiting(&self, token: RequestToken) -> bool {
        matches!(self, Self::Loading(current) if *current == token)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn displayed(&self) -> Option<&T> {
        match self {
            Self::Displayed(value) => Some(value),
            _ => None,
        }
    }
}

/// The verse panel.
#[derive(Debug, Default)]
pub struct ReaderState {
    /// Most recently selected chapter, even while it is still loading.
    pub ordinal: Option<ChapterOrdinal>,
    pub text: LoadState<ChapterText>,
    /// Display index of the highlighted verse.
    pub highlighted: Option<usize>,
}

pub type Player = PlaybackController<Box<dyn AudioTransport>>;

#[derive(Debug)]
pub struct AppState {
    pub settings: Settings,
    pub normalizer: VerseNormalizer,
    pub catalog: LoadState<Vec<Chapter>>,
    pub chapter_filter: String,
    pub reader: ReaderState,
    pub roster: LoadState<Vec<Reciter>>,
    pub reciter_query: String,
    pub selected_reciter: Option<ReciterId>,
    pub player: Player,
    /// One-line feedback for the last action.
    pub status: Option<String>,
    requests: RequestCounter,
}

impl AppState {
    pub fn new(settings: Settings, transport: Box<dyn AudioTransport>) -> Self {
        let mut player = PlaybackController::new(transport);
        player.set_rate(settings.playback.rate);
        player.set_repeat_chapter(settings.playback.repeat_chapter);
        player.set_auto_next_chapter(settings.playback.auto_next_chapter);

        Self {
            normalizer: VerseNormalizer::new(settings.reader.basmala_policy),
            selected_reciter: settings.playback.last_reciter,
            settings,
            catalog: LoadState::Idle,
            chapter_filter: String::new(),
            reader: ReaderState::default(),
            roster: LoadState::Idle,
            reciter_query: String::new(),
            player,
            status: None,
            requests: RequestCounter::default(),
        }
    }

    pub fn next_token(&mut self) -> RequestToken {
        self.requests.issue()
    }

    /// Override the stored policy for this session only.
    pub fn set_policy(&mut self, policy: BasmalaPolicy) {
        self.normalizer = VerseNormalizer::new(policy);
    }

    pub fn show_translation(&self) -> bool {
        self.settings.reader.show_translation
    }

    pub fn chapter(&self, ordinal: ChapterOrdinal) -> Option<&Chapter> {
        self.catalog
            .displayed()?
            .iter()
            .find(|chapter| chapter.ordinal == ordinal)
    }

    pub fn reciter(&self, id: ReciterId) -> Option<&Reciter> {
        self.roster
            .displayed()?
            .iter()
            .find(|reciter| reciter.id == id)
    }

    pub fn current_reciter(&self) -> Option<&Reciter> {
        self.selected_reciter.and_then(|id| self.reciter(id))
    }

    /// Catalog entries matching the current filter, in catalog order.
    pub fn visible_chapters(&self) -> Vec<&Chapter> {
        self.catalog
            .displayed()
            .map(|chapters| {
                chapters
                    .iter()
                    .filter(|chapter| chapter.matches_query(&self.chapter_filter))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Roster entries matching the current search, in roster order.
    pub fn visible_reciters(&self) -> Vec<&Reciter> {
        self.roster
            .displayed()
            .map(|reciters| mushaf_normalization::filter_reciters(reciters, &self.reciter_query))
            .unwrap_or_default()
    }
}
