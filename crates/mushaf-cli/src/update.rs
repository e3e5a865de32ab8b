//! Message handling.
//!
//! `update` is the only place [`AppState`] changes. Responses whose token no
//! longer matches the panel's pending request are dropped, so the last
//! selection always wins.

use mushaf_client::{ChapterPayload, ClientError};
use mushaf_model::{ChapterOrdinal, ReciterId};
use mushaf_normalization::first_name_match;
use tracing::{debug, warn};

use crate::message::{Effect, Message, PlaybackMessage};
use crate::playback::EndAction;
use crate::render::{CATALOG_UNAVAILABLE, RECITERS_UNAVAILABLE, TEXT_UNAVAILABLE};
use crate::state::{AppState, LoadState, RequestToken};

pub fn update(state: &mut AppState, message: Message) -> Vec<Effect> {
    debug!(?message, "dispatch");
    match message {
        Message::LoadCatalog => {
            let token = state.next_token();
            state.catalog = LoadState::Loading(token);
            vec![Effect::FetchCatalog(token)]
        }
        Message::CatalogLoaded { token, result } => {
            if !state.catalog.is_awaiting(token) {
                debug!(?token, "discarding stale catalog response");
                return Vec::new();
            }
            state.catalog = match result {
                Ok(chapters) => LoadState::Displayed(chapters),
                Err(error) => failed(state, &error, CATALOG_UNAVAILABLE),
            };
            Vec::new()
        }
        Message::FilterChapters(query) => {
            state.chapter_filter = query.trim().to_string();
            Vec::new()
        }

        Message::SelectChapter(ordinal) => select_chapter(state, ordinal),
        Message::ChapterLoaded { token, result } => {
            if !state.reader.text.is_awaiting(token) {
                debug!(?token, "discarding stale chapter response");
                return Vec::new();
            }
            state.reader.text = match result {
                Ok(payload) => LoadState::Displayed(normalize(state, &payload)),
                Err(error) => failed(state, &error, TEXT_UNAVAILABLE),
            };
            Vec::new()
        }
        Message::NextChapter => {
            let next = state
                .reader
                .ordinal
                .map_or(ChapterOrdinal::FIRST, ChapterOrdinal::next_wrapping);
            select_chapter(state, next)
        }
        Message::PreviousChapter => {
            let previous = state
                .reader
                .ordinal
                .map_or(ChapterOrdinal::LAST, ChapterOrdinal::prev_wrapping);
            select_chapter(state, previous)
        }
        Message::SelectVerse(index) => {
            if let Some(text) = state.reader.text.displayed()
                && !text.is_empty()
            {
                state.reader.highlighted = Some(index.min(text.len() - 1));
            }
            Vec::new()
        }
        Message::GoToVerse(number) => {
            if number == 0 {
                state.status = Some("Verse numbers start at 1.".to_string());
                return Vec::new();
            }
            update(state, Message::SelectVerse(number - 1))
        }
        Message::ToggleTranslation => {
            let reader = &mut state.settings.reader;
            reader.show_translation = !reader.show_translation;
            vec![Effect::SaveSettings]
        }

        Message::LoadRoster => {
            let token = state.next_token();
            state.roster = LoadState::Loading(token);
            vec![Effect::FetchRoster(token)]
        }
        Message::RosterLoaded { token, result } => {
            if !state.roster.is_awaiting(token) {
                debug!(?token, "discarding stale roster response");
                return Vec::new();
            }
            state.roster = match result {
                Ok(reciters) => LoadState::Displayed(reciters),
                Err(error) => failed(state, &error, RECITERS_UNAVAILABLE),
            };
            Vec::new()
        }
        Message::SearchReciters(query) => {
            state.reciter_query = query.trim().to_string();
            Vec::new()
        }
        Message::SelectReciter(id) => select_reciter(state, id),
        Message::JumpToReciter(query) => {
            let found = state
                .roster
                .displayed()
                .and_then(|reciters| first_name_match(reciters, &query))
                .map(|reciter| reciter.id);
            match found {
                Some(id) => select_reciter(state, id),
                None => {
                    state.status =
                        Some(format!("No reciter name contains \"{}\".", query.trim()));
                    Vec::new()
                }
            }
        }

        Message::Playback(message) => playback(state, message),

        Message::Quit => vec![Effect::Quit],
    }
}

/// Placeholder for the panel; retryable failures also get a status hint.
fn failed<T>(state: &mut AppState, error: &ClientError, placeholder: &str) -> LoadState<T> {
    let retryable = error.is_retryable();
    warn!(%error, retryable, "request failed");
    if retryable {
        state.status = Some(format!("{} Try again.", error.user_message()));
    }
    LoadState::Failed(placeholder.to_string())
}

fn select_chapter(state: &mut AppState, ordinal: ChapterOrdinal) -> Vec<Effect> {
    let token = state.next_token();
    state.reader.ordinal = Some(ordinal);
    state.reader.text = LoadState::Loading(token);
    state.reader.highlighted = None;
    vec![Effect::FetchChapter { token, ordinal }]
}

fn normalize(state: &AppState, payload: &ChapterPayload) -> mushaf_model::ChapterText {
    let texts = payload.texts();
    let translations = payload.translations();
    state
        .normalizer
        .normalize_with_translations(payload.ordinal, &texts, Some(&translations[..]))
}

fn select_reciter(state: &mut AppState, id: ReciterId) -> Vec<Effect> {
    if state.reciter(id).is_none() {
        state.status = Some(format!("No reciter with id {id}."));
        return Vec::new();
    }
    state.selected_reciter = Some(id);
    state.settings.playback.last_reciter = Some(id);
    vec![Effect::SaveSettings]
}

fn playback(state: &mut AppState, message: PlaybackMessage) -> Vec<Effect> {
    match message {
        PlaybackMessage::Play => {
            match state.reader.ordinal {
                Some(ordinal) => play(state, ordinal),
                None => state.status = Some("Open a chapter first.".to_string()),
            }
            Vec::new()
        }
        PlaybackMessage::Toggle => {
            state.player.toggle();
            Vec::new()
        }
        PlaybackMessage::Ended(token) => {
            // Advancing moves the recitation only; the open chapter stays.
            if let EndAction::Advance(next) = state.player.on_ended(token) {
                play(state, next);
            }
            Vec::new()
        }
        PlaybackMessage::SeekPercent(percent) => {
            state.player.seek_percent(percent);
            Vec::new()
        }
        PlaybackMessage::SetRate(rate) => {
            state.settings.playback.set_rate(rate);
            let rate = state.settings.playback.rate;
            state.player.set_rate(rate);
            state.status = Some(format!("rate: {rate}x"));
            vec![Effect::SaveSettings]
        }
        PlaybackMessage::ToggleRepeat => {
            let enabled = !state.settings.playback.repeat_chapter;
            state.settings.playback.set_repeat_chapter(enabled);
            state.player.set_repeat_chapter(enabled);
            sync_toggles(state);
            vec![Effect::SaveSettings]
        }
        PlaybackMessage::ToggleAutoNext => {
            let enabled = !state.settings.playback.auto_next_chapter;
            state.settings.playback.set_auto_next_chapter(enabled);
            state.player.set_auto_next_chapter(enabled);
            sync_toggles(state);
            vec![Effect::SaveSettings]
        }
    }
}

fn sync_toggles(state: &mut AppState) {
    let playback = &state.settings.playback;
    debug_assert_eq!(playback.repeat_chapter, state.player.repeat_chapter());
    debug_assert_eq!(playback.auto_next_chapter, state.player.auto_next_chapter());
    state.status = Some(format!(
        "repeat: {}, auto-next: {}",
        on_off(playback.repeat_chapter),
        on_off(playback.auto_next_chapter)
    ));
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn play(state: &mut AppState, ordinal: ChapterOrdinal) {
    let Some(reciter) = state.current_reciter().cloned() else {
        state.status = Some("Select a reciter first.".to_string());
        return;
    };
    state.status = match state.player.play_chapter(&reciter, ordinal) {
        Ok(_) => Some(format!("{} - chapter {ordinal}", reciter.name)),
        Err(error) => {
            warn!(%error, "cannot play chapter");
            Some(error.user_message().to_string())
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::tests::{FakeTransport, reciter};
    use crate::settings::Settings;
    use mushaf_model::RawVerse;

    fn state() -> AppState {
        AppState::new(Settings::default(), Box::new(FakeTransport::new()))
    }

    fn ordinal(value: u16) -> ChapterOrdinal {
        ChapterOrdinal::new(value).unwrap()
    }

    fn payload(ordinal: ChapterOrdinal, texts: &[&str]) -> ChapterPayload {
        ChapterPayload {
            ordinal,
            text: texts
                .iter()
                .enumerate()
                .map(|(i, text)| RawVerse::new(i as u32 + 1, *text))
                .collect(),
            translation: texts
                .iter()
                .enumerate()
                .map(|(i, _)| RawVerse::new(i as u32 + 1, format!("t{}", i + 1)))
                .collect(),
        }
    }

    fn fetched_token(effects: &[Effect]) -> RequestToken {
        match effects {
            [Effect::FetchChapter { token, .. }] => *token,
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn last_selection_wins() {
        let mut state = state();
        let first = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(2))));
        let second = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(3))));

        update(
            &mut state,
            Message::ChapterLoaded {
                token: second,
                result: Ok(payload(ordinal(3), &["a", "b"])),
            },
        );
        update(
            &mut state,
            Message::ChapterLoaded {
                token: first,
                result: Ok(payload(ordinal(2), &["x"])),
            },
        );

        let text = state.reader.text.displayed().unwrap();
        assert_eq!(text.ordinal, ordinal(3));
        assert_eq!(text.len(), 2);
        assert_eq!(text.verses[1].translation.as_deref(), Some("t2"));
    }

    #[test]
    fn stale_failure_does_not_clobber_display() {
        let mut state = state();
        let first = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(5))));
        let second = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(6))));
        update(
            &mut state,
            Message::ChapterLoaded {
                token: first,
                result: Err(ClientError::Network("reset".to_string())),
            },
        );
        assert!(state.reader.text.is_awaiting(second));
    }

    #[test]
    fn failure_shows_placeholder() {
        let mut state = state();
        let token = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(5))));
        update(
            &mut state,
            Message::ChapterLoaded {
                token,
                result: Err(ClientError::Status {
                    status: 500,
                    url: "https://example.test".to_string(),
                }),
            },
        );
        assert_eq!(
            state.reader.text,
            LoadState::Failed(TEXT_UNAVAILABLE.to_string())
        );

        let effects = update(&mut state, Message::LoadCatalog);
        let [Effect::FetchCatalog(token)] = effects[..] else {
            panic!("expected catalog fetch");
        };
        update(
            &mut state,
            Message::CatalogLoaded {
                token,
                result: Err(ClientError::MalformedResponse("x".to_string())),
            },
        );
        assert_eq!(
            state.catalog,
            LoadState::Failed(CATALOG_UNAVAILABLE.to_string())
        );
        assert!(state.reader.text.is_failed());
    }

    #[test]
    fn chapter_navigation_wraps() {
        let mut state = state();
        update(&mut state, Message::PreviousChapter);
        assert_eq!(state.reader.ordinal, Some(ordinal(114)));
        update(&mut state, Message::NextChapter);
        assert_eq!(state.reader.ordinal, Some(ordinal(1)));
        update(&mut state, Message::NextChapter);
        assert_eq!(state.reader.ordinal, Some(ordinal(2)));
    }

    #[test]
    fn verse_selection_is_clamped() {
        let mut state = state();
        update(&mut state, Message::GoToVerse(3));
        assert_eq!(state.reader.highlighted, None);

        let token = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(112))));
        update(
            &mut state,
            Message::ChapterLoaded {
                token,
                result: Ok(payload(ordinal(112), &["a", "b", "c", "d"])),
            },
        );
        update(&mut state, Message::GoToVerse(2));
        assert_eq!(state.reader.highlighted, Some(1));
        update(&mut state, Message::SelectVerse(99));
        assert_eq!(state.reader.highlighted, Some(3));
        update(&mut state, Message::GoToVerse(0));
        assert_eq!(state.reader.highlighted, Some(3));
        assert!(state.status.is_some());
    }

    #[test]
    fn toggles_persist_and_exclude_each_other() {
        let mut state = state();
        let effects = update(&mut state, Message::Playback(PlaybackMessage::ToggleRepeat));
        assert_eq!(effects, vec![Effect::SaveSettings]);
        assert!(state.settings.playback.repeat_chapter);

        update(&mut state, Message::Playback(PlaybackMessage::ToggleAutoNext));
        assert!(state.settings.playback.auto_next_chapter);
        assert!(!state.settings.playback.repeat_chapter);
        assert!(!state.player.repeat_chapter());

        let effects = update(&mut state, Message::ToggleTranslation);
        assert_eq!(effects, vec![Effect::SaveSettings]);
        assert!(!state.show_translation());
    }

    #[test]
    fn ended_with_auto_next_plays_next_chapter_only() {
        let mut state = state();
        with_roster(&mut state, vec![reciter(7, "https://s.test/r/")]);
        assert_eq!(
            update(&mut state, Message::SelectReciter(ReciterId(7))),
            vec![Effect::SaveSettings]
        );
        assert_eq!(state.settings.playback.last_reciter, Some(ReciterId(7)));

        update(&mut state, Message::SelectChapter(ordinal(114)));
        update(&mut state, Message::Playback(PlaybackMessage::Play));
        assert_eq!(
            state.player.now_playing().map(|p| p.url.as_str()),
            Some("https://s.test/r/114.mp3")
        );

        let token = state.player.now_playing().map(|p| p.token).unwrap();

        update(&mut state, Message::Playback(PlaybackMessage::ToggleAutoNext));
        let effects = update(&mut state, Message::Playback(PlaybackMessage::Ended(token)));
        assert!(effects.is_empty());
        assert_eq!(
            state.player.now_playing().map(|p| p.url.as_str()),
            Some("https://s.test/r/001.mp3")
        );
        assert_eq!(state.reader.ordinal, Some(ordinal(114)));

        // The end of the chapter 114 source is stale now.
        update(&mut state, Message::Playback(PlaybackMessage::Ended(token)));
        assert_eq!(
            state.player.now_playing().map(|p| p.url.as_str()),
            Some("https://s.test/r/001.mp3")
        );
    }

    fn with_roster(state: &mut AppState, reciters: Vec<mushaf_model::Reciter>) {
        let effects = update(state, Message::LoadRoster);
        let [Effect::FetchRoster(token)] = effects[..] else {
            panic!("expected roster fetch");
        };
        update(
            state,
            Message::RosterLoaded {
                token,
                result: Ok(reciters),
            },
        );
    }

    #[test]
    fn jump_selects_first_name_match() {
        let mut state = state();
        let mut basit = reciter(2, "https://s.test/b/");
        basit.name = "عبد الباسط عبد الصمد".to_string();
        let mut minshawi = reciter(3, "https://s.test/m/");
        minshawi.name = "محمد صديق المنشاوي".to_string();
        with_roster(&mut state, vec![basit, minshawi]);

        let effects = update(&mut state, Message::JumpToReciter("المنشاوي".to_string()));
        assert_eq!(effects, vec![Effect::SaveSettings]);
        assert_eq!(state.selected_reciter, Some(ReciterId(3)));

        assert!(update(&mut state, Message::JumpToReciter("الحصري".to_string())).is_empty());
        assert_eq!(state.selected_reciter, Some(ReciterId(3)));
        assert!(state.status.as_deref().unwrap().contains("الحصري"));
    }

    #[test]
    fn retryable_failure_adds_hint() {
        let mut state = state();
        let token = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(5))));
        update(
            &mut state,
            Message::ChapterLoaded {
                token,
                result: Err(ClientError::Network("reset".to_string())),
            },
        );
        assert!(state.status.take().unwrap().ends_with("Try again."));

        let token = fetched_token(&update(&mut state, Message::SelectChapter(ordinal(5))));
        update(
            &mut state,
            Message::ChapterLoaded {
                token,
                result: Err(ClientError::MalformedResponse("x".to_string())),
            },
        );
        assert_eq!(state.status, None);
        assert!(state.reader.text.is_failed());
    }

    #[test]
    fn rate_is_clamped_and_saved() {
        let mut state = state();
        let effects = update(&mut state, Message::Playback(PlaybackMessage::SetRate(9.0)));
        assert_eq!(effects, vec![Effect::SaveSettings]);
        assert_eq!(state.settings.playback.rate, 4.0);
        assert_eq!(state.player.rate(), 4.0);
    }

    #[test]
    fn play_refuses_uncovered_chapter() {
        let mut state = state();
        let mut partial = reciter(9, "https://s.test/p/");
        partial.moshaf[0].surah_list = vec![1];
        with_roster(&mut state, vec![partial]);
        update(&mut state, Message::SelectReciter(ReciterId(9)));
        update(&mut state, Message::SelectChapter(ordinal(2)));

        update(&mut state, Message::Playback(PlaybackMessage::Play));
        assert!(state.player.now_playing().is_none());
        assert_eq!(
            state.status.as_deref(),
            Some("This reciter has not recorded this chapter.")
        );
    }

    #[test]
    fn play_without_reciter_reports_status() {
        let mut state = state();
        update(&mut state, Message::SelectChapter(ordinal(1)));
        update(&mut state, Message::Playback(PlaybackMessage::Play));
        assert_eq!(state.status.as_deref(), Some("Select a reciter first."));
        assert!(state.player.now_playing().is_none());
    }

    #[test]
    fn unknown_reciter_is_not_selected() {
        let mut state = state();
        assert!(update(&mut state, Message::SelectReciter(ReciterId(1))).is_empty());
        assert_eq!(state.selected_reciter, None);
    }
}
