//! Rendering of reader panels.

use mushaf_cli::playback::SystemPlayer;
use mushaf_cli::render::{
    CATALOG_UNAVAILABLE, RECITERS_UNAVAILABLE, TEXT_UNAVAILABLE, chapter_text, index_panel,
    player_line, reader_panel, reciters_panel,
};
use mushaf_cli::settings::Settings;
use mushaf_cli::state::{AppState, LoadState};
use mushaf_model::{Chapter, ChapterOrdinal, RevelationType};
use mushaf_normalization::VerseNormalizer;

const IKHLAS: [&str; 2] = [
    "بِسْمِ ٱللَّهِ ٱلرَّحْمَٰنِ ٱلرَّحِيمِ قُلْ هُوَ ٱللَّهُ أَحَدٌ",
    "ٱللَّهُ ٱلصَّمَدُ",
];

const IKHLAS_TRANSLATION: [&str; 2] = ["Say, He is God, the One.", "God, the Eternal Refuge."];

fn ordinal(value: u16) -> ChapterOrdinal {
    ChapterOrdinal::new(value).expect("valid ordinal")
}

fn state() -> AppState {
    AppState::new(Settings::default(), Box::new(SystemPlayer::new()))
}

#[test]
fn verses_with_translation_and_highlight() {
    let text = VerseNormalizer::default().normalize_with_translations(
        ordinal(112),
        &IKHLAS,
        Some(&IKHLAS_TRANSLATION[..]),
    );
    insta::assert_snapshot!(chapter_text(&text, true, Some(1)), @r"
    بِسْمِ ٱللَّٰهِ ٱلرَّحْمَـٰنِ ٱلرَّحِيمِ
    1. قُلْ هُوَ ٱللَّهُ أَحَدٌ
       Say, He is God, the One.
    2. ٱللَّهُ ٱلصَّمَدُ ◀
       God, the Eternal Refuge.
    ");
}

#[test]
fn translation_hidden() {
    let text = VerseNormalizer::default().normalize_with_translations(
        ordinal(112),
        &IKHLAS,
        Some(&IKHLAS_TRANSLATION[..]),
    );
    let rendered = chapter_text(&text, false, None);
    assert!(!rendered.contains("Say, He is God"));
    assert_eq!(rendered.lines().count(), 3);
}

#[test]
fn failed_panels_show_placeholders_independently() {
    let mut state = state();
    state.catalog = LoadState::Failed(CATALOG_UNAVAILABLE.to_string());
    state.roster = LoadState::Failed(RECITERS_UNAVAILABLE.to_string());
    state.reader.ordinal = Some(ordinal(2));
    state.reader.text = LoadState::Failed(TEXT_UNAVAILABLE.to_string());

    assert_eq!(index_panel(&state), CATALOG_UNAVAILABLE);
    assert_eq!(reciters_panel(&state), RECITERS_UNAVAILABLE);
    assert_eq!(
        reader_panel(&state),
        format!("Chapter 2\n\n{TEXT_UNAVAILABLE}")
    );
}

#[test]
fn reader_heading_uses_catalog_names() {
    let mut state = state();
    state.catalog = LoadState::Displayed(vec![Chapter {
        ordinal: ordinal(112),
        primary_name: "سُورَةُ الإِخۡلَاصِ".to_string(),
        secondary_name: "Al-Ikhlaas".to_string(),
        translated_name: Some("Sincerity".to_string()),
        verse_count: 4,
        revelation_type: RevelationType::Meccan,
    }]);
    state.reader.ordinal = Some(ordinal(112));
    state.reader.text = LoadState::Displayed(VerseNormalizer::default().normalize(ordinal(112), &IKHLAS));

    let rendered = reader_panel(&state);
    let heading = rendered.lines().next().expect("heading");
    assert!(heading.contains("Al-Ikhlaas"));
    assert!(heading.contains("4 verses"));

    let index = index_panel(&state);
    assert!(index.contains("Al-Ikhlaas"));
    assert!(index.contains("Sincerity"));

    state.chapter_filter = "baqara".to_string();
    assert_eq!(index_panel(&state), "No chapter matches \"baqara\".");
}

#[test]
fn idle_player_line() {
    let state = state();
    assert_eq!(player_line(&state), "nothing playing · stop at end");
}
