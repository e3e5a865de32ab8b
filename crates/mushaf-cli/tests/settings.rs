//! Settings persistence.

use mushaf_cli::settings::{DEFAULT_FEATURED_IDS, Settings};
use mushaf_model::ReciterId;
use mushaf_normalization::BasmalaPolicy;

#[test]
fn round_trip_through_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");

    let mut settings = Settings::default();
    settings.reader.basmala_policy = BasmalaPolicy::StripEverywhere;
    settings.reader.show_translation = false;
    settings.playback.set_auto_next_chapter(true);
    settings.playback.last_reciter = Some(ReciterId(123));
    settings.reciters.featured_ids = vec![ReciterId(5), ReciterId(4)];
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path);
    assert_eq!(loaded, settings);

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("basmala_policy = \"strip_everywhere\""));
    assert!(content.contains("[playback]"));
}

#[test]
fn missing_or_invalid_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.toml");
    assert_eq!(Settings::load_from(&missing), Settings::default());

    let invalid = dir.path().join("invalid.toml");
    std::fs::write(&invalid, "reader = [1, 2").unwrap();
    assert_eq!(Settings::load_from(&invalid), Settings::default());
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[playback]\nrepeat_chapter = true\n").unwrap();

    let settings = Settings::load_from(&path);
    assert!(settings.playback.repeat_chapter);
    assert_eq!(settings.playback.rate, 1.0);
    assert!(settings.reader.show_translation);
    assert_eq!(
        settings.reciters.featured_ids,
        DEFAULT_FEATURED_IDS.map(ReciterId).to_vec()
    );
    assert_eq!(settings.endpoints.language, "ar");
}

#[test]
fn legacy_conflicting_toggles_are_migrated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[playback]\nrepeat_chapter = true\nauto_next_chapter = true\n",
    )
    .unwrap();

    let mut settings = Settings::load_from(&path);
    assert!(settings.migrate());
    assert!(settings.playback.repeat_chapter);
    assert!(!settings.playback.auto_next_chapter);
}
