//! Audio file naming for chapter recitations.

use mushaf_model::{ChapterOrdinal, Reciter};

/// `server + zero-padded ordinal + ".mp3"`, or `None` when the reciter has
/// no registered audio server.
pub fn audio_url(reciter: &Reciter, ordinal: ChapterOrdinal) -> Option<String> {
    reciter
        .audio_server()
        .map(|server| format!("{server}{}.mp3", ordinal.padded()))
}

/// Suggested file name for a downloaded recitation.
pub fn download_file_name(reciter: &Reciter, ordinal: ChapterOrdinal) -> String {
    let name: String = reciter
        .name
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => ch,
        })
        .collect();
    let name = name.trim();
    let name = if name.is_empty() { "reciter" } else { name };
    format!("surah-{ordinal}-{name}.mp3")
}
