//! Terminal rendering of the reader panels.
//!
//! Each panel renders independently; a failed request only replaces its own
//! panel with a placeholder.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mushaf_model::{Chapter, ChapterText, Reciter, ReciterId};

use crate::state::{AppState, LoadState};

/// Shown in place of the chapter index when the catalog could not be loaded.
pub const CATALOG_UNAVAILABLE: &str = "تعذر تحميل الفهرس";
/// Shown in place of the verses when the chapter text could not be loaded.
pub const TEXT_UNAVAILABLE: &str = "تعذر تحميل بيانات المصحف";
/// Shown in place of the reciter grid when the roster could not be loaded.
pub const RECITERS_UNAVAILABLE: &str = "تعذر تحميل القراء";

const HIGHLIGHT_MARK: &str = "◀";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn chapter_table(chapters: &[&Chapter]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Name"),
        header_cell("Transliteration"),
        header_cell("Translation"),
        header_cell("Verses"),
        header_cell("Revelation"),
    ]);
    apply_table_style(&mut table);
    for chapter in chapters {
        table.add_row(vec![
            Cell::new(chapter.ordinal),
            Cell::new(&chapter.primary_name),
            Cell::new(&chapter.secondary_name),
            match &chapter.translated_name {
                Some(name) => Cell::new(name),
                None => dim_cell("-"),
            },
            Cell::new(chapter.verse_count),
            dim_cell(chapter.revelation_type.label()),
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    table
}

pub fn reciter_table(reciters: &[&Reciter], selected: Option<ReciterId>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("ID"),
        header_cell("Name"),
        header_cell("Rewaya"),
        header_cell("Sets"),
    ]);
    apply_table_style(&mut table);
    for reciter in reciters {
        let name = if Some(reciter.id) == selected {
            Cell::new(format!("{} {HIGHLIGHT_MARK}", reciter.name)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&reciter.name)
        };
        table.add_row(vec![
            Cell::new(reciter.id),
            name,
            match &reciter.bio {
                Some(bio) => Cell::new(bio),
                None => dim_cell("-"),
            },
            if reciter.audio_server().is_some() {
                Cell::new(reciter.moshaf.len())
            } else {
                dim_cell("no audio")
            },
        ]);
    }
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table
}

/// Verses with the optional standalone formula line.
///
/// Translations are shown indented under their verse when requested.
pub fn chapter_text(text: &ChapterText, show_translation: bool, highlighted: Option<usize>) -> String {
    let mut lines = Vec::with_capacity(text.len() * 2 + 1);
    if let Some(formula) = &text.formula_line {
        lines.push(formula.clone());
    }
    for verse in &text.verses {
        let mut line = format!("{}. {}", verse.display_number(), verse.text);
        if highlighted == Some(verse.display_index) {
            line.push(' ');
            line.push_str(HIGHLIGHT_MARK);
        }
        lines.push(line);
        if show_translation && let Some(translation) = &verse.translation {
            lines.push(format!("   {translation}"));
        }
    }
    lines.join("\n")
}

fn panel<T>(load: &LoadState<T>, loading: &str, shown: impl FnOnce(&T) -> String) -> String {
    match load {
        LoadState::Idle => String::new(),
        LoadState::Loading(_) => loading.to_string(),
        LoadState::Failed(placeholder) => placeholder.clone(),
        LoadState::Displayed(value) => shown(value),
    }
}

pub fn index_panel(state: &AppState) -> String {
    panel(&state.catalog, "Loading chapter index...", |_| {
        let chapters = state.visible_chapters();
        if chapters.is_empty() {
            format!("No chapter matches \"{}\".", state.chapter_filter)
        } else {
            chapter_table(&chapters).to_string()
        }
    })
}

/// Heading for the open chapter, using catalog names when available.
pub fn chapter_heading(state: &AppState) -> Option<String> {
    let ordinal = state.reader.ordinal?;
    Some(match state.chapter(ordinal) {
        Some(chapter) => format!(
            "{} ({} verses, {})",
            chapter.label(),
            chapter.verse_count,
            chapter.revelation_type.label()
        ),
        None => format!("Chapter {ordinal}"),
    })
}

pub fn reader_panel(state: &AppState) -> String {
    let body = panel(&state.reader.text, "Loading chapter...", |text| {
        chapter_text(text, state.show_translation(), state.reader.highlighted)
    });
    match chapter_heading(state) {
        Some(heading) if !body.is_empty() => format!("{heading}\n\n{body}"),
        _ => body,
    }
}

pub fn reciters_panel(state: &AppState) -> String {
    panel(&state.roster, "Loading reciters...", |_| {
        let reciters = state.visible_reciters();
        if reciters.is_empty() {
            format!("No reciter matches \"{}\".", state.reciter_query)
        } else {
            reciter_table(&reciters, state.selected_reciter).to_string()
        }
    })
}

/// One status line: source, time, rate and the end-of-chapter preference.
pub fn player_line(state: &AppState) -> String {
    let player = &state.player;
    let mode = if player.repeat_chapter() {
        "repeat"
    } else if player.auto_next_chapter() {
        "auto-next"
    } else {
        "stop at end"
    };
    match player.now_playing() {
        Some(playing) => format!(
            "reciter {} · surah {} · {} · {:.0}% · {}x · {mode}",
            playing.reciter,
            playing.ordinal.padded(),
            player.time_label(),
            player.progress_percent(),
            player.rate()
        ),
        None => format!("nothing playing · {mode}"),
    }
}
