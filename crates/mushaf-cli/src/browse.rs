//! Interactive reader over stdin.

use std::ops::ControlFlow;

use mushaf_model::{ChapterOrdinal, ReciterId};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::message::{Message, PlaybackMessage, View};
use crate::render;
use crate::runtime::Runtime;
use crate::state::AppState;

pub const HELP: &str = "\
c <n>      open chapter n
n, p       next / previous chapter
v <n>      highlight verse n
t          toggle translation
l [query]  chapter index, optionally filtered
r [query]  reciters, optionally filtered
s <id>     select reciter
j <name>   select the first reciter whose name matches
play       play the open chapter
pause      pause or resume
seek <p>   seek to p percent
rate <r>   set the playback rate
repeat     toggle repeat chapter
auto       toggle auto next chapter
ended      the recitation finished
h          this help
q          quit";

/// One line of user input.
#[derive(Debug)]
pub enum Input {
    Message(Message),
    /// The current recitation finished.
    Ended,
    Help,
    Empty,
}

/// Parse one command line.
pub fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    let (command, argument) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };
    let message = match command {
        "" => return Ok(Input::Empty),
        "h" | "help" | "?" => return Ok(Input::Help),
        "q" | "quit" | "exit" => Message::Quit,
        "c" | "chapter" => Message::SelectChapter(
            argument
                .parse::<ChapterOrdinal>()
                .map_err(|e| e.to_string())?,
        ),
        "n" | "next" => Message::NextChapter,
        "p" | "prev" => Message::PreviousChapter,
        "v" | "verse" => Message::GoToVerse(number(argument)?),
        "t" | "translation" => Message::ToggleTranslation,
        "l" | "list" => Message::FilterChapters(argument.to_string()),
        "r" | "reciters" => Message::SearchReciters(argument.to_string()),
        "s" | "select" => Message::SelectReciter(ReciterId(number(argument)?)),
        "j" | "jump" if !argument.is_empty() => Message::JumpToReciter(argument.to_string()),
        "j" | "jump" => return Err("expected part of a reciter name".to_string()),
        "play" => Message::Playback(PlaybackMessage::Play),
        "pause" => Message::Playback(PlaybackMessage::Toggle),
        "seek" => Message::Playback(PlaybackMessage::SeekPercent(
            argument
                .parse()
                .map_err(|_| format!("expected a percentage, got \"{argument}\""))?,
        )),
        "rate" => Message::Playback(PlaybackMessage::SetRate(number(argument)?)),
        "repeat" => Message::Playback(PlaybackMessage::ToggleRepeat),
        "auto" => Message::Playback(PlaybackMessage::ToggleAutoNext),
        "ended" => return Ok(Input::Ended),
        other => return Err(format!("unknown command \"{other}\", type h for help")),
    };
    Ok(Input::Message(message))
}

fn number<T: std::str::FromStr>(argument: &str) -> Result<T, String> {
    argument
        .parse()
        .map_err(|_| format!("expected a number, got \"{argument}\""))
}

fn redraw(state: &mut AppState, view: View) {
    let panel = match view {
        View::Index => render::index_panel(state),
        View::Reader => render::reader_panel(state),
        View::Reciters => render::reciters_panel(state),
        View::Player => render::player_line(state),
        View::None => String::new(),
    };
    if !panel.is_empty() {
        println!("{panel}");
    }
    if let Some(status) = state.status.take() {
        println!("{status}");
    }
}

fn apply(state: &mut AppState, runtime: &mut Runtime, message: Message) -> ControlFlow<()> {
    let view = message.view();
    runtime.dispatch(state, message)?;
    redraw(state, view);
    ControlFlow::Continue(())
}

/// Run the reader until `q` or end of input.
pub async fn run(state: &mut AppState, runtime: &mut Runtime) -> std::io::Result<()> {
    println!("{HELP}");
    let _ = runtime.dispatch(state, Message::LoadCatalog);
    let _ = runtime.dispatch(state, Message::LoadRoster);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_input(&line) {
                    Ok(Input::Message(message)) => {
                        if apply(state, runtime, message).is_break() {
                            break;
                        }
                    }
                    Ok(Input::Ended) => match state.player.now_playing().map(|p| p.token) {
                        Some(token) => {
                            let ended = Message::Playback(PlaybackMessage::Ended(token));
                            if apply(state, runtime, ended).is_break() {
                                break;
                            }
                        }
                        None => println!("Nothing is playing."),
                    },
                    Ok(Input::Help) => println!("{HELP}"),
                    Ok(Input::Empty) => {}
                    Err(error) => println!("{error}"),
                }
            }
            Some(message) = runtime.next_result() => {
                if apply(state, runtime, message).is_break() {
                    break;
                }
            }
        }
    }
    Ok(())
}
