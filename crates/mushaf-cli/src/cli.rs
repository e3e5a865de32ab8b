//! CLI argument definitions for the reader.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mushaf_model::ChapterOrdinal;
use mushaf_normalization::BasmalaPolicy;

#[derive(Parser)]
#[command(
    name = "mushaf",
    version,
    about = "Read the Quran and listen to recitations from the terminal",
    long_about = "Read the Quran chapter by chapter with an optional translation,\n\
                  browse the reciter roster and play or download recitations."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the chapter index.
    Chapters(ChaptersArgs),

    /// Print one chapter.
    Read(ReadArgs),

    /// Interactive reader.
    Browse,

    /// List reciters.
    Reciters(RecitersArgs),

    /// Print the recitation URL of a chapter.
    AudioUrl(AudioArgs),

    /// Open a chapter recitation in the system player.
    Play(AudioArgs),

    /// Save a chapter recitation to disk.
    Download(DownloadArgs),

    /// Show or change stored preferences.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Parser)]
pub struct ChaptersArgs {
    /// Only chapters whose names or number match.
    #[arg(long = "filter", short = 'f', value_name = "QUERY")]
    pub filter: Option<String>,
}

#[derive(Parser)]
pub struct ReadArgs {
    /// Chapter number (1-114).
    #[arg(value_name = "CHAPTER")]
    pub chapter: ChapterOrdinal,

    /// Show the translation under each verse.
    #[arg(long = "translation", short = 't')]
    pub translation: bool,

    /// Hide the translation even if enabled in settings.
    #[arg(long = "no-translation", conflicts_with = "translation")]
    pub no_translation: bool,

    /// Opening formula handling for this run (defaults to the stored setting).
    #[arg(long = "policy", value_enum)]
    pub policy: Option<PolicyArg>,

    /// Highlight this verse number.
    #[arg(long = "verse", value_name = "N")]
    pub verse: Option<usize>,
}

#[derive(Parser)]
pub struct RecitersArgs {
    /// Case and diacritic insensitive search over names and rewaya.
    #[arg(long = "search", short = 's', value_name = "QUERY")]
    pub search: Option<String>,

    /// Only the featured reciters.
    #[arg(long = "featured", conflicts_with = "search")]
    pub featured: bool,
}

#[derive(Parser)]
pub struct AudioArgs {
    /// Roster id of the reciter.
    #[arg(value_name = "RECITER_ID")]
    pub reciter: u32,

    /// Chapter number (1-114).
    #[arg(value_name = "CHAPTER")]
    pub chapter: ChapterOrdinal,
}

#[derive(Parser)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub audio: AudioArgs,

    /// Directory to save into (default: current directory).
    #[arg(long = "output-dir", short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings as TOML.
    Show,
    /// Print the settings file location.
    Path,
    /// Repeat the chapter when it ends (clears auto-next when enabled).
    SetRepeat {
        #[arg(action = clap::ArgAction::Set, value_name = "BOOL")]
        enabled: bool,
    },
    /// Continue with the next chapter when one ends (clears repeat when enabled).
    SetAutoNext {
        #[arg(action = clap::ArgAction::Set, value_name = "BOOL")]
        enabled: bool,
    },
    /// Store the playback rate (clamped to 0.25-4).
    SetRate {
        #[arg(value_name = "RATE", value_parser = parse_rate)]
        rate: f32,
    },
    /// Store the opening formula handling.
    SetPolicy {
        #[arg(value_enum)]
        policy: PolicyArg,
    },
    /// Restore defaults.
    Reset,
}

fn parse_rate(value: &str) -> Result<f32, String> {
    let rate: f32 = value
        .parse()
        .map_err(|_| format!("expected a number, got \"{value}\""))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err("the rate must be a positive number".to_string())
    }
}

/// Opening formula handling choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    /// Keep the formula as verse 1 of the first chapter.
    PreserveOpening,
    /// Move the formula of every eligible chapter to its own line.
    StripEverywhere,
}

impl From<PolicyArg> for BasmalaPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::PreserveOpening => Self::PreserveOpening,
            PolicyArg::StripEverywhere => Self::StripEverywhere,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
