//! Mushaf reader CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use mushaf_cli::logging::{LogConfig, LogFormat, init_logging};
use mushaf_cli::settings::Settings;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    run_audio_url, run_browse, run_chapters, run_download, run_play, run_read, run_reciters,
    run_settings,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let settings = Settings::load();
    let settings_path = Settings::config_path();
    let result = match &cli.command {
        Command::Chapters(args) => run_chapters(args, settings).await,
        Command::Read(args) => run_read(args, settings).await,
        Command::Browse => run_browse(settings, settings_path).await,
        Command::Reciters(args) => run_reciters(args, settings).await,
        Command::AudioUrl(args) => run_audio_url(args, &settings).await,
        Command::Play(args) => run_play(args, &settings).await,
        Command::Download(args) => run_download(args, &settings).await,
        Command::Settings(command) => run_settings(command, settings, &settings_path),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
