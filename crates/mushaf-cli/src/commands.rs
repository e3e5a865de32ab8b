use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use mushaf_cli::browse;
use mushaf_cli::message::Message;
use mushaf_cli::playback::{AudioTransport, PlaybackController, SystemPlayer};
use mushaf_cli::render::{
    RECITERS_UNAVAILABLE, index_panel, reader_panel, reciter_table, reciters_panel,
};
use mushaf_cli::runtime::Runtime;
use mushaf_cli::settings::Settings;
use mushaf_cli::state::AppState;
use mushaf_client::{MushafClient, format_bytes};
use mushaf_model::{Reciter, ReciterId};
use mushaf_normalization::{audio_url, download_file_name, featured};

use crate::cli::{
    AudioArgs, ChaptersArgs, DownloadArgs, ReadArgs, RecitersArgs, SettingsCommand,
};

fn client(settings: &Settings) -> Result<MushafClient> {
    MushafClient::new(settings.endpoints.clone(), settings.editions()).context("create HTTP client")
}

fn session(settings: Settings, settings_path: Option<PathBuf>) -> Result<(AppState, Runtime)> {
    let client = client(&settings)?;
    let state = AppState::new(settings, Box::new(SystemPlayer::new()));
    Ok((state, Runtime::new(client, settings_path)))
}

pub async fn run_chapters(args: &ChaptersArgs, settings: Settings) -> Result<()> {
    let (mut state, mut runtime) = session(settings, None)?;
    let _ = runtime.dispatch(&mut state, Message::LoadCatalog);
    if let Some(filter) = &args.filter {
        let _ = runtime.dispatch(&mut state, Message::FilterChapters(filter.clone()));
    }
    runtime.settle(&mut state).await;

    println!("{}", index_panel(&state));
    if state.catalog.is_failed() {
        bail!("the chapter index could not be loaded");
    }
    Ok(())
}

pub async fn run_read(args: &ReadArgs, settings: Settings) -> Result<()> {
    let (mut state, mut runtime) = session(settings, None)?;
    if let Some(policy) = args.policy {
        state.set_policy(policy.into());
    }
    if args.translation {
        state.settings.reader.show_translation = true;
    } else if args.no_translation {
        state.settings.reader.show_translation = false;
    }

    let _ = runtime.dispatch(&mut state, Message::LoadCatalog);
    let _ = runtime.dispatch(&mut state, Message::SelectChapter(args.chapter));
    runtime.settle(&mut state).await;
    if let Some(number) = args.verse {
        let _ = runtime.dispatch(&mut state, Message::GoToVerse(number));
    }

    println!("{}", reader_panel(&state));
    if let Some(status) = state.status.take() {
        eprintln!("{status}");
    }
    if state.reader.text.is_failed() {
        bail!("chapter {} could not be loaded", args.chapter);
    }
    Ok(())
}

pub async fn run_browse(settings: Settings, settings_path: PathBuf) -> Result<()> {
    let (mut state, mut runtime) = session(settings, Some(settings_path))?;
    browse::run(&mut state, &mut runtime)
        .await
        .context("read from stdin")
}

pub async fn run_reciters(args: &RecitersArgs, settings: Settings) -> Result<()> {
    let (mut state, mut runtime) = session(settings, None)?;
    let _ = runtime.dispatch(&mut state, Message::LoadRoster);
    if let Some(query) = &args.search {
        let _ = runtime.dispatch(&mut state, Message::SearchReciters(query.clone()));
    }
    runtime.settle(&mut state).await;

    if state.roster.is_failed() {
        println!("{}", reciters_panel(&state));
        bail!("the reciter roster could not be loaded");
    }
    if args.featured {
        let reciters = state.roster.displayed().map(Vec::as_slice).unwrap_or_default();
        let picked = featured(
            reciters,
            &state.settings.reciters.featured_ids,
            state.settings.reciters.featured_fallback_count,
        );
        println!("{}", reciter_table(&picked, state.selected_reciter));
    } else {
        println!("{}", reciters_panel(&state));
    }
    Ok(())
}

async fn find_reciter(client: &MushafClient, id: ReciterId) -> Result<Reciter> {
    let roster = client
        .fetch_reciter_roster()
        .await
        .context(RECITERS_UNAVAILABLE)?;
    roster
        .into_iter()
        .find(|reciter| reciter.id == id)
        .ok_or_else(|| anyhow!("no reciter with id {id}"))
}

async fn resolve_audio(args: &AudioArgs, client: &MushafClient) -> Result<(Reciter, String)> {
    let reciter = find_reciter(client, ReciterId(args.reciter)).await?;
    if reciter
        .primary_moshaf()
        .is_some_and(|moshaf| !moshaf.covers(args.chapter))
    {
        bail!(
            "reciter {} has no recording of chapter {}",
            reciter.id,
            args.chapter
        );
    }
    let url = audio_url(&reciter, args.chapter)
        .ok_or_else(|| anyhow!("reciter {} has no audio server", reciter.id))?;
    Ok((reciter, url))
}

pub async fn run_audio_url(args: &AudioArgs, settings: &Settings) -> Result<()> {
    let client = client(settings)?;
    let (_, url) = resolve_audio(args, &client).await?;
    println!("{url}");
    Ok(())
}

pub async fn run_play(args: &AudioArgs, settings: &Settings) -> Result<()> {
    let client = client(settings)?;
    let reciter = find_reciter(&client, ReciterId(args.reciter)).await?;

    let mut player = PlaybackController::new(SystemPlayer::new());
    player.set_rate(settings.playback.rate);
    player.play_chapter(&reciter, args.chapter)?;

    let url = player
        .now_playing()
        .map(|playing| playing.url.clone())
        .unwrap_or_default();
    if player.transport().is_paused() {
        println!("Could not start the system player. Open this URL manually:");
        println!("{url}");
    } else {
        println!("{} - chapter {}", reciter.name, args.chapter);
        println!("{url}");
    }
    Ok(())
}

pub async fn run_download(args: &DownloadArgs, settings: &Settings) -> Result<()> {
    let client = client(settings)?;
    let (reciter, url) = resolve_audio(&args.audio, &client).await?;
    let directory = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let destination = directory.join(download_file_name(&reciter, args.audio.chapter));

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
        )?
        .progress_chars("=> "),
    );
    let written = client
        .download_to(&url, &destination, |progress| {
            if progress.total > 0 {
                bar.set_length(progress.total);
            }
            bar.set_position(progress.downloaded);
        })
        .await
        .with_context(|| format!("download {url}"))?;
    bar.finish_and_clear();

    info!(path = %destination.display(), bytes = written, "recitation saved");
    println!("Saved {} ({})", destination.display(), format_bytes(written));
    Ok(())
}

pub fn run_settings(command: &SettingsCommand, mut settings: Settings, path: &Path) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            let content = toml::to_string_pretty(&settings).context("serialize settings")?;
            print!("{content}");
            return Ok(());
        }
        SettingsCommand::Path => {
            println!("{}", path.display());
            return Ok(());
        }
        SettingsCommand::SetRepeat { enabled } => {
            settings.playback.set_repeat_chapter(*enabled);
        }
        SettingsCommand::SetAutoNext { enabled } => {
            settings.playback.set_auto_next_chapter(*enabled);
        }
        SettingsCommand::SetRate { rate } => settings.playback.set_rate(*rate),
        SettingsCommand::SetPolicy { policy } => {
            settings.reader.basmala_policy = (*policy).into();
        }
        SettingsCommand::Reset => settings = Settings::default(),
    }
    settings.save_to(path).context("save settings")?;
    println!(
        "repeat chapter: {}, auto next chapter: {}, rate: {}, opening formula: {}",
        settings.playback.repeat_chapter,
        settings.playback.auto_next_chapter,
        settings.playback.rate,
        settings.reader.basmala_policy
    );
    Ok(())
}
