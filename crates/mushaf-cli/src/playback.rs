//! Chapter recitation playback.
//!
//! [`PlaybackController`] owns a single [`AudioTransport`] and tracks which
//! source is current. Every `play_chapter` issues a new [`SourceToken`];
//! anything still holding an older token is stale.

use std::fmt;

use mushaf_model::{ChapterOrdinal, Reciter, ReciterId};
use mushaf_normalization::audio_url;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The transport refused to start (autoplay policy, missing player, ...).
    #[error("playback was rejected: {0}")]
    Rejected(String),

    #[error("reciter {reciter} has no audio server")]
    NoAudioServer { reciter: ReciterId },

    #[error("reciter {reciter} has no recording of chapter {ordinal}")]
    NotRecorded {
        reciter: ReciterId,
        ordinal: ChapterOrdinal,
    },
}

impl PlaybackError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(_) => "The audio player could not start.",
            Self::NoAudioServer { .. } => "No recording is available for this reciter.",
            Self::NotRecorded { .. } => "This reciter has not recorded this chapter.",
        }
    }
}

/// The audio element contract.
///
/// Positions and durations are in seconds.
pub trait AudioTransport: fmt::Debug {
    fn load(&mut self, url: &str);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn set_rate(&mut self, rate: f32);
    fn position(&self) -> f64;
    /// `None` until the transport knows the length of the source.
    fn duration(&self) -> Option<f64>;
    fn seek(&mut self, seconds: f64);
}

impl<T: AudioTransport + ?Sized> AudioTransport for Box<T> {
    fn load(&mut self, url: &str) {
        (**self).load(url);
    }
    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause();
    }
    fn is_paused(&self) -> bool {
        (**self).is_paused()
    }
    fn set_rate(&mut self, rate: f32) {
        (**self).set_rate(rate);
    }
    fn position(&self) -> f64 {
        (**self).position()
    }
    fn duration(&self) -> Option<f64> {
        (**self).duration()
    }
    fn seek(&mut self, seconds: f64) {
        (**self).seek(seconds);
    }
}

/// Identifies one `play_chapter` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceToken(u64);

/// What to do after the current source finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndAction {
    /// The chapter was restarted.
    Repeat,
    /// Continue with this chapter.
    Advance(ChapterOrdinal),
    Stop,
}

/// The source currently loaded into the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub token: SourceToken,
    pub reciter: ReciterId,
    pub ordinal: ChapterOrdinal,
    pub url: String,
}

#[derive(Debug)]
pub struct PlaybackController<T> {
    transport: T,
    issued: u64,
    current: Option<NowPlaying>,
    repeat_chapter: bool,
    auto_next_chapter: bool,
    rate: f32,
}

impl<T: AudioTransport> PlaybackController<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            issued: 0,
            current: None,
            repeat_chapter: false,
            auto_next_chapter: false,
            rate: 1.0,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.current.as_ref()
    }

    pub fn repeat_chapter(&self) -> bool {
        self.repeat_chapter
    }

    pub fn auto_next_chapter(&self) -> bool {
        self.auto_next_chapter
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Enabling repeat clears auto-advance.
    pub fn set_repeat_chapter(&mut self, enabled: bool) {
        self.repeat_chapter = enabled;
        if enabled {
            self.auto_next_chapter = false;
        }
    }

    /// Enabling auto-advance clears repeat.
    pub fn set_auto_next_chapter(&mut self, enabled: bool) {
        self.auto_next_chapter = enabled;
        if enabled {
            self.repeat_chapter = false;
        }
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = rate;
        if self.current.is_some() {
            self.transport.set_rate(rate);
        }
    }

    /// Load and start the recitation of `ordinal` by `reciter`.
    ///
    /// A reciter without an audio server, or whose recording set lists its
    /// chapters without `ordinal`, leaves the transport untouched. A rejected
    /// start is logged and the source stays loaded, so a later
    /// [`toggle`](Self::toggle) can retry.
    pub fn play_chapter(
        &mut self,
        reciter: &Reciter,
        ordinal: ChapterOrdinal,
    ) -> Result<SourceToken, PlaybackError> {
        let url = audio_url(reciter, ordinal).ok_or(PlaybackError::NoAudioServer {
            reciter: reciter.id,
        })?;
        if reciter
            .primary_moshaf()
            .is_some_and(|moshaf| !moshaf.covers(ordinal))
        {
            return Err(PlaybackError::NotRecorded {
                reciter: reciter.id,
                ordinal,
            });
        }

        self.issued += 1;
        let token = SourceToken(self.issued);
        self.transport.load(&url);
        self.transport.set_rate(self.rate);
        self.current = Some(NowPlaying {
            token,
            reciter: reciter.id,
            ordinal,
            url,
        });
        self.start();
        Ok(token)
    }

    pub fn is_current(&self, token: SourceToken) -> bool {
        self.current
            .as_ref()
            .is_some_and(|playing| playing.token == token)
    }

    /// Play or pause; does nothing before the first source is loaded.
    pub fn toggle(&mut self) {
        if self.current.is_none() {
            return;
        }
        if self.transport.is_paused() {
            self.start();
        } else {
            self.transport.pause();
        }
    }

    /// Handle the end of the source identified by `token`.
    ///
    /// The end of a superseded source is ignored.
    pub fn on_ended(&mut self, token: SourceToken) -> EndAction {
        if !self.is_current(token) {
            debug!(?token, "ignoring end of a superseded source");
            return EndAction::Stop;
        }
        let Some(playing) = &self.current else {
            return EndAction::Stop;
        };
        if self.repeat_chapter {
            self.transport.seek(0.0);
            self.start();
            EndAction::Repeat
        } else if self.auto_next_chapter {
            EndAction::Advance(playing.ordinal.next_wrapping())
        } else {
            EndAction::Stop
        }
    }

    /// Seek to `percent` of the duration; ignored while it is unknown.
    pub fn seek_percent(&mut self, percent: f64) {
        let Some(duration) = self.known_duration() else {
            return;
        };
        if percent.is_nan() {
            return;
        }
        let percent = percent.clamp(0.0, 100.0);
        self.transport.seek(duration * percent / 100.0);
    }

    /// Position as a percentage of the duration, 0 while it is unknown.
    pub fn progress_percent(&self) -> f64 {
        match self.known_duration() {
            Some(duration) => (self.transport.position() / duration * 100.0).clamp(0.0, 100.0),
            None => 0.0,
        }
    }

    /// `m:ss / m:ss`.
    pub fn time_label(&self) -> String {
        let duration = self.transport.duration().unwrap_or(f64::NAN);
        format!(
            "{} / {}",
            format_clock(self.transport.position()),
            format_clock(duration)
        )
    }

    fn known_duration(&self) -> Option<f64> {
        self.transport
            .duration()
            .filter(|duration| duration.is_finite() && *duration > 0.0)
    }

    fn start(&mut self) {
        if let Err(error) = self.transport.play() {
            debug!(%error, "play request rejected");
        }
    }
}

/// `m:ss`; anything non-finite or negative renders as `0:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Hands the source URL to the operating system's default player.
///
/// The external player owns its own transport, so position and duration
/// are never known here.
#[derive(Debug, Default)]
pub struct SystemPlayer {
    url: Option<String>,
    launched: bool,
    paused: bool,
}

impl SystemPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioTransport for SystemPlayer {
    fn load(&mut self, url: &str) {
        self.url = Some(url.to_string());
        self.launched = false;
        self.paused = true;
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let Some(url) = &self.url else {
            return Err(PlaybackError::Rejected("no source loaded".to_string()));
        };
        if !self.launched {
            open::that_detached(url).map_err(|e| PlaybackError::Rejected(e.to_string()))?;
            self.launched = true;
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        debug!("pause is handled by the external player");
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_rate(&mut self, rate: f32) {
        debug!(rate, "rate is handled by the external player");
    }

    fn position(&self) -> f64 {
        0.0
    }

    fn duration(&self) -> Option<f64> {
        None
    }

    fn seek(&mut self, seconds: f64) {
        debug!(seconds, "seek is handled by the external player");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use mushaf_model::Moshaf;

    /// In-memory transport that records every call.
    #[derive(Debug, Default)]
    pub(crate) struct FakeTransport {
        pub calls: Vec<String>,
        pub paused: bool,
        pub position: f64,
        pub duration: Option<f64>,
        pub reject: bool,
    }

    impl FakeTransport {
        pub(crate) fn new() -> Self {
            Self {
                paused: true,
                ..Self::default()
            }
        }
    }

    impl AudioTransport for FakeTransport {
        fn load(&mut self, url: &str) {
            self.calls.push(format!("load {url}"));
            self.paused = true;
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            self.calls.push("play".to_string());
            if self.reject {
                return Err(PlaybackError::Rejected("autoplay blocked".to_string()));
            }
            self.paused = false;
            Ok(())
        }
        fn pause(&mut self) {
            self.calls.push("pause".to_string());
            self.paused = true;
        }
        fn is_paused(&self) -> bool {
            self.paused
        }
        fn set_rate(&mut self, rate: f32) {
            self.calls.push(format!("rate {rate}"));
        }
        fn position(&self) -> f64 {
            self.position
        }
        fn duration(&self) -> Option<f64> {
            self.duration
        }
        fn seek(&mut self, seconds: f64) {
            self.calls.push(format!("seek {seconds}"));
            self.position = seconds;
        }
    }

    pub(crate) fn reciter(id: u32, server: &str) -> Reciter {
        Reciter {
            id: ReciterId(id),
            name: format!("reciter {id}"),
            bio: None,
            moshaf: vec![Moshaf {
                id: 1,
                name: "murattal".to_string(),
                server: server.to_string(),
                surah_total: None,
                surah_list: Vec::new(),
            }],
        }
    }

    fn ordinal(value: u16) -> ChapterOrdinal {
        ChapterOrdinal::new(value).unwrap()
    }

    #[test]
    fn play_chapter_loads_derived_url() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        controller.set_rate(1.25);
        let token = controller
            .play_chapter(&reciter(7, "https://server.test/a/"), ordinal(2))
            .unwrap();
        assert!(controller.is_current(token));
        assert_eq!(
            controller.transport().calls,
            vec!["load https://server.test/a/002.mp3", "rate 1.25", "play"]
        );
        assert!(!controller.transport().is_paused());
    }

    #[test]
    fn missing_server_leaves_transport_untouched() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        let result = controller.play_chapter(&reciter(3, "  "), ordinal(1));
        assert_eq!(
            result,
            Err(PlaybackError::NoAudioServer {
                reciter: ReciterId(3)
            })
        );
        assert!(controller.transport().calls.is_empty());
        assert!(controller.now_playing().is_none());
    }

    #[test]
    fn newer_source_supersedes_older_token() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        let first = controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(1))
            .unwrap();
        let second = controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(2))
            .unwrap();
        assert!(!controller.is_current(first));
        assert!(controller.is_current(second));
        assert!(second > first);
    }

    #[test]
    fn rejection_is_swallowed_and_toggle_retries() {
        let mut transport = FakeTransport::new();
        transport.reject = true;
        let mut controller = PlaybackController::new(transport);
        let token = controller.play_chapter(&reciter(1, "https://s.test/"), ordinal(5));
        assert!(token.is_ok());
        assert!(controller.transport().is_paused());

        controller.toggle();
        assert_eq!(controller.transport().calls.last().unwrap(), "play");
    }

    #[test]
    fn toggle_without_source_is_noop() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        controller.toggle();
        assert!(controller.transport().calls.is_empty());
    }

    #[test]
    fn toggle_pauses_and_resumes() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(1))
            .unwrap();
        controller.toggle();
        assert!(controller.transport().is_paused());
        controller.toggle();
        assert!(!controller.transport().is_paused());
    }

    #[test]
    fn ended_follows_preferences() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        let token = controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(114))
            .unwrap();
        assert_eq!(controller.on_ended(token), EndAction::Stop);

        controller.set_auto_next_chapter(true);
        assert_eq!(controller.on_ended(token), EndAction::Advance(ordinal(1)));

        controller.set_repeat_chapter(true);
        assert!(!controller.auto_next_chapter());
        assert_eq!(controller.on_ended(token), EndAction::Repeat);
        let calls = &controller.transport().calls;
        assert_eq!(&calls[calls.len() - 2..], ["seek 0", "play"]);
    }

    #[test]
    fn end_of_superseded_source_is_ignored() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        controller.set_repeat_chapter(true);
        let first = controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(1))
            .unwrap();
        controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(2))
            .unwrap();
        let calls = controller.transport().calls.len();

        assert_eq!(controller.on_ended(first), EndAction::Stop);
        assert_eq!(controller.transport().calls.len(), calls);
    }

    #[test]
    fn uncovered_chapter_is_refused() {
        let mut partial = reciter(4, "https://s.test/p/");
        partial.moshaf[0].surah_list = vec![1, 114];
        let mut controller = PlaybackController::new(FakeTransport::new());

        assert_eq!(
            controller.play_chapter(&partial, ordinal(2)),
            Err(PlaybackError::NotRecorded {
                reciter: ReciterId(4),
                ordinal: ordinal(2)
            })
        );
        assert!(controller.transport().calls.is_empty());
        assert!(controller.play_chapter(&partial, ordinal(114)).is_ok());
    }

    #[test]
    fn seek_needs_known_duration() {
        let mut controller = PlaybackController::new(FakeTransport::new());
        controller
            .play_chapter(&reciter(1, "https://s.test/"), ordinal(1))
            .unwrap();
        controller.seek_percent(50.0);
        assert!(!controller.transport().calls.iter().any(|c| c.starts_with("seek")));

        let mut transport = FakeTransport::new();
        transport.duration = Some(200.0);
        let mut controller = PlaybackController::new(transport);
        controller.seek_percent(150.0);
        assert_eq!(controller.transport().position, 200.0);
        controller.seek_percent(-3.0);
        assert_eq!(controller.transport().position, 0.0);
        controller.seek_percent(25.0);
        assert_eq!(controller.transport().position, 50.0);
        assert_eq!(controller.progress_percent(), 25.0);
    }

    #[test]
    fn time_label_formats_minutes() {
        let mut transport = FakeTransport::new();
        transport.position = 65.9;
        transport.duration = Some(754.0);
        let controller = PlaybackController::new(transport);
        assert_eq!(controller.time_label(), "1:05 / 12:34");

        let controller = PlaybackController::new(FakeTransport::new());
        assert_eq!(controller.time_label(), "0:00 / 0:00");
        assert_eq!(controller.progress_percent(), 0.0);
    }

    #[test]
    fn clock_handles_non_finite() {
        assert_eq!(format_clock(f64::INFINITY), "0:00");
        assert_eq!(format_clock(f64::NAN), "0:00");
        assert_eq!(format_clock(-1.0), "0:00");
        assert_eq!(format_clock(3600.0), "60:00");
    }
}
