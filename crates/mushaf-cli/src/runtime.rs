//! Executes effects and feeds request results back as messages.
//!
//! Requests run as spawned tasks; each reports through one unbounded
//! channel. The runtime never touches [`AppState`] except through
//! [`update`].

use std::ops::ControlFlow;
use std::path::PathBuf;

use mushaf_client::MushafClient;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{Instrument, info_span, warn};

use crate::message::{Effect, Message};
use crate::state::AppState;
use crate::update::update;

pub struct Runtime {
    client: MushafClient,
    sender: UnboundedSender<Message>,
    receiver: UnboundedReceiver<Message>,
    in_flight: usize,
    settings_path: Option<PathBuf>,
}

impl Runtime {
    /// `settings_path` is where changed settings are saved; `None` keeps
    /// changes in memory.
    pub fn new(client: MushafClient, settings_path: Option<PathBuf>) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            client,
            sender,
            receiver,
            in_flight: 0,
            settings_path,
        }
    }

    /// Apply one message and run the resulting effects.
    pub fn dispatch(&mut self, state: &mut AppState, message: Message) -> ControlFlow<()> {
        for effect in update(state, message) {
            if self.execute(state, effect).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Wait for the next request result.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_result(&mut self) -> Option<Message> {
        if self.in_flight == 0 {
            return None;
        }
        let message = self.receiver.recv().await?;
        self.in_flight -= 1;
        Some(message)
    }

    /// Dispatch results until every spawned request has reported.
    pub async fn settle(&mut self, state: &mut AppState) {
        while let Some(message) = self.next_result().await {
            if self.dispatch(state, message).is_break() {
                break;
            }
        }
    }

    fn execute(&mut self, state: &AppState, effect: Effect) -> ControlFlow<()> {
        match effect {
            Effect::FetchCatalog(token) => {
                let client = self.client.clone();
                self.spawn(info_span!("catalog"), async move {
                    Message::CatalogLoaded {
                        token,
                        result: client.fetch_chapter_list().await,
                    }
                });
            }
            Effect::FetchChapter { token, ordinal } => {
                let client = self.client.clone();
                self.spawn(info_span!("chapter", %ordinal), async move {
                    Message::ChapterLoaded {
                        token,
                        result: client.fetch_chapter(ordinal).await,
                    }
                });
            }
            Effect::FetchRoster(token) => {
                let client = self.client.clone();
                self.spawn(info_span!("roster"), async move {
                    Message::RosterLoaded {
                        token,
                        result: client.fetch_reciter_roster().await,
                    }
                });
            }
            Effect::SaveSettings => {
                if let Some(path) = &self.settings_path
                    && let Err(error) = state.settings.save_to(path)
                {
                    warn!(%error, "could not save settings");
                }
            }
            Effect::Quit => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn spawn<F>(&mut self, span: tracing::Span, request: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        self.in_flight += 1;
        let sender = self.sender.clone();
        tokio::spawn(
            async move {
                // The receiver only goes away when the runtime is dropped.
                let _ = sender.send(request.await);
            }
            .instrument(span),
        );
    }
}
