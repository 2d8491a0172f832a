use std::path::PathBuf;
use std::sync::Arc;

use codeshift_core::{update, AppState, AppViewModel, DisplayMode, Effect, Msg, SessionId};
use futures_util::StreamExt;
use shift_logging::{shift_error, shift_info, shift_warn};

use crate::{decode_records, ShowOutcome, Uploader, ViewerController};

/// The presentation layer. Called synchronously after every state change, so
/// each record is visible as soon as it has been applied.
pub trait RenderSink: Send {
    fn render(&mut self, view: &AppViewModel);
}

/// Drives one upload-and-convert run at a time and owns the application state.
pub struct ConversionController {
    state: AppState,
    uploader: Arc<dyn Uploader>,
    viewers: ViewerController,
    renderer: Box<dyn RenderSink>,
    last_show: Option<ShowOutcome>,
}

impl ConversionController {
    pub fn new(
        state: AppState,
        uploader: Arc<dyn Uploader>,
        viewers: ViewerController,
        renderer: Box<dyn RenderSink>,
    ) -> Self {
        Self {
            state,
            uploader,
            viewers,
            renderer,
            last_show: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn viewers(&self) -> &ViewerController {
        &self.viewers
    }

    /// Outcome of the most recent attempt to show a file.
    pub fn last_show(&self) -> Option<ShowOutcome> {
        self.last_show
    }

    pub async fn choose_archive(&mut self, archive: PathBuf) {
        self.dispatch(Msg::ArchiveChosen(archive)).await;
    }

    /// Uploads the chosen archive and drains the response until it ends.
    /// Does nothing when no archive has been chosen.
    pub async fn convert(&mut self) {
        let Some((session, archive)) = self.dispatch(Msg::ConvertClicked).await else {
            return;
        };
        shift_logging::set_session(session.0);
        shift_info!("Converting {}", archive.display());

        let body = match self.uploader.open_stream(&archive).await {
            Ok(body) => body,
            Err(err) => {
                self.dispatch(Msg::ConnectionFailed {
                    session,
                    reason: err.to_string(),
                })
                .await;
                return;
            }
        };

        let mut records = decode_records(body);
        let mut received = 0usize;
        while let Some(item) = records.next().await {
            match item {
                Ok(record) => {
                    received += 1;
                    self.dispatch(Msg::RecordReceived { session, record }).await;
                }
                Err(err) => {
                    self.dispatch(Msg::ConnectionFailed {
                        session,
                        reason: err.to_string(),
                    })
                    .await;
                    return;
                }
            }
        }

        self.dispatch(Msg::StreamFinished { session }).await;
        shift_info!(
            "Stream finished: {} record(s), {} result(s), state {:?}",
            received,
            self.state.results().len(),
            self.state.session()
        );
    }

    pub async fn select_result(&mut self, index: usize) {
        self.dispatch(Msg::ResultSelected(index)).await;
    }

    pub async fn set_display_mode(&mut self, mode: DisplayMode) {
        self.dispatch(Msg::DisplayModeChanged(mode)).await;
    }

    /// Releases the viewers; the controller stays usable.
    pub async fn teardown(&mut self) {
        self.dispatch(Msg::Closed).await;
    }

    /// Applies `msg`, renders when the state changed, then runs the effects.
    /// Returns the upload request if the message started a new session.
    async fn dispatch(&mut self, msg: Msg) -> Option<(SessionId, PathBuf)> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.renderer.render(&state.view());
        }
        self.state = state;

        let mut upload = None;
        for effect in effects {
            match effect {
                Effect::DisposeViewers => self.viewers.dispose_all().await,
                Effect::StartUpload { session, archive } => upload = Some((session, archive)),
                Effect::ShowFile { file, mode } => {
                    self.last_show = Some(self.viewers.show_file(&file, mode).await);
                }
                Effect::ReportStreamError { message } => {
                    shift_warn!("Stream error: {}", message);
                }
                Effect::ReportConnectionFailure { reason } => {
                    shift_error!("Conversion failed: {}", reason);
                }
            }
        }
        upload
    }
}
