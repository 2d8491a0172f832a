use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::view_model::{AppViewModel, ResultRowView};
use crate::{DisplayMode, FileResult};

/// The only transport failure text shown to the user.
pub const CONNECTION_FAILED_MESSAGE: &str = "Connection failed. Is the backend running?";

/// Identifies one conversion run. Messages from older runs are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SessionId(pub u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Converting,
    Completed,
    Failed,
}

/// What a mid-stream `error` record does to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StreamErrorPolicy {
    /// Log the message; the stream may continue or end normally.
    #[default]
    LogOnly,
    /// Move the session to `Failed` with the record's message.
    FailSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    archive: Option<PathBuf>,
    session_id: SessionId,
    session: SessionState,
    stream_open: bool,
    results: Vec<FileResult>,
    selected: Option<usize>,
    download_id: Option<String>,
    error_message: Option<String>,
    raw_original: String,
    raw_modified: String,
    display_mode: DisplayMode,
    stream_error_policy: StreamErrorPolicy,
    stream_errors: usize,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    pub fn with_stream_error_policy(mut self, policy: StreamErrorPolicy) -> Self {
        self.stream_error_policy = policy;
        self
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_streaming(&self) -> bool {
        self.stream_open
    }

    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }

    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn download_id(&self) -> Option<&str> {
        self.download_id.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn stream_error_count(&self) -> usize {
        self.stream_errors
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            session_id: self.session_id,
            converting: self.stream_open,
            archive_name: self
                .archive
                .as_deref()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned()),
            results: self
                .results
                .iter()
                .enumerate()
                .map(|(index, file)| ResultRowView {
                    index,
                    label: file.label().to_string(),
                    path: file.path.clone(),
                    selected: self.selected == Some(index),
                })
                .collect(),
            selected: self.selected,
            download_id: self.download_id.clone(),
            error_message: self.error_message.clone(),
            display_mode: self.display_mode,
            raw_original: self.raw_original.clone(),
            raw_modified: self.raw_modified.clone(),
            stream_errors: self.stream_errors,
            dirty: self.dirty,
        }
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, session: SessionId) -> bool {
        session == self.session_id && self.stream_open
    }

    pub(crate) fn choose_archive(&mut self, archive: PathBuf) {
        self.archive = Some(archive);
        self.reset_results();
        // Any stream still draining belongs to the previous selection.
        self.session_id = SessionId(self.session_id.0 + 1);
        self.session = SessionState::Idle;
        self.stream_open = false;
        self.dirty = true;
    }

    pub(crate) fn start_session(&mut self) -> SessionId {
        self.reset_results();
        self.session_id = SessionId(self.session_id.0 + 1);
        self.session = SessionState::Converting;
        self.stream_open = true;
        self.dirty = true;
        self.session_id
    }

    /// Appends a result and returns the new collection length.
    pub(crate) fn push_result(&mut self, file: FileResult) -> usize {
        self.results.push(file);
        self.dirty = true;
        self.results.len()
    }

    /// Stages the result at `index` for display and returns a copy of it.
    pub(crate) fn show_result(&mut self, index: usize) -> Option<FileResult> {
        let file = self.results.get(index)?.clone();
        self.selected = Some(index);
        self.raw_original.clone_from(&file.original_code);
        self.raw_modified.clone_from(&file.converted_code);
        self.dirty = true;
        Some(file)
    }

    pub(crate) fn selected_result(&self) -> Option<FileResult> {
        self.selected
            .and_then(|index| self.results.get(index))
            .cloned()
    }

    pub(crate) fn complete(&mut self, download_id: String) {
        self.session = SessionState::Completed;
        self.download_id = Some(download_id);
        self.error_message = None;
        self.dirty = true;
    }

    pub(crate) fn record_stream_error(&mut self, message: &str) {
        self.stream_errors += 1;
        if self.stream_error_policy == StreamErrorPolicy::FailSession {
            self.session = SessionState::Failed;
            self.download_id = None;
            self.error_message = Some(message.to_string());
        }
        self.dirty = true;
    }

    pub(crate) fn finish_stream(&mut self) {
        self.stream_open = false;
        if self.session == SessionState::Converting {
            self.session = SessionState::Idle;
        }
        self.dirty = true;
    }

    pub(crate) fn fail_connection(&mut self) {
        self.stream_open = false;
        self.session = SessionState::Failed;
        self.download_id = None;
        self.error_message = Some(CONNECTION_FAILED_MESSAGE.to_string());
        self.dirty = true;
    }

    pub(crate) fn set_display_mode(&mut self, mode: DisplayMode) {
        self.display_mode = mode;
        self.dirty = true;
    }

    fn reset_results(&mut self) {
        self.results.clear();
        self.selected = None;
        self.download_id = None;
        self.error_message = None;
        self.raw_original.clear();
        self.raw_modified.clear();
        self.stream_errors = 0;
    }
}
