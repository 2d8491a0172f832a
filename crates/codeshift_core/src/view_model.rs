use crate::{DisplayMode, SessionId, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    pub session_id: SessionId,
    pub converting: bool,
    pub archive_name: Option<String>,
    pub results: Vec<ResultRowView>,
    pub selected: Option<usize>,
    pub download_id: Option<String>,
    pub error_message: Option<String>,
    pub display_mode: DisplayMode,
    pub raw_original: String,
    pub raw_modified: String,
    pub stream_errors: usize,
    pub dirty: bool,
}

impl AppViewModel {
    /// The editor area exists only in editor mode once there is something to show.
    pub fn has_editor_area(&self) -> bool {
        self.display_mode == DisplayMode::Editor && !self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRowView {
    pub index: usize,
    pub label: String,
    pub path: Option<String>,
    pub selected: bool,
}
