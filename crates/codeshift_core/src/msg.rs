use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a project archive to convert.
    ArchiveChosen(PathBuf),
    /// User asked to convert the selected archive.
    ConvertClicked,
    /// A decoded record arrived on the stream of `session`.
    RecordReceived {
        session: crate::SessionId,
        record: crate::StreamRecord,
    },
    /// The stream of `session` ended normally.
    StreamFinished { session: crate::SessionId },
    /// The stream of `session` could not be opened or broke mid-way.
    ConnectionFailed {
        session: crate::SessionId,
        reason: String,
    },
    /// User picked a result from the list.
    ResultSelected(usize),
    /// User switched between the code viewer and the raw text fallback.
    DisplayModeChanged(crate::DisplayMode),
    /// The presentation surface is going away.
    Closed,
}
