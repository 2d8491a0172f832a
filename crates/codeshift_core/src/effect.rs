use std::path::PathBuf;

use crate::{DisplayMode, FileResult, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Tear down both viewer slots.
    DisposeViewers,
    /// Upload the archive and drain the response stream under `session`.
    StartUpload { session: SessionId, archive: PathBuf },
    /// Materialize (or update) the viewers for `file`.
    ShowFile { file: FileResult, mode: DisplayMode },
    /// A mid-stream `error` record arrived.
    ReportStreamError { message: String },
    /// The transport failed; `reason` is the detailed cause for diagnostics.
    ReportConnectionFailure { reason: String },
}
