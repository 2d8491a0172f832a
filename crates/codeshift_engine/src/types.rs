use std::fmt;

use codeshift_core::ViewerSlot;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailureKind {
    InvalidUrl,
    ArchiveUnreadable,
    HttpStatus(u16),
    Timeout,
    Body,
    Network,
}

impl fmt::Display for TransportFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailureKind::InvalidUrl => write!(f, "invalid url"),
            TransportFailureKind::ArchiveUnreadable => write!(f, "archive unreadable"),
            TransportFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            TransportFailureKind::Timeout => write!(f, "timeout"),
            TransportFailureKind::Body => write!(f, "response body error"),
            TransportFailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Faults reported by the code-viewer collaborator or the mount surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to create {slot:?} viewer: {message}")]
    Create { slot: ViewerSlot, message: String },
    #[error("failed to update {slot:?} viewer: {message}")]
    Update { slot: ViewerSlot, message: String },
    #[error("failed to dispose {slot:?} viewer: {message}")]
    Dispose { slot: ViewerSlot, message: String },
    #[error("mount points not available after {waited_ms} ms")]
    MountTimeout { waited_ms: u64 },
    #[error("presentation surface closed")]
    SurfaceClosed,
}
