//! Text panes standing in for code-viewer widgets.

use std::sync::{Arc, Mutex, MutexGuard};

use codeshift_core::ViewerSlot;
use codeshift_engine::{CodeViewer, MountPoint, ViewerConfig, ViewerError, ViewerFactory};
use shift_logging::shift_debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub mount: String,
    pub language: String,
    pub file_ext: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct Panes {
    original: Option<Pane>,
    modified: Option<Pane>,
}

impl Panes {
    fn slot_mut(&mut self, slot: ViewerSlot) -> &mut Option<Pane> {
        match slot {
            ViewerSlot::Original => &mut self.original,
            ViewerSlot::Modified => &mut self.modified,
        }
    }
}

/// The two panes shared between the viewers and whoever prints them.
#[derive(Debug, Clone, Default)]
pub struct PaneBoard {
    panes: Arc<Mutex<Panes>>,
}

impl PaneBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pane(&self, slot: ViewerSlot) -> Option<Pane> {
        self.lock().slot_mut(slot).clone()
    }

    fn lock(&self) -> MutexGuard<'_, Panes> {
        self.panes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub struct TerminalViewerFactory {
    board: PaneBoard,
}

impl TerminalViewerFactory {
    pub fn new(board: PaneBoard) -> Self {
        Self { board }
    }
}

#[async_trait::async_trait]
impl ViewerFactory for TerminalViewerFactory {
    async fn create(
        &self,
        slot: ViewerSlot,
        mount: &MountPoint,
        config: ViewerConfig,
    ) -> Result<Box<dyn CodeViewer>, ViewerError> {
        let mut panes = self.board.lock();
        let entry = panes.slot_mut(slot);
        if entry.is_some() {
            return Err(ViewerError::Create {
                slot,
                message: format!("pane {} already holds a viewer", mount.0),
            });
        }
        shift_debug!("Pane {:?} opened in {} ({})", slot, mount.0, config.language.id);
        *entry = Some(Pane {
            mount: mount.0.clone(),
            language: config.language.id,
            file_ext: config.language.file_ext,
            text: config.text,
        });
        Ok(Box::new(TerminalViewer {
            slot,
            board: self.board.clone(),
        }))
    }
}

struct TerminalViewer {
    slot: ViewerSlot,
    board: PaneBoard,
}

#[async_trait::async_trait]
impl CodeViewer for TerminalViewer {
    async fn set_text(&mut self, text: &str) -> Result<(), ViewerError> {
        let mut panes = self.board.lock();
        match panes.slot_mut(self.slot) {
            Some(pane) => {
                pane.text = text.to_string();
                Ok(())
            }
            None => Err(ViewerError::Update {
                slot: self.slot,
                message: "pane is closed".to_string(),
            }),
        }
    }

    async fn dispose(&mut self) -> Result<(), ViewerError> {
        let mut panes = self.board.lock();
        match panes.slot_mut(self.slot).take() {
            Some(_) => Ok(()),
            None => Err(ViewerError::Dispose {
                slot: self.slot,
                message: "pane is already closed".to_string(),
            }),
        }
    }
}
