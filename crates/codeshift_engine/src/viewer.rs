use std::sync::Arc;
use std::time::Duration;

use codeshift_core::{DisplayMode, FileResult, SlotState, ViewerSlot};
use shift_logging::{shift_debug, shift_error, shift_warn};

use crate::{MountPoint, MountPoints, MountWatcher, ViewerError};

/// Language passed to the viewer for syntax support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageHint {
    pub id: String,
    pub file_ext: String,
}

impl LanguageHint {
    pub fn new(id: impl Into<String>, file_ext: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            file_ext: file_ext.into(),
        }
    }
}

/// Source language for the original slot, target language for the modified one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerLanguages {
    pub source: LanguageHint,
    pub target: LanguageHint,
}

impl Default for ViewerLanguages {
    fn default() -> Self {
        Self {
            source: LanguageHint::new("csharp", "cs"),
            target: LanguageHint::new("java", "java"),
        }
    }
}

impl ViewerLanguages {
    fn for_slot(&self, slot: ViewerSlot) -> &LanguageHint {
        match slot {
            ViewerSlot::Original => &self.source,
            ViewerSlot::Modified => &self.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    pub text: String,
    pub language: LanguageHint,
    pub read_only: bool,
}

/// A live code-viewer widget.
#[async_trait::async_trait]
pub trait CodeViewer: Send {
    async fn set_text(&mut self, text: &str) -> Result<(), ViewerError>;
    async fn dispose(&mut self) -> Result<(), ViewerError>;
}

/// Creates code-viewer widgets inside laid-out mount points.
#[async_trait::async_trait]
pub trait ViewerFactory: Send + Sync {
    async fn create(
        &self,
        slot: ViewerSlot,
        mount: &MountPoint,
        config: ViewerConfig,
    ) -> Result<Box<dyn CodeViewer>, ViewerError>;
}

/// What [`ViewerController::show_file`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Raw text mode; only the pending text was staged.
    Skipped,
    Created,
    Updated,
    /// The existing viewers were unusable and were replaced.
    Recreated,
    /// No working viewers could be produced.
    Failed,
}

#[derive(Default)]
struct Slot {
    state: SlotState,
    viewer: Option<Box<dyn CodeViewer>>,
    generation: Option<u64>,
    pending: String,
}

/// Owns the original/modified viewer pair. Nothing else touches the widgets.
///
/// Every operation takes `&mut self`, so a create can never overlap a pending
/// create or dispose.
pub struct ViewerController {
    factory: Arc<dyn ViewerFactory>,
    mounts: MountWatcher,
    languages: ViewerLanguages,
    mount_timeout: Duration,
    original: Slot,
    modified: Slot,
}

impl ViewerController {
    pub fn new(
        factory: Arc<dyn ViewerFactory>,
        mounts: MountWatcher,
        languages: ViewerLanguages,
        mount_timeout: Duration,
    ) -> Self {
        Self {
            factory,
            mounts,
            languages,
            mount_timeout,
            original: Slot::default(),
            modified: Slot::default(),
        }
    }

    pub fn state(&self, slot: ViewerSlot) -> SlotState {
        self.slot(slot).state
    }

    pub fn pending_text(&self, slot: ViewerSlot) -> &str {
        &self.slot(slot).pending
    }

    pub async fn show_file(&mut self, file: &FileResult, mode: DisplayMode) -> ShowOutcome {
        self.original.pending.clone_from(&file.original_code);
        self.modified.pending.clone_from(&file.converted_code);

        if mode == DisplayMode::RawText {
            return ShowOutcome::Skipped;
        }

        let mounts = match self.mounts.ready_within(self.mount_timeout).await {
            Ok(mounts) => mounts,
            Err(err) => {
                shift_error!("Cannot show {}: {}", file.label(), err);
                return ShowOutcome::Failed;
            }
        };

        let both_ready = self.original.state == SlotState::Ready
            && self.modified.state == SlotState::Ready;
        let same_layout = self.original.generation == Some(mounts.generation)
            && self.modified.generation == Some(mounts.generation);

        if both_ready && same_layout {
            match self.update_in_place().await {
                Ok(()) => return ShowOutcome::Updated,
                Err(err) => {
                    shift_warn!("Viewer update failed, recreating: {}", err);
                    self.dispose_all().await;
                    return match self.create_both(&mounts).await {
                        Ok(()) => ShowOutcome::Recreated,
                        Err(err) => {
                            shift_error!("Viewer recreation failed: {}", err);
                            ShowOutcome::Failed
                        }
                    };
                }
            }
        }

        let replacing = self.has_live_viewer();
        if replacing {
            shift_debug!(
                "Viewers are stale (layout {} -> {}), recreating",
                self.original.generation.unwrap_or_default(),
                mounts.generation
            );
            self.dispose_all().await;
        }
        match self.create_both(&mounts).await {
            Ok(()) if replacing => ShowOutcome::Recreated,
            Ok(()) => ShowOutcome::Created,
            Err(err) => {
                shift_error!("Viewer creation failed: {}", err);
                ShowOutcome::Failed
            }
        }
    }

    /// Tears down both slots. Never fails; both slots end up `Disposed`.
    pub async fn dispose_all(&mut self) {
        for slot in ViewerSlot::BOTH {
            let entry = self.slot_mut(slot);
            let viewer = entry.viewer.take();
            entry.state = SlotState::Disposed;
            entry.generation = None;
            if let Some(mut viewer) = viewer {
                if let Err(err) = viewer.dispose().await {
                    shift_warn!("Dispose error: {}", err);
                }
            }
        }
    }

    async fn update_in_place(&mut self) -> Result<(), ViewerError> {
        for slot in ViewerSlot::BOTH {
            let entry = self.slot_mut(slot);
            let Some(viewer) = entry.viewer.as_mut() else {
                return Err(ViewerError::Update {
                    slot,
                    message: "slot marked ready without a viewer".to_string(),
                });
            };
            viewer.set_text(&entry.pending).await?;
        }
        Ok(())
    }

    async fn create_both(&mut self, mounts: &MountPoints) -> Result<(), ViewerError> {
        for slot in ViewerSlot::BOTH {
            let mount = match slot {
                ViewerSlot::Original => &mounts.original,
                ViewerSlot::Modified => &mounts.modified,
            };
            let config = ViewerConfig {
                text: self.slot(slot).pending.clone(),
                language: self.languages.for_slot(slot).clone(),
                read_only: true,
            };
            match self.factory.create(slot, mount, config).await {
                Ok(viewer) => {
                    let entry = self.slot_mut(slot);
                    entry.viewer = Some(viewer);
                    entry.state = SlotState::Ready;
                    entry.generation = Some(mounts.generation);
                }
                Err(err) => {
                    // Both slots move together; drop the half-built pair.
                    self.dispose_all().await;
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    fn has_live_viewer(&self) -> bool {
        self.original.viewer.is_some() || self.modified.viewer.is_some()
    }

    fn slot(&self, slot: ViewerSlot) -> &Slot {
        match slot {
            ViewerSlot::Original => &self.original,
            ViewerSlot::Modified => &self.modified,
        }
    }

    fn slot_mut(&mut self, slot: ViewerSlot) -> &mut Slot {
        match slot {
            ViewerSlot::Original => &mut self.original,
            ViewerSlot::Modified => &mut self.modified,
        }
    }
}
