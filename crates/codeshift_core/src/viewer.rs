use serde::{Deserialize, Serialize};

/// One of the two side-by-side viewer positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerSlot {
    Original,
    Modified,
}

impl ViewerSlot {
    pub const BOTH: [ViewerSlot; 2] = [ViewerSlot::Original, ViewerSlot::Modified];
}

/// Lifecycle of a single viewer slot. `Disposed` is not terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotState {
    #[default]
    Uncreated,
    Ready,
    Disposed,
}

/// How converted files are presented.
///
/// `RawText` is the fallback for when the code viewer cannot be used: the
/// staged text is still kept, but no viewer is materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayMode {
    #[default]
    Editor,
    RawText,
}
