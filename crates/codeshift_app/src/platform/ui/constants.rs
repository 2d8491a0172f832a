pub const MOUNT_ORIGINAL: &str = "original-container";
pub const MOUNT_MODIFIED: &str = "modified-container";

/// Column width of one pane, gutter included.
pub const PANE_WIDTH: usize = 60;
pub const GUTTER_WIDTH: usize = 5;
pub const PANE_SEPARATOR: &str = " | ";
