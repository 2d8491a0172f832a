//! Codeshift core: stream record model, pure session state machine and view-model helpers.
mod effect;
mod msg;
mod record;
mod state;
mod update;
mod view_model;
mod viewer;

pub use effect::Effect;
pub use msg::Msg;
pub use record::{FileResult, StreamRecord};
pub use state::{AppState, SessionId, SessionState, StreamErrorPolicy, CONNECTION_FAILED_MESSAGE};
pub use update::update;
pub use view_model::{AppViewModel, ResultRowView};
pub use viewer::{DisplayMode, SlotState, ViewerSlot};
