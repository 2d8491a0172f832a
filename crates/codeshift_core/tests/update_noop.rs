use std::path::PathBuf;

use codeshift_core::{update, AppState, DisplayMode, Msg, SessionId};

#[test]
fn selecting_a_missing_result_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::ResultSelected(3));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn convert_without_archive_is_rejected() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::ConvertClicked);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn unchanged_display_mode_is_noop() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::DisplayModeChanged(DisplayMode::Editor));

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn stream_end_without_open_stream_is_noop() {
    let (mut state, _) = update(AppState::new(), Msg::ArchiveChosen(PathBuf::from("a.zip")));
    state.consume_dirty();
    let session = state.session_id();

    let (mut next, effects) = update(state.clone(), Msg::StreamFinished { session });
    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());

    let (next, _) = update(next, Msg::StreamFinished { session: SessionId(99) });
    assert_eq!(state, next);
}
