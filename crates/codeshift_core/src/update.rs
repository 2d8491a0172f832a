use crate::{AppState, DisplayMode, Effect, Msg, StreamRecord};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ArchiveChosen(path) => {
            state.choose_archive(path);
            vec![Effect::DisposeViewers]
        }
        Msg::ConvertClicked => match state.archive().map(ToOwned::to_owned) {
            Some(archive) => {
                let session = state.start_session();
                vec![
                    Effect::DisposeViewers,
                    Effect::StartUpload { session, archive },
                ]
            }
            None => Vec::new(),
        },
        Msg::RecordReceived { session, record } => {
            if !state.is_current(session) {
                return (state, Vec::new());
            }
            apply_record(&mut state, record)
        }
        Msg::StreamFinished { session } => {
            if state.is_current(session) {
                state.finish_stream();
            }
            Vec::new()
        }
        Msg::ConnectionFailed { session, reason } => {
            if !state.is_current(session) {
                return (state, Vec::new());
            }
            state.fail_connection();
            vec![Effect::ReportConnectionFailure { reason }]
        }
        Msg::ResultSelected(index) => match state.show_result(index) {
            Some(file) => vec![Effect::ShowFile {
                file,
                mode: state.display_mode(),
            }],
            None => Vec::new(),
        },
        Msg::DisplayModeChanged(mode) => {
            if mode == state.display_mode() {
                return (state, Vec::new());
            }
            state.set_display_mode(mode);
            match mode {
                DisplayMode::RawText => vec![Effect::DisposeViewers],
                DisplayMode::Editor => state
                    .selected_result()
                    .map(|file| vec![Effect::ShowFile { file, mode }])
                    .unwrap_or_default(),
            }
        }
        Msg::Closed => vec![Effect::DisposeViewers],
    };

    (state, effects)
}

fn apply_record(state: &mut AppState, record: StreamRecord) -> Vec<Effect> {
    match record {
        StreamRecord::File { data } => {
            // Only the first file of a session is shown automatically.
            if state.push_result(data) != 1 {
                return Vec::new();
            }
            state
                .show_result(0)
                .map(|file| {
                    vec![Effect::ShowFile {
                        file,
                        mode: state.display_mode(),
                    }]
                })
                .unwrap_or_default()
        }
        StreamRecord::Complete { download_id } => {
            state.complete(download_id);
            Vec::new()
        }
        StreamRecord::Error { message } => {
            state.record_stream_error(&message);
            vec![Effect::ReportStreamError { message }]
        }
    }
}
