use std::io;
use std::sync::Arc;

use anyhow::Context;
use codeshift_core::{AppState, AppViewModel, DisplayMode, ViewerSlot};
use codeshift_engine::{
    download_url, ConversionController, MountSignal, ReqwestUploader, ViewerController,
};
use shift_logging::{shift_info, shift_warn};

use super::config::{self, AppConfig, LanguageSetting};
use super::logging;
use super::ui::render::{draw_side_by_side, pane_title, results_list, TerminalPresenter};
use super::ui::viewer::{PaneBoard, TerminalViewerFactory};
use crate::Cli;

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    let loaded = config::load(&cli.config);
    let mut config = loaded.config;
    logging::initialize(config.log_destination, logging::parse_level(&config.log_level));
    if let Some(problem) = loaded.problem {
        shift_warn!("{}; using default settings", problem);
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    if cli.raw {
        config.display_mode = DisplayMode::RawText;
    }
    download_url(&config.base_url, "sample")
        .with_context(|| format!("invalid base URL {:?}", config.base_url))?;

    let board = PaneBoard::new();
    let mut controller = build_controller(&config, board.clone());
    shift_info!("Backend at {}", config.base_url);

    controller.choose_archive(cli.archive).await;
    controller.convert().await;
    if let Some(index) = cli.select {
        controller.select_result(index).await;
    }

    let view = controller.state().view();
    print_summary(&config, &view, &board);
    controller.teardown().await;
    Ok(())
}

fn build_controller(config: &AppConfig, board: PaneBoard) -> ConversionController {
    let mounts = MountSignal::new();
    let viewers = ViewerController::new(
        Arc::new(TerminalViewerFactory::new(board)),
        mounts.subscribe(),
        config.languages(),
        config.mount_timeout(),
    );
    let state = AppState::new()
        .with_display_mode(config.display_mode)
        .with_stream_error_policy(config.stream_error_policy);
    ConversionController::new(
        state,
        Arc::new(ReqwestUploader::new(config.upload_settings())),
        viewers,
        Box::new(TerminalPresenter::new(io::stdout(), mounts)),
    )
}

fn print_summary(config: &AppConfig, view: &AppViewModel, board: &PaneBoard) {
    if !view.results.is_empty() {
        println!("\n{}", results_list(view));
    }

    let selected = view
        .selected
        .and_then(|index| view.results.get(index))
        .map(|row| row.label.clone());
    if let Some(label) = selected {
        let (left, right) = match view.display_mode {
            DisplayMode::RawText => (
                PaneView::raw(&view.raw_original, &config.source_language),
                PaneView::raw(&view.raw_modified, &config.target_language),
            ),
            DisplayMode::Editor => (
                PaneView::from_board(board, ViewerSlot::Original),
                PaneView::from_board(board, ViewerSlot::Modified),
            ),
        };
        println!(
            "{}",
            draw_side_by_side(
                &pane_title(&label, &left.language, &left.file_ext),
                &left.text,
                &pane_title(&label, &right.language, &right.file_ext),
                &right.text,
            )
        );
    }

    if let Some(message) = &view.error_message {
        eprintln!("{}", message);
    }
    if let Some(id) = &view.download_id {
        match download_url(&config.base_url, id) {
            Ok(url) => println!("Download: {}", url),
            Err(err) => shift_warn!("Cannot build download link for {}: {}", id, err),
        }
    }
}

/// What one side of the summary shows.
struct PaneView {
    language: String,
    file_ext: String,
    text: String,
}

impl PaneView {
    fn raw(text: &str, language: &LanguageSetting) -> Self {
        Self {
            language: language.id.clone(),
            file_ext: language.file_ext.clone(),
            text: text.to_string(),
        }
    }

    fn from_board(board: &PaneBoard, slot: ViewerSlot) -> Self {
        match board.pane(slot) {
            Some(pane) => Self {
                language: pane.language,
                file_ext: pane.file_ext,
                text: pane.text,
            },
            None => Self {
                language: "closed".to_string(),
                file_ext: String::new(),
                text: String::new(),
            },
        }
    }
}
