use std::io::Write;

use codeshift_core::{AppViewModel, SessionState};
use codeshift_engine::{MountPoint, MountSignal, RenderSink};

use super::constants::*;

/// Prints a status line per state change and lays out the editor area.
pub struct TerminalPresenter<W: Write + Send> {
    out: W,
    mounts: MountSignal,
    last_status: Option<String>,
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W, mounts: MountSignal) -> Self {
        Self {
            out,
            mounts,
            last_status: None,
        }
    }
}

impl<W: Write + Send> RenderSink for TerminalPresenter<W> {
    fn render(&mut self, view: &AppViewModel) {
        if view.has_editor_area() {
            self.mounts.publish(
                MountPoint(MOUNT_ORIGINAL.to_string()),
                MountPoint(MOUNT_MODIFIED.to_string()),
            );
        } else {
            self.mounts.withdraw();
        }

        let status = status_line(view);
        if self.last_status.as_deref() != Some(status.as_str()) {
            let _ = writeln!(self.out, "{}", status);
            self.last_status = Some(status);
        }
    }
}

pub fn status_line(view: &AppViewModel) -> String {
    let session_label = match view.session {
        SessionState::Idle => "Idle",
        SessionState::Converting => "Converting",
        SessionState::Completed => "Completed",
        SessionState::Failed => "Failed",
    };
    let archive = view.archive_name.as_deref().unwrap_or("no archive");

    let mut text = format!(
        "[{}] {} | {} | Files: {}",
        view.session_id,
        session_label,
        archive,
        view.results.len()
    );
    if view.converting {
        text.push_str(" | receiving");
    }
    if view.stream_errors > 0 {
        text.push_str(&format!(" | Errors: {}", view.stream_errors));
    }
    if let Some(message) = &view.error_message {
        text.push_str(&format!(" | {}", message));
    }
    text
}

/// One line per result, the selected one marked.
pub fn results_list(view: &AppViewModel) -> String {
    let mut text = String::new();
    for row in &view.results {
        let marker = if row.selected { '>' } else { ' ' };
        match &row.path {
            Some(path) => text.push_str(&format!(
                "{} {:>3}  {}  ({})\n",
                marker, row.index, row.label, path
            )),
            None => text.push_str(&format!("{} {:>3}  {}\n", marker, row.index, row.label)),
        }
    }
    text
}

/// Pane header such as `A.java [java, *.java]`.
pub fn pane_title(label: &str, language: &str, file_ext: &str) -> String {
    if file_ext.is_empty() {
        format!("{} [{}]", label, language)
    } else {
        format!("{} [{}, *.{}]", label, language, file_ext)
    }
}

/// Lays two texts out side by side with line numbers, padding the shorter one.
pub fn draw_side_by_side(left_title: &str, left: &str, right_title: &str, right: &str) -> String {
    let text_width = PANE_WIDTH - GUTTER_WIDTH;
    let left_lines: Vec<&str> = left.lines().collect();
    let right_lines: Vec<&str> = right.lines().collect();
    let rows = left_lines.len().max(right_lines.len());

    let mut out = String::new();
    push_row(
        &mut out,
        &format!("{:<width$}", fit(left_title, PANE_WIDTH), width = PANE_WIDTH),
        &fit(right_title, PANE_WIDTH),
    );
    push_row(&mut out, &"-".repeat(PANE_WIDTH), &"-".repeat(PANE_WIDTH));
    for row in 0..rows {
        push_row(
            &mut out,
            &cell(left_lines.get(row).copied(), row, text_width),
            &cell(right_lines.get(row).copied(), row, text_width),
        );
    }
    out
}

fn push_row(out: &mut String, left: &str, right: &str) {
    let row = format!("{}{}{}", left, PANE_SEPARATOR, right);
    out.push_str(row.trim_end());
    out.push('\n');
}

fn cell(line: Option<&str>, row: usize, text_width: usize) -> String {
    match line {
        Some(line) => format!(
            "{:>gutter$} {:<width$}",
            row + 1,
            fit(&line.replace('\t', "    "), text_width),
            gutter = GUTTER_WIDTH - 1,
            width = text_width
        ),
        None => " ".repeat(PANE_WIDTH),
    }
}

/// Truncates to `width` characters, marking the cut with `~`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
