use indicatif::{ProgressBar, ProgressStyle};
use rizz_analysis::StageBoard;
use rizz_core::StageStatus;

/// Stage progress drawn on stderr. A no-op when disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 80 => "{bar:40.magenta/blue} {pos:>3}% {msg}",
        _ => "{wide_bar:.magenta/blue} {pos}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn bar(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    /// Mirror a published stage board.
    pub fn show(&self, board: &StageBoard) {
        if let Some(bar) = &self.bar {
            bar.set_position(u64::from(board.percent()));
            bar.set_message(stage_message(board));
        }
    }

    pub fn finish_ok(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

/// One-line summary of the board, e.g. `Chat history ✓  Profile scan …`.
fn stage_message(board: &StageBoard) -> String {
    board
        .stages()
        .map(|(stage, status)| {
            let mark = match status {
                StageStatus::Pending => "·",
                StageStatus::Processing => "…",
                StageStatus::Complete => "✓",
                StageStatus::Failed => "✗",
            };
            format!("{} {mark}", stage.label())
        })
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rizz_core::StageId;

    #[test]
    fn message_marks_each_stage() {
        let mut board = StageBoard::new();
        board
            .transition(StageId::ChatHistory, StageStatus::Processing)
            .unwrap();
        board
            .transition(StageId::ChatHistory, StageStatus::Complete)
            .unwrap();
        board
            .transition(StageId::ProfileScan, StageStatus::Processing)
            .unwrap();

        let message = stage_message(&board);
        let marks: Vec<&str> = message
            .split("  ")
            .filter_map(|part| part.rsplit(' ').next())
            .collect();
        assert_eq!(marks, vec!["✓", "…", "·"]);
    }

    #[test]
    fn disabled_progress_is_inert() {
        let progress = Progress::bar(false, "analysing");
        progress.show(&StageBoard::new());
        progress.finish_ok("done");
        assert!(progress.bar.is_none());
    }
}
