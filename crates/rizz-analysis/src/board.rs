use rizz_core::{CoreError, StageId, StageStatus};
use serde::Serialize;

/// Stage statuses and progress of one pipeline run.
///
/// Statuses only move along [`StageStatus::allowed_next_states`] and the
/// percentage never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageBoard {
    stages: [StageStatus; 3],
    percent: u8,
    failed: bool,
}

impl Default for StageBoard {
    fn default() -> Self {
        Self {
            stages: [StageStatus::Pending; 3],
            percent: 0,
            failed: false,
        }
    }
}

impl StageBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn status(&self, stage: StageId) -> StageStatus {
        self.stages[stage.index()]
    }

    #[must_use]
    pub const fn percent(&self) -> u8 {
        self.percent
    }

    /// Whether a stage ended in [`StageStatus::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.failed
    }

    /// Whether progress has reached 100.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.percent >= 100
    }

    /// Stages in pipeline order with their status.
    pub fn stages(&self) -> impl Iterator<Item = (StageId, StageStatus)> + '_ {
        StageId::ALL
            .into_iter()
            .map(|stage| (stage, self.status(stage)))
    }

    /// The stage currently processing, if any.
    #[must_use]
    pub fn active(&self) -> Option<StageId> {
        self.stages()
            .find(|(_, status)| *status == StageStatus::Processing)
            .map(|(stage, _)| stage)
    }

    /// Move `stage` to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if the move is not allowed;
    /// the board is left unchanged.
    pub fn transition(&mut self, stage: StageId, next: StageStatus) -> Result<(), CoreError> {
        let current = self.status(stage);
        if !current.can_transition_to(next) {
            return Err(CoreError::transition(&format!("stage {stage}"), current, next));
        }
        self.stages[stage.index()] = next;
        if next == StageStatus::Failed {
            self.failed = true;
        }
        Ok(())
    }

    /// Raise progress to `percent` (capped at 100). Lower values are ignored.
    pub fn advance_to(&mut self, percent: u8) {
        self.percent = self.percent.max(percent.min(100));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_board_is_all_pending() {
        let board = StageBoard::new();
        assert!(board.stages().all(|(_, s)| s == StageStatus::Pending));
        assert_eq!(board.percent(), 0);
        assert_eq!(board.active(), None);
    }

    #[test]
    fn stages_move_forward_only() {
        let mut board = StageBoard::new();
        board
            .transition(StageId::ChatHistory, StageStatus::Processing)
            .unwrap();
        assert_eq!(board.active(), Some(StageId::ChatHistory));
        board
            .transition(StageId::ChatHistory, StageStatus::Complete)
            .unwrap();

        let err = board
            .transition(StageId::ChatHistory, StageStatus::Processing)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTransition { .. }));
        assert_eq!(board.status(StageId::ChatHistory), StageStatus::Complete);
    }

    #[test]
    fn failed_requires_processing() {
        let mut board = StageBoard::new();
        assert!(
            board
                .transition(StageId::AiGeneration, StageStatus::Failed)
                .is_err()
        );
        assert!(!board.is_failed());

        board
            .transition(StageId::AiGeneration, StageStatus::Processing)
            .unwrap();
        board
            .transition(StageId::AiGeneration, StageStatus::Failed)
            .unwrap();
        assert!(board.is_failed());
    }

    #[test]
    fn percent_never_decreases() {
        let mut board = StageBoard::new();
        board.advance_to(66);
        board.advance_to(33);
        assert_eq!(board.percent(), 66);
        board.advance_to(250);
        assert_eq!(board.percent(), 100);
        assert!(board.is_finished());
    }
}
