use std::sync::Arc;

use rizz_client::{AnalyzeRequest, Backend};
use rizz_config::AnalysisConfig;
use rizz_core::{AnalysisResult, Contact, Session, StageId, StageStatus};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::{adapter::adapt, board::StageBoard, error::AnalysisError};

/// Receives the observable effects of a run.
///
/// Both callbacks run synchronously on the pipeline's task and are never
/// invoked once the run's liveness token is cancelled.
pub trait PipelineObserver: Send + Sync {
    /// Stage statuses or progress changed.
    fn on_progress(&self, board: &StageBoard);

    /// The run finished with a result, possibly degraded. Called at most once.
    fn on_complete(&self, result: &AnalysisResult);
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Completed(AnalysisResult),
    /// The backend failed; the degraded result was delivered instead.
    Degraded {
        result: AnalysisResult,
        error: AnalysisError,
    },
    /// The liveness token was cancelled. Nothing further was applied.
    Cancelled,
}

impl RunOutcome {
    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Completed(result) | Self::Degraded { result, .. } => Some(result),
            Self::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Drives one remote analysis call through the three stages.
pub struct AnalysisPipeline {
    backend: Arc<dyn Backend>,
    config: AnalysisConfig,
}

/// Marker for "liveness token cancelled", used to unwind with `?`.
struct Cancelled;

/// The single apply point: every observer call goes through here and is
/// skipped once the token is cancelled.
struct Emitter<'a> {
    liveness: &'a CancellationToken,
    observer: &'a dyn PipelineObserver,
    board: StageBoard,
}

impl Emitter<'_> {
    fn apply(&mut self, steps: &[(StageId, StageStatus)], percent: u8) -> Result<(), Cancelled> {
        if self.liveness.is_cancelled() {
            return Err(Cancelled);
        }
        for &(stage, status) in steps {
            if let Err(error) = self.board.transition(stage, status) {
                tracing::error!(%error, "pipeline skipped an invalid stage transition");
            }
        }
        self.board.advance_to(percent);
        self.observer.on_progress(&self.board);
        Ok(())
    }

    fn complete(&self, result: &AnalysisResult) -> Result<(), Cancelled> {
        if self.liveness.is_cancelled() {
            return Err(Cancelled);
        }
        self.observer.on_complete(result);
        Ok(())
    }
}

impl AnalysisPipeline {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: AnalysisConfig) -> Self {
        Self { backend, config }
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the analysis for `contact`.
    ///
    /// Emits progress at the configured checkpoints and delivers the result
    /// (or the degraded result on failure) through `observer`. The backend is
    /// called once. When `liveness` is cancelled the in-flight request is
    /// dropped and nothing further reaches the observer.
    pub async fn run(
        &self,
        session: &Session,
        contact: &Contact,
        liveness: &CancellationToken,
        observer: &dyn PipelineObserver,
    ) -> RunOutcome {
        let mut emitter = Emitter {
            liveness,
            observer,
            board: StageBoard::new(),
        };
        match self.drive(session, contact, &mut emitter).await {
            Ok(outcome) => outcome,
            Err(Cancelled) => {
                tracing::debug!(contact = %contact.username, "analysis run cancelled");
                RunOutcome::Cancelled
            }
        }
    }

    async fn drive(
        &self,
        session: &Session,
        contact: &Contact,
        emitter: &mut Emitter<'_>,
    ) -> Result<RunOutcome, Cancelled> {
        let checkpoints = self.config.checkpoints;
        emitter.apply(
            &[(StageId::ChatHistory, StageStatus::Processing)],
            checkpoints.start,
        )?;

        let request = AnalyzeRequest {
            session_token: session.token().to_string(),
            username: contact.username.clone(),
            thread_id: contact.id.clone().filter(|id| !id.is_empty()),
        };
        let response = tokio::select! {
            biased;
            () = emitter.liveness.cancelled() => return Err(Cancelled),
            response = self.backend.analyze_contact(&request) => response,
        };

        match response.map_err(AnalysisError::from).and_then(reject_unsuccessful) {
            Ok(payload) => {
                emitter.apply(
                    &[(StageId::ChatHistory, StageStatus::Complete)],
                    checkpoints.chat_history,
                )?;
                emitter.apply(
                    &[
                        (StageId::ProfileScan, StageStatus::Processing),
                        (StageId::ProfileScan, StageStatus::Complete),
                    ],
                    checkpoints.profile_scan,
                )?;
                emitter.apply(
                    &[(StageId::AiGeneration, StageStatus::Processing)],
                    checkpoints.generation,
                )?;
                let result = adapt(&payload, &contact.username, &self.config.placeholder_line);
                emitter.apply(
                    &[(StageId::AiGeneration, StageStatus::Complete)],
                    checkpoints.done,
                )?;
                emitter.complete(&result)?;
                Ok(RunOutcome::Completed(result))
            }
            Err(error) => {
                tracing::warn!(%error, contact = %contact.username, "analysis failed; using degraded result");
                let result = AnalysisResult::degraded(&self.config.placeholder_line);
                let failing = emitter.board.active().unwrap_or(StageId::ChatHistory);
                emitter.apply(&[(failing, StageStatus::Failed)], checkpoints.done)?;
                emitter.complete(&result)?;
                Ok(RunOutcome::Degraded { result, error })
            }
        }
    }
}

/// Treat a `success: false` payload as a failure.
fn reject_unsuccessful(payload: Value) -> Result<Value, AnalysisError> {
    if payload.get("success").and_then(Value::as_bool) == Some(false) {
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(AnalysisError::Rejected(message));
    }
    Ok(payload)
}
