use std::sync::{Arc, Mutex, PoisonError};

use rizz_analysis::{
    AnalysisPipeline, PipelineObserver, RunOutcome, SendError, StageBoard, send_pickup_line,
};
use rizz_auth::{SessionStore, authenticate};
use rizz_client::Backend;
use rizz_config::RizzConfig;
use rizz_core::{AnalysisResult, Contact, DirectoryMode, PickupCursor, Screen, Session};
use rizz_directory::{DirectorySync, Listing};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    error::AppError,
    navigator::Preconditions,
    state::{AppSnapshot, SendStatus},
};

/// Intent handler for the four screens.
///
/// Every state change is applied inside [`watch::Sender::send_modify`], so a
/// check of liveness (listing ticket or run token) and the write it guards
/// happen under one lock. Cloning is cheap and shares all state.
#[derive(Clone)]
pub struct App {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn Backend>,
    sessions: SessionStore,
    directory: DirectorySync,
    pipeline: AnalysisPipeline,
    state: watch::Sender<AppSnapshot>,
    /// Liveness token of the current analysis run.
    run: Mutex<Option<CancellationToken>>,
}

/// Handle to a spawned analysis run.
#[derive(Debug)]
pub struct AnalysisRun {
    handle: JoinHandle<RunOutcome>,
}

impl AnalysisRun {
    /// Wait for the run to finish. A panicked or aborted task counts as
    /// cancelled.
    pub async fn wait(self) -> RunOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(%error, "analysis task did not finish");
                RunOutcome::Cancelled
            }
        }
    }
}

impl App {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: &RizzConfig) -> Self {
        let (state, _) = watch::channel(AppSnapshot::default());
        Self {
            inner: Arc::new(Inner {
                directory: DirectorySync::new(Arc::clone(&backend), config.directory.clone()),
                pipeline: AnalysisPipeline::new(Arc::clone(&backend), config.analysis.clone()),
                backend,
                sessions: SessionStore::new(),
                state,
                run: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to snapshot updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.inner.state.subscribe()
    }

    /// A copy of the current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> AppSnapshot {
        self.inner.state.borrow().clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.sessions.current()
    }

    // ---------------------------------------------------------------------
    // Login
    // ---------------------------------------------------------------------

    /// Authenticate and enter the directory.
    ///
    /// On failure the message is shown on the login screen and no session
    /// is stored. The first listing is not loaded; call [`App::refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] if authentication fails, or
    /// [`AppError::WrongScreen`] outside the login screen.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        self.require_screen(Screen::Login)?;
        self.inner.state.send_modify(|s| s.login_error = None);

        match authenticate(
            self.inner.backend.as_ref(),
            &self.inner.sessions,
            username,
            password,
        )
        .await
        {
            Ok(session) => {
                self.enter_directory(&session)?;
                Ok(session)
            }
            Err(error) => {
                self.inner
                    .state
                    .send_modify(|s| s.login_error = Some(error.to_string()));
                Err(error.into())
            }
        }
    }

    /// Enter the directory with a previously persisted session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::WrongScreen`] outside the login screen.
    pub fn resume(&self, session: Session) -> Result<(), AppError> {
        self.require_screen(Screen::Login)?;
        self.inner.sessions.set(session.clone());
        self.enter_directory(&session)
    }

    fn enter_directory(&self, session: &Session) -> Result<(), AppError> {
        let mut outcome = Ok(());
        self.inner.state.send_modify(|s| {
            outcome = s.navigator.advance(
                Screen::Directory,
                Preconditions {
                    authenticated: true,
                    ..Preconditions::default()
                },
            );
            if outcome.is_ok() {
                s.session_user = Some(session.username.clone());
                s.login_error = None;
            }
        });
        outcome.map_err(AppError::from)
    }

    // ---------------------------------------------------------------------
    // Directory
    // ---------------------------------------------------------------------

    /// Switch between inbox and pending. Clears the query and replaces the
    /// listing.
    ///
    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn switch_directory_mode(&self, mode: DirectoryMode) -> Result<(), AppError> {
        self.require_screen(Screen::Directory)?;
        self.inner.state.send_modify(|s| {
            s.directory.mode = mode;
            s.directory.query.clear();
            s.directory.contacts.clear();
            s.directory.error = None;
        });
        self.refresh().await
    }

    /// Search within the directory. A blank query shows the mode's listing.
    ///
    /// # Errors
    ///
    /// See [`App::refresh`].
    pub async fn search(&self, query: &str) -> Result<(), AppError> {
        self.require_screen(Screen::Directory)?;
        self.inner
            .state
            .send_modify(|s| s.directory.query = query.trim().to_string());
        self.refresh().await
    }

    /// Reload the listing for the current mode and query.
    ///
    /// A result that was superseded by a later request is dropped silently
    /// and returns `Ok`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Auth`] without a session.
    /// - [`AppError::Directory`] if the current request failed; the message
    ///   is also shown in the snapshot.
    pub async fn refresh(&self) -> Result<(), AppError> {
        self.require_screen(Screen::Directory)?;
        let session = self.inner.sessions.require()?;
        let (mode, query) = {
            let snapshot = self.inner.state.borrow();
            (snapshot.directory.mode, snapshot.directory.query.clone())
        };
        self.inner.state.send_modify(|s| s.directory.loading = true);

        let Listing::Current { ticket, result } =
            self.inner.directory.sync(&session, mode, &query).await
        else {
            return Ok(());
        };

        let mut applied = false;
        self.inner.state.send_modify(|s| {
            if !self.inner.directory.is_current(ticket) {
                return;
            }
            applied = true;
            s.directory.loading = false;
            match &result {
                Ok(contacts) => {
                    s.directory.contacts.clone_from(contacts);
                    s.directory.error = None;
                }
                Err(error) => {
                    s.directory.contacts.clear();
                    s.directory.error = Some(
                        error
                            .backend_message()
                            .map_or_else(|| error.to_string(), str::to_string),
                    );
                }
            }
        });
        if !applied {
            return Ok(());
        }
        result.map(drop).map_err(AppError::from)
    }

    /// Resolve a thread for `participant_ids` and start analysing it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Directory`] if the ids are empty or resolution
    /// fails, plus everything [`App::select_contact`] returns.
    pub async fn start_new_chat(&self, participant_ids: &[u64]) -> Result<AnalysisRun, AppError> {
        self.require_screen(Screen::Directory)?;
        let session = self.inner.sessions.require()?;
        let contact = self
            .inner
            .directory
            .resolve_or_create_thread(&session, participant_ids)
            .await?;
        self.select_contact(contact)
    }

    /// Open `contact` and run its analysis in the background.
    ///
    /// Leaving the directory supersedes any listing still in flight.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Auth`] without a session, or
    /// [`AppError::WrongScreen`] outside the directory.
    pub fn select_contact(&self, contact: Contact) -> Result<AnalysisRun, AppError> {
        self.require_screen(Screen::Directory)?;
        let session = self.inner.sessions.require()?;
        let mut outcome = Ok(());
        self.inner.state.send_modify(|s| {
            outcome = s.navigator.advance(
                Screen::Analysis,
                Preconditions {
                    authenticated: true,
                    contact_selected: true,
                    result_ready: false,
                },
            );
            if outcome.is_ok() {
                s.clear_selection();
                s.selected = Some(contact.clone());
                s.pipeline = Some(StageBoard::new());
                s.directory.contacts.clear();
                s.directory.loading = false;
                self.inner.directory.invalidate();
            }
        });
        outcome?;
        Ok(self.start_run(session, contact))
    }

    // ---------------------------------------------------------------------
    // Results
    // ---------------------------------------------------------------------

    /// Rerun the analysis for the selected contact.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoSelection`] without a selected contact, or
    /// [`AppError::WrongScreen`] outside the results screen.
    pub fn retry_analysis(&self) -> Result<AnalysisRun, AppError> {
        self.require_screen(Screen::Results)?;
        let session = self.inner.sessions.require()?;
        let mut outcome = Err(AppError::NoSelection);
        self.inner.state.send_modify(|s| {
            let Some(contact) = s.selected.clone() else {
                return;
            };
            outcome = s
                .navigator
                .advance(
                    Screen::Analysis,
                    Preconditions {
                        authenticated: true,
                        contact_selected: true,
                        result_ready: false,
                    },
                )
                .map(|()| contact)
                .map_err(AppError::from);
            if outcome.is_ok() {
                s.result = None;
                s.cursor = PickupCursor::default();
                s.send_status = None;
                s.pipeline = Some(StageBoard::new());
            }
        });
        let contact = outcome?;
        Ok(self.start_run(session, contact))
    }

    /// Show the next pickup line, wrapping after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoResult`] before a result exists.
    pub fn regenerate_pickup_line(&self) -> Result<String, AppError> {
        self.require_screen(Screen::Results)?;
        let mut line = None;
        self.inner.state.send_modify(|s| {
            if let Some(result) = &s.result {
                s.cursor.advance(&result.pickup_lines);
                s.send_status = None;
                line = Some(s.cursor.current(&result.pickup_lines).to_string());
            }
        });
        line.ok_or(AppError::NoResult)
    }

    /// Send the pickup line currently shown to the selected contact.
    ///
    /// A failure is recorded in the snapshot and never touches the result.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Send`] if the send fails or the result only holds
    /// the placeholder line, [`AppError::NoResult`] before a result exists.
    pub async fn send_current_pickup_line(&self) -> Result<(), AppError> {
        self.require_screen(Screen::Results)?;
        let session = self.inner.sessions.require()?;
        let (contact, line, sendable) = {
            let snapshot = self.inner.state.borrow();
            let contact = snapshot.selected.clone().ok_or(AppError::NoSelection)?;
            let result = snapshot.result.as_ref().ok_or(AppError::NoResult)?;
            let line = snapshot
                .current_pickup_line()
                .ok_or(AppError::NoResult)?
                .to_string();
            (contact, line, result.has_sendable_lines())
        };

        let sent = if sendable {
            send_pickup_line(self.inner.backend.as_ref(), &session, &contact, &line).await
        } else {
            tracing::debug!(contact = %contact.username, "refusing to send placeholder line");
            Err(SendError::NoPickupLine)
        };
        let status = match &sent {
            Ok(()) => SendStatus::Sent,
            Err(error) => SendStatus::Failed(
                error
                    .backend_message()
                    .map_or_else(|| error.to_string(), str::to_string),
            ),
        };
        self.inner.state.send_modify(|s| {
            if s.screen() == Screen::Results {
                s.send_status = Some(status);
            }
        });
        Ok(sent?)
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    /// Go back one screen.
    ///
    /// Cancels any analysis run first. Returning to the directory reloads
    /// the listing; returning to login clears the session.
    pub async fn back(&self) -> Screen {
        let mut screen = Screen::Login;
        self.inner.state.send_modify(|s| {
            if let Some(run) = self.take_run() {
                run.cancel();
            }
            let from = s.screen();
            screen = s.navigator.back();
            match (from, screen) {
                (Screen::Directory, Screen::Login) => {
                    self.inner.sessions.clear();
                    self.inner.directory.invalidate();
                    *s = AppSnapshot::default();
                }
                (Screen::Analysis | Screen::Results, Screen::Directory) => s.clear_selection(),
                _ => {}
            }
        });
        tracing::debug!(screen = screen.as_str(), "navigated back");

        if screen == Screen::Directory {
            if let Err(error) = self.refresh().await {
                tracing::debug!(%error, "directory reload after back failed");
            }
        }
        screen
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn require_screen(&self, expected: Screen) -> Result<(), AppError> {
        let actual = self.inner.state.borrow().screen();
        if actual == expected {
            Ok(())
        } else {
            Err(AppError::WrongScreen { expected, actual })
        }
    }

    fn take_run(&self) -> Option<CancellationToken> {
        self.inner
            .run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn start_run(&self, session: Session, contact: Contact) -> AnalysisRun {
        let liveness = CancellationToken::new();
        let previous = self
            .inner
            .run
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(liveness.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        let observer = RunObserver {
            app: self.clone(),
            liveness,
        };
        let handle = tokio::spawn(async move {
            let inner = &observer.app.inner;
            let thread = async {
                let view = inner.directory.open_thread(&session, contact.clone()).await;
                observer.apply(|s| s.thread = view.messages);
            };
            let run = inner
                .pipeline
                .run(&session, &contact, &observer.liveness, &observer);
            let ((), outcome) = tokio::join!(thread, run);
            outcome
        });
        AnalysisRun { handle }
    }
}

/// Applies pipeline effects to the snapshot while the run is still live.
struct RunObserver {
    app: App,
    liveness: CancellationToken,
}

impl RunObserver {
    fn apply(&self, change: impl FnOnce(&mut AppSnapshot)) {
        self.app.inner.state.send_modify(|s| {
            if !self.liveness.is_cancelled() {
                change(s);
            }
        });
    }
}

impl PipelineObserver for RunObserver {
    fn on_progress(&self, board: &StageBoard) {
        self.apply(|s| s.pipeline = Some(board.clone()));
    }

    fn on_complete(&self, result: &AnalysisResult) {
        self.apply(|s| {
            s.result = Some(result.clone());
            s.cursor = PickupCursor::default();
            if let Err(error) = s.navigator.advance(
                Screen::Results,
                Preconditions {
                    authenticated: true,
                    contact_selected: true,
                    result_ready: true,
                },
            ) {
                tracing::error!(%error, "analysis finished off the analysis screen");
            }
        });
    }
}
