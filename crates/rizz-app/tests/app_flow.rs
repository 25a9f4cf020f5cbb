use std::sync::Arc;

use pretty_assertions::assert_eq;
use rizz_analysis::{RunOutcome, SendError};
use rizz_app::{App, AppError, SendStatus};
use rizz_client::testing::StubBackend;
use rizz_client::{Backend, ClientError, RawContact, RawSearchHit, RawThread, RawUser};
use rizz_config::RizzConfig;
use rizz_core::{Contact, DirectoryMode, Screen, Session, StageId, StageStatus};
use serde_json::json;

fn contact(id: &str, username: &str) -> RawContact {
    RawContact {
        id: Some(id.to_string()),
        username: username.to_string(),
        ..Default::default()
    }
}

fn user_hit(username: &str) -> RawSearchHit {
    RawSearchHit::User(RawUser {
        username: username.to_string(),
        ..Default::default()
    })
}

fn stub() -> StubBackend {
    StubBackend::new()
        .with_account("operator", "hunter2", "tok-1")
        .with_contacts(vec![contact("t1", "sarah_j"), contact("t2", "alex")])
        .with_pending(vec![RawThread {
            id: "p1".into(),
            users: vec![RawUser {
                username: "new_friend".into(),
                ..Default::default()
            }],
            ..Default::default()
        }])
        .with_analysis(json!({
            "success": true,
            "rizz_score": 82,
            "pickup_lines": ["First line", "Second line"]
        }))
}

fn app_over(stub: &Arc<StubBackend>) -> App {
    App::new(
        Arc::clone(stub) as Arc<dyn Backend>,
        &RizzConfig::default(),
    )
}

async fn logged_in(stub: &Arc<StubBackend>) -> App {
    let app = app_over(stub);
    app.login("operator", "hunter2").await.unwrap();
    app.refresh().await.unwrap();
    app
}

fn listed(app: &App) -> Vec<String> {
    app.snapshot()
        .directory
        .contacts
        .into_iter()
        .map(|c| c.username)
        .collect()
}

fn sarah() -> Contact {
    Contact {
        id: Some("t1".into()),
        ..Contact::named("sarah_j")
    }
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_login_stays_on_login() {
    let stub = Arc::new(stub());
    let app = app_over(&stub);

    let err = app.login("operator", "wrong").await.unwrap_err();

    assert!(matches!(err, AppError::Auth(_)));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Login);
    assert_eq!(snapshot.login_error.as_deref(), Some("Login failed"));
    assert_eq!(snapshot.session_user, None);
    assert!(app.session().is_none());
}

#[tokio::test]
async fn login_enters_directory() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;

    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Directory);
    assert_eq!(snapshot.session_user.as_deref(), Some("operator"));
    assert_eq!(listed(&app), vec!["sarah_j", "alex"]);
    assert!(!snapshot.directory.loading);
}

#[tokio::test]
async fn resumed_session_skips_login() {
    let stub = Arc::new(stub());
    let app = app_over(&stub);

    app.resume(Session::new("tok-9", "operator")).unwrap();
    app.refresh().await.unwrap();

    assert_eq!(app.snapshot().screen(), Screen::Directory);
    assert_eq!(stub.tokens_seen(), vec!["tok-9"]);
    assert!(stub.calls_to("login").is_empty());
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[tokio::test]
async fn switching_mode_replaces_listing() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    app.search("sar").await.unwrap();

    app.switch_directory_mode(DirectoryMode::Pending).await.unwrap();

    let snapshot = app.snapshot();
    assert_eq!(snapshot.directory.mode, DirectoryMode::Pending);
    assert_eq!(snapshot.directory.query, "");
    assert_eq!(listed(&app), vec!["new_friend"]);
}

#[tokio::test]
async fn mode_switch_drops_old_listing_before_fetch_returns() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    let gate = stub.gate("list_pending_chats");
    let mut updates = app.subscribe();

    let switch = tokio::spawn({
        let app = app.clone();
        async move { app.switch_directory_mode(DirectoryMode::Pending).await }
    });
    while stub.calls_to("list_pending_chats").is_empty() {
        tokio::task::yield_now().await;
    }

    let mid = updates.borrow_and_update().clone();
    assert_eq!(mid.directory.mode, DirectoryMode::Pending);
    assert!(mid.directory.contacts.is_empty());
    assert_eq!(mid.directory.error, None);
    assert!(mid.directory.loading);

    gate.notify_one();
    switch.await.unwrap().unwrap();
    assert_eq!(listed(&app), vec!["new_friend"]);
}

#[tokio::test]
async fn mode_switch_wins_over_pending_inbox_fetch() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    let gate = stub.gate("list_contacts");
    let inbox_calls = stub.calls_to("list_contacts").len();

    let stale = tokio::spawn({
        let app = app.clone();
        async move { app.refresh().await }
    });
    while stub.calls_to("list_contacts").len() == inbox_calls {
        tokio::task::yield_now().await;
    }
    app.switch_directory_mode(DirectoryMode::Pending).await.unwrap();
    gate.notify_one();
    stale.await.unwrap().unwrap();

    assert_eq!(listed(&app), vec!["new_friend"]);
    assert!(!app.snapshot().directory.loading);
}

#[tokio::test]
async fn listing_failure_is_shown_once() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    stub.fail(
        "list_contacts",
        ClientError::Api {
            status: 401,
            message: "Invalid or expired session token.".into(),
        },
    );

    let err = app.refresh().await.unwrap_err();

    assert!(matches!(err, AppError::Directory(_)));
    let snapshot = app.snapshot();
    assert_eq!(
        snapshot.directory.error.as_deref(),
        Some("Invalid or expired session token.")
    );
    assert!(snapshot.directory.contacts.is_empty());
}

#[tokio::test]
async fn stale_search_never_reaches_snapshot() {
    let stub = Arc::new(
        stub()
            .with_search("a", vec![user_hit("from_a")])
            .with_search("ab", vec![user_hit("from_ab")]),
    );
    let gate_a = stub.gate("search:a");
    let app = logged_in(&stub).await;

    let first = tokio::spawn({
        let app = app.clone();
        async move { app.search("a").await }
    });
    while stub.calls_to("search_threads").is_empty() {
        tokio::task::yield_now().await;
    }
    app.search("ab").await.unwrap();
    gate_a.notify_one();
    first.await.unwrap().unwrap();

    assert_eq!(listed(&app), vec!["from_ab"]);
    assert_eq!(app.snapshot().directory.query, "ab");
}

#[tokio::test]
async fn intents_outside_their_screen_are_refused() {
    let stub = Arc::new(stub());
    let app = app_over(&stub);

    assert!(matches!(
        app.select_contact(sarah()),
        Err(AppError::WrongScreen {
            expected: Screen::Directory,
            actual: Screen::Login
        })
    ));
    assert!(matches!(
        app.regenerate_pickup_line(),
        Err(AppError::WrongScreen { .. })
    ));
    assert_eq!(app.snapshot().screen(), Screen::Login);
    assert!(stub.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_run_lands_on_results() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;

    let run = app.select_contact(sarah()).unwrap();
    let outcome = run.wait().await;

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Results);
    assert_eq!(snapshot.selected, Some(sarah()));
    assert_eq!(snapshot.result.as_ref().map(|r| r.rizz_score), Some(82));
    assert_eq!(snapshot.current_pickup_line(), Some("First line"));
    let board = snapshot.pipeline.expect("board published");
    assert_eq!(board.percent(), 100);
    assert!(board.stages().all(|(_, s)| s == StageStatus::Complete));
    assert!(snapshot.directory.contacts.is_empty());
}

#[tokio::test]
async fn failed_analysis_still_reaches_results() {
    let stub = Arc::new(stub().failing(
        "analyze_contact",
        ClientError::Api {
            status: 500,
            message: "Perplexity API error".into(),
        },
    ));
    let app = logged_in(&stub).await;

    let outcome = app.select_contact(sarah()).unwrap().wait().await;

    assert!(matches!(outcome, RunOutcome::Degraded { .. }));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Results);
    let result = snapshot.result.expect("degraded result shown");
    assert!(result.is_degraded());
    let board = snapshot.pipeline.expect("board published");
    assert!(board.is_failed());
    assert_eq!(board.status(StageId::ChatHistory), StageStatus::Failed);
}

#[tokio::test]
async fn back_during_run_discards_completion() {
    let stub = Arc::new(stub());
    let gate = stub.gate("analyze_contact");
    let app = logged_in(&stub).await;

    let run = app.select_contact(sarah()).unwrap();
    while stub.calls_to("analyze_contact").is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(app.snapshot().screen(), Screen::Analysis);

    assert_eq!(app.back().await, Screen::Directory);
    gate.notify_one();
    let outcome = run.wait().await;

    assert!(outcome.is_cancelled());
    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Directory);
    assert_eq!(snapshot.result, None);
    assert_eq!(snapshot.pipeline, None);
    assert_eq!(snapshot.selected, None);
    assert_eq!(listed(&app), vec!["sarah_j", "alex"]);
}

#[tokio::test]
async fn listing_landing_after_selection_stays_hidden() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    let gate = stub.gate("list_contacts");
    let inbox_calls = stub.calls_to("list_contacts").len();

    let late = tokio::spawn({
        let app = app.clone();
        async move { app.refresh().await }
    });
    while stub.calls_to("list_contacts").len() == inbox_calls {
        tokio::task::yield_now().await;
    }
    let run = app.select_contact(sarah()).unwrap();
    gate.notify_one();
    late.await.unwrap().unwrap();
    run.wait().await;

    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Results);
    assert!(snapshot.directory.contacts.is_empty());
    assert!(!snapshot.directory.loading);
}

#[tokio::test]
async fn new_chat_resolves_thread_then_analyses() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;

    let outcome = app.start_new_chat(&[7, 3]).await.unwrap().wait().await;

    assert!(!outcome.is_cancelled());
    let selected = app.snapshot().selected.expect("thread selected");
    assert_eq!(selected.username, "user3");
    assert_eq!(stub.calls_to("get_thread_by_participants")[0].detail, "3,7");
}

#[tokio::test]
async fn empty_new_chat_stays_in_directory() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;

    let err = app.start_new_chat(&[]).await.unwrap_err();

    assert!(matches!(err, AppError::Directory(_)));
    assert_eq!(app.snapshot().screen(), Screen::Directory);
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[tokio::test]
async fn regenerate_wraps_around() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;

    assert_eq!(app.regenerate_pickup_line().unwrap(), "Second line");
    assert_eq!(app.regenerate_pickup_line().unwrap(), "First line");
    assert_eq!(app.snapshot().cursor.index(), 0);
}

#[tokio::test]
async fn send_failure_keeps_result() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;
    let before = app.snapshot().result;
    stub.fail(
        "send_message",
        ClientError::Rejected("User 'sarah_j' not found.".into()),
    );

    let err = app.send_current_pickup_line().await.unwrap_err();

    assert!(matches!(err, AppError::Send(_)));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.result, before);
    assert_eq!(
        snapshot.send_status,
        Some(SendStatus::Failed("User 'sarah_j' not found.".into()))
    );
    assert_eq!(snapshot.screen(), Screen::Results);
}

#[tokio::test]
async fn placeholder_line_is_never_sent_after_failed_run() {
    let stub = Arc::new(stub().failing(
        "analyze_contact",
        ClientError::Api {
            status: 500,
            message: "Perplexity API error".into(),
        },
    ));
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;
    let before = app.snapshot().result;

    let err = app.send_current_pickup_line().await.unwrap_err();

    assert!(matches!(err, AppError::Send(SendError::NoPickupLine)));
    assert!(stub.calls_to("send_message").is_empty());
    let snapshot = app.snapshot();
    assert_eq!(snapshot.result, before);
    assert!(matches!(snapshot.send_status, Some(SendStatus::Failed(_))));
}

#[tokio::test]
async fn placeholder_line_is_never_sent_when_analysis_had_none() {
    let stub = Arc::new(stub().with_analysis(json!({
        "success": true,
        "rizz_score": 64,
        "pickup_lines": []
    })));
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;

    let err = app.send_current_pickup_line().await.unwrap_err();

    assert!(matches!(err, AppError::Send(SendError::NoPickupLine)));
    assert!(stub.calls_to("send_message").is_empty());
}

#[tokio::test]
async fn send_uses_current_line() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;

    app.send_current_pickup_line().await.unwrap();

    assert_eq!(app.snapshot().send_status, Some(SendStatus::Sent));
    assert_eq!(stub.calls_to("send_message")[0].detail, "sarah_j");
}

#[tokio::test]
async fn retry_reruns_for_same_contact() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;
    app.select_contact(sarah()).unwrap().wait().await;
    app.regenerate_pickup_line().unwrap();

    app.retry_analysis().unwrap().wait().await;

    let snapshot = app.snapshot();
    assert_eq!(snapshot.screen(), Screen::Results);
    assert_eq!(snapshot.cursor.index(), 0);
    assert_eq!(stub.calls_to("analyze_contact").len(), 2);
}

// ---------------------------------------------------------------------------
// Back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn back_to_login_clears_session() {
    let stub = Arc::new(stub());
    let app = logged_in(&stub).await;

    assert_eq!(app.back().await, Screen::Login);

    let snapshot = app.snapshot();
    assert_eq!(snapshot.session_user, None);
    assert!(snapshot.directory.contacts.is_empty());
    assert!(app.session().is_none());
    assert!(matches!(app.refresh().await, Err(AppError::WrongScreen { .. })));
}
