use pretty_assertions::assert_eq;
use rizz_auth::{AuthError, FALLBACK_LOGIN_MESSAGE, SessionStore, authenticate};
use rizz_client::{Backend, ClientError, testing::StubBackend};

fn stub() -> StubBackend {
    StubBackend::new().with_account("operator", "hunter2", "tok-1")
}

#[tokio::test]
async fn successful_login_stores_session() {
    let backend = stub();
    let store = SessionStore::new();

    let session = authenticate(&backend, &store, "operator", "hunter2")
        .await
        .expect("login succeeds");

    assert_eq!(session.token(), "tok-1");
    assert_eq!(session.username, "operator");
    assert_eq!(store.require().unwrap().token(), "tok-1");
}

#[tokio::test]
async fn stored_token_is_attached_until_cleared() {
    let backend = stub();
    let store = SessionStore::new();
    authenticate(&backend, &store, "operator", "hunter2")
        .await
        .unwrap();

    let token = store.require().unwrap().token().to_string();
    backend.list_contacts(&token, 20).await.unwrap();
    backend.list_pending_chats(&token, 20).await.unwrap();
    assert_eq!(backend.tokens_seen(), vec!["tok-1", "tok-1"]);

    store.clear();
    assert!(matches!(store.require(), Err(AuthError::NotAuthenticated)));
}

#[tokio::test]
async fn rejected_login_uses_fallback_message() {
    let backend = stub();
    let store = SessionStore::new();

    let err = authenticate(&backend, &store, "operator", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::LoginRejected(ref m) if m == FALLBACK_LOGIN_MESSAGE));
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn rejected_login_surfaces_backend_message() {
    let backend = stub().failing(
        "login",
        ClientError::Rejected("challenge_required".into()),
    );
    let store = SessionStore::new();

    let err = authenticate(&backend, &store, "operator", "hunter2")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "challenge_required");
    assert!(store.current().is_none());
}

#[tokio::test]
async fn blank_credentials_never_reach_backend() {
    let backend = stub();
    let store = SessionStore::new();

    let err = authenticate(&backend, &store, "  ", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmptyCredential { field: "username" }));

    let err = authenticate(&backend, &store, "operator", "")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::EmptyCredential { field: "password" }));

    assert!(backend.calls().is_empty());
}
