//! End-to-end session scenarios against a mock auth service.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stockgate::{
    AuthClient, AuthError, CredentialStore, LoginCredentials, RouteDecision, SessionManager,
    SessionState,
};

fn sample_user_json() -> serde_json::Value {
    json!({
        "id": 42,
        "username": "alice",
        "email": "alice@example.com",
        "first_name": "Alice",
        "last_name": "Nguyen",
        "role_id": 2,
        "is_verified": 1,
        "must_change_password": 0
    })
}

fn login_body() -> serde_json::Value {
    json!({
        "message": "Login successful",
        "accessToken": "at-1",
        "refreshToken": "rt-1",
        "user": sample_user_json()
    })
}

fn credentials() -> LoginCredentials {
    LoginCredentials {
        username: "alice".to_string(),
        password: "correct-horse".to_string(),
    }
}

fn session_for(base_url: &str, dir: &tempfile::TempDir) -> SessionManager {
    let store = CredentialStore::new(dir.path().to_path_buf());
    let api = AuthClient::new(base_url).expect("Failed to build auth client");
    let mut session = SessionManager::new(api, store);
    session.hydrate();
    session
}

#[tokio::test]
async fn test_login_success_persists_and_authenticates() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({
            "username": "alice",
            "password": "correct-horse"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    assert_eq!(session.state(), SessionState::Anonymous);

    let user = session.login(&credentials()).await.expect("login failed");
    assert_eq!(user.id, 42);
    assert!(session.is_authenticated());
    assert!(!session.is_loading());
    assert_eq!(session.user().map(|u| u.username.as_str()), Some("alice"));

    // Persisted state backs up the in-memory claim
    let store = session.store();
    assert_eq!(store.access_token().as_deref(), Some("at-1"));
    assert_eq!(store.refresh_token().as_deref(), Some("rt-1"));
    assert_eq!(store.user().map(|u| u.id), Some(42));
}

#[tokio::test]
async fn test_reload_rehydrates_same_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    session.login(&credentials()).await.unwrap();

    // Simulate an application reload: fresh manager, same store directory
    let mut reloaded = session_for(&server.uri(), &dir);
    assert_eq!(reloaded.state(), SessionState::Authenticated);
    assert_eq!(reloaded.user().map(|u| u.id), Some(42));

    // hydrate is idempotent
    reloaded.hydrate();
    assert_eq!(reloaded.state(), SessionState::Authenticated);
}

#[tokio::test]
async fn test_rejected_login_returns_server_message_and_leaves_store_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);

    let err = session
        .login(&LoginCredentials {
            username: "alice".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .expect_err("login should fail");

    assert!(matches!(err, AuthError::CredentialsInvalid(_)));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert_eq!(session.state(), SessionState::Anonymous);
    assert!(!session.is_loading());

    let store = session.store();
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
    assert_eq!(store.user(), None);
}

#[tokio::test]
async fn test_failed_login_preserves_existing_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "nope"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path().to_path_buf());
    store.set_tokens("at-old", "rt-old").unwrap();

    let mut session = session_for(&server.uri(), &dir);
    let _ = session.login(&credentials()).await;

    // Store is byte-identical to its pre-call state
    let store = session.store();
    assert_eq!(store.access_token().as_deref(), Some("at-old"));
    assert_eq!(store.refresh_token().as_deref(), Some("rt-old"));
}

#[tokio::test]
async fn test_unreachable_server_surfaces_network_failure() {
    // Nothing listens on port 9
    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for("http://127.0.0.1:9/api/auth", &dir);

    let err = session.login(&credentials()).await.expect_err("must fail");
    assert!(matches!(err, AuthError::NetworkFailure(_)));
    assert_eq!(err.to_string(), "Network request failed");
    assert_eq!(session.store().access_token(), None);
}

#[tokio::test]
async fn test_malformed_success_body_is_a_failure_not_a_panic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);

    let err = session.login(&credentials()).await.expect_err("must fail");
    assert!(matches!(err, AuthError::NetworkFailure(_)));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(session.store().access_token(), None);
}

#[tokio::test]
async fn test_logout_notifies_server_with_bearer_token_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(header("authorization", "Bearer at-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Logged out"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    session.login(&credentials()).await.unwrap();

    session.logout().await;

    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(session.user(), None);
    let store = session.store();
    assert_eq!(store.access_token(), None);
    assert_eq!(store.refresh_token(), None);
    assert_eq!(store.user(), None);
}

#[tokio::test]
async fn test_logout_clears_locally_even_when_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    session.login(&credentials()).await.unwrap();

    // Must not propagate the server error
    session.logout().await;

    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(session.store().access_token(), None);
    assert_eq!(session.store().refresh_token(), None);
    assert_eq!(session.store().user(), None);
}

#[tokio::test]
async fn test_refresh_rotates_access_token_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .and(body_json(json!({"refreshToken": "rt-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "at-2"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    session.login(&credentials()).await.unwrap();

    session.refresh_session().await.expect("refresh failed");

    // No visible state change; only the access token rotated
    assert_eq!(session.state(), SessionState::Authenticated);
    assert_eq!(session.store().access_token().as_deref(), Some("at-2"));
    assert_eq!(session.store().refresh_token().as_deref(), Some("rt-1"));
    assert_eq!(session.store().user().map(|u| u.id), Some(42));
}

#[tokio::test]
async fn test_rejected_refresh_logs_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Refresh token expired"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);
    session.login(&credentials()).await.unwrap();

    let err = session.refresh_session().await.expect_err("must fail");
    assert!(matches!(err, AuthError::SessionExpired));
    assert_eq!(session.state(), SessionState::Anonymous);

    // Store ends fully empty: no stale access token without a refresh path
    assert_eq!(session.store().access_token(), None);
    assert_eq!(session.store().refresh_token(), None);
    assert_eq!(session.store().user(), None);
}

#[tokio::test]
async fn test_refresh_without_refresh_token_is_logout_plus_failure() {
    let server = MockServer::start().await;

    let dir = tempfile::tempdir().unwrap();
    // Transient inconsistency: an access token with no refresh token
    let store = CredentialStore::new(dir.path().to_path_buf());
    store.set("access_token", "at-stale").unwrap();

    let mut session = session_for(&server.uri(), &dir);

    let err = session.refresh_session().await.expect_err("must fail");
    assert!(matches!(err, AuthError::SessionExpired));
    assert_eq!(session.state(), SessionState::Anonymous);
    assert_eq!(session.store().access_token(), None);
}

#[tokio::test]
async fn test_route_guard_follows_session_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server.uri(), &dir);

    assert_eq!(
        session.route("/inventory"),
        RouteDecision::RedirectToLogin {
            from: "/inventory".to_string()
        }
    );
    assert_eq!(session.route("/login"), RouteDecision::Render);

    session.login(&credentials()).await.unwrap();

    assert_eq!(session.route("/inventory"), RouteDecision::Render);
    assert_eq!(session.route("/login"), RouteDecision::RedirectToHome);
}
