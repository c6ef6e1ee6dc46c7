//! Callback handler tests: the one-shot exchange guard, terminal
//! navigation, and the end-to-end login scenarios.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

use spectre_client::api::AuthBackend;
use spectre_client::callback::{CallbackHandler, CallbackQuery, CallbackState};
use spectre_client::config::AppConfig;
use spectre_client::error::ApiError;
use spectre_client::identity::{is_admin, is_member, Identity, SessionStore};
use spectre_client::routes::Route;
use spectre_client::store::CredentialStore;

#[derive(Default)]
struct MockBackend {
    exchange_calls: AtomicUsize,
    me_calls: AtomicUsize,
    reject_exchange: AtomicBool,
    reject_me: AtomicBool,
    seen_state: Mutex<Option<String>>,
    block_exchange: AtomicBool,
    gate: Notify,
}

impl AuthBackend for MockBackend {
    async fn config(&self) -> Result<AppConfig, ApiError> {
        Ok(AppConfig::default())
    }

    async fn login_url(&self) -> Result<String, ApiError> {
        Ok("https://provider.test/oauth".into())
    }

    async fn exchange_code(&self, code: &str, state: Option<&str>) -> Result<String, ApiError> {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_state.lock() = state.map(str::to_string);
        if self.block_exchange.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        if self.reject_exchange.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 401, body: "Invalid state".into() });
        }
        assert_eq!(code, "abc123");
        Ok("tok1".into())
    }

    async fn me(&self, _token: &str) -> Result<Identity, ApiError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_me.load(Ordering::SeqCst) {
            return Err(ApiError::Status { status: 401, body: "unauthorized".into() });
        }
        Ok(Identity { id: 7, username: "Nova".into(), roles: vec!["ROLE_MEMBER".into()] })
    }
}

fn setup(dir: &std::path::Path) -> Arc<SessionStore<MockBackend>> {
    Arc::new(SessionStore::new(MockBackend::default(), CredentialStore::new(dir)))
}

fn query(code: Option<&str>, state: Option<&str>) -> CallbackQuery {
    CallbackQuery { code: code.map(str::to_string), state: state.map(str::to_string) }
}

#[tokio::test]
async fn successful_exchange_resolves_identity_and_goes_home() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    let handler = CallbackHandler::new(session.clone());

    let (state, nav) = handler.activate(&query(Some("abc123"), Some("xyz"))).await;

    assert_eq!(state, CallbackState::Resolved);
    assert_eq!(nav, Route::Home);
    assert_eq!(session.credential().as_deref(), Some("tok1"));
    let id = session.identity().unwrap();
    assert_eq!((id.id, id.username.as_str()), (7, "Nova"));
    assert_eq!(id.roles, vec!["ROLE_MEMBER".to_string()]);
    assert!(is_member(Some(&id)));
    assert!(!is_admin(Some(&id)));
    // The anti-forgery state parameter travelled with the exchange
    assert_eq!(session.backend().seen_state.lock().as_deref(), Some("xyz"));
}

#[tokio::test]
async fn missing_code_fails_without_any_network_call() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    let handler = CallbackHandler::new(session.clone());

    let (state, nav) = handler.activate(&query(None, Some("xyz"))).await;

    assert_eq!(state, CallbackState::Failed);
    assert_eq!(nav, Route::Home);
    assert_eq!(session.backend().exchange_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.backend().me_calls.load(Ordering::SeqCst), 0);
    assert_eq!(session.credential(), None);
}

#[tokio::test]
async fn second_activation_after_terminal_state_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    let handler = CallbackHandler::new(session.clone());
    let q = query(Some("abc123"), None);
    assert_eq!(handler.state(), CallbackState::Idle);

    let (first, _) = handler.activate(&q).await;
    assert_eq!(handler.state(), CallbackState::Resolved);
    let (second, nav) = handler.activate(&q).await;

    assert_eq!(first, CallbackState::Resolved);
    assert_eq!(second, CallbackState::Resolved);
    assert_eq!(nav, Route::Home);
    assert_eq!(session.backend().exchange_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn concurrent_double_activation_issues_one_exchange() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    session.backend().block_exchange.store(true, Ordering::SeqCst);
    let handler = CallbackHandler::new(session.clone());
    let q = query(Some("abc123"), None);

    // The first activation is parked inside the exchange when the second
    // one fires; the second must observe the guard and do nothing.
    let (first, second) = futures::join!(handler.activate(&q), async {
        tokio::task::yield_now().await;
        let out = handler.activate(&q).await;
        session.backend().gate.notify_one();
        out
    });

    assert_eq!(first.0, CallbackState::Resolved);
    assert_eq!(second.0, CallbackState::Exchanging);
    assert_eq!(session.backend().exchange_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn exchange_rejection_fails_and_leaves_session_untouched() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    session.backend().reject_exchange.store(true, Ordering::SeqCst);
    let handler = CallbackHandler::new(session.clone());

    let (state, nav) = handler.activate(&query(Some("abc123"), None)).await;

    assert_eq!(state, CallbackState::Failed);
    assert_eq!(nav, Route::Home);
    assert_eq!(session.credential(), None);
    assert_eq!(session.identity(), None);
}

#[tokio::test]
async fn exchange_success_with_unauthorized_me_keeps_credential() {
    let tmp = tempfile::tempdir().unwrap();
    let session = setup(tmp.path());
    session.backend().reject_me.store(true, Ordering::SeqCst);
    let handler = CallbackHandler::new(session.clone());

    let (state, _) = handler.activate(&query(Some("abc123"), None)).await;

    // The credential was installed; only the identity is missing, so all
    // capabilities read false.
    assert_eq!(state, CallbackState::Resolved);
    assert_eq!(session.credential().as_deref(), Some("tok1"));
    assert_eq!(session.identity(), None);
    assert!(!is_member(session.identity().as_ref()));
    assert!(!is_admin(session.identity().as_ref()));
}

#[test]
fn callback_query_parses_redirect_urls() {
    let q = CallbackQuery::from_url("https://app.test/auth/callback?code=abc%20123&state=xy%2Fz");
    assert_eq!(q.code.as_deref(), Some("abc 123"));
    assert_eq!(q.state.as_deref(), Some("xy/z"));

    let q = CallbackQuery::from_url("https://app.test/auth/callback?state=only");
    assert_eq!(q.code, None);
    assert_eq!(q.state.as_deref(), Some("only"));

    let q = CallbackQuery::from_url("https://app.test/auth/callback");
    assert_eq!(q.code, None);
    assert_eq!(q.state, None);

    // Fragments and unknown parameters are ignored
    let q = CallbackQuery::from_url("https://app.test/cb?code=abc&foo=bar#frag");
    assert_eq!(q.code.as_deref(), Some("abc"));
}
