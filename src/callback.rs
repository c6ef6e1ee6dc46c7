//! One-shot OAuth callback handler. Instantiated once per redirect-back
//! navigation; exchanges the provider's authorization code for a credential
//! exactly once, hands it to the session, and always ends up back home.
//!
//! Authorization codes are single-use, so a second activation (the hosting
//! view being mounted or rendered twice for the same redirect) must not
//! produce a second exchange request. The attempted flag is checked-and-set
//! under a lock before any await point, which makes the guard race-free
//! under re-entrant scheduling.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::api::AuthBackend;
use crate::identity::SessionStore;
use crate::routes::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackState {
    Idle,
    Exchanging,
    /// Terminal: credential installed and identity refresh completed.
    Resolved,
    /// Terminal: missing code, provider rejection, or transport failure.
    Failed,
}

/// Query parameters carried back by the provider redirect.
#[derive(Debug, Clone, Default)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

impl CallbackQuery {
    /// Parse the query portion of a redirect URL (`?code=..&state=..`).
    /// Unknown parameters are ignored.
    pub fn from_url(url: &str) -> Self {
        let mut out = Self::default();
        let Some((_, query)) = url.split_once('?') else { return out };
        let query = query.split('#').next().unwrap_or(query);
        for pair in query.split('&') {
            let (k, v) = match pair.split_once('=') {
                Some((k, v)) => (k, v),
                None => (pair, ""),
            };
            let v = urlencoding::decode(v).map(|c| c.into_owned()).unwrap_or_default();
            match k {
                "code" if !v.is_empty() => out.code = Some(v),
                "state" if !v.is_empty() => out.state = Some(v),
                _ => {}
            }
        }
        out
    }
}

pub struct CallbackHandler<B: AuthBackend> {
    session: Arc<SessionStore<B>>,
    state: Mutex<CallbackState>,
}

impl<B: AuthBackend> CallbackHandler<B> {
    pub fn new(session: Arc<SessionStore<B>>) -> Self {
        Self { session, state: Mutex::new(CallbackState::Idle) }
    }

    pub fn state(&self) -> CallbackState {
        *self.state.lock()
    }

    /// Run the exchange for this redirect. Returns the handler state after
    /// this activation together with the view to navigate to; terminal
    /// states always navigate home. Re-activation while exchanging or after
    /// a terminal state is a no-op and reports the current state.
    pub async fn activate(&self, query: &CallbackQuery) -> (CallbackState, Route) {
        {
            let mut st = self.state.lock();
            match *st {
                CallbackState::Idle => {
                    if query.code.is_none() {
                        // No code in the redirect: fail without any network
                        warn!("auth callback without code parameter");
                        *st = CallbackState::Failed;
                        return (CallbackState::Failed, Route::Home);
                    }
                    *st = CallbackState::Exchanging;
                }
                current => return (current, Route::Home),
            }
        }
        let Some(code) = query.code.as_deref() else {
            // Unreachable: the guard above only proceeds with a code present
            return (CallbackState::Failed, Route::Home);
        };

        let next = match self.session.backend().exchange_code(code, query.state.as_deref()).await {
            Ok(token) => {
                self.session.set_credential(Some(token)).await;
                self.session.refresh_identity().await;
                info!("auth callback exchange completed");
                CallbackState::Resolved
            }
            Err(e) => {
                // Logged only; the user is sent home either way
                warn!("auth callback exchange failed: {}", e);
                CallbackState::Failed
            }
        };
        *self.state.lock() = next;
        (next, Route::Home)
    }
}
