//! Process-wide session service: owns the (credential, identity) pair,
//! persists credential changes, and resolves identities through the backend.
//! Constructed once at startup and injected into consumers; no globals.

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::api::AuthBackend;
use crate::store::CredentialStore;

use super::Identity;

#[derive(Debug, Default)]
struct Inner {
    credential: Option<String>,
    identity: Option<Identity>,
}

pub struct SessionStore<B: AuthBackend> {
    backend: B,
    store: CredentialStore,
    inner: RwLock<Inner>,
}

impl<B: AuthBackend> SessionStore<B> {
    pub fn new(backend: B, store: CredentialStore) -> Self {
        Self { backend, store, inner: RwLock::new(Inner::default()) }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Startup path: adopt the persisted credential (if any) and resolve it.
    pub async fn load_persisted(&self) {
        if let Some(tok) = self.store.load() {
            self.inner.write().credential = Some(tok.clone());
            self.resolve_for(tok).await;
        }
    }

    pub fn credential(&self) -> Option<String> {
        self.inner.read().credential.clone()
    }

    /// Current resolved identity; `None` both when unauthenticated and while
    /// resolution is pending or has failed.
    pub fn identity(&self) -> Option<Identity> {
        self.inner.read().identity.clone()
    }

    /// Install a new credential (persist first, then resolve) or clear the
    /// session entirely (`None` = logout: memory and durable slot). The
    /// persistence write completes before any resolution is in flight, so a
    /// reload right after login always sees the credential.
    pub async fn set_credential(&self, token: Option<String>) {
        match token {
            Some(tok) => {
                if let Err(e) = self.store.save(Some(&tok)) {
                    warn!("failed to persist credential: {}", e);
                }
                {
                    let mut g = self.inner.write();
                    g.credential = Some(tok.clone());
                    // New credential invalidates the previous identity until
                    // resolution completes
                    g.identity = None;
                }
                self.resolve_for(tok).await;
            }
            None => {
                if let Err(e) = self.store.save(None) {
                    warn!("failed to clear persisted credential: {}", e);
                }
                let mut g = self.inner.write();
                g.credential = None;
                g.identity = None;
            }
        }
    }

    /// Re-run identity resolution against the current credential without
    /// changing it; used after actions that may alter server-side roles.
    /// With no credential present, no resolution fires.
    pub async fn refresh_identity(&self) {
        let tok = self.credential();
        match tok {
            Some(tok) => self.resolve_for(tok).await,
            None => self.inner.write().identity = None,
        }
    }

    /// Resolve `tok` and apply the result only if `tok` is still the current
    /// credential. The tag comparison (not locking) is what discards stale
    /// responses that arrive after a logout or a newer login.
    async fn resolve_for(&self, tok: String) {
        let resolved = match self.backend.me(&tok).await {
            Ok(id) => Some(id),
            Err(e) => {
                // Resolution failure clears the identity only; the credential
                // stays put (even on a definitive 401) and will be retried on
                // the next reload.
                debug!("identity resolution failed: {}", e);
                None
            }
        };
        let mut g = self.inner.write();
        if g.credential.as_deref() == Some(tok.as_str()) {
            g.identity = resolved;
        } else {
            debug!("discarding stale identity resolution");
        }
    }
}
