use serde::{Deserialize, Serialize};

/// Resolved user record derived from a credential via the backend's `/api/me`.
/// Never persisted; recomputed whenever the credential changes. Raw role
/// strings are kept as the backend sent them (the admin user table displays
/// them verbatim); all gating goes through the `Role` enum instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}
