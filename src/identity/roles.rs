//! Capability gate: pure predicates turning a role set into named
//! capabilities. Roles are a closed enumeration with one normalization +
//! membership function; gating for the UI never compares raw strings at
//! call sites. Advisory only: the backend enforces authorization on every
//! sensitive request regardless of what the client shows.

use super::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Member,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "MEMBER",
            Role::Admin => "ADMIN",
        }
    }

    /// Case-insensitive match against a raw role string. The backend emits
    /// Spring-style `ROLE_MEMBER` / `ROLE_ADMIN`; the bare spelling must
    /// gate the same way, so the prefix is stripped before comparing.
    /// Unrecognized strings match no role and are ignored by the gate.
    pub fn matches(&self, raw: &str) -> bool {
        let upper = raw.to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        bare == self.as_str()
    }
}

/// False for a missing identity; otherwise a case-insensitive membership
/// test over the identity's raw role strings.
pub fn has_role(identity: Option<&Identity>, role: Role) -> bool {
    match identity {
        Some(id) => id.roles.iter().any(|r| role.matches(r)),
        None => false,
    }
}

/// Member capability: admins are implicitly members.
pub fn is_member(identity: Option<&Identity>) -> bool {
    has_role(identity, Role::Member) || has_role(identity, Role::Admin)
}

pub fn is_admin(identity: Option<&Identity>) -> bool {
    has_role(identity, Role::Admin)
}
