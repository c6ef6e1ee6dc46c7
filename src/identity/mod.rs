//! Identity and session state for the client: the resolved user record, the
//! closed role vocabulary driving the capability gate, and the process-wide
//! session service. Keep the public surface thin and split implementation
//! across sub-modules.

mod principal;
mod roles;
mod session;

pub use principal::Identity;
pub use roles::{has_role, is_admin, is_member, Role};
pub use session::SessionStore;
