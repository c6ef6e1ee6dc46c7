//! Navigation surface and page guards: the consumers of the capability gate.
//! Guards short-circuit with `Forbidden` and never touch the network; the
//! backend independently enforces authorization on every sensitive request.

use crate::identity::{has_role, is_admin, is_member, Identity, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Ships,
    Images,
    Posts,
    Compare,
    Commodities,
    Earnings,
    AdminUsers,
    AuthCallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Forbidden,
}

impl Route {
    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Ships => "Ships",
            Route::Images => "Images",
            Route::Posts => "Posts",
            Route::Compare => "Compare",
            Route::Commodities => "Commodities",
            Route::Earnings => "Earnings",
            Route::AdminUsers => "Admin",
            Route::AuthCallback => "Completing login",
        }
    }

    /// Page-level gate for a route given the current identity.
    pub fn guard(&self, identity: Option<&Identity>) -> Access {
        let ok = match self {
            Route::Home | Route::Ships | Route::Images | Route::Posts | Route::AuthCallback => true,
            // Compare is the one member-or-admin tool; the trading tools
            // check the member role alone, as the original nav did
            Route::Compare => is_member(identity),
            Route::Commodities | Route::Earnings => has_role(identity, Role::Member),
            Route::AdminUsers => is_admin(identity),
        };
        if ok { Access::Granted } else { Access::Forbidden }
    }
}

/// Navigation links shown for the given identity, in display order. The
/// callback route is never a link; it only exists as a redirect target.
pub fn visible_routes(identity: Option<&Identity>) -> Vec<Route> {
    [
        Route::Home,
        Route::Ships,
        Route::Images,
        Route::Posts,
        Route::Compare,
        Route::Commodities,
        Route::Earnings,
        Route::AdminUsers,
    ]
    .into_iter()
    .filter(|r| r.guard(identity) == Access::Granted)
    .collect()
}
