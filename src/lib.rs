//! Client core for the Spectre guild site: session and authorization state,
//! the one-shot OAuth callback exchange, and the role-derived capability gate,
//! plus thin typed wrappers over the backend's CRUD and tools endpoints.

pub mod api;
pub mod callback;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod routes;
pub mod store;

// Test-only printing helper: expands to eprintln! during tests/debug builds
// and is absent otherwise. Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
