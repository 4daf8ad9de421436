//! Session middleware configuration.
//!
//! The session is the durable per-visitor store that holds the selection
//! slot. It expires only after a long stretch of inactivity, so a selection
//! survives browser restarts.

use std::time::Duration;

use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::AdvisorConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "advisor_session";

/// Create the session layer over any session store.
///
/// Production uses the `SQLite` store; tests pass a `MemoryStore`.
///
/// # Arguments
///
/// * `store` - Session store
/// * `config` - Advisor configuration (for cookie security and expiry)
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdvisorConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(inactivity_window(config.selection_ttl)))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

fn inactivity_window(ttl: Duration) -> tower_sessions::cookie::time::Duration {
    let seconds = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    tower_sessions::cookie::time::Duration::seconds(seconds)
}
