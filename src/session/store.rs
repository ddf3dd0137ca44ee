//! Registry of live sessions keyed by an opaque cookie id.
//!
//! Each browser session gets its own [`SessionState`] behind an async mutex,
//! so one session's actions run one at a time while other sessions proceed
//! independently. Sessions idle for longer than the configured TTL are
//! dropped the next time the registry is touched.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use super::state::SessionState;
use crate::metrics;
use crate::prompts::Prompts;

/// Opaque identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Shared handle to one session's state.
pub type SharedSession = Arc<Mutex<SessionState>>;

struct Entry {
    state: SharedSession,
    last_seen: Instant,
}

/// In-memory session registry. Nothing is persisted.
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, Entry>>,
    ttl: Duration,
    prompts: Prompts,
}

impl SessionStore {
    /// Create a registry whose new sessions start with `prompts`.
    pub fn new(prompts: Prompts, ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            prompts,
        }
    }

    /// Look up a live session without creating one.
    ///
    /// Page views go through here so that cookieless traffic (health
    /// checkers, crawlers) never allocates a session.
    pub async fn get(&self, id: Option<SessionId>) -> Option<SharedSession> {
        let id = id?;
        let mut sessions = self.sessions.lock().await;
        let now = self.sweep(&mut sessions);
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = now;
        Some(entry.state.clone())
    }

    /// Look up the session for `id`, creating a fresh one when the id is
    /// missing, unknown or expired.
    ///
    /// Returns the id actually in use and whether a new session was created,
    /// so the caller knows to (re)issue the cookie.
    pub async fn get_or_create(&self, id: Option<SessionId>) -> (SessionId, SharedSession, bool) {
        let mut sessions = self.sessions.lock().await;
        let now = self.sweep(&mut sessions);

        if let Some(id) = id {
            if let Some(entry) = sessions.get_mut(&id) {
                entry.last_seen = now;
                return (id, entry.state.clone(), false);
            }
        }

        let id = SessionId::new();
        let state = Arc::new(Mutex::new(self.blank_state()));
        sessions.insert(
            id,
            Entry {
                state: state.clone(),
                last_seen: now,
            },
        );
        metrics::set_active_sessions(sessions.len());
        tracing::info!(session = %id, active = sessions.len(), "Started new session");

        (id, state, true)
    }

    /// The state a new session starts from. Not registered.
    pub fn blank_state(&self) -> SessionState {
        SessionState::new(self.prompts.clone())
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Drop sessions idle past the TTL and return the current instant.
    fn sweep(&self, sessions: &mut HashMap<SessionId, Entry>) -> Instant {
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Dropped idle sessions");
            metrics::set_active_sessions(sessions.len());
        }
        now
    }
}
