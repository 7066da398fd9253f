//! Lazily refreshed session identifier.
//!
//! # Design
//! A `SessionCache` is either empty or holds a session id together with the
//! instant at which it must be refreshed. The refresh instant is the login
//! time plus the server-declared timeout, minus a safety margin, so an id is
//! never sent when it could expire mid-request.
//!
//! The state sits behind a `Mutex` that `ensure_valid` holds across the
//! login exchange. Concurrent callers that all find the session stale
//! therefore produce one login, and nobody observes a half-written id/expiry
//! pair.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    start: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap_or_else(PoisonError::into_inner) += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A freshly issued session as reported by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub sid: String,
    pub timeout: Duration,
}

#[derive(Debug, Default)]
struct SessionState {
    sid: String,
    /// `None` with a non-empty `sid` means the timeout is too large to place
    /// on the clock, so the session never needs a refresh.
    refresh_at: Option<Instant>,
}

pub struct SessionCache {
    state: Mutex<SessionState>,
    safety_margin: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionCache {
    pub fn new(safety_margin: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(SessionState::default()),
            safety_margin,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return a live session id, running `login` first when there is none
    /// or the current one is due for refresh. Login errors are returned as-is
    /// and leave the previous state untouched.
    pub fn ensure_valid<E, F>(&self, login: F) -> Result<String, E>
    where
        F: FnOnce() -> Result<Session, E>,
    {
        let mut state = self.lock();
        if self.is_stale_at(&state, self.clock.now()) {
            let session = login()?;
            self.record(&mut state, session);
        }
        Ok(state.sid.clone())
    }

    /// Replace the cached session unconditionally.
    pub fn store(&self, session: Session) {
        let mut state = self.lock();
        self.record(&mut state, session);
    }

    /// Drop the cached session; the next `ensure_valid` logs in again.
    pub fn clear(&self) {
        *self.lock() = SessionState::default();
    }

    /// Current session id, if one is held and not yet due for refresh.
    pub fn current(&self) -> Option<String> {
        let state = self.lock();
        if self.is_stale_at(&state, self.clock.now()) {
            return None;
        }
        Some(state.sid.clone())
    }

    fn is_stale_at(&self, state: &SessionState, now: Instant) -> bool {
        if state.sid.is_empty() {
            return true;
        }
        state.refresh_at.is_some_and(|at| now >= at)
    }

    fn record(&self, state: &mut SessionState, session: Session) {
        let lifetime = session.timeout.saturating_sub(self.safety_margin);
        state.refresh_at = self.clock.now().checked_add(lifetime);
        state.sid = session.sid;
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("SessionCache")
            .field("has_session", &!state.sid.is_empty())
            .field("refresh_at", &state.refresh_at)
            .field("safety_margin", &self.safety_margin)
            .finish()
    }
}
