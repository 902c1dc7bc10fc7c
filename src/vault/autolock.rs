//! Idle tracking for the auto-lock policy.
//!
//! The session holds no timers. Whatever drives it (the interactive
//! shell, a UI event loop) keeps an `IdleWatch`, records activity on
//! each user action, and asks it whether the session should be locked.

use std::time::{Duration, Instant};

use super::session::VaultSession;
use super::storage::KeyValueStore;

/// Inactivity period after which an unlocked session is locked.
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Tracks the last qualifying user activity.
#[derive(Debug, Clone)]
pub struct IdleWatch {
    timeout: Duration,
    last_activity: Instant,
}

impl Default for IdleWatch {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleWatch {
    /// Start watching with the standard five-minute timeout.
    pub fn new() -> Self {
        Self::with_timeout(IDLE_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            last_activity: Instant::now(),
        }
    }

    /// Reset the timer.
    pub fn record_activity(&mut self) {
        self.record_activity_at(Instant::now());
    }

    pub fn record_activity_at(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= self.timeout
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: Instant) -> Duration {
        self.timeout
            .saturating_sub(now.saturating_duration_since(self.last_activity))
    }

    /// Fire the session's idle hook if the timeout has passed.
    ///
    /// Returns `true` if this call locked the session.
    pub fn enforce<S: KeyValueStore>(&self, session: &mut VaultSession<S>) -> bool {
        self.enforce_at(session, Instant::now())
    }

    pub fn enforce_at<S: KeyValueStore>(&self, session: &mut VaultSession<S>, now: Instant) -> bool {
        if session.is_unlocked() && self.is_expired_at(now) {
            session.on_idle_timeout();
            return true;
        }
        false
    }
}
