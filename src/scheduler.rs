//! Debounced save scheduling
//!
//! Two states: idle and pending. A mutation moves idle to pending and
//! (re)arms a fixed debounce timer; expiry hands the actual write back to
//! the caller and returns to idle. There is no queue of distinct writes -
//! only the latest in-memory document matters, since a flush always
//! serializes current full state.

use std::time::{Duration, Instant};

/// Default quiet period before a pending write is flushed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(700);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Pending { due: Instant },
}

/// Debounce state machine driven by the tracker's autosave loop
///
/// The machine itself never performs I/O and takes the current instant as
/// a parameter, so it can be tested without real timers.
#[derive(Debug)]
pub struct SaveScheduler {
    debounce: Duration,
    state: State,
}

impl SaveScheduler {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            state: State::Idle,
        }
    }

    /// Record a mutation: idle moves to pending, pending re-arms the timer
    pub fn note_mutation(&mut self, now: Instant) {
        self.state = State::Pending {
            due: now + self.debounce,
        };
    }

    /// Whether a write is pending (armed but not yet flushed)
    pub fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    /// The instant the pending write becomes due, if any
    pub fn due_at(&self) -> Option<Instant> {
        match self.state {
            State::Idle => None,
            State::Pending { due } => Some(due),
        }
    }

    /// Consume an expired timer
    ///
    /// Returns true exactly when a pending write was due at `now`; the
    /// caller then performs the persistence write. The machine returns
    /// to idle.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.state {
            State::Pending { due } if now >= due => {
                self.state = State::Idle;
                true
            }
            _ => false,
        }
    }

    /// Consume any pending write regardless of the timer
    ///
    /// Backs the "save now" path (import) and the flush-on-teardown hook.
    pub fn take_pending(&mut self) -> bool {
        let pending = self.is_pending();
        self.state = State::Idle;
        pending
    }
}

impl Default for SaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
