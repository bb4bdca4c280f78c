//! Reentrancy guard and keystroke debouncing for the formatter.
//!
//! Replacing the surface content looks exactly like user input to the
//! platform, so the formatter must not react to its own writes. The guard is
//! raised before the surface is mutated and only dropped on the frame after
//! the caret was restored. The debouncer coalesces bursts of keystrokes into
//! one render: each keystroke pushes the deadline back.

use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the re-render.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum GuardState {
    #[default]
    Idle,
    Formatting,
    /// Mutation done; released on the next frame.
    ReleasePending,
}

/// Non-blocking "formatting in progress" flag.
#[derive(Debug, Clone, Default)]
pub struct ReentrancyGuard {
    state: GuardState,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True from [`begin`](Self::begin) until the frame after
    /// [`finish`](Self::finish).
    pub fn is_active(&self) -> bool {
        self.state != GuardState::Idle
    }

    /// Raises the guard. Returns false (and changes nothing) if it is
    /// already raised.
    pub fn begin(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.state = GuardState::Formatting;
        true
    }

    /// Marks the mutation as done; the guard drops on the next frame.
    pub fn finish(&mut self) {
        if self.state == GuardState::Formatting {
            self.state = GuardState::ReleasePending;
        }
    }

    /// Frame callback. Returns true if the guard was released.
    pub fn on_frame(&mut self) -> bool {
        if self.state == GuardState::ReleasePending {
            self.state = GuardState::Idle;
            return true;
        }
        false
    }
}

/// Cancellable, reschedulable single-shot timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// (Re)starts the timer from `now`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the deadline, if one is pending.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Returns true and clears the deadline if it has passed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
