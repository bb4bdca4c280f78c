//! Blur handling for the editor + dropdown pair.
//!
//! Clicking a dropdown row blurs the surface before the click lands, so a
//! blur must not cancel the session outright. Instead the blur is noted and,
//! once a short delay has passed, the new focus target decides: the session
//! only closes if focus went somewhere other than the surface or dropdown.

use std::time::{Duration, Instant};

/// Default delay before a blur is acted upon.
pub const DEFAULT_BLUR_CHECK: Duration = Duration::from_millis(150);

/// Where keyboard focus is at the time the blur check runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Surface,
    Dropdown,
    Outside,
}

impl FocusTarget {
    /// True if focus stayed within the editor's own widgets.
    pub fn is_within_editor(self) -> bool {
        matches!(self, FocusTarget::Surface | FocusTarget::Dropdown)
    }
}

#[derive(Debug, Clone)]
pub struct BlurWatch {
    delay: Duration,
    blurred_at: Option<Instant>,
}

impl Default for BlurWatch {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_CHECK)
    }
}

impl BlurWatch {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            blurred_at: None,
        }
    }

    /// Records a blur of the surface at `now`.
    pub fn on_blur(&mut self, now: Instant) {
        self.blurred_at = Some(now);
    }

    /// Focus came back before the check; nothing to decide.
    pub fn on_focus(&mut self) {
        self.blurred_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.blurred_at.is_some()
    }

    /// Once the delay has elapsed, consumes the pending blur and returns true
    /// if the session should be cancelled given `target`. Before the delay,
    /// or with no pending blur, returns false.
    pub fn should_cancel(&mut self, now: Instant, target: FocusTarget) -> bool {
        match self.blurred_at {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.blurred_at = None;
                !target.is_within_editor()
            }
            _ => false,
        }
    }
}
