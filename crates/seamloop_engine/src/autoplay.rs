// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timed self-rescheduling advance.
//!
//! The scheduler only keeps time; the engine polls it each tick and performs
//! the advance. Suspension always discards the running countdown, and
//! resuming arms a fresh full delay.

/// Why autoplay is currently held back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuspendReason {
    /// Host page or window is hidden
    Hidden,
    /// Host window lost focus
    Blurred,
    /// A drag session is active
    Drag,
    /// Paused by the caller
    Paused,
}

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AutoplayState {
    /// Not enabled
    #[default]
    Idle,
    /// Waiting for the deadline (host time in seconds)
    Scheduled {
        /// Host time at which the next advance fires
        deadline: f64,
    },
    /// Enabled but held back by at least one [`SuspendReason`]
    Suspended,
}

/// Autoplay timer
#[derive(Debug, Clone, Default)]
pub struct AutoplayScheduler {
    delay: f64,
    state: AutoplayState,
    reasons: Vec<SuspendReason>,
}

impl AutoplayScheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> AutoplayState {
        self.state
    }

    /// Delay between advances in seconds
    pub fn delay(&self) -> f64 {
        self.delay
    }

    /// Whether a deadline is pending
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, AutoplayState::Scheduled { .. })
    }

    /// Whether autoplay is enabled at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, AutoplayState::Idle)
    }

    /// Active suspension reasons
    pub fn reasons(&self) -> &[SuspendReason] {
        &self.reasons
    }

    /// Enable with a delay; a non-positive delay leaves the scheduler idle
    pub fn enable(&mut self, delay: f64, now: f64) {
        if !delay.is_finite() || delay <= 0.0 {
            tracing::debug!(delay, "autoplay not enabled: delay must be positive");
            self.state = AutoplayState::Idle;
            return;
        }
        self.delay = delay;
        self.state = if self.reasons.is_empty() {
            AutoplayState::Scheduled { deadline: now + delay }
        } else {
            AutoplayState::Suspended
        };
    }

    /// Disable and drop any pending deadline
    pub fn disable(&mut self) {
        self.state = AutoplayState::Idle;
        self.reasons.retain(|r| *r != SuspendReason::Paused);
    }

    /// Hold autoplay back for a reason
    pub fn suspend(&mut self, reason: SuspendReason) {
        if !self.reasons.contains(&reason) {
            self.reasons.push(reason);
        }
        if self.is_scheduled() {
            self.state = AutoplayState::Suspended;
        }
    }

    /// Lift a reason; re-arms a full delay once no reason remains
    pub fn resume(&mut self, reason: SuspendReason, now: f64) {
        self.reasons.retain(|r| *r != reason);
        if self.state == AutoplayState::Suspended && self.reasons.is_empty() {
            self.state = AutoplayState::Scheduled {
                deadline: now + self.delay,
            };
        }
    }

    /// Restart the countdown from `now` if one is pending
    pub fn reschedule(&mut self, now: f64) {
        if self.is_scheduled() {
            self.state = AutoplayState::Scheduled {
                deadline: now + self.delay,
            };
        }
    }

    /// Returns true when the deadline has passed, re-arming for the next advance
    pub fn poll(&mut self, now: f64) -> bool {
        match self.state {
            AutoplayState::Scheduled { deadline } if now >= deadline => {
                self.state = AutoplayState::Scheduled {
                    deadline: now + self.delay,
                };
                true
            }
            _ => false,
        }
    }
}
