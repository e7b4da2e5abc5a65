// SPDX-License-Identifier: MIT OR Apache-2.0
//! Index navigation.
//!
//! Any integer is a valid target. Requests further than half the loop away
//! are rewritten to the equivalent target in the other direction, and the
//! destination time is shifted by one period whenever reaching it directly
//! would move the playhead against the requested direction. The tween then
//! writes every frame through the time wrap, so the motion crosses the seam
//! without a visible jump.

use crate::engine::{LoopEngine, PlaybackState};
use crate::error::{LoopError, Result};
use crate::events::SettleCause;
use crate::tween::{Easing, Tween};
use crate::wrap::wrap_index;

/// Per-call transition overrides
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransitionOptions {
    /// Seconds; falls back to the configured default, then to the loop's own speed
    pub duration: Option<f64>,
    /// Easing; falls back to the configured default
    pub easing: Option<Easing>,
}

impl TransitionOptions {
    /// Transition over a fixed number of seconds
    pub fn over(seconds: f64) -> Self {
        Self {
            duration: Some(seconds),
            easing: None,
        }
    }

    /// Jump without animating
    pub fn teleport() -> Self {
        Self::over(0.0)
    }

    /// Set the easing
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }
}

/// A resolved navigation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationPlan {
    /// Target after the shortest-path rewrite, still unwrapped
    pub target: isize,
    /// Wrapped index the engine will settle on
    pub index: usize,
    /// Destination time, possibly one period outside `[0, duration)`
    pub time: f64,
}

/// Resolve a target index against the current position
pub fn plan_navigation(
    target: isize,
    current: usize,
    anchors: &[f64],
    playhead: f64,
    duration: f64,
) -> NavigationPlan {
    let count = anchors.len() as isize;
    let current = current as isize;
    let half = count as f64 / 2.0;

    let mut target = target;
    let delta = target - current;
    if delta.unsigned_abs() as f64 > half {
        let mut shortest = delta.rem_euclid(count.max(1));
        if shortest as f64 > half {
            shortest -= count;
        }
        target = current + shortest;
    }

    let index = wrap_index(target, anchors.len());
    let mut time = anchors.get(index).copied().unwrap_or(0.0);
    if target != current && (time > playhead) != (target > current) {
        time += if target > current { duration } else { -duration };
    }

    NavigationPlan {
        target,
        index,
        time,
    }
}

/// Description of a transition that was started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionHandle {
    id: u64,
    index: usize,
    from: f64,
    to: f64,
    duration: f64,
}

impl TransitionHandle {
    /// Sequence number, unique per engine
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Index the transition settles on
    pub fn index(&self) -> usize {
        self.index
    }

    /// Playhead time when the transition started
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Unwrapped destination time
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Seconds the transition takes
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the playhead jumped without animating
    pub fn is_teleport(&self) -> bool {
        self.duration <= 0.0
    }
}

/// The transition currently driving the playhead
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActiveTransition {
    pub(crate) id: u64,
    pub(crate) index: usize,
    pub(crate) tween: Tween,
}

impl<T> LoopEngine<T> {
    /// Move to an item index; negative and out-of-range values wrap.
    ///
    /// Returns `None` once the engine is torn down. Requesting the current
    /// index tweens straight to its anchor without adding a loop, so from an
    /// off-anchor playhead the motion may run back across the seam side of
    /// the loop.
    pub fn to_index(&mut self, index: isize, options: TransitionOptions) -> Option<TransitionHandle> {
        match self.navigate(index, options) {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::debug!("navigation ignored: {err}");
                None
            }
        }
    }

    /// Move one item forward
    pub fn next(&mut self, options: TransitionOptions) -> Option<TransitionHandle> {
        if !self.alive {
            return None;
        }
        let target = self.current() as isize + 1;
        self.to_index(target, options)
    }

    /// Move one item back
    pub fn previous(&mut self, options: TransitionOptions) -> Option<TransitionHandle> {
        if !self.alive {
            return None;
        }
        let target = self.current() as isize - 1;
        self.to_index(target, options)
    }

    pub(crate) fn navigate(&mut self, index: isize, options: TransitionOptions) -> Result<TransitionHandle> {
        if !self.alive {
            return Err(LoopError::TornDown);
        }

        let plan = plan_navigation(
            index,
            self.nav.current_index,
            &self.anchors,
            self.playhead,
            self.timeline.duration(),
        );

        self.transition = None;
        self.cancel_drag();
        self.playback = PlaybackState::Paused;
        self.nav.current_index = plan.index;
        self.nav.index_dirty = false;
        self.autoplay.reschedule(self.clock);

        let from = self.playhead;
        let seconds = options
            .duration
            .or(self.config.navigation.duration)
            .unwrap_or_else(|| (plan.time - from).abs());
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let easing = options.easing.unwrap_or(self.config.navigation.easing);

        let id = self.next_transition_id;
        self.next_transition_id += 1;

        tracing::debug!(
            requested = index,
            target = plan.target,
            index = plan.index,
            from,
            to = plan.time,
            seconds,
            "navigating"
        );

        if seconds <= 0.0 {
            self.set_playhead(plan.time);
            self.settle(plan.index, SettleCause::Teleport);
        } else {
            self.transition = Some(ActiveTransition {
                id,
                index: plan.index,
                tween: Tween::new(from, plan.time, self.clock, seconds, easing),
            });
        }

        Ok(TransitionHandle {
            id,
            index: plan.index,
            from,
            to: plan.time,
            duration: seconds,
        })
    }

    pub(crate) fn step_transition(&mut self) {
        let Some(active) = self.transition else {
            return;
        };
        self.set_playhead(active.tween.sample(self.clock));
        if active.tween.is_done(self.clock) {
            tracing::trace!(transition = active.id, index = active.index, "transition finished");
            self.transition = None;
            self.settle(active.index, SettleCause::Navigation);
        }
    }
}
