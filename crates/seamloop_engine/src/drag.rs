// SPDX-License-Identifier: MIT OR Apache-2.0
//! Drag scrubbing and throws.
//!
//! While the pointer is down, horizontal displacement maps linearly onto
//! loop progress (one full loop length of travel is one full period). On
//! release the position is projected along the release velocity, snapped to
//! the nearest anchor and animated there with an ease-out throw.

use crate::autoplay::SuspendReason;
use crate::closest::closest_index;
use crate::engine::{LoopEngine, PlaybackState};
use crate::events::SettleCause;
use crate::tween::{Easing, Tween};
use crate::wrap::TimeWrap;

/// Throws shorter than this many pixels finish on the spot
const MIN_THROW_DISTANCE_PX: f64 = 0.5;

/// State of one pointer interaction, from press until the throw lands
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragSession {
    press_x: f64,
    last_x: f64,
    start_progress: f64,
    ratio: f64,
    last_snap: f64,
    resume_playback: PlaybackState,
    throw: Option<Tween>,
}

impl DragSession {
    fn new(press_x: f64, start_progress: f64, total_length: f64, resume_playback: PlaybackState) -> Self {
        Self {
            press_x,
            last_x: press_x,
            start_progress,
            ratio: progress_ratio(total_length),
            last_snap: start_progress,
            resume_playback,
            throw: None,
        }
    }

    /// Unwrapped progress for a pointer position
    fn progress_at(&self, x: f64) -> f64 {
        self.start_progress + (self.press_x - x) * self.ratio
    }

    pub(crate) fn is_throwing(&self) -> bool {
        self.throw.is_some()
    }
}

/// Progress per pixel of pointer travel
pub fn progress_ratio(total_length: f64) -> f64 {
    if total_length.is_finite() && total_length > 0.0 {
        1.0 / total_length
    } else {
        1.0
    }
}

/// Snap an unwrapped progress value onto the nearest anchor.
///
/// The result stays unwrapped, so a throw across the seam keeps moving in
/// the direction it was thrown.
pub fn snap_progress(progress: f64, anchors: &[f64], duration: f64) -> f64 {
    if anchors.is_empty() || !duration.is_finite() || duration <= 0.0 {
        return progress;
    }
    let time = progress * duration;
    let wrapped = TimeWrap::new(duration).wrap(time);
    let anchor = anchors[closest_index(anchors, duration, wrapped)];

    let mut offset = anchor - wrapped;
    if offset.abs() > duration / 2.0 {
        offset += if offset < 0.0 { duration } else { -duration };
    }
    (time + offset) / duration
}

impl<T> LoopEngine<T> {
    /// Pointer pressed at `x`; returns false when dragging is unavailable.
    ///
    /// Any running transition or throw is cancelled and autoplay is held
    /// until the drag settles.
    pub fn press(&mut self, x: f64) -> bool {
        if !self.alive || !self.config.drag.enabled || !x.is_finite() {
            return false;
        }

        self.transition = None;
        let resume_playback = match self.drag.take() {
            Some(previous) => previous.resume_playback,
            None => self.playback,
        };
        self.playback = PlaybackState::Paused;
        self.autoplay.suspend(SuspendReason::Drag);

        let session = DragSession::new(x, self.progress(), self.layout.total_length(), resume_playback);
        tracing::trace!(x, progress = session.start_progress, "drag pressed");
        self.drag = Some(session);
        true
    }

    /// Pointer moved to `x` while pressed
    pub fn drag_to(&mut self, x: f64) {
        if !self.alive || !x.is_finite() {
            return;
        }
        let progress = match self.drag.as_mut() {
            Some(session) if !session.is_throwing() => {
                session.last_x = x;
                session.progress_at(x)
            }
            _ => return,
        };
        self.set_progress(progress);
        self.nav.index_dirty = true;
        self.notify_if_changed();
    }

    /// Pointer released at `x` moving at `velocity` pixels per second.
    ///
    /// Displacements inside the dead zone return to the last snapped
    /// position; anything larger is thrown to the anchor nearest the
    /// projected landing point.
    pub fn release(&mut self, x: f64, velocity: f64) {
        if !self.alive {
            return;
        }
        let duration = self.timeline.duration();
        let total_length = self.layout.total_length();
        let settings = self.config.drag;

        let (current, target) = {
            let Some(session) = self.drag.as_mut() else {
                return;
            };
            if session.is_throwing() {
                return;
            }
            let x = if x.is_finite() { x } else { session.last_x };
            let velocity = if velocity.is_finite() { velocity } else { 0.0 };
            let current = session.progress_at(x);

            let target = if (session.press_x - x).abs() < settings.dead_zone_px {
                session.last_snap
            } else {
                let projected = current - velocity * settings.throw_projection * session.ratio;
                let snapped = snap_progress(projected, &self.anchors, duration);
                session.last_snap = snapped;
                snapped
            };
            (current, target)
        };

        self.set_progress(current);
        self.closest_index(true);

        let distance_px = (target - current).abs() * total_length;
        if distance_px < MIN_THROW_DISTANCE_PX {
            self.set_progress(target);
            self.finish_drag();
            return;
        }

        let speed = velocity.abs().max(settings.min_throw_speed).max(f64::EPSILON);
        let seconds = (distance_px / speed)
            .max(settings.min_throw_duration)
            .min(settings.max_throw_duration.max(settings.min_throw_duration));
        tracing::trace!(from = current, to = target, seconds, "drag thrown");

        if let Some(session) = self.drag.as_mut() {
            session.throw = Some(Tween::new(current, target, self.clock, seconds, Easing::EaseOutCubic));
        }
        self.nav.index_dirty = true;
    }

    pub(crate) fn step_drag(&mut self) {
        let Some(throw) = self.drag.as_ref().and_then(|session| session.throw) else {
            return;
        };
        self.set_progress(throw.sample(self.clock));
        self.notify_if_changed();
        if throw.is_done(self.clock) {
            self.finish_drag();
        }
    }

    fn finish_drag(&mut self) {
        let Some(session) = self.drag.take() else {
            return;
        };
        let index = self.closest_index(true);
        self.playback = session.resume_playback;
        self.autoplay.resume(SuspendReason::Drag, self.clock);
        tracing::debug!(index, "drag settled");
        self.settle(index, SettleCause::Drag);
    }

    /// Carry the session over to freshly measured geometry.
    ///
    /// A held pointer keeps scrubbing from the current progress at the new
    /// pixel ratio. A throw in flight lands where it is.
    pub(crate) fn rebase_drag(&mut self) {
        let Some(throwing) = self.drag.as_ref().map(DragSession::is_throwing) else {
            return;
        };
        if throwing {
            self.finish_drag();
            return;
        }
        let progress = self.progress();
        let total_length = self.layout.total_length();
        if let Some(session) = self.drag.as_mut() {
            session.ratio = progress_ratio(total_length);
            session.start_progress = progress - (session.press_x - session.last_x) * session.ratio;
            tracing::trace!(progress, total_length, "drag rebased");
        }
    }

    /// Drop the session without settling
    pub(crate) fn cancel_drag(&mut self) {
        if let Some(session) = self.drag.take() {
            self.playback = session.resume_playback;
            self.autoplay.resume(SuspendReason::Drag, self.clock);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tests::{four_items, paused, run_until_settled};
    use crate::events::LoopEvent;
    use crate::layout::StaticMeasurements;
    use crate::navigation::TransitionOptions;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn settle_log(engine: &mut LoopEngine<usize>) -> Rc<RefCell<Vec<(usize, SettleCause)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        engine.subscribe(move |event| {
            if let LoopEvent::Settled { index, cause } = event {
                sink.borrow_mut().push((*index, *cause));
            }
            Ok(())
        });
        log
    }

    #[test]
    fn test_snap_progress() {
        let anchors = [0.0, 1.0, 2.0, 3.0];
        assert!((snap_progress(0.3, &anchors, 4.0) - 0.25).abs() < 1e-12);
        // just past the seam, snapping forward keeps the unwrapped value
        assert!((snap_progress(0.95, &anchors, 4.0) - 1.0).abs() < 1e-12);
        assert!((snap_progress(-0.05, &anchors, 4.0)).abs() < 1e-12);
        assert_eq!(snap_progress(0.3, &[], 4.0), 0.3);
    }

    #[test]
    fn test_ratio_guards_degenerate_length() {
        assert_eq!(progress_ratio(400.0), 0.0025);
        assert_eq!(progress_ratio(0.0), 1.0);
        assert_eq!(progress_ratio(f64::NAN), 1.0);
    }

    #[test]
    fn test_drag_scrubs_progress() {
        let mut engine = four_items(paused());
        assert!(engine.press(300.0));
        engine.drag_to(200.0);
        assert!((engine.progress() - 0.25).abs() < 1e-12);
        engine.drag_to(400.0);
        assert!((engine.progress() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_dead_zone_returns_to_start() {
        let mut engine = four_items(paused());
        let log = settle_log(&mut engine);
        engine.press(200.0);
        engine.drag_to(195.0);
        engine.release(195.0, 0.0);
        run_until_settled(&mut engine);
        assert!(!engine.is_dragging());
        assert!(engine.time().abs() < 1e-9 || (engine.time() - 4.0).abs() < 1e-9);
        assert_eq!(engine.current(), 0);
        assert_eq!(*log.borrow(), vec![(0, SettleCause::Drag)]);
    }

    #[test]
    fn test_release_in_place_settles_immediately() {
        let mut engine = four_items(paused());
        let log = settle_log(&mut engine);
        engine.press(200.0);
        engine.release(200.0, 0.0);
        assert!(!engine.is_dragging());
        assert_eq!(*log.borrow(), vec![(0, SettleCause::Drag)]);
    }

    #[test]
    fn test_throw_lands_on_anchor_once() {
        let mut engine = four_items(paused());
        let log = settle_log(&mut engine);
        engine.press(300.0);
        engine.drag_to(170.0);
        engine.release(170.0, 0.0);
        assert!(engine.is_animating());
        run_until_settled(&mut engine);
        assert!((engine.time() - 1.0).abs() < 1e-9);
        assert_eq!(engine.current(), 1);
        assert_eq!(*log.borrow(), vec![(1, SettleCause::Drag)]);
    }

    #[test]
    fn test_velocity_projects_landing_point() {
        let mut engine = four_items(paused());
        engine.press(300.0);
        engine.drag_to(250.0);
        engine.release(250.0, -800.0);
        run_until_settled(&mut engine);
        assert_eq!(engine.current(), 3);
        assert!((engine.time() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_drag_holds_autoplay() {
        let mut engine = four_items(paused().with_autoplay(1.0));
        engine.press(300.0);
        assert!(!engine.autoplay().is_scheduled());
        for _ in 0..180 {
            engine.tick(1.0 / 60.0);
        }
        assert_eq!(engine.navigation_state().current_index, 0);
        engine.release(300.0, 0.0);
        assert!(engine.autoplay().is_scheduled());
    }

    #[test]
    fn test_drag_restores_playback() {
        let mut engine = four_items(Default::default());
        engine.press(300.0);
        assert_eq!(engine.playback_state(), PlaybackState::Paused);
        engine.release(300.0, 0.0);
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
    }

    #[test]
    fn test_resize_mid_drag_keeps_scrubbing() {
        let mut engine = four_items(Default::default());
        let log = settle_log(&mut engine);
        engine.press(300.0);
        engine.drag_to(250.0);
        assert!((engine.progress() - 0.125).abs() < 1e-12);

        let wider = StaticMeasurements::uniform(4, 200.0, 0.0, 300.0);
        assert!(engine.on_resize(&wider));
        assert!(engine.is_dragging());
        assert!((engine.progress() - 0.125).abs() < 1e-9);

        // another 100px is an eighth of the wider loop
        engine.drag_to(150.0);
        assert!((engine.progress() - 0.25).abs() < 1e-9);
        engine.release(150.0, 0.0);
        run_until_settled(&mut engine);
        assert!(!engine.is_dragging());
        assert_eq!(engine.current(), 1);
        assert!((engine.time() - 2.0).abs() < 1e-9);
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        assert_eq!(*log.borrow(), vec![(1, SettleCause::Drag)]);
    }

    #[test]
    fn test_resize_mid_throw_lands_once() {
        let mut engine = four_items(Default::default());
        let log = settle_log(&mut engine);
        engine.press(300.0);
        engine.drag_to(170.0);
        engine.release(170.0, 0.0);
        engine.tick(1.0 / 60.0);
        assert!(engine.is_animating());

        let same = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        assert!(engine.on_resize(&same));
        assert!(!engine.is_dragging());
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        run_until_settled(&mut engine);
        assert_eq!(*log.borrow(), vec![(1, SettleCause::Drag)]);
    }

    #[test]
    fn test_cancelled_drag_restores_playback() {
        let mut engine = four_items(Default::default());
        engine.press(300.0);
        engine.drag_to(250.0);
        engine.cancel_drag();
        assert!(!engine.is_dragging());
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        assert!(engine.autoplay().reasons().is_empty());
    }

    #[test]
    fn test_navigation_cancels_drag() {
        let mut engine = four_items(paused().with_autoplay(2.0));
        let log = settle_log(&mut engine);
        engine.press(300.0);
        engine.drag_to(250.0);
        engine.to_index(2, TransitionOptions::teleport());
        assert!(!engine.is_dragging());
        assert!(engine.autoplay().reasons().is_empty());
        engine.release(250.0, 0.0);
        assert_eq!(*log.borrow(), vec![(2, SettleCause::Teleport)]);
    }

    #[test]
    fn test_drag_disabled() {
        let mut config = paused();
        config.drag.enabled = false;
        let mut engine = four_items(config);
        assert!(!engine.press(100.0));
        engine.drag_to(0.0);
        assert_eq!(engine.time(), 0.0);
    }
}
