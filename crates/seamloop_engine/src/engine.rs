// SPDX-License-Identifier: MIT OR Apache-2.0
//! The loop engine.
//!
//! [`LoopEngine`] owns the geometry, the playhead and every piece of motion
//! state. Three drivers write the playhead: index transitions, drag
//! sessions and free-running playback. Only one is active at a time; each
//! cancels the others before taking over, and all of them stop writing once
//! the engine is torn down.
//!
//! The host calls [`LoopEngine::tick`] once per frame with the elapsed time
//! and reads positions back with [`LoopEngine::translation_of`].

use crate::autoplay::{AutoplayScheduler, SuspendReason};
use crate::center::adjust_anchors;
use crate::closest;
use crate::config::LoopConfig;
use crate::drag::DragSession;
use crate::error::{LoopError, Result};
use crate::events::{ChangeEvent, ListenerId, ListenerResult, Listeners, LoopEvent, SettleCause};
use crate::layout::{Layout, MeasurementProvider};
use crate::navigation::ActiveTransition;
use crate::subscription::{Subscription, SubscriptionId, SubscriptionSet};
use crate::timeline::LoopTimeline;
use crate::wrap::wrap01;

/// Free-running playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not advancing on its own
    #[default]
    Paused,
    /// Advancing forward
    Playing,
    /// Advancing in reverse
    Reverse,
}

/// Which item the engine considers current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationState {
    /// Last index explicitly settled on
    pub current_index: usize,
    /// The playhead moved since `current_index` was last committed
    pub index_dirty: bool,
}

/// Seamless horizontal loop over a fixed set of items
pub struct LoopEngine<T> {
    pub(crate) items: Vec<T>,
    pub(crate) config: LoopConfig,
    pub(crate) layout: Layout,
    pub(crate) timeline: LoopTimeline,
    pub(crate) anchors: Vec<f64>,
    pub(crate) viewport_width: f64,
    pub(crate) playhead: f64,
    pub(crate) clock: f64,
    pub(crate) playback: PlaybackState,
    pub(crate) reversed: bool,
    pub(crate) nav: NavigationState,
    pub(crate) transition: Option<ActiveTransition>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) autoplay: AutoplayScheduler,
    pub(crate) listeners: Listeners<T>,
    pub(crate) subscriptions: SubscriptionSet,
    pub(crate) last_notified: Option<usize>,
    pub(crate) next_transition_id: u64,
    pub(crate) alive: bool,
}

impl<T> LoopEngine<T> {
    /// Measure the items and build the loop.
    ///
    /// Configuration problems (no items, zero-width items, non-positive
    /// speed) fail here and no engine is returned.
    pub fn build<P>(items: Vec<T>, provider: &P, config: LoopConfig) -> Result<Self>
    where
        P: MeasurementProvider<T> + ?Sized,
    {
        config.validate()?;
        if items.is_empty() {
            return Err(LoopError::EmptyTrack);
        }

        let layout = Layout::measure(&items, provider, config.padding_right)?;
        let timeline = LoopTimeline::with_speed(&layout, config.speed, config.snap)?;
        let viewport_width = provider.viewport_width();
        let anchors = adjust_anchors(
            &timeline.base_anchors(),
            layout.widths(),
            layout.total_length(),
            timeline.time_wrap(),
            viewport_width,
            config.center,
        );

        let playhead = if config.center { anchors[0] } else { 0.0 };
        let playback = match (config.paused, config.reversed) {
            (true, _) => PlaybackState::Paused,
            (false, false) => PlaybackState::Playing,
            (false, true) => PlaybackState::Reverse,
        };

        tracing::debug!(
            items = items.len(),
            total_length = layout.total_length(),
            duration = timeline.duration(),
            "built loop"
        );

        let mut engine = Self {
            items,
            reversed: config.reversed,
            config,
            layout,
            timeline,
            anchors,
            viewport_width,
            playhead,
            clock: 0.0,
            playback,
            nav: NavigationState::default(),
            transition: None,
            drag: None,
            autoplay: AutoplayScheduler::new(),
            listeners: Listeners::new(),
            subscriptions: SubscriptionSet::new(),
            last_notified: None,
            next_transition_id: 0,
            alive: true,
        };
        engine.last_notified = Some(engine.resolve_closest());
        if let Some(autoplay) = engine.config.autoplay {
            engine.autoplay.enable(autoplay.delay, 0.0);
        }
        Ok(engine)
    }

    // --- queries ---

    /// The items in loop order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of items
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Active configuration
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Current layout
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current timeline
    pub fn timeline(&self) -> &LoopTimeline {
        &self.timeline
    }

    /// Anchor time of every item, after center adjustment
    pub fn anchor_times(&self) -> &[f64] {
        &self.anchors
    }

    /// Loop period in seconds
    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }

    /// Playhead time in `[0, duration)`
    pub fn time(&self) -> f64 {
        self.playhead
    }

    /// Playhead progress in `[0, 1)`
    pub fn progress(&self) -> f64 {
        self.timeline.time_wrap().progress(self.playhead)
    }

    /// Host time accumulated through [`tick`](Self::tick)
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Navigation bookkeeping
    pub fn navigation_state(&self) -> NavigationState {
        self.nav
    }

    /// Free-running playback state
    pub fn playback_state(&self) -> PlaybackState {
        self.playback
    }

    /// Whether the loop runs backwards
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Autoplay scheduler
    pub fn autoplay(&self) -> &AutoplayScheduler {
        &self.autoplay
    }

    /// Whether a transition or throw is moving the playhead
    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || self.drag.as_ref().is_some_and(DragSession::is_throwing)
    }

    /// Whether a drag session exists
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the engine still accepts calls
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Number of attached host subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Translation in pixels of an item at the current playhead
    pub fn translation_of(&self, index: usize) -> Option<f64> {
        self.timeline.translation_at(index, self.playhead)
    }

    /// Translation as a percentage of the item's own width
    pub fn translation_percent_of(&self, index: usize) -> Option<f64> {
        let width = *self.layout.widths().get(index)?;
        Some(self.translation_of(index)? / width * 100.0)
    }

    // --- index resolution ---

    /// Index whose anchor is circularly nearest the playhead.
    ///
    /// With `commit` the result becomes the current index.
    pub fn closest_index(&mut self, commit: bool) -> usize {
        let index = self.resolve_closest();
        if commit && self.alive {
            self.nav.current_index = index;
            self.nav.index_dirty = false;
        }
        index
    }

    /// Current index, resolving it from the playhead if it may be stale
    pub fn current(&mut self) -> usize {
        if self.nav.index_dirty {
            self.closest_index(true)
        } else {
            self.nav.current_index
        }
    }

    pub(crate) fn resolve_closest(&self) -> usize {
        let wrap = self.timeline.time_wrap();
        closest::closest_index(&self.anchors, wrap.duration(), wrap.wrap(self.playhead))
    }

    // --- frame driving ---

    /// Advance host time by `dt` seconds and step whichever driver is active
    pub fn tick(&mut self, dt: f64) {
        if !self.alive || !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.clock += dt;

        if self.drag.is_some() {
            self.step_drag();
        } else if self.transition.is_some() {
            self.step_transition();
        } else {
            self.step_playback(dt);
        }

        if self.autoplay.poll(self.clock) {
            self.autoplay_advance();
        }
    }

    fn step_playback(&mut self, dt: f64) {
        let direction = match self.playback {
            PlaybackState::Playing => 1.0,
            PlaybackState::Reverse => -1.0,
            PlaybackState::Paused => return,
        };
        self.set_playhead(self.playhead + direction * dt);
        self.nav.index_dirty = true;
        self.notify_if_changed();
    }

    /// Write the playhead through the time wrap
    pub(crate) fn set_playhead(&mut self, time: f64) {
        self.playhead = self.timeline.time_wrap().wrap(time);
    }

    /// Write the playhead from a progress value, wrapping it onto the loop
    pub(crate) fn set_progress(&mut self, progress: f64) {
        self.set_playhead(wrap01(progress) * self.timeline.duration());
    }

    // --- playback control ---

    /// Start free-running playback in the configured direction
    pub fn play(&mut self) {
        if !self.alive {
            return;
        }
        self.transition = None;
        self.playback = if self.reversed {
            PlaybackState::Reverse
        } else {
            PlaybackState::Playing
        };
    }

    /// Stop free-running playback
    pub fn pause(&mut self) {
        if self.alive {
            self.playback = PlaybackState::Paused;
        }
    }

    /// Flip the direction of playback and autoplay
    pub fn reverse(&mut self) {
        if !self.alive {
            return;
        }
        self.reversed = !self.reversed;
        self.playback = match self.playback {
            PlaybackState::Playing => PlaybackState::Reverse,
            PlaybackState::Reverse => PlaybackState::Playing,
            PlaybackState::Paused => PlaybackState::Paused,
        };
    }

    // --- autoplay control ---

    /// Enable autoplay with a delay in seconds
    pub fn enable_autoplay(&mut self, delay: f64) {
        if self.alive {
            self.autoplay.enable(delay, self.clock);
        }
    }

    /// Hold autoplay until [`resume_autoplay`](Self::resume_autoplay)
    pub fn pause_autoplay(&mut self) {
        if self.alive {
            self.autoplay.suspend(SuspendReason::Paused);
        }
    }

    /// Lift an explicit pause; arms a fresh full delay
    pub fn resume_autoplay(&mut self) {
        if self.alive {
            self.autoplay.resume(SuspendReason::Paused, self.clock);
        }
    }

    /// Turn autoplay off
    pub fn disable_autoplay(&mut self) {
        if self.alive {
            self.autoplay.disable();
        }
    }

    /// Host visibility changed
    pub fn set_visible(&mut self, visible: bool) {
        self.toggle_suspension(SuspendReason::Hidden, !visible);
    }

    /// Host focus changed
    pub fn set_focused(&mut self, focused: bool) {
        self.toggle_suspension(SuspendReason::Blurred, !focused);
    }

    fn toggle_suspension(&mut self, reason: SuspendReason, suspend: bool) {
        if !self.alive {
            return;
        }
        if suspend {
            self.autoplay.suspend(reason);
        } else {
            self.autoplay.resume(reason, self.clock);
        }
    }

    fn autoplay_advance(&mut self) {
        let step = if self.reversed { -1 } else { 1 };
        let target = self.current() as isize + step;
        if let Err(err) = self.navigate(target, Default::default()) {
            tracing::warn!("autoplay advance failed: {err}");
        }
    }

    // --- geometry refresh ---

    /// Re-measure the items.
    ///
    /// A shallow refresh recomputes layout and anchors and keeps the loop
    /// progress. A deep refresh also rebuilds the timeline and cancels a
    /// running transition. A held drag carries on against the new geometry
    /// and a throw lands where it is. While playback is paused and dragging
    /// is enabled (or a transition was cut short), the playhead then rests on
    /// the current item; otherwise the progress is kept. If any item cannot
    /// be measured the pass is skipped, the previous geometry stays in place
    /// and `false` is returned.
    pub fn refresh<P>(&mut self, deep: bool, provider: &P) -> bool
    where
        P: MeasurementProvider<T> + ?Sized,
    {
        if !self.alive {
            return false;
        }

        let layout = match Layout::measure(&self.items, provider, self.config.padding_right) {
            Ok(layout) => layout,
            Err(err) => {
                log_refresh_failure(&err);
                return false;
            }
        };
        let rebuilt = if deep {
            match LoopTimeline::with_speed(&layout, self.config.speed, self.config.snap) {
                Ok(timeline) => Some(timeline),
                Err(err) => {
                    log_refresh_failure(&err);
                    return false;
                }
            }
        } else {
            None
        };

        // resolved against the outgoing anchors
        let resting_index = if deep {
            self.current()
        } else {
            self.nav.current_index
        };
        let progress = self.progress();
        let viewport_width = provider.viewport_width();
        let timeline = rebuilt.as_ref().unwrap_or(&self.timeline);
        let anchors = adjust_anchors(
            &timeline.base_anchors(),
            layout.widths(),
            layout.total_length(),
            timeline.time_wrap(),
            viewport_width,
            self.config.center,
        );

        self.layout = layout;
        self.anchors = anchors;
        self.viewport_width = viewport_width;

        if let Some(timeline) = rebuilt {
            self.timeline = timeline;
            self.set_progress(progress);
            let was_moving = self.transition.take().is_some();
            if self.drag.is_some() {
                self.rebase_drag();
            } else if self.playback == PlaybackState::Paused && (self.config.drag.enabled || was_moving) {
                self.nav.current_index = resting_index;
                self.nav.index_dirty = false;
                let anchor = self.anchors[resting_index];
                self.set_playhead(anchor);
            }
        } else if self.transition.is_none() && self.drag.is_none() {
            self.set_progress(progress);
        }

        tracing::debug!(
            deep,
            total_length = self.layout.total_length(),
            duration = self.timeline.duration(),
            "refreshed loop"
        );
        true
    }

    /// Host viewport or content size changed
    pub fn on_resize<P>(&mut self, provider: &P) -> bool
    where
        P: MeasurementProvider<T> + ?Sized,
    {
        self.refresh(true, provider)
    }

    // --- notifications ---

    /// Register an event listener
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&LoopEvent<'_, T>) -> ListenerResult + 'static,
    {
        self.listeners.insert(listener)
    }

    /// Remove an event listener
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Emit a change notification if the aligned item differs from the last one reported
    pub(crate) fn notify_if_changed(&mut self) {
        let index = self.resolve_closest();
        if self.last_notified == Some(index) {
            return;
        }
        self.last_notified = Some(index);

        let progress = self.progress();
        let event = LoopEvent::Changed(ChangeEvent {
            index,
            item: &self.items[index],
            progress,
            total_items: self.items.len(),
        });
        self.listeners.dispatch(&event);
    }

    pub(crate) fn settle(&mut self, index: usize, cause: SettleCause) {
        self.notify_if_changed();
        self.listeners.dispatch(&LoopEvent::Settled { index, cause });
    }

    // --- host subscriptions ---

    /// Hand a host subscription to the engine; it is released on teardown.
    ///
    /// After teardown the subscription is released immediately.
    pub fn attach(&mut self, subscription: Subscription) -> Option<SubscriptionId> {
        if !self.alive {
            drop(subscription);
            return None;
        }
        Some(self.subscriptions.insert(subscription))
    }

    /// Release a single host subscription early
    pub fn detach(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(id)
    }

    /// Cancel all pending work, release host subscriptions and stop accepting calls
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.transition = None;
        self.drag = None;
        self.playback = PlaybackState::Paused;
        self.autoplay.disable();
        self.subscriptions.release_all();
        self.listeners.clear();
        tracing::debug!("loop torn down");
    }
}

fn log_refresh_failure(err: &LoopError) {
    if err.is_transient() {
        tracing::warn!("refresh skipped, keeping last geometry: {err}");
    } else {
        tracing::error!("refresh rejected new geometry, keeping last geometry: {err}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::layout::StaticMeasurements;
    use crate::navigation::TransitionOptions;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    pub(crate) const FRAME: f64 = 1.0 / 60.0;

    pub(crate) fn four_items(config: LoopConfig) -> LoopEngine<usize> {
        let provider = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        LoopEngine::build((0..4).collect(), &provider, config).unwrap()
    }

    pub(crate) fn paused() -> LoopConfig {
        LoopConfig::default().with_paused(true)
    }

    pub(crate) fn run_until_settled(engine: &mut LoopEngine<usize>) {
        for _ in 0..10_000 {
            if !engine.is_animating() {
                return;
            }
            engine.tick(FRAME);
        }
        panic!("engine never settled");
    }

    pub(crate) fn run_for(engine: &mut LoopEngine<usize>, seconds: f64) {
        let frames = (seconds / FRAME).round() as usize;
        for _ in 0..frames {
            engine.tick(FRAME);
        }
    }

    #[test]
    fn test_build_four_items() {
        let engine = four_items(paused());
        assert_eq!(engine.duration(), 4.0);
        assert_eq!(engine.anchor_times(), &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(engine.time(), 0.0);
        assert_eq!(engine.navigation_state().current_index, 0);
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let provider = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        let result = LoopEngine::build(vec![0; 4], &provider, LoopConfig::default().with_speed(0.0));
        assert!(matches!(result, Err(LoopError::NonPositiveSpeed(_))));

        let empty: Vec<usize> = Vec::new();
        assert!(matches!(
            LoopEngine::build(empty, &provider, LoopConfig::default()),
            Err(LoopError::EmptyTrack)
        ));

        let mut zero = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        zero.measurements[2].width = 0.0;
        assert!(matches!(
            LoopEngine::build(vec![0; 4], &zero, LoopConfig::default()),
            Err(LoopError::ZeroWidthItem { index: 2, .. })
        ));
    }

    #[test]
    fn test_center_mode_starts_on_first_item() {
        let provider = StaticMeasurements::uniform(4, 100.0, 0.0, 200.0);
        let mut engine =
            LoopEngine::build((0..4).collect(), &provider, paused().with_center(true)).unwrap();
        assert_eq!(engine.anchor_times(), &[3.5, 0.5, 1.5, 2.5]);
        assert_eq!(engine.time(), 3.5);
        assert_eq!(engine.closest_index(false), 0);
    }

    #[test]
    fn test_closest_index_commit_is_idempotent() {
        let mut engine = four_items(paused());
        engine.press(300.0);
        engine.drag_to(170.0);
        let first = engine.closest_index(true);
        let second = engine.closest_index(true);
        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert!(!engine.navigation_state().index_dirty);
    }

    #[test]
    fn test_free_running_reports_each_change_once() {
        let mut engine = four_items(LoopConfig::default());
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        engine.subscribe(move |event| {
            if let LoopEvent::Changed(change) = event {
                sink.borrow_mut().push(change.index);
                assert_eq!(change.total_items, 4);
                assert_eq!(*change.item, change.index);
            }
            Ok(())
        });

        run_for(&mut engine, 4.1);
        assert_eq!(*changes.borrow(), vec![1, 2, 3, 0]);
        assert!(engine.navigation_state().index_dirty);
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_reverse_playback() {
        let mut engine = four_items(LoopConfig::default());
        engine.reverse();
        assert_eq!(engine.playback_state(), PlaybackState::Reverse);
        run_for(&mut engine, 1.0);
        assert!((engine.time() - 3.0).abs() < 1e-6);
        assert_eq!(engine.current(), 3);
    }

    #[test]
    fn test_refresh_shallow_is_idempotent() {
        let provider = StaticMeasurements::uniform(4, 100.0, 0.0, 250.0);
        let mut engine =
            LoopEngine::build((0..4).collect(), &provider, paused().with_center(true)).unwrap();
        assert!(engine.refresh(false, &provider));
        let first = engine.anchor_times().to_vec();
        assert!(engine.refresh(false, &provider));
        assert_eq!(engine.anchor_times(), first.as_slice());
    }

    #[test]
    fn test_refresh_keeps_last_good_geometry() {
        let mut engine = four_items(paused());
        let mut broken = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        broken.measurements.truncate(2);
        assert!(!engine.refresh(true, &broken));
        assert_eq!(engine.duration(), 4.0);
        assert_eq!(engine.anchor_times(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_deep_refresh_rests_on_current_index() {
        let mut engine = four_items(paused());
        engine.to_index(2, TransitionOptions::default());
        run_for(&mut engine, 0.5);
        let wider = StaticMeasurements::uniform(4, 200.0, 0.0, 300.0);
        assert!(engine.on_resize(&wider));
        assert_eq!(engine.duration(), 8.0);
        assert_eq!(engine.anchor_times(), &[0.0, 2.0, 4.0, 6.0]);
        assert!(!engine.is_animating());
        assert_eq!(engine.time(), 4.0);
        assert_eq!(engine.current(), 2);
    }

    #[test]
    fn test_resize_keeps_free_running_position() {
        let mut engine = four_items(LoopConfig::default());
        run_for(&mut engine, 2.5);
        let before = engine.time();
        let same = StaticMeasurements::uniform(4, 100.0, 0.0, 300.0);
        assert!(engine.on_resize(&same));
        assert!((engine.time() - before).abs() < 1e-9);
        assert_eq!(engine.playback_state(), PlaybackState::Playing);
        run_for(&mut engine, 0.5);
        assert!((engine.time() - (before + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_resize_after_pause_rests_on_nearest_item() {
        let mut engine = four_items(LoopConfig::default());
        run_for(&mut engine, 1.2);
        engine.pause();
        assert!(engine.navigation_state().index_dirty);
        let wider = StaticMeasurements::uniform(4, 200.0, 0.0, 300.0);
        assert!(engine.on_resize(&wider));
        assert_eq!(engine.current(), 1);
        assert!((engine.time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_refresh_rejects_zero_width_remeasure() {
        let mut engine = four_items(paused());
        let collapsed = StaticMeasurements::uniform(4, 0.0, 0.0, 300.0);
        assert!(!engine.refresh(true, &collapsed));
        assert!(!engine.refresh(false, &collapsed));
        assert_eq!(engine.layout().total_length(), 400.0);
        assert_eq!(engine.anchor_times(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_translation_query() {
        let mut engine = four_items(paused());
        engine.to_index(1, TransitionOptions::teleport());
        assert_eq!(engine.translation_of(1), Some(-100.0));
        assert_eq!(engine.translation_percent_of(1), Some(-100.0));
        assert_eq!(engine.translation_of(0), Some(300.0));
        assert_eq!(engine.translation_of(9), None);
    }

    #[test]
    fn test_teardown_releases_everything_once() {
        let mut engine = four_items(paused().with_autoplay(1.0));
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        engine.attach(Subscription::new("resize", move || counter.set(counter.get() + 1)));
        assert_eq!(engine.subscription_count(), 1);

        engine.teardown();
        engine.teardown();
        assert_eq!(released.get(), 1);
        assert!(!engine.is_alive());
        assert!(!engine.autoplay().is_enabled());

        assert!(engine.to_index(2, TransitionOptions::default()).is_none());
        assert!(engine.next(TransitionOptions::default()).is_none());
        run_for(&mut engine, 2.0);
        assert_eq!(engine.time(), 0.0);
        assert_eq!(engine.current(), 0);

        let late = Rc::clone(&released);
        assert!(engine
            .attach(Subscription::new("late", move || late.set(late.get() + 10)))
            .is_none());
        assert_eq!(released.get(), 11);
    }

    #[test]
    fn test_autoplay_controls_ignored_after_teardown() {
        let mut engine = four_items(paused().with_autoplay(1.0));
        engine.teardown();
        engine.pause_autoplay();
        engine.disable_autoplay();
        engine.resume_autoplay();
        assert!(engine.autoplay().reasons().is_empty());
        assert!(!engine.autoplay().is_enabled());
        run_for(&mut engine, 2.0);
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_paused_autoplay_never_advances() {
        let mut engine = four_items(paused().with_autoplay(1.0));
        run_for(&mut engine, 0.5);
        engine.pause_autoplay();
        run_for(&mut engine, 5.0);
        assert_eq!(engine.current(), 0);
        assert!(!engine.is_animating());

        engine.resume_autoplay();
        run_for(&mut engine, 1.1);
        assert_eq!(engine.current(), 1);
    }

    #[test]
    fn test_reversed_autoplay_steps_back() {
        let mut config = paused().with_autoplay(1.0);
        config.reversed = true;
        let mut engine = four_items(config);
        run_for(&mut engine, 1.1);
        assert_eq!(engine.current(), 3);
    }

    #[test]
    fn test_autoplay_survives_failing_listener() {
        let mut config = paused().with_autoplay(0.5);
        config.navigation.duration = Some(0.0);
        let mut engine = four_items(config);

        engine.subscribe(|_| Err("listener exploded".into()));
        let settled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&settled);
        engine.subscribe(move |event| {
            if matches!(event, LoopEvent::Settled { .. }) {
                counter.set(counter.get() + 1);
            }
            Ok(())
        });
        assert_eq!(engine.listener_count(), 2);

        run_for(&mut engine, 2.1);
        assert_eq!(settled.get(), 4);
        assert_eq!(engine.current(), 0);
    }

    #[test]
    fn test_visibility_suspends_autoplay() {
        let mut engine = four_items(paused().with_autoplay(1.0));
        run_for(&mut engine, 0.5);
        engine.set_visible(false);
        assert!(!engine.autoplay().is_scheduled());
        run_for(&mut engine, 3.0);
        assert_eq!(engine.current(), 0);

        engine.set_visible(true);
        assert!(engine.autoplay().is_scheduled());
        run_for(&mut engine, 0.9);
        assert_eq!(engine.current(), 0);
        run_for(&mut engine, 0.2);
        assert_eq!(engine.current(), 1);
    }
}
