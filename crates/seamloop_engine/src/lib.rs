// SPDX-License-Identifier: MIT OR Apache-2.0
//! Seamless horizontal loop engine.
//!
//! This crate drives an infinite horizontal strip of items:
//! - Layout calculation from host measurements
//! - A closed timeline where every item wraps around without a seam
//! - Index navigation along the shortest path
//! - Drag scrubbing with snapping throws
//! - Autoplay with visibility and focus suspension
//!
//! ## Architecture
//!
//! The engine is built on:
//! - A pure geometry pipeline (layout, timeline, center offset)
//! - A single owner of the playhead ([`LoopEngine`]) driven by host ticks
//! - Listeners for change and settle notifications
//! - Scoped host subscriptions released on teardown

pub mod wrap;
pub mod layout;
pub mod segment;
pub mod timeline;
pub mod center;
pub mod closest;
pub mod tween;
pub mod config;
pub mod autoplay;
pub mod events;
pub mod subscription;
pub mod engine;
pub mod navigation;
pub mod drag;
pub mod error;

pub use layout::{ItemMeasurement, Layout, MeasurementProvider, StaticMeasurements};
pub use segment::Snap;
pub use timeline::LoopTimeline;
pub use tween::Easing;
pub use config::{AutoplayConfig, DragConfig, LoopConfig, NavigationDefaults};
pub use autoplay::{AutoplayScheduler, AutoplayState, SuspendReason};
pub use events::{ChangeEvent, ListenerError, ListenerId, ListenerResult, LoopEvent, SettleCause};
pub use subscription::{Subscription, SubscriptionId};
pub use engine::{LoopEngine, NavigationState, PlaybackState};
pub use navigation::{TransitionHandle, TransitionOptions};
pub use error::{LoopError, MeasureError, Result};
