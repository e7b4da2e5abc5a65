// SPDX-License-Identifier: MIT OR Apache-2.0
//! Time-based interpolation used for navigation and throw motion.

use crate::segment::lerp;
use serde::{Deserialize, Serialize};

/// Easing curve applied to tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Constant speed
    #[default]
    Linear,
    /// Quadratic ease in
    EaseInQuad,
    /// Quadratic ease out
    EaseOutQuad,
    /// Quadratic ease in/out
    EaseInOutQuad,
    /// Cubic ease in
    EaseInCubic,
    /// Cubic ease out
    EaseOutCubic,
    /// Cubic ease in/out
    EaseInOutCubic,
}

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// A single value animated between two points in host time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
    easing: Easing,
}

impl Tween {
    /// Create a tween starting at host time `start`
    pub fn new(from: f64, to: f64, start: f64, duration: f64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start,
            duration: if duration.is_finite() { duration.max(0.0) } else { 0.0 },
            easing,
        }
    }

    /// Start value
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Target value
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Whether the tween has reached its target at host time `now`
    pub fn is_done(&self, now: f64) -> bool {
        now - self.start >= self.duration
    }

    /// Value at host time `now`
    pub fn sample(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let t = ((now - self.start) / self.duration).clamp(0.0, 1.0);
        lerp(self.from, self.to, self.easing.apply(t))
    }
}
