// SPDX-License-Identifier: MIT OR Apache-2.0
//! Loop configuration.
//!
//! All settings have defaults, so a config file only needs the fields it
//! changes:
//!
//! ```text
//! (speed: 1.5, center: true, autoplay: Some((delay: 3.0)))
//! ```

use crate::error::{LoopError, Result};
use crate::segment::Snap;
use crate::tween::Easing;
use serde::{Deserialize, Serialize};

/// Default dead zone in pixels below which a drag does not snap away
pub const DEFAULT_DEAD_ZONE_PX: f64 = 10.0;

/// Settings for the whole loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Speed multiplier; 1.0 travels 100 pixels per second
    pub speed: f64,
    /// Extra space after the last item, in pixels
    pub padding_right: f64,
    /// Position quantisation
    pub snap: Snap,
    /// Align item midpoints with the viewport midpoint at rest
    pub center: bool,
    /// Start with free-running playback paused
    pub paused: bool,
    /// Run the loop (and autoplay) backwards
    pub reversed: bool,
    /// Defaults for navigation transitions
    pub navigation: NavigationDefaults,
    /// Drag and throw behaviour
    pub drag: DragConfig,
    /// Timed advance, disabled when `None`
    pub autoplay: Option<AutoplayConfig>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            padding_right: 0.0,
            snap: Snap::default(),
            center: false,
            paused: false,
            reversed: false,
            navigation: NavigationDefaults::default(),
            drag: DragConfig::default(),
            autoplay: None,
        }
    }
}

impl LoopConfig {
    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Reject settings that cannot produce a loop
    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(LoopError::NonPositiveSpeed(self.speed));
        }
        Ok(())
    }

    /// Set the speed multiplier
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable center mode
    pub fn with_center(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    /// Start paused or playing
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    /// Set the snap
    pub fn with_snap(mut self, snap: Snap) -> Self {
        self.snap = snap;
        self
    }

    /// Enable autoplay with a delay in seconds
    pub fn with_autoplay(mut self, delay: f64) -> Self {
        self.autoplay = Some(AutoplayConfig { delay });
        self
    }
}

/// Default duration and easing for index navigation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NavigationDefaults {
    /// Seconds per transition; `None` travels at the loop's own speed
    pub duration: Option<f64>,
    /// Easing for transitions
    pub easing: Easing,
}

/// Drag and throw settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Whether pointer dragging is accepted
    pub enabled: bool,
    /// Displacement in pixels below which release keeps the last snap
    pub dead_zone_px: f64,
    /// Seconds of release velocity projected forward before snapping
    pub throw_projection: f64,
    /// Slowest speed in pixels per second used to time a throw
    pub min_throw_speed: f64,
    /// Shortest throw in seconds
    pub min_throw_duration: f64,
    /// Longest throw in seconds
    pub max_throw_duration: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dead_zone_px: DEFAULT_DEAD_ZONE_PX,
            throw_projection: 0.3,
            min_throw_speed: 800.0,
            min_throw_duration: 0.15,
            max_throw_duration: 1.2,
        }
    }
}

/// Autoplay timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoplayConfig {
    /// Seconds between advances
    pub delay: f64,
}
