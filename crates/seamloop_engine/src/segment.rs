// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion segments that make up an item's part of the loop.

use serde::{Deserialize, Serialize};

/// Quantisation applied to computed positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Snap {
    /// No rounding
    Disabled,
    /// Round to the nearest multiple of the increment (in pixels)
    Increment(f64),
    /// Round to whole pixels
    #[default]
    Pixel,
}

impl Snap {
    /// Round a value according to this snap
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Snap::Disabled => value,
            Snap::Pixel => value.round(),
            Snap::Increment(step) if step > 0.0 && step.is_finite() => {
                (value / step).round() * step
            }
            Snap::Increment(_) => value,
        }
    }
}

/// Which half of an item's loop program a segment is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// From the resting offset until the item has fully left the loop
    Primary,
    /// From the far edge back to the resting offset
    WrapEntry,
}

impl SegmentKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::WrapEntry => "wrap-entry",
        }
    }
}

/// A linear translation over a time span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment kind
    pub kind: SegmentKind,
    /// Start time in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Translation in pixels at the start
    pub from_px: f64,
    /// Translation in pixels at the end
    pub to_px: f64,
}

impl Segment {
    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Translation at a time, clamped to the segment
    pub fn sample(&self, time: f64) -> f64 {
        if self.duration <= 0.0 {
            return self.to_px;
        }
        let t = ((time - self.start) / self.duration).clamp(0.0, 1.0);
        lerp(self.from_px, self.to_px, t)
    }
}

/// The two chained segments of one item plus its anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemProgram {
    /// Leaves the loop
    pub primary: Segment,
    /// Re-enters from the far edge
    pub wrap_entry: Segment,
    /// Time at which the item rests at the reference edge
    pub anchor: f64,
}

impl ItemProgram {
    /// Translation at a time already wrapped onto the loop
    pub fn sample(&self, time: f64) -> f64 {
        if time < self.primary.end() {
            self.primary.sample(time)
        } else {
            self.wrap_entry.sample(time)
        }
    }
}

/// Linear interpolation between two values
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap() {
        assert_eq!(Snap::Disabled.apply(1.26), 1.26);
        assert_eq!(Snap::Pixel.apply(1.6), 2.0);
        assert_eq!(Snap::Increment(0.5).apply(1.3), 1.5);
        assert_eq!(Snap::Increment(0.0).apply(1.3), 1.3);
    }

    #[test]
    fn test_segment_sample_clamps() {
        let seg = Segment {
            kind: SegmentKind::Primary,
            start: 1.0,
            duration: 2.0,
            from_px: 0.0,
            to_px: -200.0,
        };
        assert_eq!(seg.sample(0.0), 0.0);
        assert_eq!(seg.sample(2.0), -100.0);
        assert_eq!(seg.sample(5.0), -200.0);
    }
}
