// SPDX-License-Identifier: MIT OR Apache-2.0
//! Closed-loop timeline built from a layout.
//!
//! Every item gets two segments. The primary segment starts at time zero
//! and carries the item from its resting offset until it has fully left the
//! loop's leading edge. The wrap-entry segment picks up exactly when the
//! primary ends, placing the item one loop length further along and
//! bringing it back to rest. Both move at `pixels_per_second`, so each
//! item's program spans exactly one loop period.

use crate::error::{LoopError, Result};
use crate::layout::Layout;
use crate::segment::{ItemProgram, Segment, SegmentKind, Snap};
use crate::wrap::TimeWrap;

/// Base pixel rate for a speed of 1.0
pub const PIXELS_PER_SPEED_UNIT: f64 = 100.0;

/// The loop program for all items
#[derive(Debug, Clone, PartialEq)]
pub struct LoopTimeline {
    programs: Vec<ItemProgram>,
    duration: f64,
    pixels_per_second: f64,
    total_length: f64,
    snap: Snap,
}

impl LoopTimeline {
    /// Build the loop program for a layout
    pub fn build(layout: &Layout, pixels_per_second: f64, snap: Snap) -> Result<Self> {
        if !pixels_per_second.is_finite() || pixels_per_second <= 0.0 {
            return Err(LoopError::NonPositiveSpeed(pixels_per_second));
        }
        if layout.is_empty() {
            return Err(LoopError::EmptyTrack);
        }

        let total_length = layout.total_length();
        let mut programs = Vec::with_capacity(layout.len());

        for index in 0..layout.len() {
            let distance_to_start = layout.distance_to_start(index);
            let distance_to_loop = layout.distance_to_loop(index);

            let primary = Segment {
                kind: SegmentKind::Primary,
                start: 0.0,
                duration: distance_to_loop / pixels_per_second,
                from_px: 0.0,
                to_px: snap.apply(-distance_to_loop),
            };
            let wrap_entry = Segment {
                kind: SegmentKind::WrapEntry,
                start: primary.end(),
                duration: (total_length - distance_to_loop) / pixels_per_second,
                from_px: snap.apply(total_length - distance_to_loop),
                to_px: 0.0,
            };

            for segment in [&primary, &wrap_entry] {
                if !segment.duration.is_finite() || segment.duration < 0.0 {
                    return Err(LoopError::InvalidSegment {
                        index,
                        segment: segment.kind.name(),
                        duration: segment.duration,
                    });
                }
            }

            programs.push(ItemProgram {
                primary,
                wrap_entry,
                anchor: distance_to_start / pixels_per_second,
            });
        }

        let duration = total_length / pixels_per_second;
        if !duration.is_finite() || duration <= 0.0 {
            return Err(LoopError::InvalidSegment {
                index: 0,
                segment: SegmentKind::Primary.name(),
                duration,
            });
        }

        Ok(Self {
            programs,
            duration,
            pixels_per_second,
            total_length,
            snap,
        })
    }

    /// Build with a speed multiplier of [`PIXELS_PER_SPEED_UNIT`]
    pub fn with_speed(layout: &Layout, speed: f64, snap: Snap) -> Result<Self> {
        Self::build(layout, speed * PIXELS_PER_SPEED_UNIT, snap)
    }

    /// Loop period in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Travel speed in pixels per second
    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    /// Loop length in pixels this timeline was built for
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Wrap for this timeline's period
    pub fn time_wrap(&self) -> TimeWrap {
        TimeWrap::new(self.duration)
    }

    /// Number of item programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether the timeline has no items
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Per-item programs
    pub fn programs(&self) -> &[ItemProgram] {
        &self.programs
    }

    /// Anchor times before any center adjustment
    pub fn base_anchors(&self) -> Vec<f64> {
        self.programs.iter().map(|p| p.anchor).collect()
    }

    /// Translation in pixels of an item at a loop time
    pub fn translation_at(&self, index: usize, time: f64) -> Option<f64> {
        let program = self.programs.get(index)?;
        let t = self.time_wrap().wrap(time);
        Some(self.snap.apply(program.sample(t)))
    }
}
