// SPDX-License-Identifier: MIT OR Apache-2.0
//! Layout calculation: item widths, spacing and the loop length.
//!
//! The host measures each item and reports its width, the gap to its
//! predecessor and any horizontal scale. Item 0's gap is the loop-closing
//! gap back from the last item. Everything here is pure, so a layout can be
//! recomputed at any time without touching the playhead.

use crate::error::{LoopError, MeasureError, Result};
use serde::{Deserialize, Serialize};

/// Raw geometry of one item as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemMeasurement {
    /// Unscaled width in pixels
    pub width: f64,
    /// Gap in pixels between the previous item's trailing edge and this item
    pub gap_before: f64,
    /// Horizontal scale transform currently applied to the item
    pub scale_x: f64,
}

impl ItemMeasurement {
    /// Create an unscaled measurement
    pub fn new(width: f64, gap_before: f64) -> Self {
        Self {
            width,
            gap_before,
            scale_x: 1.0,
        }
    }

    /// Set the horizontal scale
    pub fn with_scale(mut self, scale_x: f64) -> Self {
        self.scale_x = scale_x;
        self
    }

    /// Width after applying the scale transform
    pub fn effective_width(&self) -> f64 {
        self.width * self.scale_x
    }
}

/// Source of item geometry, implemented by the rendering layer
pub trait MeasurementProvider<T> {
    /// Measure a single item
    fn measure(&self, index: usize, item: &T) -> std::result::Result<ItemMeasurement, MeasureError>;

    /// Width of the visible viewport in pixels
    fn viewport_width(&self) -> f64;
}

/// Measurements known up front, independent of the items themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticMeasurements {
    /// One measurement per item, in loop order
    pub measurements: Vec<ItemMeasurement>,
    /// Viewport width in pixels
    pub viewport_width: f64,
}

impl StaticMeasurements {
    /// `count` identical items
    pub fn uniform(count: usize, width: f64, gap: f64, viewport_width: f64) -> Self {
        Self {
            measurements: vec![ItemMeasurement::new(width, gap); count],
            viewport_width,
        }
    }
}

impl<T> MeasurementProvider<T> for StaticMeasurements {
    fn measure(&self, index: usize, _item: &T) -> std::result::Result<ItemMeasurement, MeasureError> {
        self.measurements
            .get(index)
            .copied()
            .ok_or_else(|| MeasureError::new(format!("no measurement for item {index}")))
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}

/// Measured geometry of the whole strip
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    widths: Vec<f64>,
    space_before: Vec<f64>,
    offsets: Vec<f64>,
    total_length: f64,
}

impl Layout {
    /// Compute a layout from per-item measurements
    pub fn compute(measurements: &[ItemMeasurement], padding_right: f64) -> Result<Self> {
        if measurements.is_empty() {
            return Err(LoopError::EmptyTrack);
        }

        let mut widths = Vec::with_capacity(measurements.len());
        let mut space_before = Vec::with_capacity(measurements.len());
        let mut offsets = Vec::with_capacity(measurements.len());
        let mut cursor = 0.0;

        for (index, m) in measurements.iter().enumerate() {
            let width = m.effective_width();
            if !width.is_finite() || width <= f64::EPSILON {
                return Err(LoopError::ZeroWidthItem { index, width });
            }
            let gap = if m.gap_before.is_finite() { m.gap_before } else { 0.0 };

            // item 0 sits at the origin; its gap closes the loop instead
            if index > 0 {
                cursor += gap;
            }
            offsets.push(cursor);
            cursor += width;

            widths.push(width);
            space_before.push(gap);
        }

        let total_length = cursor + space_before[0] + padding_right;

        Ok(Self {
            widths,
            space_before,
            offsets,
            total_length,
        })
    }

    /// Measure every item through a provider and compute the layout
    pub fn measure<T, P>(items: &[T], provider: &P, padding_right: f64) -> Result<Self>
    where
        P: MeasurementProvider<T> + ?Sized,
    {
        let measurements = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                provider
                    .measure(index, item)
                    .map_err(|source| LoopError::Measurement { index, source })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::compute(&measurements, padding_right)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Whether the layout has no items
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Effective widths of each item
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// Gap before each item; entry 0 is the loop-closing gap
    pub fn space_before(&self) -> &[f64] {
        &self.space_before
    }

    /// Natural leading-edge position of each item relative to item 0
    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Length of one full loop in pixels
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Distance an item travels from rest until its anchor time
    pub fn distance_to_start(&self, index: usize) -> f64 {
        self.offsets[index] + self.space_before[0]
    }

    /// Distance an item travels from rest until it has fully left the loop
    pub fn distance_to_loop(&self, index: usize) -> f64 {
        self.distance_to_start(index) + self.widths[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(count: usize, width: f64, gap: f64) -> Vec<ItemMeasurement> {
        vec![ItemMeasurement::new(width, gap); count]
    }

    #[test]
    fn test_equal_items() {
        let layout = Layout::compute(&uniform(4, 100.0, 0.0), 0.0).unwrap();
        assert_eq!(layout.total_length(), 400.0);
        assert_eq!(layout.offsets(), &[0.0, 100.0, 200.0, 300.0]);
        assert_eq!(layout.len(), 4);
    }

    #[test]
    fn test_gaps_and_padding() {
        let layout = Layout::compute(&uniform(3, 100.0, 20.0), 5.0).unwrap();
        // three widths, two inner gaps, the closing gap, padding
        assert_eq!(layout.total_length(), 300.0 + 40.0 + 20.0 + 5.0);
        assert_eq!(layout.offsets(), &[0.0, 120.0, 240.0]);
        assert_eq!(layout.distance_to_start(1), 140.0);
        assert_eq!(layout.distance_to_loop(2), 360.0);
    }

    #[test]
    fn test_scale_applies_to_width() {
        let measurements = [
            ItemMeasurement::new(100.0, 0.0).with_scale(0.5),
            ItemMeasurement::new(100.0, 0.0),
        ];
        let layout = Layout::compute(&measurements, 0.0).unwrap();
        assert_eq!(layout.widths(), &[50.0, 100.0]);
        assert_eq!(layout.total_length(), 150.0);
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let mut measurements = uniform(3, 100.0, 0.0);
        measurements[1].width = 0.0;
        let err = Layout::compute(&measurements, 0.0).unwrap_err();
        assert!(matches!(err, LoopError::ZeroWidthItem { index: 1, .. }));

        let scaled = [ItemMeasurement::new(100.0, 0.0).with_scale(0.0)];
        assert!(Layout::compute(&scaled, 0.0).is_err());
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(matches!(
            Layout::compute(&[], 0.0),
            Err(LoopError::EmptyTrack)
        ));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let measurements = [
            ItemMeasurement::new(80.0, 12.0),
            ItemMeasurement::new(120.0, 8.0),
            ItemMeasurement::new(60.0, 10.0),
        ];
        let a = Layout::compute(&measurements, 3.0).unwrap();
        let b = Layout::compute(&measurements, 3.0).unwrap();
        assert_eq!(a, b);
    }

    struct Failing;

    impl MeasurementProvider<u32> for Failing {
        fn measure(&self, index: usize, _item: &u32) -> std::result::Result<ItemMeasurement, MeasureError> {
            if index == 2 {
                Err(MeasureError::new("detached"))
            } else {
                Ok(ItemMeasurement::new(10.0, 0.0))
            }
        }

        fn viewport_width(&self) -> f64 {
            100.0
        }
    }

    #[test]
    fn test_measure_reports_failing_item() {
        let err = Layout::measure(&[1, 2, 3], &Failing, 0.0).unwrap_err();
        assert!(matches!(err, LoopError::Measurement { index: 2, .. }));
        assert!(err.is_transient());
    }
}
