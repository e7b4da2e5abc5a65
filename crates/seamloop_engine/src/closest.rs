// SPDX-License-Identifier: MIT OR Apache-2.0
//! Circular nearest-anchor lookup.

use crate::wrap::TimeWrap;

/// Index of the anchor circularly nearest to `time`.
///
/// Ties resolve to the lowest index. Runs every frame, so it stays a single
/// pass with no allocation.
pub fn closest_index(anchors: &[f64], duration: f64, time: f64) -> usize {
    let wrap = TimeWrap::new(duration);
    let mut closest = f64::INFINITY;
    let mut index = 0;
    for (i, anchor) in anchors.iter().enumerate() {
        let d = wrap.distance(*anchor, time);
        if d < closest {
            closest = d;
            index = i;
        }
    }
    index
}
