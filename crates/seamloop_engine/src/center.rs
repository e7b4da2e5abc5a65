// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shifts anchor times so items rest centered in the viewport.

use crate::wrap::TimeWrap;

/// Time by which the viewport midpoint trails the loop's reference edge
pub fn center_time_offset(duration: f64, total_length: f64, viewport_width: f64, enabled: bool) -> f64 {
    if !enabled || total_length <= 0.0 || !viewport_width.is_finite() {
        return 0.0;
    }
    duration * (viewport_width / 2.0) / total_length
}

/// Compute display anchors from the timeline's base anchors.
///
/// Always derived from the unadjusted anchors, so repeating the call with
/// the same viewport yields the same result.
pub fn adjust_anchors(
    base: &[f64],
    widths: &[f64],
    total_length: f64,
    wrap: TimeWrap,
    viewport_width: f64,
    enabled: bool,
) -> Vec<f64> {
    if !enabled || total_length <= 0.0 {
        return base.to_vec();
    }
    let duration = wrap.duration();
    let offset = center_time_offset(duration, total_length, viewport_width, enabled);
    base.iter()
        .zip(widths)
        .map(|(anchor, width)| wrap.wrap(anchor + duration * (width / 2.0) / total_length - offset))
        .collect()
}
