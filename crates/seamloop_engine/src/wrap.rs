// SPDX-License-Identifier: MIT OR Apache-2.0
//! Modulo helpers for mapping times, progress and indices onto the loop.

/// Maps any time onto `[0, duration)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWrap {
    duration: f64,
}

impl TimeWrap {
    /// Create a wrap for a loop of the given duration in seconds
    pub fn new(duration: f64) -> Self {
        Self { duration }
    }

    /// Loop period in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Wrap a time onto the loop period
    pub fn wrap(&self, time: f64) -> f64 {
        if self.duration.is_nan() || self.duration <= 0.0 || !time.is_finite() {
            return 0.0;
        }
        let wrapped = time.rem_euclid(self.duration);
        // rem_euclid can round up to the divisor for tiny negative inputs
        if wrapped >= self.duration {
            0.0
        } else {
            wrapped
        }
    }

    /// Convert a time to loop progress in `[0, 1)`
    pub fn progress(&self, time: f64) -> f64 {
        if self.duration > 0.0 {
            self.wrap(time) / self.duration
        } else {
            0.0
        }
    }

    /// Circular distance between two times on the loop
    pub fn distance(&self, a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        if d > self.duration / 2.0 {
            (self.duration - d).abs()
        } else {
            d
        }
    }
}

/// Wrap a progress value onto `[0, 1)`
pub fn wrap01(progress: f64) -> f64 {
    TimeWrap::new(1.0).wrap(progress)
}

/// Wrap a signed index onto `[0, count)`
pub fn wrap_index(index: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    index.rem_euclid(count as isize) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_is_periodic() {
        let wrap = TimeWrap::new(4.0);
        let mut t = -13.7;
        while t < 13.7 {
            let a = wrap.wrap(t);
            let b = wrap.wrap(t + 4.0);
            assert!((a - b).abs() < 1e-9, "wrap({t}) = {a}, wrap({}) = {b}", t + 4.0);
            assert!((0.0..4.0).contains(&a));
            t += 0.37;
        }
    }

    #[test]
    fn test_wrap_negative() {
        let wrap = TimeWrap::new(4.0);
        assert_eq!(wrap.wrap(-1.0), 3.0);
        assert_eq!(wrap.wrap(4.0), 0.0);
        assert_eq!(wrap.wrap(-1e-18), 0.0);
    }

    #[test]
    fn test_degenerate_duration() {
        assert_eq!(TimeWrap::new(0.0).wrap(3.0), 0.0);
        assert_eq!(TimeWrap::new(0.0).progress(3.0), 0.0);
    }

    #[test]
    fn test_distance_is_circular() {
        let wrap = TimeWrap::new(4.0);
        assert_eq!(wrap.distance(0.0, 3.0), 1.0);
        assert_eq!(wrap.distance(1.0, 2.5), 1.5);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 4), 3);
        assert_eq!(wrap_index(9, 4), 1);
        assert_eq!(wrap_index(-8, 4), 0);
        assert_eq!(wrap_index(5, 0), 0);
    }

    #[test]
    fn test_wrap01() {
        assert_eq!(wrap01(1.25), 0.25);
        assert_eq!(wrap01(-0.25), 0.75);
    }
}
