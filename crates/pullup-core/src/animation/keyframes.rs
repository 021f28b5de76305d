#![forbid(unsafe_code)]

//! Relative keyframe windows.
//!
//! A [`KeyframeWindow`] is a sub-range of a group's normalized timeline.
//! Sampling a window at the umbrella fraction yields a local progress that is
//! 0 before the window, 1 after it, and linear inside it.

use crate::geometry::Lerp;

/// A `[start, start + duration]` slice of the unit timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeWindow {
    start: f64,
    duration: f64,
}

impl KeyframeWindow {
    /// The whole timeline.
    pub const FULL: Self = Self {
        start: 0.0,
        duration: 1.0,
    };

    /// Create a window. `start` is clamped into [0, 1] and `duration` so the
    /// window never runs past 1.
    #[must_use]
    pub fn new(start: f64, duration: f64) -> Self {
        let start = start.clamp(0.0, 1.0);
        Self {
            start,
            duration: duration.clamp(0.0, 1.0 - start),
        }
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// A window inside this one, with start and duration relative to it.
    #[must_use]
    pub fn nested(&self, relative_start: f64, relative_duration: f64) -> Self {
        Self::new(
            self.start + relative_start * self.duration,
            relative_duration * self.duration,
        )
    }

    /// Local progress at umbrella `fraction`.
    #[must_use]
    pub fn local_progress(&self, fraction: f64) -> f64 {
        if self.duration <= f64::EPSILON {
            return if fraction >= self.start { 1.0 } else { 0.0 };
        }
        ((fraction - self.start) / self.duration).clamp(0.0, 1.0)
    }

    /// Interpolate `from` → `to` at umbrella `fraction`.
    #[must_use]
    pub fn sample<T: Lerp>(&self, from: &T, to: &T, fraction: f64) -> T {
        from.lerp(to, self.local_progress(fraction))
    }
}

impl Default for KeyframeWindow {
    fn default() -> Self {
        Self::FULL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_window_holds_endpoints() {
        let w = KeyframeWindow::new(0.3, 0.4);
        assert_eq!(w.local_progress(0.1), 0.0);
        assert_eq!(w.local_progress(0.9), 1.0);
        assert!((w.local_progress(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn window_never_overruns() {
        let w = KeyframeWindow::new(0.8, 0.4);
        assert!((w.end() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn nested_tail() {
        let w = KeyframeWindow::new(0.2, 0.4).nested(0.8, 0.2);
        assert!((w.start() - 0.52).abs() < 1e-12);
        assert!((w.duration() - 0.08).abs() < 1e-12);
    }

    #[test]
    fn zero_width_window_steps() {
        let w = KeyframeWindow::new(0.5, 0.0);
        assert_eq!(w.local_progress(0.49), 0.0);
        assert_eq!(w.local_progress(0.5), 1.0);
    }

    #[test]
    fn sample_lerps() {
        let w = KeyframeWindow::FULL;
        assert_eq!(w.sample(&30.0, &0.0, 0.5), 15.0);
    }
}
