#![forbid(unsafe_code)]

//! Animation primitives for progress-driven transitions.
//!
//! The transition engine is built around one normalized progress value that
//! many sub-effects read from. This module provides the building blocks:
//!
//! - [`Animation`]: time-driven values (springs, timed motions).
//! - [`TimingCurve`] and the free easing functions: shape a [0, 1] input.
//! - [`spring`]: damped harmonic oscillator and UIKit-style spring parameters.
//! - [`timing`]: [`TimingProfile`](timing::TimingProfile) (curve or spring)
//!   and [`Motion`](timing::Motion), a running segment between two fractions.
//! - [`group`]: the [`ScrubbableGroup`](group::ScrubbableGroup) umbrella
//!   animation with layer clocks.
//! - [`keyframes`]: relative sub-windows inside a group's timeline.
//!
//! # Invariants
//!
//! 1. Every easing function maps 0.0 → 0.0 and 1.0 → 1.0.
//! 2. Inputs outside [0, 1] are clamped before shaping.

use std::time::Duration;

pub mod group;
pub mod keyframes;
pub mod spring;
pub mod timing;

pub use group::{GroupEnd, GroupStatus, LayerClock, ScrubbableGroup, Settle};
pub use keyframes::KeyframeWindow;
pub use spring::{Spring, SpringParameters};
pub use timing::{Motion, TimingProfile};

/// A time-driven animated value.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its final value.
    fn is_complete(&self) -> bool;

    /// Current value, normally in [0.0, 1.0].
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}

/// Signature shared by the easing functions below.
pub type EasingFn = fn(f64) -> f64;

/// Identity easing.
#[inline]
#[must_use]
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in (accelerating).
#[inline]
#[must_use]
pub fn ease_in(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * t
}

/// Cubic ease-out (decelerating).
#[inline]
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// Cubic S-curve.
#[inline]
#[must_use]
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let inv = -2.0 * t + 2.0;
        1.0 - inv * inv * inv / 2.0
    }
}

/// Named timing curve for duration-based motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimingCurve {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    #[default]
    EaseInOut,
}

impl TimingCurve {
    /// Shape a normalized time value.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        self.easing()(t)
    }

    /// The underlying easing function.
    #[must_use]
    pub fn easing(self) -> EasingFn {
        match self {
            Self::Linear => linear,
            Self::EaseIn => ease_in,
            Self::EaseOut => ease_out,
            Self::EaseInOut => ease_in_out,
        }
    }
}
