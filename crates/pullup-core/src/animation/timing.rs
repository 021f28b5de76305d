#![forbid(unsafe_code)]

//! Timing profiles and running motion segments.
//!
//! A [`TimingProfile`] describes *how* a value travels from 0 to 1: either a
//! cubic curve over a fixed duration, or a spring that takes as long as it
//! needs to settle. A [`Motion`] applies a profile to one concrete segment
//! (`from` → `to`) with a duration already scaled to the distance covered.
//!
//! # Invariants
//!
//! 1. `TimingProfile::progress(0.0) == 0.0` and `progress(1.0) == 1.0`.
//! 2. A [`Motion`] with zero duration is complete immediately and reports `to`.
//! 3. `Motion::value()` equals `to` once complete, regardless of overshoot.
//! 4. A spring seeded with a velocity starts at `initial_velocity × |to - from|`
//!    per second, whatever the distance.

use std::time::Duration;

use super::spring::SpringParameters;
use super::{Animation, TimingCurve};
use crate::geometry::Lerp;

/// How a value travels across a normalized distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingProfile {
    /// A cubic curve over a fixed duration.
    Cubic {
        curve: TimingCurve,
        duration: Duration,
    },
    /// A damped spring; duration is derived from its settling time.
    Spring(SpringParameters),
}

impl TimingProfile {
    /// Linear motion over `duration`.
    #[must_use]
    pub const fn linear(duration: Duration) -> Self {
        Self::Cubic {
            curve: TimingCurve::Linear,
            duration,
        }
    }

    /// Ease-in-out motion over `duration`.
    #[must_use]
    pub const fn ease_in_out(duration: Duration) -> Self {
        Self::Cubic {
            curve: TimingCurve::EaseInOut,
            duration,
        }
    }

    /// Spring motion.
    #[must_use]
    pub const fn spring(damping_ratio: f64, response: f64) -> Self {
        Self::Spring(SpringParameters::new(damping_ratio, response))
    }

    /// Time the profile takes to cover the full 0→1 distance.
    #[must_use]
    pub fn natural_duration(&self) -> Duration {
        match self {
            Self::Cubic { duration, .. } => *duration,
            Self::Spring(params) => params.settling_duration(),
        }
    }

    /// Shaped progress for normalized time `t` in [0, 1].
    #[must_use]
    pub fn progress(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Cubic { curve, .. } => curve.apply(t),
            Self::Spring(params) => {
                let secs = params.settling_duration().as_secs_f64();
                params.position_at(t * secs)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

/// A running segment between two fractions.
#[derive(Debug, Clone)]
pub struct Motion {
    from: f64,
    to: f64,
    profile: TimingProfile,
    duration: Duration,
    /// Cached natural duration for spring sampling.
    natural_secs: f64,
    elapsed: Duration,
}

impl Motion {
    /// Create a motion covering `from` → `to` over an explicit duration.
    #[must_use]
    pub fn new(from: f64, to: f64, profile: TimingProfile, duration: Duration) -> Self {
        Self {
            from,
            to,
            profile,
            duration,
            natural_secs: profile.natural_duration().as_secs_f64(),
            elapsed: Duration::ZERO,
        }
    }

    /// Create a motion whose duration is the profile's natural duration
    /// scaled by the distance to cover.
    ///
    /// A velocity-seeded spring keeps its natural duration: its velocity is
    /// already relative to this segment, and compressing its clock would
    /// multiply the starting speed by `1 / distance`.
    #[must_use]
    pub fn scaled(from: f64, to: f64, profile: TimingProfile) -> Self {
        let distance = (to - from).abs().min(1.0);
        let duration = match profile {
            _ if distance == 0.0 => Duration::ZERO,
            TimingProfile::Spring(params) if params.initial_velocity != 0.0 => {
                profile.natural_duration()
            }
            _ => profile.natural_duration().mul_f64(distance),
        };
        Self::new(from, to, profile, duration)
    }

    /// Segment start.
    #[must_use]
    pub fn from(&self) -> f64 {
        self.from
    }

    /// Segment end.
    #[must_use]
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Total duration of the segment.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The profile driving this segment.
    #[must_use]
    pub fn profile(&self) -> &TimingProfile {
        &self.profile
    }

    fn shaped(&self, t: f64) -> f64 {
        match self.profile {
            TimingProfile::Cubic { curve, .. } => curve.apply(t),
            // Sampling the spring over its own natural time keeps the shape
            // intact when the segment duration was scaled down.
            TimingProfile::Spring(params) => params.position_at(t * self.natural_secs),
        }
    }
}

impl Animation for Motion {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current fraction. May leave [from, to] briefly for underdamped springs.
    fn value(&self) -> f64 {
        if self.is_complete() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from.lerp(&self.to, self.shaped(t))
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}
