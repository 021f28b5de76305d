#![forbid(unsafe_code)]

//! Damped spring physics for timing profiles.
//!
//! [`SpringParameters`] is the perceptual description (damping ratio and
//! response) a [`TimingProfile`](super::TimingProfile) carries. Its
//! closed-form [`position_at`](SpringParameters::position_at) gives exact
//! samples; [`Spring`] integrates the same system step by step and is used to
//! measure how long a spring needs to come to rest.
//!
//! Both describe a unit mass pulled toward 1.0:
//!
//!   x'' = -k (x - 1) - c x'
//!
//! with `k = (2π / response)²` and `c = 4π × damping_ratio / response`.
//!
//! # Invariants
//!
//! 1. `settling_duration()` is finite and never exceeds [`MAX_SETTLE_SECS`].
//! 2. `position_at(0) == 0` and `position_at(t) → 1` for any positive
//!    damping ratio.
//!
//! # Failure Modes
//!
//! - Zero damping never rests; settling caps at [`MAX_SETTLE_SECS`].
//! - Responses below 10ms are treated as 10ms.

use std::f64::consts::PI;
use std::time::Duration;

use super::Animation;

/// Integration step.
const STEP_SECS: f64 = 0.004;

/// Distance from 1.0 and speed below which a spring counts as settled.
const REST_EPSILON: f64 = 0.001;

const MIN_RESPONSE_SECS: f64 = 0.01;

/// Upper bound on a computed settling duration.
pub const MAX_SETTLE_SECS: f64 = 10.0;

/// Fixed-step integrator for a 0→1 spring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    params: SpringParameters,
    position: f64,
    velocity: f64,
    settled: bool,
}

impl Spring {
    #[must_use]
    pub fn new(params: SpringParameters) -> Self {
        Self {
            params,
            position: 0.0,
            velocity: params.initial_velocity,
            settled: false,
        }
    }

    #[must_use]
    pub fn params(&self) -> SpringParameters {
        self.params
    }

    /// Unclamped position.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    fn integrate(&mut self, secs: f64) {
        let (k, c) = (self.params.stiffness(), self.params.damping());
        let mut left = secs;
        while left > 0.0 {
            let h = left.min(STEP_SECS);
            // Semi-implicit Euler.
            self.velocity += (-k * (self.position - 1.0) - c * self.velocity) * h;
            self.position += self.velocity * h;
            left -= h;
        }
        if (self.position - 1.0).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON * 10.0 {
            self.position = 1.0;
            self.velocity = 0.0;
            self.settled = true;
        }
    }

    /// Time a fresh spring with these parameters needs to settle.
    #[must_use]
    pub fn settling_duration(params: SpringParameters) -> Duration {
        let mut probe = Self::new(params);
        let mut elapsed = 0.0;
        while !probe.settled && elapsed < MAX_SETTLE_SECS {
            probe.integrate(STEP_SECS);
            elapsed += STEP_SECS;
        }
        Duration::from_secs_f64(elapsed.min(MAX_SETTLE_SECS))
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if !self.settled {
            self.integrate(dt.as_secs_f64());
        }
    }

    fn is_complete(&self) -> bool {
        self.settled
    }

    fn value(&self) -> f64 {
        self.position.clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        *self = Self::new(self.params);
    }
}

// ---------------------------------------------------------------------------
// Perceptual parameters
// ---------------------------------------------------------------------------

/// A spring described by damping ratio and response time.
///
/// `initial_velocity` is relative: 1.0 means the full 0→1 distance per
/// second at the start of the motion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpringParameters {
    /// 1.0 is critically damped; below 1.0 overshoots.
    pub damping_ratio: f64,
    /// Approximate period of one oscillation, in seconds.
    pub response: f64,
    /// Starting velocity relative to the animated distance.
    pub initial_velocity: f64,
}

impl Default for SpringParameters {
    fn default() -> Self {
        Self::new(1.0, 0.4)
    }
}

impl SpringParameters {
    /// Create parameters with zero initial velocity.
    #[must_use]
    pub const fn new(damping_ratio: f64, response: f64) -> Self {
        Self {
            damping_ratio,
            response,
            initial_velocity: 0.0,
        }
    }

    /// Seed the spring with a relative velocity (builder pattern).
    #[must_use]
    pub const fn with_initial_velocity(mut self, v: f64) -> Self {
        self.initial_velocity = v;
        self
    }

    fn response_secs(&self) -> f64 {
        self.response.max(MIN_RESPONSE_SECS)
    }

    fn omega(&self) -> f64 {
        2.0 * PI / self.response_secs()
    }

    fn ratio(&self) -> f64 {
        self.damping_ratio.max(0.0)
    }

    /// Equivalent stiffness for a unit mass.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        let w = self.omega();
        w * w
    }

    /// Equivalent damping coefficient for a unit mass.
    #[must_use]
    pub fn damping(&self) -> f64 {
        2.0 * self.ratio() * self.omega()
    }

    /// Time until the spring comes to rest from 0 toward 1.
    #[must_use]
    pub fn settling_duration(&self) -> Duration {
        Spring::settling_duration(*self)
    }

    /// Exact position of a 0→1 spring after `t` seconds.
    #[must_use]
    pub fn position_at(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 0.0;
        }
        let w0 = self.omega();
        let zeta = self.ratio();
        let x0 = -1.0;
        let v0 = self.initial_velocity;

        let x = if (zeta - 1.0).abs() < 1e-6 {
            (-w0 * t).exp() * (x0 + (v0 + w0 * x0) * t)
        } else if zeta < 1.0 {
            let wd = w0 * (1.0 - zeta * zeta).sqrt();
            (-zeta * w0 * t).exp()
                * (x0 * (wd * t).cos() + (v0 + zeta * w0 * x0) / wd * (wd * t).sin())
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - root);
            let r2 = -w0 * (zeta + root);
            let c2 = (v0 - r1 * x0) / (r2 - r1);
            let c1 = x0 - c2;
            c1 * (r1 * t).exp() + c2 * (r2 * t).exp()
        };
        1.0 + x
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
