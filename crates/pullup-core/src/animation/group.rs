#![forbid(unsafe_code)]

//! Scrubbable umbrella animation group.
//!
//! A [`ScrubbableGroup`] owns one normalized fraction along a start→end
//! timeline. Everything a transition animates is sampled from that fraction:
//! property interpolations read it directly, and time-driven sub-effects each
//! hold a [`LayerClock`] whose local time offset is resynchronized from it.
//!
//! The group can be scrubbed (paused at an explicit fraction), started with
//! its base profile, re-targeted toward either end with a different profile,
//! or snapped to an end. Re-targeting always continues from the current
//! fraction; the new duration is the profile's natural duration scaled by
//! the distance left to cover.
//!
//! # State Machine
//!
//! ```text
//! Inactive ──pause/scrub──► Paused ──start/continue_to──► Running
//!    │                        ▲                              │
//!    │                        └────────pause/scrub───────────┤
//!    └──────────────finish_immediately / arrival─────────────┴──► Finished
//! ```
//!
//! # Invariants
//!
//! 1. `fraction()` is always in [0.0, 1.0].
//! 2. A completion is recorded exactly once; [`take_completion`] yields it
//!    once and `None` afterwards.
//! 3. A finished group ignores every further command.
//! 4. Repeating a running settle request (same end, same [`Settle`]) is a
//!    no-op: the motion is not restarted.
//! 5. While running, every layer clock's offset equals
//!    `fraction × layer.duration` after each [`advance`].
//!
//! [`take_completion`]: ScrubbableGroup::take_completion
//! [`advance`]: ScrubbableGroup::advance

use std::time::Duration;

use super::timing::{Motion, TimingProfile};
use super::{Animation, TimingCurve};

/// Lifecycle status of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Built, never paused or started.
    Inactive,
    /// Holding an explicit fraction.
    Paused,
    /// Moving under a timing profile.
    Running,
    /// Reached an end; completion has been recorded.
    Finished,
}

/// Which end of the timeline a group reached or is heading for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupEnd {
    /// Fraction 0.0.
    Start,
    /// Fraction 1.0.
    End,
}

impl GroupEnd {
    /// Fraction at this end.
    #[must_use]
    pub const fn fraction(self) -> f64 {
        match self {
            Self::Start => 0.0,
            Self::End => 1.0,
        }
    }

    /// The other end.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

/// Why a group is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settle {
    /// Plain start with the base profile.
    Run,
    /// Cancellation back toward where the transition began.
    Cancel,
    /// Velocity-seeded completion.
    Finish,
}

// ---------------------------------------------------------------------------
// LayerClock
// ---------------------------------------------------------------------------

/// An independent sub-effect clock layered under the umbrella fraction.
///
/// The clock never advances on its own; its owner sets the time offset.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerClock {
    label: &'static str,
    duration: Duration,
    curve: TimingCurve,
    time_offset: Duration,
    paused: bool,
}

impl LayerClock {
    /// Create a paused clock at offset zero.
    #[must_use]
    pub fn new(label: &'static str, duration: Duration, curve: TimingCurve) -> Self {
        Self {
            label,
            duration,
            curve,
            time_offset: Duration::ZERO,
            paused: true,
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn time_offset(&self) -> Duration {
        self.time_offset
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop the clock and rewind it to zero.
    pub fn pause(&mut self) {
        self.paused = true;
        self.time_offset = Duration::ZERO;
    }

    fn sync(&mut self, fraction: f64, running: bool) {
        self.paused = !running;
        self.time_offset = self.duration.mul_f64(fraction.clamp(0.0, 1.0));
    }

    /// Curve-shaped local progress in [0, 1].
    #[must_use]
    pub fn local_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let t = self.time_offset.as_secs_f64() / self.duration.as_secs_f64();
        self.curve.apply(t)
    }
}

// ---------------------------------------------------------------------------
// ScrubbableGroup
// ---------------------------------------------------------------------------

/// The umbrella animation: one fraction, many synchronized sub-effects.
#[derive(Debug, Clone)]
pub struct ScrubbableGroup {
    status: GroupStatus,
    fraction: f64,
    reversed: bool,
    base_profile: TimingProfile,
    motion: Option<Motion>,
    settle: Option<(GroupEnd, Settle)>,
    layers: Vec<LayerClock>,
    completion: Option<GroupEnd>,
}

impl ScrubbableGroup {
    /// Create an inactive group at fraction 0 that starts with `base_profile`.
    #[must_use]
    pub fn new(base_profile: TimingProfile) -> Self {
        Self {
            status: GroupStatus::Inactive,
            fraction: 0.0,
            reversed: false,
            base_profile,
            motion: None,
            settle: None,
            layers: Vec::new(),
            completion: None,
        }
    }

    /// Register a layer clock (builder pattern).
    #[must_use]
    pub fn with_layer(mut self, layer: LayerClock) -> Self {
        self.add_layer(layer);
        self
    }

    /// Register a layer clock and return its index.
    pub fn add_layer(&mut self, mut layer: LayerClock) -> usize {
        layer.pause();
        self.layers.push(layer);
        self.layers.len() - 1
    }

    #[must_use]
    pub fn layers(&self) -> &[LayerClock] {
        &self.layers
    }

    /// Find a layer by label.
    #[must_use]
    pub fn layer(&self, label: &str) -> Option<&LayerClock> {
        self.layers.iter().find(|l| l.label == label)
    }

    #[inline]
    #[must_use]
    pub fn status(&self) -> GroupStatus {
        self.status
    }

    /// Position along the start→end timeline.
    #[inline]
    #[must_use]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Whether the group is heading toward [`GroupEnd::Start`].
    #[inline]
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == GroupStatus::Running
    }

    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GroupStatus::Finished
    }

    /// The end the group heads for when started.
    #[must_use]
    pub fn target_end(&self) -> GroupEnd {
        if self.reversed {
            GroupEnd::Start
        } else {
            GroupEnd::End
        }
    }

    /// The active settle request, if running.
    #[must_use]
    pub fn settle(&self) -> Option<(GroupEnd, Settle)> {
        self.settle
    }

    /// Stop motion and hold the current fraction.
    pub fn pause(&mut self) {
        if self.status == GroupStatus::Finished {
            return;
        }
        self.status = GroupStatus::Paused;
        self.motion = None;
        self.settle = None;
        self.sync_layers();
    }

    /// Forget a previous reversal so a later start heads for the end again.
    pub fn clear_reversal(&mut self) {
        self.reversed = false;
    }

    /// Pause at `progress` (clamped). Returns the applied fraction.
    pub fn scrub(&mut self, progress: f64) -> f64 {
        if self.status == GroupStatus::Finished {
            return self.fraction;
        }
        self.fraction = progress.clamp(0.0, 1.0);
        self.pause();
        self.fraction
    }

    /// Run from the current fraction toward [`target_end`](Self::target_end)
    /// with the base profile.
    pub fn start(&mut self) -> bool {
        let profile = self.base_profile;
        self.continue_to(self.target_end(), profile, Settle::Run)
    }

    /// Re-target toward `end` with `profile`, continuing from the current
    /// fraction. Returns `false` when the request was ignored.
    pub fn continue_to(&mut self, end: GroupEnd, profile: TimingProfile, settle: Settle) -> bool {
        if self.status == GroupStatus::Finished {
            return false;
        }
        if self.status == GroupStatus::Running && self.settle == Some((end, settle)) {
            return false;
        }
        self.reversed = end == GroupEnd::Start;
        let motion = Motion::scaled(self.fraction, end.fraction(), profile);
        if motion.is_complete() {
            self.complete(end);
            return true;
        }
        self.motion = Some(motion);
        self.settle = Some((end, settle));
        self.status = GroupStatus::Running;
        self.sync_layers();
        true
    }

    /// Jump to `end` and record completion.
    pub fn finish_immediately(&mut self, end: GroupEnd) {
        if self.status == GroupStatus::Finished {
            return;
        }
        self.complete(end);
    }

    /// Advance a running group by `dt`. Returns `true` if the fraction moved.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if self.status != GroupStatus::Running {
            return false;
        }
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        let before = self.fraction;
        motion.tick(dt);
        let arrived = motion.is_complete();
        self.fraction = motion.value().clamp(0.0, 1.0);
        if arrived {
            self.complete(self.target_end());
        } else {
            self.sync_layers();
            tracing::trace!(
                fraction = self.fraction,
                layers = self.layers.len(),
                "group.resync"
            );
        }
        (self.fraction - before).abs() > f64::EPSILON || arrived
    }

    /// The recorded completion, yielded once.
    pub fn take_completion(&mut self) -> Option<GroupEnd> {
        self.completion.take()
    }

    fn complete(&mut self, end: GroupEnd) {
        self.fraction = end.fraction();
        self.motion = None;
        self.settle = None;
        self.reversed = end == GroupEnd::Start;
        self.status = GroupStatus::Finished;
        for layer in &mut self.layers {
            layer.sync(self.fraction, false);
        }
        self.completion = Some(end);
        tracing::debug!(?end, "group.complete");
    }

    fn sync_layers(&mut self) {
        let running = self.status == GroupStatus::Running;
        for layer in &mut self.layers {
            layer.sync(self.fraction, running);
        }
    }
}
