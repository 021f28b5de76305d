#![forbid(unsafe_code)]

//! Gesture-to-progress driver.
//!
//! An [`InteractionDriver`] turns one axis of a pan gesture into transition
//! progress and, on release, into a commit-or-cancel decision. Two drivers
//! exist per menu: one presenting (dragging up opens) and one dismissing
//! (dragging down closes). The sign is fixed per driver.
//!
//! # Continuity
//!
//! A gesture can start while a group is already in flight. The driver then
//! captures the group's fraction as an offset. If the driver heads for the
//! group's start position rather than its end, it is *inverted*: its own
//! progress `p` maps to group fraction `1 - p`, and its release decisions
//! are mirrored (committing means cancelling the group).
//!
//! # Release
//!
//! The release velocity is projected forward with constant deceleration:
//! `(v / 1000) * rate / (1 - rate)` points. Projected progress above the
//! commit threshold commits; otherwise the gesture cancels, animated only
//! if any progress was made.

use crate::animator::InFlight;
use crate::config::GesturePolicy;
use crate::state::TransitionState;

/// Which transition a driver controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// Dragging up opens the panel.
    Presenting,
    /// Dragging down closes the panel.
    Dismissing,
}

impl DriverKind {
    /// Sign applied to vertical translation (y grows downward).
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Presenting => -1.0,
            Self::Dismissing => 1.0,
        }
    }

    /// The state a completed gesture leaves the panel in.
    #[must_use]
    pub const fn target(self) -> TransitionState {
        match self {
            Self::Presenting => TransitionState::Opened,
            Self::Dismissing => TransitionState::Closed,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Presenting => "presenting",
            Self::Dismissing => "dismissing",
        }
    }
}

/// The driver's decision at release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    Commit { relative_velocity: f64 },
    /// `relative_velocity` is measured against the distance back to where the
    /// gesture started.
    Cancel { animated: bool, relative_velocity: f64 },
}

/// What to ask of the animator, after accounting for inversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupDirective {
    Finish { relative_velocity: f64 },
    Cancel { animated: bool },
}

/// Distance travelled after decelerating to rest at a constant `rate`.
#[must_use]
pub fn project(velocity: f64, rate: f64) -> f64 {
    (velocity / 1000.0) * rate / (1.0 - rate)
}

/// Release speed relative to the distance left to travel, capped at `max`.
#[must_use]
pub fn relative_velocity(velocity: f64, progress: f64, panel_height: f64, max: f64) -> f64 {
    let remaining = (1.0 - progress.clamp(0.0, 1.0)) * panel_height;
    if remaining <= f64::EPSILON {
        return if velocity == 0.0 { 0.0 } else { max };
    }
    (velocity.abs() / remaining).min(max)
}

/// Maps one gesture to transition progress.
#[derive(Debug, Clone)]
pub struct InteractionDriver {
    kind: DriverKind,
    in_progress: bool,
    offset: f64,
    inverted: bool,
    policy: GesturePolicy,
}

impl InteractionDriver {
    #[must_use]
    pub fn new(kind: DriverKind, policy: GesturePolicy) -> Self {
        Self {
            kind,
            in_progress: false,
            offset: 0.0,
            inverted: false,
            policy,
        }
    }

    #[must_use]
    pub fn kind(&self) -> DriverKind {
        self.kind
    }

    /// Whether a gesture owned by this driver is active.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Start a gesture, continuing from `in_flight` if a group is live.
    pub fn begin(&mut self, in_flight: Option<InFlight>) {
        self.in_progress = true;
        match in_flight {
            Some(f) => {
                self.inverted = self.kind.target() != f.end_state;
                self.offset = if self.inverted {
                    1.0 - f.fraction
                } else {
                    f.fraction
                };
            }
            None => {
                self.inverted = false;
                self.offset = 0.0;
            }
        }
        tracing::debug!(
            driver = self.kind.label(),
            offset = self.offset,
            inverted = self.inverted,
            "driver.begin"
        );
    }

    fn raw(&self, translation: f64, height: f64) -> f64 {
        if height <= f64::EPSILON {
            return 0.0;
        }
        self.kind.sign() * translation / height
    }

    /// Offset-adjusted progress for a vertical `translation` over `height`.
    #[must_use]
    pub fn progress(&self, translation: f64, height: f64) -> f64 {
        (self.offset + self.raw(translation, height)).clamp(0.0, 1.0)
    }

    /// Map driver progress onto the group timeline.
    #[must_use]
    pub fn group_progress(&self, progress: f64) -> f64 {
        if self.inverted {
            1.0 - progress
        } else {
            progress
        }
    }

    /// End the gesture and decide.
    pub fn release(
        &mut self,
        translation: f64,
        velocity: f64,
        height: f64,
        panel_height: f64,
    ) -> Release {
        self.in_progress = false;
        let progress = self.progress(translation, height);
        let projected = translation + project(velocity, self.policy.deceleration_rate);
        let projected_progress = self.offset + self.raw(projected, height);
        let release = if projected_progress > self.policy.commit_threshold {
            Release::Commit {
                relative_velocity: relative_velocity(
                    velocity,
                    progress,
                    panel_height,
                    self.policy.max_relative_velocity,
                ),
            }
        } else {
            Release::Cancel {
                animated: progress > 0.0,
                relative_velocity: relative_velocity(
                    velocity,
                    1.0 - progress,
                    panel_height,
                    self.policy.max_relative_velocity,
                ),
            }
        };
        tracing::debug!(
            driver = self.kind.label(),
            progress,
            projected_progress,
            ?release,
            "driver.release"
        );
        release
    }

    /// Translate a release into an animator request.
    #[must_use]
    pub fn directive(&self, release: Release) -> GroupDirective {
        match (release, self.inverted) {
            (Release::Commit { relative_velocity }, false) => {
                GroupDirective::Finish { relative_velocity }
            }
            (Release::Cancel { animated, .. }, false) => GroupDirective::Cancel { animated },
            (Release::Commit { .. }, true) => GroupDirective::Cancel { animated: true },
            // Back toward the gesture's start is forward on the group.
            (Release::Cancel { relative_velocity, .. }, true) => {
                GroupDirective::Finish { relative_velocity }
            }
        }
    }

    /// The system cancelled the gesture.
    pub fn system_cancel(&mut self) -> GroupDirective {
        self.in_progress = false;
        tracing::debug!(driver = self.kind.label(), "driver.system_cancel");
        self.directive(Release::Cancel {
            animated: true,
            relative_velocity: 0.0,
        })
    }

    /// Forget the gesture without a decision.
    pub fn end(&mut self) {
        self.in_progress = false;
        self.offset = 0.0;
        self.inverted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 800.0;

    fn driver(kind: DriverKind) -> InteractionDriver {
        InteractionDriver::new(kind, GesturePolicy::default())
    }

    #[test]
    fn projection_matches_formula() {
        let d = project(1000.0, 0.996);
        assert!((d - 249.0).abs() < 1e-9);
        assert_eq!(project(0.0, 0.996), 0.0);
    }

    #[test]
    fn presenting_drag_up_increases_progress() {
        let mut d = driver(DriverKind::Presenting);
        d.begin(None);
        assert!((d.progress(-400.0, H) - 0.5).abs() < 1e-12);
        assert_eq!(d.progress(100.0, H), 0.0);
    }

    #[test]
    fn threshold_commit_and_cancel() {
        let mut d = driver(DriverKind::Presenting);
        d.begin(None);
        assert!(matches!(
            d.release(-350.0, 0.0, H, H),
            Release::Commit { .. }
        ));
        d.begin(None);
        assert!(matches!(
            d.release(-200.0, 0.0, H, H),
            Release::Cancel { animated: true, .. }
        ));
        d.begin(None);
        assert!(matches!(
            d.release(0.0, 0.0, H, H),
            Release::Cancel { animated: false, .. }
        ));
    }

    #[test]
    fn fling_projects_past_threshold() {
        let mut d = driver(DriverKind::Dismissing);
        d.begin(None);
        // 100 + 0.8 * 249 ≈ 299 < 320; 1500 pt/s → 100 + 373.5 > 320
        assert!(matches!(
            d.release(100.0, 800.0, H, H),
            Release::Cancel { .. }
        ));
        d.begin(None);
        assert!(matches!(
            d.release(100.0, 1500.0, H, H),
            Release::Commit { .. }
        ));
    }

    #[test]
    fn relative_velocity_is_capped_and_guarded() {
        assert!((relative_velocity(400.0, 0.5, 800.0, 30.0) - 1.0).abs() < 1e-12);
        assert_eq!(relative_velocity(1e9, 0.5, 800.0, 30.0), 30.0);
        assert_eq!(relative_velocity(100.0, 1.0, 800.0, 30.0), 30.0);
        assert_eq!(relative_velocity(0.0, 1.0, 800.0, 30.0), 0.0);
    }

    #[test]
    fn reversal_offset_is_continuous() {
        let mut d = driver(DriverKind::Dismissing);
        d.begin(Some(InFlight {
            fraction: 0.3,
            end_state: TransitionState::Opened,
            running: true,
        }));
        assert!(d.is_inverted());
        assert!((d.progress(0.0, H) - 0.7).abs() < 1e-12);
        assert!((d.group_progress(d.progress(0.0, H)) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn same_direction_continues_from_fraction() {
        let mut d = driver(DriverKind::Presenting);
        d.begin(Some(InFlight {
            fraction: 0.3,
            end_state: TransitionState::Opened,
            running: true,
        }));
        assert!(!d.is_inverted());
        assert!((d.progress(-80.0, H) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn inverted_directives_mirror() {
        let mut d = driver(DriverKind::Dismissing);
        d.begin(Some(InFlight {
            fraction: 0.3,
            end_state: TransitionState::Opened,
            running: true,
        }));
        assert_eq!(
            d.directive(Release::Commit {
                relative_velocity: 2.0
            }),
            GroupDirective::Cancel { animated: true }
        );
        assert_eq!(
            d.directive(Release::Cancel {
                animated: true,
                relative_velocity: 1.5
            }),
            GroupDirective::Finish {
                relative_velocity: 1.5
            }
        );
    }

    #[test]
    fn inverted_cancel_keeps_release_speed() {
        let mut d = driver(DriverKind::Dismissing);
        d.begin(Some(InFlight {
            fraction: 0.3,
            end_state: TransitionState::Opened,
            running: true,
        }));
        // Driver progress 0.7 → 0.25, still moving up at 100 pt/s with 200pt
        // back to the start.
        let release = d.release(-360.0, -100.0, H, H);
        let Release::Cancel {
            relative_velocity, ..
        } = release
        else {
            panic!("expected cancel, got {release:?}");
        };
        assert!((relative_velocity - 0.5).abs() < 1e-12);
        assert_eq!(
            d.directive(release),
            GroupDirective::Finish {
                relative_velocity: 0.5
            }
        );
    }

    #[test]
    fn system_cancel_always_cancels() {
        let mut d = driver(DriverKind::Presenting);
        d.begin(None);
        assert_eq!(d.system_cancel(), GroupDirective::Cancel { animated: true });
        assert!(!d.in_progress());
    }

    #[test]
    fn zero_height_yields_zero_progress() {
        let mut d = driver(DriverKind::Presenting);
        d.begin(None);
        assert_eq!(d.progress(-100.0, 0.0), 0.0);
    }
}
