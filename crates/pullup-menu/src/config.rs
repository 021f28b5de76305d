#![forbid(unsafe_code)]

//! Tunable transition parameters as data.
//!
//! Every constant that shapes the panel transition lives in one
//! [`TransitionConfig`] that can be loaded from TOML or JSON at startup
//! (feature `policy-config`).
//!
//! # Loading
//!
//! ```toml
//! # pullup.toml
//! [gesture]
//! commit_threshold = 0.35
//!
//! [timing.finish]
//! damping_ratio = 0.7
//! response = 0.25
//!
//! [preload]
//! max_attempts = 20
//! ```
//!
//! ```rust,ignore
//! let config = TransitionConfig::from_toml_file("pullup.toml")?;
//! let config = TransitionConfig::from_json_str(json)?.into_validated()?;
//! ```
//!
//! # Defaults
//!
//! `TransitionConfig::default()` reproduces the documented behavior: commit
//! threshold 0.4, deceleration 0.996, relative velocity cap 30, commit spring
//! (1.0, 0.4s), finish spring (0.8, 0.3s), spring (1.0, 0.4s) when an
//! opening is cancelled, linear 0.4s when a closing is cancelled, 1s
//! ease-in-out icon morph, 2.35s
//! non-interactive transition, 10 preload attempts every 16ms.

#[cfg(feature = "policy-config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use pullup_core::animation::{SpringParameters, TimingCurve, TimingProfile};
use pullup_core::geometry::Rgba;
use pullup_core::gesture::PanConfig;

use crate::composer::BlurStyle;
use crate::error::ConfigError;
use crate::state::TransitionState;

// ---------------------------------------------------------------------------
// Top-level TransitionConfig
// ---------------------------------------------------------------------------

/// All tunable parameters of the panel transition.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TransitionConfig {
    /// Gesture-to-progress mapping.
    pub gesture: GesturePolicy,
    /// Timing profiles for commit, finish, cancel and sub-effects.
    pub timing: TimingPolicy,
    /// Per-row staggered reveal.
    pub stagger: StaggerPolicy,
    /// Affordance geometry and tints.
    pub affordance: AffordancePolicy,
    /// Content preload polling.
    pub preload: PreloadPolicy,
    /// Resting backdrop blur while opened.
    pub backdrop: BlurStyle,
}

impl TransitionConfig {
    /// Load from a TOML string.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "policy-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "policy-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to pretty TOML.
    #[cfg(feature = "policy-config")]
    #[must_use]
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let g = &self.gesture;
        if !(g.commit_threshold > 0.0 && g.commit_threshold < 1.0) {
            errors.push(format!(
                "gesture.commit_threshold must be in (0, 1), got {}",
                g.commit_threshold
            ));
        }
        if !(g.deceleration_rate > 0.0 && g.deceleration_rate < 1.0) {
            errors.push(format!(
                "gesture.deceleration_rate must be in (0, 1), got {}",
                g.deceleration_rate
            ));
        }
        if g.max_relative_velocity <= 0.0 {
            errors.push(format!(
                "gesture.max_relative_velocity must be > 0, got {}",
                g.max_relative_velocity
            ));
        }
        if g.drag_threshold < 0.0 {
            errors.push(format!(
                "gesture.drag_threshold must be >= 0, got {}",
                g.drag_threshold
            ));
        }
        if g.velocity_window_ms == 0 {
            errors.push("gesture.velocity_window_ms must be > 0".into());
        }

        let t = &self.timing;
        for (name, spring) in [
            ("commit", &t.commit),
            ("finish", &t.finish),
            ("cancel_opening", &t.cancel_opening),
        ] {
            if spring.response <= 0.0 {
                errors.push(format!(
                    "timing.{name}.response must be > 0, got {}",
                    spring.response
                ));
            }
            if spring.damping_ratio <= 0.0 {
                errors.push(format!(
                    "timing.{name}.damping_ratio must be > 0, got {}",
                    spring.damping_ratio
                ));
            }
        }
        for (name, secs) in [
            ("cancel_closing_secs", t.cancel_closing_secs),
            ("morph_secs", t.morph_secs),
            ("non_interactive_secs", t.non_interactive_secs),
        ] {
            if !(secs > 0.0 && secs.is_finite()) {
                errors.push(format!("timing.{name} must be > 0, got {secs}"));
            }
        }

        let s = &self.stagger;
        if s.total_duration <= 0.0 {
            errors.push(format!(
                "stagger.total_duration must be > 0, got {}",
                s.total_duration
            ));
        }
        for (name, v) in [
            ("row_duration_fraction", s.row_duration_fraction),
            ("settle_fraction", s.settle_fraction),
        ] {
            if !(v > 0.0 && v <= 1.0) {
                errors.push(format!("stagger.{name} must be in (0, 1], got {v}"));
            }
        }

        let a = &self.affordance;
        for (name, v) in [
            ("anchor_size", a.anchor_size),
            ("width", a.width),
            ("height_ratio", a.height_ratio),
        ] {
            if v <= 0.0 {
                errors.push(format!("affordance.{name} must be > 0, got {v}"));
            }
        }

        if self.preload.max_attempts == 0 {
            errors.push("preload.max_attempts must be > 0".into());
        }
        if self.preload.poll_interval_ms == 0 {
            errors.push("preload.poll_interval_ms must be > 0".into());
        }

        errors
    }

    /// Return `self` if it validates cleanly.
    pub fn into_validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Pan recognizer thresholds.
    #[must_use]
    pub fn pan_config(&self) -> PanConfig {
        PanConfig {
            drag_threshold: self.gesture.drag_threshold,
            velocity_window: Duration::from_millis(self.gesture.velocity_window_ms),
        }
    }

    /// Profile a transition starts with.
    #[must_use]
    pub fn commit_profile(&self) -> TimingProfile {
        TimingProfile::Spring(self.timing.commit)
    }

    /// Velocity-seeded completion profile.
    #[must_use]
    pub fn finish_profile(&self, relative_velocity: f64) -> TimingProfile {
        TimingProfile::Spring(self.timing.finish.with_initial_velocity(relative_velocity))
    }

    /// Cancellation profile for a transition that started from `state`.
    ///
    /// Cancelling an open-to-close transition uses a linear curve; a spring
    /// there makes the backdrop blur jump.
    #[must_use]
    pub fn cancel_profile(&self, state: TransitionState) -> TimingProfile {
        match state {
            TransitionState::Opened => {
                TimingProfile::linear(secs(self.timing.cancel_closing_secs))
            }
            TransitionState::Closed => TimingProfile::Spring(self.timing.cancel_opening),
        }
    }

    /// Local duration of the icon morph layer clock.
    #[must_use]
    pub fn morph_duration(&self) -> Duration {
        secs(self.timing.morph_secs)
    }

    /// Profile for the non-interactive transition.
    #[must_use]
    pub fn non_interactive_profile(&self) -> TimingProfile {
        TimingProfile::Cubic {
            curve: self.timing.non_interactive_curve,
            duration: secs(self.timing.non_interactive_secs),
        }
    }

    /// Delay between preload polls.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.preload.poll_interval_ms)
    }
}

fn secs(v: f64) -> Duration {
    Duration::try_from_secs_f64(v).unwrap_or(Duration::ZERO)
}

// ---------------------------------------------------------------------------
// Sub-configs (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Gesture-to-progress mapping.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct GesturePolicy {
    /// Projected progress above which a release commits.
    pub commit_threshold: f64,
    /// Per-millisecond velocity decay used to project a release.
    pub deceleration_rate: f64,
    /// Cap on the velocity handed to the finish spring.
    pub max_relative_velocity: f64,
    /// Points a pointer travels before a pan begins.
    pub drag_threshold: f64,
    /// Velocity estimation window.
    pub velocity_window_ms: u64,
}

impl Default for GesturePolicy {
    fn default() -> Self {
        Self {
            commit_threshold: 0.4,
            deceleration_rate: 0.996,
            max_relative_velocity: 30.0,
            drag_threshold: 10.0,
            velocity_window_ms: 100,
        }
    }
}

/// Timing profiles.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct TimingPolicy {
    /// Spring a transition starts with.
    pub commit: SpringParameters,
    /// Spring for a committed release; seeded with the release velocity.
    pub finish: SpringParameters,
    /// Spring for cancelling an opening transition.
    pub cancel_opening: SpringParameters,
    /// Linear duration for cancelling a closing transition.
    pub cancel_closing_secs: f64,
    /// Icon morph layer duration.
    pub morph_secs: f64,
    pub morph_curve: TimingCurve,
    /// Non-interactive presentation/dismissal duration.
    pub non_interactive_secs: f64,
    pub non_interactive_curve: TimingCurve,
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            commit: SpringParameters::new(1.0, 0.4),
            finish: SpringParameters::new(0.8, 0.3),
            cancel_opening: SpringParameters::new(1.0, 0.4),
            cancel_closing_secs: 0.4,
            morph_secs: 1.0,
            morph_curve: TimingCurve::EaseInOut,
            non_interactive_secs: 2.35,
            non_interactive_curve: TimingCurve::EaseInOut,
        }
    }
}

/// Per-row staggered reveal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct StaggerPolicy {
    /// Length of the stagger timeline.
    pub total_duration: f64,
    /// Each row's window as a fraction of the timeline.
    pub row_duration_fraction: f64,
    /// Transform-settle phase as a fraction of a row's window.
    pub settle_fraction: f64,
    /// Vertical offset of a hidden row, in points.
    pub row_offset: f64,
}

impl Default for StaggerPolicy {
    fn default() -> Self {
        Self {
            total_duration: 1.0,
            row_duration_fraction: 0.4,
            settle_fraction: 0.2,
            row_offset: 30.0,
        }
    }
}

/// Affordance geometry and tints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct AffordancePolicy {
    /// Side of the fallback anchor square.
    pub anchor_size: f64,
    /// Width of the panel's embedded affordance.
    pub width: f64,
    /// Height as a fraction of width.
    pub height_ratio: f64,
    /// Distance from the container top to the embedded affordance.
    pub top_inset: f64,
    /// RGBA tint while the panel is closed.
    pub closed_tint: [f64; 4],
    /// RGBA tint while the panel is opened.
    pub opened_tint: [f64; 4],
}

impl Default for AffordancePolicy {
    fn default() -> Self {
        Self {
            anchor_size: 20.0,
            width: 40.0,
            height_ratio: 0.75,
            top_inset: 100.0,
            closed_tint: [1.0, 1.0, 1.0, 1.0],
            opened_tint: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl AffordancePolicy {
    /// Tint for an affordance at rest in `state`.
    #[must_use]
    pub fn tint(&self, state: TransitionState) -> Rgba {
        let [r, g, b, a] = match state {
            TransitionState::Closed => self.closed_tint,
            TransitionState::Opened => self.opened_tint,
        };
        Rgba::new(r, g, b, a)
    }
}

/// Content preload polling.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(default))]
pub struct PreloadPolicy {
    pub max_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for PreloadPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            poll_interval_ms: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
