#![forbid(unsafe_code)]

//! Declarative sub-animation composer.
//!
//! [`compose`] takes a snapshot of the panel before a transition (resting
//! state, container, affordance frames, row frames) and returns a
//! [`TransitionPlan`]: every animated property as a from/to pair plus the
//! keyframe window it runs in. The plan is immutable; sampling it at a
//! fraction is a pure function, so scrubbing never depends on the path taken.
//!
//! # Tracks
//!
//! | Track | From → To (opening) | Window |
//! |-------|---------------------|--------|
//! | Backdrop | off → blur | snapped to nearest endpoint while scrubbing |
//! | Panel affordance transform | collapsed → identity | whole timeline |
//! | Panel affordance alpha | 0 → 1 | whole timeline |
//! | Stand-in frame | trigger → panel affordance | whole timeline |
//! | Stand-in alpha | 1 → 0 | whole timeline |
//! | Chevron morphs | reversed → target | morph layer clock |
//! | Row alpha | 0 → 1 | position-dependent stagger window |
//! | Row offset | `row_offset` → 0 | settle window nested in the row window |
//!
//! Closing swaps every from/to pair and mirrors the stagger.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No trigger affordance | Anchor at bottom-center of the container; no stand-in |
//! | Zero-height container | All rows start at the beginning of the timeline |
//! | Zero-size panel affordance | Transform scale falls back to 1 |

use pullup_core::animation::KeyframeWindow;
use pullup_core::geometry::{Lerp, Rect, Transform};

#[cfg(feature = "policy-config")]
use serde::{Deserialize, Serialize};

use crate::affordance::{ArrowSample, Direction, DirectionMorph};
use crate::config::TransitionConfig;
use crate::error::TransitionError;
use crate::state::TransitionState;

// ---------------------------------------------------------------------------
// Backdrop
// ---------------------------------------------------------------------------

/// Blur strength of the backdrop while the panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "policy-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "policy-config", serde(rename_all = "snake_case"))]
pub enum BlurStyle {
    Light,
    #[default]
    Regular,
    Dark,
}

/// The backdrop effect value. Only the two endpoints exist; there is no
/// partial blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackdropEffect {
    Off,
    Blur(BlurStyle),
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Snapshot of everything the composer reads, taken at build time.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposerInput {
    /// Resting state before the transition.
    pub state: TransitionState,
    /// Panel bounds in host coordinates.
    pub container: Rect,
    /// The host's trigger affordance, if present.
    pub trigger_frame: Option<Rect>,
    /// The panel's embedded affordance, if present.
    pub dismiss_frame: Option<Rect>,
    /// Visible row frames in host coordinates.
    pub rows: Vec<Rect>,
}

/// Bottom-center anchor used when an affordance frame is missing.
#[must_use]
pub fn fallback_anchor(container: Rect, size: f64) -> Rect {
    Rect::new(container.mid_x(), container.max_y(), size, size)
}

/// Maps the embedded affordance geometry onto the trigger geometry.
#[must_use]
pub fn collapse_transform(dismiss: Rect, open: Rect) -> Transform {
    let ratio = |num: f64, den: f64| if den.abs() > f64::EPSILON { num / den } else { 1.0 };
    let scale = Transform::scale(
        ratio(open.width(), dismiss.width()),
        ratio(open.height(), dismiss.height()),
    );
    let dy = (open.min_y() - dismiss.min_y()) - (dismiss.height() - open.height()) / 2.0;
    scale.concat(&Transform::translation(0.0, dy))
}

// ---------------------------------------------------------------------------
// Tracks
// ---------------------------------------------------------------------------

/// The panel's permanent affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct AffordanceTrack {
    pub transform_from: Transform,
    pub transform_to: Transform,
    pub alpha_from: f64,
    pub alpha_to: f64,
    pub morph: DirectionMorph,
}

/// The transient stand-in traveling between trigger and panel.
#[derive(Debug, Clone, PartialEq)]
pub struct StandInTrack {
    pub frame_from: Rect,
    pub frame_to: Rect,
    pub alpha_from: f64,
    pub alpha_to: f64,
    /// Direction the stand-in is created with.
    pub initial_direction: Direction,
    pub morph: DirectionMorph,
}

/// Per-row staggered reveal.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRevealSpec {
    pub frame: Rect,
    /// Start on the stagger timeline, in stagger time units.
    pub start_delay: f64,
    /// Alpha window on the unit timeline.
    pub window: KeyframeWindow,
    /// Offset window, nested in `window`.
    pub settle: KeyframeWindow,
    pub alpha_from: f64,
    pub alpha_to: f64,
    pub offset_from: f64,
    pub offset_to: f64,
}

impl RowRevealSpec {
    fn new(state: TransitionState, container: Rect, frame: Rect, config: &TransitionConfig) -> Self {
        let s = &config.stagger;
        let total = s.total_duration;
        let row_duration = s.row_duration_fraction * total;
        let height = container.height();
        let row_y = frame.min_y() - container.min_y();

        let mut start = if height > f64::EPSILON {
            (total / height) * (height - row_y)
        } else {
            0.0
        };
        if state.is_open() {
            start = (total - start - row_duration).max(0.0);
        }

        let window = KeyframeWindow::new(start / total, row_duration / total);
        let settle = if state.is_open() {
            window.nested(0.0, s.settle_fraction)
        } else {
            window.nested(1.0 - s.settle_fraction, s.settle_fraction)
        };
        let (alpha_from, alpha_to, offset_from, offset_to) = if state.is_open() {
            (1.0, 0.0, 0.0, s.row_offset)
        } else {
            (0.0, 1.0, s.row_offset, 0.0)
        };

        Self {
            frame,
            start_delay: start,
            window,
            settle,
            alpha_from,
            alpha_to,
            offset_from,
            offset_to,
        }
    }

    /// Row visuals at umbrella `fraction`.
    #[must_use]
    pub fn sample(&self, fraction: f64) -> RowFrame {
        RowFrame {
            alpha: self.window.sample(&self.alpha_from, &self.alpha_to, fraction),
            offset: self.settle.sample(&self.offset_from, &self.offset_to, fraction),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan & frame
// ---------------------------------------------------------------------------

/// Everything one transition animates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub state: TransitionState,
    pub backdrop_from: BackdropEffect,
    pub backdrop_to: BackdropEffect,
    pub affordance: AffordanceTrack,
    pub stand_in: Option<StandInTrack>,
    pub rows: Vec<RowRevealSpec>,
    /// Trigger alpha for the duration of the transition.
    pub trigger_alpha: f64,
    /// Whether the trigger is masked for the duration of the transition.
    pub trigger_masked: bool,
    /// Whether a missing affordance fell back to the default anchor.
    pub used_fallback_anchor: bool,
}

/// Visual state of the panel affordance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffordanceFrame {
    pub transform: Transform,
    pub alpha: f64,
    pub arrow: ArrowSample,
}

/// Visual state of the stand-in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandInFrame {
    pub frame: Rect,
    pub alpha: f64,
    pub arrow: ArrowSample,
}

/// Visual state of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowFrame {
    pub alpha: f64,
    pub offset: f64,
}

/// A sampled plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionFrame {
    pub fraction: f64,
    pub backdrop: BackdropEffect,
    /// Animated amount of the backdrop effect in [0, 1] toward `backdrop_to`.
    pub backdrop_amount: f64,
    pub affordance: AffordanceFrame,
    pub stand_in: Option<StandInFrame>,
    pub rows: Vec<RowFrame>,
}

impl TransitionPlan {
    /// Sample at umbrella `fraction`.
    ///
    /// `morph_progress` is the morph layer clock's shaped local progress.
    /// While `scrubbing`, the backdrop holds the nearer endpoint.
    #[must_use]
    pub fn sample(&self, fraction: f64, morph_progress: f64, scrubbing: bool) -> TransitionFrame {
        let f = fraction.clamp(0.0, 1.0);
        let nearer_end = f >= 0.5;
        let backdrop = if nearer_end {
            self.backdrop_to
        } else {
            self.backdrop_from
        };
        let backdrop_amount = if scrubbing {
            if nearer_end { 1.0 } else { 0.0 }
        } else {
            f
        };

        let a = &self.affordance;
        let affordance = AffordanceFrame {
            transform: a.transform_from.lerp(&a.transform_to, f),
            alpha: a.alpha_from.lerp(&a.alpha_to, f),
            arrow: a.morph.sample(morph_progress),
        };

        let stand_in = self.stand_in.as_ref().map(|s| StandInFrame {
            frame: s.frame_from.lerp(&s.frame_to, f),
            alpha: s.alpha_from.lerp(&s.alpha_to, f),
            arrow: s.morph.sample(morph_progress),
        });

        TransitionFrame {
            fraction: f,
            backdrop,
            backdrop_amount,
            affordance,
            stand_in,
            rows: self.rows.iter().map(|r| r.sample(f)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// compose
// ---------------------------------------------------------------------------

/// Compute the plan for a transition leaving `input.state`.
#[must_use]
pub fn compose(input: &ComposerInput, config: &TransitionConfig) -> TransitionPlan {
    let closed = !input.state.is_open();
    let anchor = fallback_anchor(input.container, config.affordance.anchor_size);

    let trigger = input.trigger_frame.unwrap_or_else(|| {
        TransitionError::MissingTrigger.resolve();
        anchor
    });
    let dismiss = input.dismiss_frame.unwrap_or(anchor);
    let (source, target) = if closed {
        (trigger, dismiss)
    } else {
        (dismiss, trigger)
    };

    let collapsed = collapse_transform(dismiss, trigger);
    let (transform_from, transform_to) = if closed {
        (collapsed, Transform::IDENTITY)
    } else {
        (Transform::IDENTITY, collapsed)
    };
    let (alpha_from, alpha_to) = if closed { (0.0, 1.0) } else { (1.0, 0.0) };
    let heading = if closed { Direction::Down } else { Direction::Up };
    let panel_tint = config.affordance.tint(TransitionState::Opened);

    let affordance = AffordanceTrack {
        transform_from,
        transform_to,
        alpha_from,
        alpha_to,
        morph: DirectionMorph::new(heading, dismiss.size, None, panel_tint),
    };

    let stand_in = match (input.trigger_frame, input.dismiss_frame) {
        (Some(_), Some(_)) => Some(StandInTrack {
            frame_from: source,
            frame_to: target,
            alpha_from: alpha_to,
            alpha_to: alpha_from,
            initial_direction: heading.reversed(),
            morph: DirectionMorph::new(
                heading,
                source.size,
                Some(target.size),
                config.affordance.tint(input.state),
            )
            .with_tint(config.affordance.tint(input.state.opposite())),
        }),
        _ => None,
    };

    let blur = BackdropEffect::Blur(config.backdrop);
    let (backdrop_from, backdrop_to) = if closed {
        (BackdropEffect::Off, blur)
    } else {
        (blur, BackdropEffect::Off)
    };

    let rows = input
        .rows
        .iter()
        .map(|&frame| RowRevealSpec::new(input.state, input.container, frame, config))
        .collect();

    TransitionPlan {
        state: input.state,
        backdrop_from,
        backdrop_to,
        affordance,
        trigger_alpha: if stand_in.is_some() { 0.0 } else { 1.0 },
        stand_in,
        rows,
        trigger_masked: closed,
        used_fallback_anchor: input.trigger_frame.is_none() || input.dismiss_frame.is_none(),
    }
}
