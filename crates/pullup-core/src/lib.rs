#![forbid(unsafe_code)]

//! Core: headless primitives for progress-driven, gesture-interactive
//! transitions.
//!
//! # Role in pullup
//! `pullup-core` owns everything that is not specific to the slide-up panel:
//! geometry, timing, the scrubbable umbrella animation, pan recognition, and
//! the single-threaded UI context. `pullup-menu` builds the panel transition
//! on top of these.
//!
//! # Primary responsibilities
//! - **geometry**: points, sizes, rects, scale+translate transforms, colors,
//!   and the [`Lerp`](geometry::Lerp) trait every animated value implements.
//! - **animation**: easing curves, springs, timing profiles, the
//!   [`ScrubbableGroup`](animation::ScrubbableGroup) and keyframe windows.
//! - **gesture**: [`PanRecognizer`](gesture::PanRecognizer), turning pointer
//!   samples into pan events with velocity.
//! - **context**: [`UiContext`](context::UiContext), a deferred task queue
//!   with a logical clock and a thread-affinity check.

pub mod animation;
pub mod context;
pub mod geometry;
pub mod gesture;

pub use animation::{
    Animation, GroupEnd, GroupStatus, KeyframeWindow, LayerClock, Motion, ScrubbableGroup, Settle,
    Spring, SpringParameters, TimingCurve, TimingProfile,
};
pub use context::{TaskId, UiContext};
pub use geometry::{Lerp, Point, Rect, Rgba, Size, Transform};
pub use gesture::{PanConfig, PanEvent, PanPhase, PanRecognizer, PointerEvent, PointerPhase};
