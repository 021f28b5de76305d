#![forbid(unsafe_code)]

//! Slide-up menu panel with gesture-interactive open/close transitions.
//!
//! # Role in pullup
//! `pullup-menu` is the panel itself: the transition plan, the state machine
//! that owns the live animation group, the gesture drivers, and the
//! orchestrator a host screen talks to. Time, geometry and pointer handling
//! come from `pullup-core`.
//!
//! # How it fits in the system
//! A host implements [`HostContainer`] and creates a [`PullUpMenu`] with a
//! content generator. Pointer samples and frame ticks go in; the host reads
//! the panel's view graph ([`Panel`]) back out and renders it.
//!
//! ```text
//!  pointer ──► PanRecognizer ──► InteractionDriver ──┐
//!                                                    ▼
//!  open()/close() ─────────────────────────────► PanelAnimator ──► TransitionPlan::sample
//!                                                    │                    │
//!  tick(dt) ──► UiContext (preload polls) ───────────┘                    ▼
//!                                                               Panel view graph
//! ```
//!
//! # Feature flags
//! - `policy-config`: load [`TransitionConfig`] from TOML or JSON.

pub mod affordance;
pub mod animator;
pub mod composer;
pub mod config;
pub mod content;
pub mod delegate;
pub mod error;
pub mod host;
pub mod interaction;
pub mod menu;
pub mod panel;
pub mod state;

pub use affordance::{ArrowPath, ArrowSample, Direction, DirectionMorph, PanelAffordance};
pub use animator::{BuildOutcome, InFlight, PanelAnimator, PendingAction, TransitionEvent};
pub use composer::{
    BackdropEffect, BlurStyle, ComposerInput, RowFrame, TransitionFrame, TransitionPlan, compose,
};
pub use config::{
    AffordancePolicy, GesturePolicy, PreloadPolicy, StaggerPolicy, TimingPolicy, TransitionConfig,
};
pub use content::{ContentProvider, MenuItem, StaticContent};
pub use delegate::{PanelTransition, TransitionAnimator, TransitionContext, TransitionDelegate};
pub use error::{ConfigError, Fallback, TransitionError};
pub use host::{HostContainer, PresentationMode};
pub use interaction::{DriverKind, GroupDirective, InteractionDriver, Release};
pub use menu::{ContentGenerator, PullUpMenu, UiTask};
pub use panel::{Panel, PanelId};
pub use state::TransitionState;
