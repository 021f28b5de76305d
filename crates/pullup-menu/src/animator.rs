#![forbid(unsafe_code)]

//! Transition state machine.
//!
//! [`PanelAnimator`] owns the resting [`TransitionState`] and at most one
//! live [`ScrubbableGroup`]. Every operation goes through one
//! build-or-reuse entry point so a group is never duplicated.
//!
//! # State Machine
//!
//! ```text
//!            begin_preload                preload_finished
//!   Idle ─────────────────► Preloading ─────────────────────┐
//!    │                       (pending progress + action)    │
//!    │ build_and_pause                                      ▼
//!    └──────────────────────────────────────────────────► Built ──completion──► Idle
//!                                                          (group, plan)
//! ```
//!
//! # Invariants
//!
//! 1. At most one group is live. `build_and_pause` on a live group pauses
//!    and reuses it.
//! 2. `state` changes only when a completion reports [`GroupEnd::End`]; a
//!    completion at [`GroupEnd::Start`] leaves it untouched.
//! 3. While preloading, progress and actions are queued, never dropped. The
//!    latest action replaces an earlier one.
//! 4. After completion the slot returns to `Idle`; later commands are no-ops
//!    until the next build.

use std::time::Duration;

use pullup_core::animation::{GroupEnd, LayerClock, ScrubbableGroup, Settle};

use crate::composer::{ComposerInput, TransitionFrame, TransitionPlan, compose};
use crate::config::TransitionConfig;
use crate::error::TransitionError;
use crate::host::PresentationMode;
use crate::state::TransitionState;

/// Label of the chevron morph layer clock.
pub const MORPH_LAYER: &str = "morph";

/// Result of [`PanelAnimator::build_and_pause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// A new group and plan were built; build-time side effects apply.
    Fresh,
    /// A live group was paused and reused.
    Reused,
    /// Content is still loading; requests are queued.
    Deferred,
}

/// A request queued while content is preloading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingAction {
    Start,
    Cancel { animated: bool },
    Finish { relative_velocity: f64 },
}

/// Position of a live group, for gesture continuity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InFlight {
    /// Fraction along the start→end timeline.
    pub fraction: f64,
    /// State the group's end position corresponds to.
    pub end_state: TransitionState,
    pub running: bool,
}

/// Emitted once per transition when its group comes to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEvent {
    pub end: GroupEnd,
    pub previous: TransitionState,
    pub state: TransitionState,
    /// Whether the plan had a stand-in affordance to tear down.
    pub had_stand_in: bool,
}

impl TransitionEvent {
    /// Whether the transition reached the opposite state.
    #[must_use]
    pub fn committed(&self) -> bool {
        self.end == GroupEnd::End
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Idle,
    Preloading {
        pending_progress: Option<f64>,
        pending_action: Option<PendingAction>,
    },
    Built {
        group: ScrubbableGroup,
        plan: TransitionPlan,
    },
}

/// Drives one panel's open/close transitions.
#[derive(Debug, Clone)]
pub struct PanelAnimator {
    state: TransitionState,
    slot: Slot,
    config: TransitionConfig,
}

impl Default for PanelAnimator {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}

impl PanelAnimator {
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            state: TransitionState::Closed,
            slot: Slot::Idle,
            config,
        }
    }

    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// The live group, if built.
    #[must_use]
    pub fn group(&self) -> Option<&ScrubbableGroup> {
        match &self.slot {
            Slot::Built { group, .. } => Some(group),
            _ => None,
        }
    }

    #[must_use]
    pub fn plan(&self) -> Option<&TransitionPlan> {
        match &self.slot {
            Slot::Built { plan, .. } => Some(plan),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_preloading(&self) -> bool {
        matches!(self.slot, Slot::Preloading { .. })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.group().is_some_and(ScrubbableGroup::is_running)
    }

    /// Queued action, while preloading.
    #[must_use]
    pub fn pending_action(&self) -> Option<PendingAction> {
        match self.slot {
            Slot::Preloading { pending_action, .. } => pending_action,
            _ => None,
        }
    }

    /// Queued progress, while preloading.
    #[must_use]
    pub fn pending_progress(&self) -> Option<f64> {
        match self.slot {
            Slot::Preloading {
                pending_progress, ..
            } => pending_progress,
            _ => None,
        }
    }

    /// The live group's position, if any.
    #[must_use]
    pub fn in_flight(&self) -> Option<InFlight> {
        self.live_group().map(|g| InFlight {
            fraction: g.fraction(),
            end_state: self.state.opposite(),
            running: g.is_running(),
        })
    }

    fn live_group(&self) -> Option<&ScrubbableGroup> {
        self.group().filter(|g| !g.is_finished())
    }

    fn live_group_mut(&mut self) -> Option<&mut ScrubbableGroup> {
        match &mut self.slot {
            Slot::Built { group, .. } if !group.is_finished() => Some(group),
            _ => None,
        }
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    /// Ensure a paused group exists for a transition leaving the current
    /// state.
    pub fn build_and_pause(&mut self, input: &ComposerInput) -> BuildOutcome {
        if self.reuse_live() {
            return BuildOutcome::Reused;
        }
        if self.is_preloading() {
            return BuildOutcome::Deferred;
        }
        self.build_fresh(input);
        BuildOutcome::Fresh
    }

    /// Enter the preloading phase. A live group is reused instead.
    pub fn begin_preload(&mut self) -> BuildOutcome {
        if self.reuse_live() {
            return BuildOutcome::Reused;
        }
        if !self.is_preloading() {
            tracing::debug!(state = ?self.state, "animator.preload.begin");
            self.slot = Slot::Preloading {
                pending_progress: None,
                pending_action: None,
            };
        }
        BuildOutcome::Deferred
    }

    /// Content finished loading: build, then replay queued progress and the
    /// queued action.
    pub fn preload_finished(&mut self, input: &ComposerInput) -> BuildOutcome {
        let Slot::Preloading {
            pending_progress,
            pending_action,
        } = self.slot
        else {
            return self.build_and_pause(input);
        };
        self.build_fresh(input);
        if let Some(progress) = pending_progress {
            self.scrub(progress);
        }
        if let Some(action) = pending_action {
            tracing::debug!(?action, "animator.pending.apply");
            match action {
                PendingAction::Start => self.start(),
                PendingAction::Cancel { animated } => self.cancel(animated),
                PendingAction::Finish { relative_velocity } => self.finish(relative_velocity),
            }
        }
        BuildOutcome::Fresh
    }

    fn reuse_live(&mut self) -> bool {
        let Some(group) = self.live_group_mut() else {
            return false;
        };
        group.pause();
        group.clear_reversal();
        tracing::debug!(fraction = group.fraction(), "animator.build.reused");
        true
    }

    fn build_fresh(&mut self, input: &ComposerInput) {
        let _span = tracing::debug_span!("pullup.build", state = ?self.state).entered();
        let mut input = input.clone();
        input.state = self.state;
        let plan = compose(&input, &self.config);
        let mut group = ScrubbableGroup::new(self.config.commit_profile()).with_layer(
            LayerClock::new(
                MORPH_LAYER,
                self.config.morph_duration(),
                self.config.timing.morph_curve,
            ),
        );
        group.pause();
        tracing::debug!(
            rows = plan.rows.len(),
            stand_in = plan.stand_in.is_some(),
            "animator.build.fresh"
        );
        self.slot = Slot::Built { group, plan };
    }

    fn queue(&mut self, action: PendingAction) -> bool {
        if let Slot::Preloading { pending_action, .. } = &mut self.slot {
            TransitionError::Preloading.resolve();
            if let Some(previous) = pending_action.replace(action) {
                tracing::debug!(?previous, ?action, "animator.pending.replaced");
            } else {
                tracing::debug!(?action, "animator.pending.queued");
            }
            return true;
        }
        false
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Build (or reuse) and run toward the opposite state.
    pub fn open(&mut self, input: &ComposerInput) -> BuildOutcome {
        let outcome = self.build_and_pause(input);
        self.start();
        outcome
    }

    /// Same as [`open`](Self::open): a transition always heads for the
    /// opposite of the resting state.
    pub fn close(&mut self, input: &ComposerInput) -> BuildOutcome {
        let outcome = self.build_and_pause(input);
        self.start();
        outcome
    }

    /// Run a built group toward the opposite state, or queue the start
    /// while preloading.
    pub fn start(&mut self) {
        if self.queue(PendingAction::Start) {
            return;
        }
        match self.live_group_mut() {
            Some(group) => {
                if group.start() {
                    tracing::debug!(fraction = group.fraction(), "animator.start");
                }
            }
            None => {
                TransitionError::GroupFinished.resolve();
            }
        }
    }

    /// Scrub to `progress`. Ignored in the alternate presentation mode.
    pub fn update_interactive(&mut self, progress: f64, mode: PresentationMode) {
        if mode == PresentationMode::Alternate {
            TransitionError::PresentationBypassed.resolve();
            return;
        }
        self.scrub(progress);
    }

    fn scrub(&mut self, progress: f64) {
        let clamped = progress.clamp(0.0, 1.0);
        if let Slot::Preloading {
            pending_progress, ..
        } = &mut self.slot
        {
            *pending_progress = Some(clamped);
            return;
        }
        match self.live_group_mut() {
            Some(group) => {
                let applied = group.scrub(clamped);
                if progress != applied {
                    tracing::debug!(progress, applied, "animator.scrub.clamped");
                } else {
                    tracing::trace!(applied, "animator.scrub");
                }
            }
            None => {
                TransitionError::GroupFinished.resolve();
            }
        }
    }

    /// Return toward the resting state.
    pub fn cancel(&mut self, animated: bool) {
        if self.queue(PendingAction::Cancel { animated }) {
            return;
        }
        let profile = self.config.cancel_profile(self.state);
        match self.live_group_mut() {
            Some(group) if animated => {
                if group.continue_to(GroupEnd::Start, profile, Settle::Cancel) {
                    tracing::debug!(fraction = group.fraction(), "animator.cancel");
                }
            }
            Some(group) => {
                group.finish_immediately(GroupEnd::Start);
                tracing::debug!("animator.cancel.immediate");
            }
            None => {
                TransitionError::GroupFinished.resolve();
            }
        }
    }

    /// Complete toward the opposite state with a velocity-seeded spring.
    pub fn finish(&mut self, relative_velocity: f64) {
        if self.queue(PendingAction::Finish { relative_velocity }) {
            return;
        }
        let profile = self.config.finish_profile(relative_velocity);
        match self.live_group_mut() {
            Some(group) => {
                if group.continue_to(GroupEnd::End, profile, Settle::Finish) {
                    tracing::debug!(
                        fraction = group.fraction(),
                        relative_velocity,
                        "animator.finish"
                    );
                }
            }
            None => {
                TransitionError::GroupFinished.resolve();
            }
        }
    }

    /// Set the state directly, discarding any group. Used when the custom
    /// transition is bypassed.
    pub fn set_state_bypassed(&mut self, state: TransitionState) {
        tracing::debug!(from = ?self.state, to = ?state, "animator.bypass");
        self.slot = Slot::Idle;
        self.state = state;
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    /// Advance a running group by `dt` and report a completion.
    pub fn tick(&mut self, dt: Duration) -> Option<TransitionEvent> {
        if let Slot::Built { group, .. } = &mut self.slot {
            group.advance(dt);
        }
        self.poll_completion()
    }

    /// Report a completion recorded by the last command, if any.
    pub fn poll_completion(&mut self) -> Option<TransitionEvent> {
        let Slot::Built { group, plan } = &mut self.slot else {
            return None;
        };
        let end = group.take_completion()?;
        let had_stand_in = plan.stand_in.is_some();
        let previous = self.state;
        if end == GroupEnd::End {
            self.state = previous.opposite();
        }
        self.slot = Slot::Idle;
        tracing::debug!(?end, ?previous, state = ?self.state, "animator.complete");
        Some(TransitionEvent {
            end,
            previous,
            state: self.state,
            had_stand_in,
        })
    }

    /// Sample the plan at the group's current fraction.
    #[must_use]
    pub fn frame(&self) -> Option<TransitionFrame> {
        let Slot::Built { group, plan } = &self.slot else {
            return None;
        };
        let fraction = group.fraction();
        let morph = group
            .layer(MORPH_LAYER)
            .map_or(fraction, LayerClock::local_progress);
        Some(plan.sample(fraction, morph, !group.is_running()))
    }
}
