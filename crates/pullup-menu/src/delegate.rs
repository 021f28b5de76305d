#![forbid(unsafe_code)]

//! Adapter to a host's modal presentation lifecycle.
//!
//! A host that presents the panel through its own modal machinery asks a
//! [`TransitionDelegate`] for two things: an animator object for the
//! presentation or dismissal, and an interaction controller if a gesture is
//! driving it. The delegate hands out a [`PanelTransition`] (the composed
//! plan run over a fixed duration) unless the host is in its alternate
//! presentation mode, and an [`InteractionDriver`] only while that driver
//! owns an active gesture.

use std::time::Duration;

use pullup_core::animation::{Animation, Motion};

use crate::composer::{ComposerInput, TransitionFrame, TransitionPlan, compose};
use crate::config::TransitionConfig;
use crate::host::PresentationMode;
use crate::interaction::InteractionDriver;
use crate::state::TransitionState;

/// Host-side record of one modal transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionContext {
    input: ComposerInput,
    cancelled: bool,
    completed: Option<bool>,
}

impl TransitionContext {
    #[must_use]
    pub fn new(input: ComposerInput) -> Self {
        Self {
            input,
            cancelled: false,
            completed: None,
        }
    }

    #[must_use]
    pub fn input(&self) -> &ComposerInput {
        &self.input
    }

    /// Mark the transition as cancelled by the host.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Report the outcome. Only the first report counts.
    pub fn complete_transition(&mut self, did_complete: bool) {
        if self.completed.is_none() {
            self.completed = Some(did_complete);
        }
    }

    /// The reported outcome, if any.
    #[must_use]
    pub fn completed(&self) -> Option<bool> {
        self.completed
    }
}

/// A non-interactive transition animator.
///
/// Every adapter must supply its own `animate_transition`; there is no
/// default body to fall back on.
pub trait TransitionAnimator {
    fn transition_duration(&self) -> Duration;

    /// Set up the transition described by `ctx`.
    fn animate_transition(&mut self, ctx: &mut TransitionContext);

    /// Advance by `dt`. Returns `false` once the transition has completed
    /// `ctx`.
    fn advance(&mut self, dt: Duration, ctx: &mut TransitionContext) -> bool;
}

// ---------------------------------------------------------------------------
// PanelTransition
// ---------------------------------------------------------------------------

/// The panel's own non-interactive presentation or dismissal.
#[derive(Debug, Clone)]
pub struct PanelTransition {
    presenting: bool,
    config: TransitionConfig,
    plan: Option<TransitionPlan>,
    motion: Option<Motion>,
}

impl PanelTransition {
    #[must_use]
    pub fn new(presenting: bool, config: TransitionConfig) -> Self {
        Self {
            presenting,
            config,
            plan: None,
            motion: None,
        }
    }

    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    /// Current visuals, once started.
    #[must_use]
    pub fn frame(&self) -> Option<TransitionFrame> {
        let (plan, motion) = (self.plan.as_ref()?, self.motion.as_ref()?);
        let fraction = motion.value();
        let morph = self.config.timing.morph_curve.apply(fraction);
        Some(plan.sample(fraction, morph, false))
    }
}

impl TransitionAnimator for PanelTransition {
    fn transition_duration(&self) -> Duration {
        self.config.non_interactive_profile().natural_duration()
    }

    fn animate_transition(&mut self, ctx: &mut TransitionContext) {
        let mut input = ctx.input().clone();
        input.state = if self.presenting {
            TransitionState::Closed
        } else {
            TransitionState::Opened
        };
        let profile = self.config.non_interactive_profile();
        self.plan = Some(compose(&input, &self.config));
        self.motion = Some(Motion::new(0.0, 1.0, profile, profile.natural_duration()));
        tracing::debug!(presenting = self.presenting, "transition.animate");
    }

    fn advance(&mut self, dt: Duration, ctx: &mut TransitionContext) -> bool {
        let Some(motion) = self.motion.as_mut() else {
            return false;
        };
        motion.tick(dt);
        if motion.is_complete() {
            ctx.complete_transition(!ctx.is_cancelled());
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// TransitionDelegate
// ---------------------------------------------------------------------------

/// Answers a host's "which animator, which interaction controller" queries.
#[derive(Debug, Clone, Copy)]
pub struct TransitionDelegate<'a> {
    mode: PresentationMode,
    config: &'a TransitionConfig,
    presenting: &'a InteractionDriver,
    dismissing: &'a InteractionDriver,
}

impl<'a> TransitionDelegate<'a> {
    #[must_use]
    pub fn new(
        mode: PresentationMode,
        config: &'a TransitionConfig,
        presenting: &'a InteractionDriver,
        dismissing: &'a InteractionDriver,
    ) -> Self {
        Self {
            mode,
            config,
            presenting,
            dismissing,
        }
    }

    /// `None` means the host should use its plain presentation.
    #[must_use]
    pub fn presentation_animator(&self) -> Option<PanelTransition> {
        self.animator(true)
    }

    /// `None` means the host should use its plain dismissal.
    #[must_use]
    pub fn dismissal_animator(&self) -> Option<PanelTransition> {
        self.animator(false)
    }

    fn animator(&self, presenting: bool) -> Option<PanelTransition> {
        match self.mode {
            PresentationMode::Alternate => None,
            PresentationMode::Interactive => {
                Some(PanelTransition::new(presenting, self.config.clone()))
            }
        }
    }

    #[must_use]
    pub fn presentation_interaction(&self) -> Option<&'a InteractionDriver> {
        Self::interaction(self.mode, self.presenting)
    }

    #[must_use]
    pub fn dismissal_interaction(&self) -> Option<&'a InteractionDriver> {
        Self::interaction(self.mode, self.dismissing)
    }

    fn interaction(
        mode: PresentationMode,
        driver: &'a InteractionDriver,
    ) -> Option<&'a InteractionDriver> {
        (mode == PresentationMode::Interactive && driver.in_progress()).then_some(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::DriverKind;
    use pullup_core::geometry::Rect;

    fn ctx() -> TransitionContext {
        TransitionContext::new(ComposerInput {
            state: TransitionState::Closed,
            container: Rect::new(0.0, 0.0, 400.0, 800.0),
            trigger_frame: Some(Rect::new(180.0, 740.0, 40.0, 40.0)),
            dismiss_frame: Some(Rect::new(180.0, 100.0, 40.0, 30.0)),
            rows: vec![Rect::new(16.0, 300.0, 176.0, 55.0)],
        })
    }

    fn run(t: &mut PanelTransition, ctx: &mut TransitionContext) -> usize {
        t.animate_transition(ctx);
        let mut frames = 0;
        while t.advance(Duration::from_millis(16), ctx) {
            frames += 1;
            assert!(frames < 1000, "transition never completed");
        }
        frames
    }

    #[test]
    fn presentation_runs_for_configured_duration() {
        let mut t = PanelTransition::new(true, TransitionConfig::default());
        assert_eq!(t.transition_duration(), Duration::from_secs_f64(2.35));
        let mut c = ctx();
        let frames = run(&mut t, &mut c);
        assert!((145..=147).contains(&frames), "frames = {frames}");
        assert_eq!(c.completed(), Some(true));
        let f = t.frame().expect("frame");
        assert_eq!(f.fraction, 1.0);
        assert_eq!(f.affordance.alpha, 1.0);
    }

    #[test]
    fn cancelled_context_reports_incomplete() {
        let mut t = PanelTransition::new(false, TransitionConfig::default());
        let mut c = ctx();
        c.cancel();
        run(&mut t, &mut c);
        assert_eq!(c.completed(), Some(false));
        // Dismissal ends with the panel affordance hidden.
        assert_eq!(t.frame().map(|f| f.affordance.alpha), Some(0.0));
    }

    #[test]
    fn completion_reported_once() {
        let mut c = ctx();
        c.complete_transition(true);
        c.complete_transition(false);
        assert_eq!(c.completed(), Some(true));
    }

    #[test]
    fn advance_before_animate_is_inert() {
        let mut t = PanelTransition::new(true, TransitionConfig::default());
        let mut c = ctx();
        assert!(!t.advance(Duration::from_millis(16), &mut c));
        assert!(c.completed().is_none());
        assert!(t.frame().is_none());
    }

    #[test]
    fn alternate_mode_falls_back_to_plain() {
        let config = TransitionConfig::default();
        let p = InteractionDriver::new(DriverKind::Presenting, config.gesture.clone());
        let d = InteractionDriver::new(DriverKind::Dismissing, config.gesture.clone());
        let delegate = TransitionDelegate::new(PresentationMode::Alternate, &config, &p, &d);
        assert!(delegate.presentation_animator().is_none());
        assert!(delegate.dismissal_animator().is_none());
    }

    #[test]
    fn interaction_only_while_gesture_in_progress() {
        let config = TransitionConfig::default();
        let mut p = InteractionDriver::new(DriverKind::Presenting, config.gesture.clone());
        let d = InteractionDriver::new(DriverKind::Dismissing, config.gesture.clone());
        {
            let delegate =
                TransitionDelegate::new(PresentationMode::Interactive, &config, &p, &d);
            assert!(delegate.presentation_animator().is_some());
            assert!(delegate.presentation_interaction().is_none());
        }
        p.begin(None);
        let delegate = TransitionDelegate::new(PresentationMode::Interactive, &config, &p, &d);
        assert!(delegate.presentation_interaction().is_some());
        assert!(delegate.dismissal_interaction().is_none());
    }
}
