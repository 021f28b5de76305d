#![forbid(unsafe_code)]

//! A panel instance and its view graph.
//!
//! A [`Panel`] is created when a transition first needs one and dropped when
//! a close commits. It owns its content, its [`PanelAnimator`], and the
//! visuals the host renders: the embedded affordance, an optional stand-in
//! affordance, the backdrop and one [`RowFrame`] per visible row.
//!
//! Deferred tasks never hold a panel; they carry its [`PanelId`] and look it
//! up again, treating a mismatch as "already gone".

use std::fmt;

use pullup_core::geometry::{Rect, Transform};

use crate::affordance::{Direction, PanelAffordance};
use crate::animator::PanelAnimator;
use crate::composer::{BackdropEffect, ComposerInput, RowFrame, TransitionFrame, TransitionPlan};
use crate::config::TransitionConfig;
use crate::content::ContentProvider;
use crate::state::TransitionState;

/// Identifier of a panel instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelId(u64);

impl PanelId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One panel instance.
pub struct Panel {
    id: PanelId,
    container: Rect,
    content: Box<dyn ContentProvider>,
    attached: bool,
    alpha: f64,
    affordance: PanelAffordance,
    stand_in: Option<PanelAffordance>,
    backdrop: BackdropEffect,
    backdrop_amount: f64,
    rows: Vec<RowFrame>,
    animator: PanelAnimator,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("attached", &self.attached)
            .field("state", &self.animator.state())
            .field("rows", &self.rows.len())
            .field("stand_in", &self.stand_in.is_some())
            .finish_non_exhaustive()
    }
}

impl Panel {
    /// A detached, closed panel filling `container`.
    #[must_use]
    pub fn new(
        id: PanelId,
        container: Rect,
        content: Box<dyn ContentProvider>,
        config: &TransitionConfig,
    ) -> Self {
        let a = &config.affordance;
        let size = (a.width, a.width * a.height_ratio);
        let frame = Rect::new(
            container.mid_x() - size.0 / 2.0,
            container.min_y() + a.top_inset,
            size.0,
            size.1,
        );
        Self {
            id,
            container,
            content,
            attached: false,
            alpha: 1.0,
            affordance: PanelAffordance::new(
                frame,
                Direction::Down,
                a.tint(TransitionState::Opened),
            ),
            stand_in: None,
            backdrop: BackdropEffect::Off,
            backdrop_amount: 0.0,
            rows: Vec::new(),
            animator: PanelAnimator::new(config.clone()),
        }
    }

    #[must_use]
    pub fn id(&self) -> PanelId {
        self.id
    }

    #[must_use]
    pub fn container(&self) -> Rect {
        self.container
    }

    #[must_use]
    pub fn content(&self) -> &dyn ContentProvider {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn ContentProvider {
        self.content.as_mut()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub(crate) fn attach(&mut self) {
        self.attached = true;
    }

    pub(crate) fn detach(&mut self) {
        self.attached = false;
    }

    /// Panel-wide alpha. Zero while content preloads.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    /// The embedded affordance.
    #[must_use]
    pub fn affordance(&self) -> &PanelAffordance {
        &self.affordance
    }

    /// The transient stand-in, while a transition has one.
    #[must_use]
    pub fn stand_in(&self) -> Option<&PanelAffordance> {
        self.stand_in.as_ref()
    }

    #[must_use]
    pub fn backdrop(&self) -> BackdropEffect {
        self.backdrop
    }

    #[must_use]
    pub fn backdrop_amount(&self) -> f64 {
        self.backdrop_amount
    }

    #[must_use]
    pub fn rows(&self) -> &[RowFrame] {
        &self.rows
    }

    #[must_use]
    pub fn animator(&self) -> &PanelAnimator {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut PanelAnimator {
        &mut self.animator
    }

    /// Snapshot for the composer.
    #[must_use]
    pub fn composer_input(&self, trigger: Option<Rect>) -> ComposerInput {
        ComposerInput {
            state: self.animator.state(),
            container: self.container,
            trigger_frame: trigger,
            dismiss_frame: Some(self.affordance.frame()),
            rows: self.content.row_frames(self.container),
        }
    }

    /// Apply build-time preconditions from a fresh plan.
    pub(crate) fn install(&mut self, plan: &TransitionPlan) {
        let track = &plan.affordance;
        self.affordance.set_transform(track.transform_from);
        self.affordance.set_alpha(track.alpha_from);
        self.affordance.begin_morph(track.morph.clone());

        self.stand_in = plan.stand_in.as_ref().map(|s| {
            let mut stand_in = PanelAffordance::new(
                s.frame_from,
                s.initial_direction,
                s.morph.sample(0.0).tint,
            );
            stand_in.set_alpha(s.alpha_from);
            stand_in.begin_morph(s.morph.clone());
            stand_in
        });
        self.backdrop = plan.backdrop_from;
        self.backdrop_amount = 0.0;
        self.rows = plan.rows.iter().map(|r| r.sample(0.0)).collect();
    }

    /// Mirror a sampled frame into the view graph.
    pub(crate) fn apply_frame(&mut self, frame: &TransitionFrame) {
        self.affordance.set_transform(frame.affordance.transform);
        self.affordance.set_alpha(frame.affordance.alpha);
        self.affordance.set_arrow(frame.affordance.arrow);
        if let (Some(stand_in), Some(sampled)) = (self.stand_in.as_mut(), frame.stand_in) {
            stand_in.set_frame(sampled.frame);
            stand_in.set_alpha(sampled.alpha);
            stand_in.set_arrow(sampled.arrow);
        }
        self.backdrop = frame.backdrop;
        self.backdrop_amount = frame.backdrop_amount;
        self.rows.clone_from(&frame.rows);
    }

    /// Reset visuals to rest in `state` and drop the stand-in.
    pub(crate) fn restore_at_rest(&mut self, state: TransitionState, config: &TransitionConfig) {
        self.affordance.set_transform(Transform::IDENTITY);
        self.affordance.set_alpha(1.0);
        self.affordance.set_direction(match state {
            TransitionState::Closed => Direction::Up,
            TransitionState::Opened => Direction::Down,
        });
        self.stand_in = None;
        let open = state.is_open();
        self.backdrop = if open {
            BackdropEffect::Blur(config.backdrop)
        } else {
            BackdropEffect::Off
        };
        self.backdrop_amount = if open { 1.0 } else { 0.0 };
        let row = if open {
            RowFrame {
                alpha: 1.0,
                offset: 0.0,
            }
        } else {
            RowFrame {
                alpha: 0.0,
                offset: config.stagger.row_offset,
            }
        };
        for r in &mut self.rows {
            *r = row;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::compose;
    use crate::content::{MenuItem, StaticContent};

    fn panel() -> Panel {
        let content = StaticContent::new(vec![MenuItem::new("a", "A"), MenuItem::new("b", "B")]);
        Panel::new(
            PanelId::new(1),
            Rect::new(0.0, 0.0, 400.0, 800.0),
            Box::new(content),
            &TransitionConfig::default(),
        )
    }

    #[test]
    fn embedded_affordance_is_centered_below_top_inset() {
        let p = panel();
        assert_eq!(p.affordance().frame(), Rect::new(180.0, 100.0, 40.0, 30.0));
        assert!(!p.is_attached());
    }

    #[test]
    fn composer_input_reads_content_rows() {
        let p = panel();
        let input = p.composer_input(None);
        assert_eq!(input.rows.len(), 2);
        assert_eq!(input.dismiss_frame, Some(p.affordance().frame()));
        assert_eq!(input.state, TransitionState::Closed);
    }

    #[test]
    fn install_then_restore_drops_stand_in() {
        let mut p = panel();
        let config = TransitionConfig::default();
        let plan = compose(
            &p.composer_input(Some(Rect::new(180.0, 740.0, 40.0, 40.0))),
            &config,
        );
        p.install(&plan);
        assert!(p.stand_in().is_some());
        assert_eq!(p.affordance().alpha(), 0.0);
        assert_eq!(p.affordance().direction(), Direction::Down);

        p.restore_at_rest(TransitionState::Opened, &config);
        assert!(p.stand_in().is_none());
        assert_eq!(p.affordance().alpha(), 1.0);
        assert!(p.affordance().transform().is_identity());
        assert!(p.affordance().morph().is_none());
        assert_eq!(p.backdrop(), BackdropEffect::Blur(config.backdrop));
        assert!(p.rows().iter().all(|r| r.alpha == 1.0));
    }

    #[test]
    fn applied_frames_carry_the_morphing_chevron() {
        let mut p = panel();
        let config = TransitionConfig::default();
        let plan = compose(
            &p.composer_input(Some(Rect::new(180.0, 740.0, 40.0, 40.0))),
            &config,
        );
        p.install(&plan);
        let closed_tint = config.affordance.tint(TransitionState::Closed);
        let opened_tint = config.affordance.tint(TransitionState::Opened);
        assert_eq!(p.stand_in().map(PanelAffordance::tint), Some(closed_tint));

        let frame = plan.sample(0.5, 1.0, false);
        p.apply_frame(&frame);
        let stand_in = p.stand_in().expect("stand-in while transitioning");
        assert_eq!(stand_in.tint(), opened_tint);
        assert_eq!(Some(stand_in.drawn_arrow()), frame.stand_in.map(|s| s.arrow));
        assert_eq!(p.affordance().drawn_arrow(), frame.affordance.arrow);

        p.restore_at_rest(TransitionState::Opened, &config);
        assert_eq!(
            p.affordance().drawn_arrow().path,
            p.affordance().arrow(0.0).path
        );
    }

    #[test]
    fn id_display() {
        assert_eq!(PanelId::new(7).to_string(), "#7");
    }
}
