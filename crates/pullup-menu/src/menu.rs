#![forbid(unsafe_code)]

//! The slide-up menu orchestrator.
//!
//! [`PullUpMenu`] ties the pieces together for one host screen:
//!
//! - creates the panel lazily from a content generator and attaches it,
//! - polls content readiness on the [`UiContext`] before the first build,
//! - routes pan gestures through the presenting and dismissing drivers,
//! - advances the live group once per frame and mirrors it into the panel,
//! - applies completion side effects (trigger restore, stand-in teardown,
//!   detach on close).
//!
//! Every entry point runs on the UI context's thread.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Gesture or command with no panel | Ignored (`MissingPanel`) |
//! | Poll for a replaced panel | Ignored (`PanelGone`) |
//! | Content not ready after the budget | Build anyway (`NotReady`, warned) |
//! | Alternate presentation mode | Immediate attach/detach, gestures off |

use std::time::Duration;

use pullup_core::context::{TaskId, UiContext};
use pullup_core::gesture::{PanEvent, PanPhase, PanRecognizer, PointerEvent};

use crate::animator::{BuildOutcome, TransitionEvent};
use crate::composer::TransitionFrame;
use crate::config::TransitionConfig;
use crate::content::ContentProvider;
use crate::delegate::TransitionDelegate;
use crate::error::TransitionError;
use crate::host::{HostContainer, PresentationMode};
use crate::interaction::{DriverKind, GroupDirective, InteractionDriver};
use crate::panel::{Panel, PanelId};
use crate::state::TransitionState;

/// Builds fresh panel content each time a panel is created.
pub type ContentGenerator = Box<dyn FnMut() -> Box<dyn ContentProvider>>;

/// Deferred work on the UI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiTask {
    PollPreload { panel: PanelId, attempt: u32 },
}

/// A slide-up menu bound to one host.
pub struct PullUpMenu<H: HostContainer> {
    host: H,
    config: TransitionConfig,
    ui: UiContext<UiTask>,
    generator: ContentGenerator,
    panel: Option<Panel>,
    next_panel: u64,
    preload_task: Option<TaskId>,
    presenting: InteractionDriver,
    dismissing: InteractionDriver,
    present_pan: PanRecognizer,
    dismiss_pan: PanRecognizer,
    events: Vec<TransitionEvent>,
}

impl<H: HostContainer> PullUpMenu<H> {
    #[must_use]
    pub fn new(host: H, config: TransitionConfig, generator: ContentGenerator) -> Self {
        let pan = config.pan_config();
        Self {
            presenting: InteractionDriver::new(DriverKind::Presenting, config.gesture.clone()),
            dismissing: InteractionDriver::new(DriverKind::Dismissing, config.gesture.clone()),
            present_pan: PanRecognizer::new(pan.clone()),
            dismiss_pan: PanRecognizer::new(pan),
            host,
            config,
            ui: UiContext::new(),
            generator,
            panel: None,
            next_panel: 1,
            preload_task: None,
            events: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Resting state. `Closed` when no panel exists.
    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.panel
            .as_ref()
            .map_or(TransitionState::Closed, |p| p.animator().state())
    }

    #[must_use]
    pub fn panel(&self) -> Option<&Panel> {
        self.panel.as_ref()
    }

    #[must_use]
    pub fn is_panel_attached(&self) -> bool {
        self.panel.as_ref().is_some_and(Panel::is_attached)
    }

    /// Current transition visuals, while a group is built.
    #[must_use]
    pub fn frame(&self) -> Option<TransitionFrame> {
        self.panel.as_ref()?.animator().frame()
    }

    /// Scheduled UI tasks.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.ui.pending()
    }

    #[must_use]
    pub fn transition_delegate(&self) -> TransitionDelegate<'_> {
        TransitionDelegate::new(
            self.host.presentation_mode(),
            &self.config,
            &self.presenting,
            &self.dismissing,
        )
    }

    fn mode(&self) -> PresentationMode {
        self.host.presentation_mode()
    }

    fn container_height(&self) -> f64 {
        self.host.container_frame().height()
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Open the panel.
    ///
    /// If a close is in flight it is cancelled instead, which returns the
    /// panel to open.
    pub fn open(&mut self) {
        self.request(TransitionState::Opened);
    }

    /// Close the panel. Cancels an in-flight open.
    pub fn close(&mut self) {
        self.request(TransitionState::Closed);
    }

    fn request(&mut self, target: TransitionState) {
        self.ui.assert_affine();
        if self.mode() == PresentationMode::Alternate {
            self.bypass(target);
            return;
        }
        let state = self.state();
        let busy = self.panel.as_ref().is_some_and(|p| {
            p.animator().in_flight().is_some() || p.animator().is_preloading()
        });
        if state == target {
            match self.panel.as_mut() {
                Some(panel) if busy => panel.animator_mut().cancel(true),
                _ => {
                    tracing::debug!(?target, "menu.request.already_there");
                    return;
                }
            }
        } else {
            if target == TransitionState::Closed && self.panel.is_none() {
                TransitionError::MissingPanel.resolve();
                return;
            }
            self.prepare();
            if let Some(panel) = self.panel.as_mut() {
                panel.animator_mut().start();
            }
        }
        self.after_command();
    }

    fn bypass(&mut self, target: TransitionState) {
        TransitionError::PresentationBypassed.resolve();
        let live = self.panel.as_ref().is_some_and(|p| {
            p.animator().in_flight().is_some() || p.animator().is_preloading()
        });
        if live {
            self.presenting.end();
            self.dismissing.end();
            self.restore_trigger();
        }
        match target {
            TransitionState::Opened => {
                self.ensure_panel();
                if let Some(panel) = self.panel.as_mut() {
                    panel.animator_mut().set_state_bypassed(TransitionState::Opened);
                    panel.restore_at_rest(TransitionState::Opened, &self.config);
                }
            }
            TransitionState::Closed => self.teardown(),
        }
    }

    /// Forward a tap on row `index` to the content.
    pub fn select_item(&mut self, index: usize) {
        match self.panel.as_mut() {
            Some(panel) => panel.content_mut().select(index),
            None => {
                TransitionError::MissingPanel.resolve();
            }
        }
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Pointer sample over the host (drives the presenting gesture).
    pub fn host_pointer(&mut self, event: &PointerEvent) {
        self.sync_gesture_policy();
        if let Some(pan) = self.present_pan.process(event) {
            self.handle_present_pan(pan);
        }
    }

    /// Pointer sample over the panel (drives the dismissing gesture).
    pub fn panel_pointer(&mut self, event: &PointerEvent) {
        self.sync_gesture_policy();
        if let Some(pan) = self.dismiss_pan.process(event) {
            self.handle_dismiss_pan(pan);
        }
    }

    fn sync_gesture_policy(&mut self) {
        let enabled = self.mode() == PresentationMode::Interactive;
        if let Some(pan) = self.present_pan.set_enabled(enabled) {
            self.handle_present_pan(pan);
        }
        if let Some(pan) = self.dismiss_pan.set_enabled(enabled) {
            self.handle_dismiss_pan(pan);
        }
    }

    pub fn handle_present_pan(&mut self, event: PanEvent) {
        self.handle_pan(DriverKind::Presenting, event);
    }

    pub fn handle_dismiss_pan(&mut self, event: PanEvent) {
        self.handle_pan(DriverKind::Dismissing, event);
    }

    fn handle_pan(&mut self, kind: DriverKind, event: PanEvent) {
        self.ui.assert_affine();
        let _span =
            tracing::debug_span!("pullup.gesture", driver = kind.label(), phase = ?event.phase)
                .entered();
        let mode = self.mode();
        let height = self.container_height();
        match event.phase {
            PanPhase::Began => {
                if mode == PresentationMode::Alternate {
                    TransitionError::PresentationBypassed.resolve();
                    return;
                }
                let in_flight = self
                    .panel
                    .as_ref()
                    .and_then(|p| p.animator().in_flight());
                let state = self.state();
                if in_flight.is_none() && state == kind.target() {
                    tracing::debug!(?state, "menu.gesture.ignored");
                    return;
                }
                if kind == DriverKind::Dismissing && self.panel.is_none() {
                    TransitionError::MissingPanel.resolve();
                    return;
                }
                self.driver_mut(kind).begin(in_flight);
                self.prepare();
            }
            PanPhase::Changed => {
                let driver = self.driver(kind);
                if !driver.in_progress() {
                    return;
                }
                let progress = driver.group_progress(driver.progress(event.translation.y, height));
                tracing::trace!(progress, "menu.gesture.progress");
                match self.panel.as_mut() {
                    Some(panel) => panel.animator_mut().update_interactive(progress, mode),
                    None => {
                        TransitionError::MissingPanel.resolve();
                    }
                }
            }
            PanPhase::Ended => {
                if !self.driver(kind).in_progress() {
                    return;
                }
                let driver = self.driver_mut(kind);
                let release =
                    driver.release(event.translation.y, event.velocity.y, height, height);
                let directive = driver.directive(release);
                self.apply_directive(directive);
            }
            PanPhase::Cancelled => {
                if !self.driver(kind).in_progress() {
                    return;
                }
                let directive = self.driver_mut(kind).system_cancel();
                self.apply_directive(directive);
            }
        }
        self.after_command();
    }

    fn driver(&self, kind: DriverKind) -> &InteractionDriver {
        match kind {
            DriverKind::Presenting => &self.presenting,
            DriverKind::Dismissing => &self.dismissing,
        }
    }

    fn driver_mut(&mut self, kind: DriverKind) -> &mut InteractionDriver {
        match kind {
            DriverKind::Presenting => &mut self.presenting,
            DriverKind::Dismissing => &mut self.dismissing,
        }
    }

    fn apply_directive(&mut self, directive: GroupDirective) {
        let Some(panel) = self.panel.as_mut() else {
            TransitionError::MissingPanel.resolve();
            return;
        };
        match directive {
            GroupDirective::Finish { relative_velocity } => {
                panel.animator_mut().finish(relative_velocity);
            }
            GroupDirective::Cancel { animated } => panel.animator_mut().cancel(animated),
        }
    }

    // -----------------------------------------------------------------------
    // Build & preload
    // -----------------------------------------------------------------------

    fn ensure_panel(&mut self) {
        if self.panel.is_some() {
            return;
        }
        let id = PanelId::new(self.next_panel);
        self.next_panel += 1;
        let content = (self.generator)();
        let mut panel = Panel::new(id, self.host.container_frame(), content, &self.config);
        panel.attach();
        self.host.panel_attached(id);
        tracing::debug!(%id, "menu.panel.attached");
        self.panel = Some(panel);
    }

    /// Make sure a paused group exists, or that content is preloading.
    fn prepare(&mut self) -> BuildOutcome {
        self.ensure_panel();
        let trigger = self.host.trigger_affordance();
        let Some(panel) = self.panel.as_mut() else {
            return BuildOutcome::Deferred;
        };
        let animator_busy = panel.animator().in_flight().is_some() || panel.animator().is_preloading();
        if animator_busy || panel.content().is_ready() {
            let input = panel.composer_input(trigger);
            let outcome = panel.animator_mut().build_and_pause(&input);
            if outcome == BuildOutcome::Fresh {
                self.apply_build_effects();
            }
            return outcome;
        }
        let outcome = panel.animator_mut().begin_preload();
        panel.set_alpha(0.0);
        let id = panel.id();
        self.schedule_poll(id, 1);
        outcome
    }

    fn schedule_poll(&mut self, panel: PanelId, attempt: u32) {
        let task = self
            .ui
            .schedule(self.config.poll_interval(), UiTask::PollPreload { panel, attempt });
        self.preload_task = Some(task);
    }

    fn run_task(&mut self, task: UiTask) {
        match task {
            UiTask::PollPreload { panel: id, attempt } => self.poll_preload(id, attempt),
        }
    }

    fn poll_preload(&mut self, id: PanelId, attempt: u32) {
        self.preload_task = None;
        let max_attempts = self.config.preload.max_attempts;
        let Some(panel) = self.panel.as_mut().filter(|p| p.id() == id) else {
            TransitionError::PanelGone { id }.resolve();
            return;
        };
        panel.content_mut().preload_step();
        if panel.content().is_ready() {
            tracing::debug!(%id, attempt, "menu.preload.ready");
        } else if attempt >= max_attempts {
            let err = TransitionError::NotReady { attempts: attempt };
            tracing::warn!(%id, attempts = attempt, "{err}; building anyway");
            err.resolve();
        } else {
            self.schedule_poll(id, attempt + 1);
            return;
        }
        self.finish_preload();
    }

    fn finish_preload(&mut self) {
        let trigger = self.host.trigger_affordance();
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        panel.set_alpha(1.0);
        let input = panel.composer_input(trigger);
        if panel.animator_mut().preload_finished(&input) == BuildOutcome::Fresh {
            self.apply_build_effects();
        }
        self.after_command();
    }

    fn apply_build_effects(&mut self) {
        let Some(panel) = self.panel.as_mut() else {
            return;
        };
        let Some(plan) = panel.animator().plan().cloned() else {
            return;
        };
        if plan.stand_in.is_some() {
            self.host.set_trigger_alpha(plan.trigger_alpha);
        }
        self.host.set_trigger_masked(plan.trigger_masked);
        panel.install(&plan);
    }

    // -----------------------------------------------------------------------
    // Frame loop & completion
    // -----------------------------------------------------------------------

    /// Advance by one display frame. Returns completions since the last
    /// call.
    pub fn tick(&mut self, dt: Duration) -> Vec<TransitionEvent> {
        for task in self.ui.advance(dt) {
            self.run_task(task);
        }
        if let Some(panel) = self.panel.as_mut() {
            let event = panel.animator_mut().tick(dt);
            self.sync_visuals();
            if let Some(event) = event {
                self.complete(event);
            }
        }
        std::mem::take(&mut self.events)
    }

    fn after_command(&mut self) {
        self.sync_visuals();
        let event = self
            .panel
            .as_mut()
            .and_then(|p| p.animator_mut().poll_completion());
        if let Some(event) = event {
            self.complete(event);
        }
    }

    fn sync_visuals(&mut self) {
        if let Some(panel) = self.panel.as_mut()
            && let Some(frame) = panel.animator().frame()
        {
            panel.apply_frame(&frame);
        }
    }

    /// Undo the trigger hiding and masking a build applied.
    fn restore_trigger(&mut self) {
        self.host.set_trigger_alpha(1.0);
        self.host.set_trigger_masked(false);
    }

    fn complete(&mut self, event: TransitionEvent) {
        self.restore_trigger();
        if let Some(panel) = self.panel.as_mut() {
            panel.restore_at_rest(event.state, &self.config);
        }
        tracing::debug!(
            end = ?event.end,
            previous = ?event.previous,
            state = ?event.state,
            "menu.transition.complete"
        );
        if event.state == TransitionState::Closed {
            self.teardown();
        }
        self.events.push(event);
    }

    fn teardown(&mut self) {
        if let Some(task) = self.preload_task.take() {
            self.ui.cancel(task);
        }
        let Some(mut panel) = self.panel.take() else {
            return;
        };
        panel.detach();
        self.host.panel_detached(panel.id());
        tracing::debug!(id = %panel.id(), "menu.panel.detached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{MenuItem, StaticContent};
    use pullup_core::geometry::Rect;

    #[derive(Debug, Default)]
    struct Host {
        alpha_calls: Vec<f64>,
        masked: bool,
        attached: Vec<PanelId>,
        detached: Vec<PanelId>,
        alternate: bool,
    }

    impl HostContainer for Host {
        fn container_frame(&self) -> Rect {
            Rect::new(0.0, 0.0, 400.0, 800.0)
        }
        fn trigger_affordance(&self) -> Option<Rect> {
            Some(Rect::new(180.0, 740.0, 40.0, 40.0))
        }
        fn presentation_mode(&self) -> PresentationMode {
            if self.alternate {
                PresentationMode::Alternate
            } else {
                PresentationMode::Interactive
            }
        }
        fn set_trigger_alpha(&mut self, alpha: f64) {
            self.alpha_calls.push(alpha);
        }
        fn set_trigger_masked(&mut self, masked: bool) {
            self.masked = masked;
        }
        fn panel_attached(&mut self, id: PanelId) {
            self.attached.push(id);
        }
        fn panel_detached(&mut self, id: PanelId) {
            self.detached.push(id);
        }
    }

    fn menu(passes: u32) -> PullUpMenu<Host> {
        PullUpMenu::new(
            Host::default(),
            TransitionConfig::default(),
            Box::new(move || {
                Box::new(
                    StaticContent::new(vec![MenuItem::new("a", "A"), MenuItem::new("b", "B")])
                        .with_layout_passes(passes),
                )
            }),
        )
    }

    fn run(m: &mut PullUpMenu<Host>) -> Vec<TransitionEvent> {
        let mut out = Vec::new();
        for _ in 0..2000 {
            out.extend(m.tick(Duration::from_millis(16)));
            if !out.is_empty() {
                break;
            }
        }
        out
    }

    #[test]
    fn open_then_close_round_trip() {
        let mut m = menu(0);
        m.open();
        assert!(m.is_panel_attached());
        assert!(m.host().masked);
        let ev = run(&mut m);
        assert_eq!(ev.len(), 1);
        assert_eq!(m.state(), TransitionState::Opened);
        assert!(!m.host().masked);
        assert!(m.panel().is_some_and(|p| p.stand_in().is_none()));

        m.close();
        run(&mut m);
        assert_eq!(m.state(), TransitionState::Closed);
        assert!(m.panel().is_none());
        assert_eq!(m.host().detached.len(), 1);
    }

    #[test]
    fn close_without_panel_is_noop() {
        let mut m = menu(0);
        m.close();
        assert!(m.panel().is_none());
        assert!(m.host().attached.is_empty());
    }

    #[test]
    fn open_while_open_is_noop() {
        let mut m = menu(0);
        m.open();
        run(&mut m);
        let calls = m.host().alpha_calls.len();
        m.open();
        assert_eq!(m.host().alpha_calls.len(), calls);
        assert!(m.frame().is_none());
    }

    #[test]
    fn close_during_open_cancels_back() {
        let mut m = menu(0);
        m.open();
        for _ in 0..5 {
            m.tick(Duration::from_millis(16));
        }
        m.close();
        let ev = run(&mut m);
        assert_eq!(ev.len(), 1);
        assert!(!ev[0].committed());
        assert_eq!(m.state(), TransitionState::Closed);
        assert!(m.panel().is_none());
    }

    #[test]
    fn preload_polls_until_ready() {
        let mut m = menu(3);
        m.open();
        assert!(m.panel().is_some_and(|p| p.animator().is_preloading()));
        assert_eq!(m.panel().map(Panel::alpha), Some(0.0));
        assert_eq!(m.pending_tasks(), 1);
        for _ in 0..3 {
            m.tick(Duration::from_millis(16));
        }
        assert!(m.panel().is_some_and(|p| p.animator().is_running()));
        assert_eq!(m.panel().map(Panel::alpha), Some(1.0));
    }

    #[test]
    fn alternate_mode_attaches_immediately() {
        let mut m = menu(0);
        m.host_mut().alternate = true;
        m.open();
        assert_eq!(m.state(), TransitionState::Opened);
        assert!(m.frame().is_none());
        m.close();
        assert!(m.panel().is_none());
    }

    #[test]
    fn select_forwards_to_content() {
        let mut m = menu(0);
        m.select_item(0);
        m.open();
        m.select_item(1);
        assert!(m.panel().is_some());
    }
}
