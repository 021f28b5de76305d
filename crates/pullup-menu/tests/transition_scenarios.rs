#![forbid(unsafe_code)]

//! End-to-end transition scenarios driven through [`PullUpMenu`].
//!
//! Covers:
//! (1) Release threshold: 350pt up on an 800pt container commits, 200pt cancels
//! (2) Reversal continuity: a dismissing drag caught mid-cancel reads 0.7
//! (3) Staggered row reveal order
//! (4) Trigger hidden exactly once per built transition
//! (5) Resting state only flips on completion
//! (6) Teardown after a committed close
//! (7) Preload: queued requests, last call wins, attempt budget
//! (8) Alternate presentation mode bypass, restoring the trigger mid-transition
//!
//! Run:
//!   cargo test -p pullup-menu --test transition_scenarios

use std::time::Duration;

use pullup_core::geometry::{Point, Rect};
use pullup_core::gesture::{PanEvent, PanPhase, PointerEvent};
use pullup_menu::{
    ContentProvider, HostContainer, MenuItem, PanelId, PresentationMode, PullUpMenu,
    StaticContent, TransitionConfig, TransitionEvent, TransitionState,
};

const FRAME: Duration = Duration::from_millis(16);
const CONTAINER: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Default)]
struct RecordingHost {
    trigger: Option<Rect>,
    alternate: bool,
    alpha_calls: Vec<f64>,
    masked: bool,
    attached: Vec<PanelId>,
    detached: Vec<PanelId>,
}

impl RecordingHost {
    fn with_trigger() -> Self {
        Self {
            trigger: Some(Rect::new(180.0, 740.0, 40.0, 40.0)),
            ..Self::default()
        }
    }
}

impl HostContainer for RecordingHost {
    fn container_frame(&self) -> Rect {
        CONTAINER
    }

    fn trigger_affordance(&self) -> Option<Rect> {
        self.trigger
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

/// Content that never finishes laying out.
struct NeverReady {
    items: Vec<MenuItem>,
    steps: u32,
}

impl ContentProvider for NeverReady {
    fn items(&self) -> &[MenuItem] {
        &self.items
    }

    fn row_frames(&self, container: Rect) -> Vec<Rect> {
        vec![Rect::new(container.min_x(), container.mid_y(), 100.0, 55.0)]
    }

    fn is_ready(&self) -> bool {
        false
    }

    fn preload_step(&mut self) {
        self.steps += 1;
    }

    fn select(&mut self, _index: usize) {}
}

fn items(n: usize) -> Vec<MenuItem> {
    (0..n)
        .map(|i| MenuItem::new(format!("item{i}"), format!("Item {i}")))
        .collect()
}

fn menu_with(host: RecordingHost, passes: u32) -> PullUpMenu<RecordingHost> {
    PullUpMenu::new(
        host,
        TransitionConfig::default(),
        Box::new(move || Box::new(StaticContent::new(items(4)).with_layout_passes(passes))),
    )
}

fn menu() -> PullUpMenu<RecordingHost> {
    menu_with(RecordingHost::with_trigger(), 0)
}

fn pan(phase: PanPhase, ty: f64, vy: f64) -> PanEvent {
    PanEvent {
        phase,
        translation: Point::new(0.0, ty),
        velocity: Point::new(0.0, vy),
    }
}

fn run_to_rest(menu: &mut PullUpMenu<RecordingHost>) -> Vec<TransitionEvent> {
    let mut events = Vec::new();
    for _ in 0..2000 {
        events.extend(menu.tick(FRAME));
        if !events.is_empty() {
            return events;
        }
    }
    panic!("transition never came to rest");
}

fn fraction(menu: &PullUpMenu<RecordingHost>) -> f64 {
    menu.frame().map(|f| f.fraction).expect("live transition")
}

fn drag_open(menu: &mut PullUpMenu<RecordingHost>, ty: f64, vy: f64) {
    menu.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    menu.handle_present_pan(pan(PanPhase::Changed, ty, vy));
    menu.handle_present_pan(pan(PanPhase::Ended, ty, vy));
}

// ============================================================================
// Release threshold
// ============================================================================

#[test]
fn slow_release_past_threshold_commits() {
    let mut m = menu();
    drag_open(&mut m, -350.0, 0.0);
    let events = run_to_rest(&mut m);
    assert!(events[0].committed());
    assert_eq!(m.state(), TransitionState::Opened);
    assert!(m.is_panel_attached());
}

#[test]
fn slow_release_short_of_threshold_cancels() {
    let mut m = menu();
    drag_open(&mut m, -200.0, 0.0);
    let events = run_to_rest(&mut m);
    assert!(!events[0].committed());
    assert_eq!(m.state(), TransitionState::Closed);
    assert!(m.panel().is_none());
}

#[test]
fn fling_commits_a_short_drag() {
    let mut m = menu();
    drag_open(&mut m, -100.0, -1500.0);
    let events = run_to_rest(&mut m);
    assert!(events[0].committed());
}

#[test]
fn finish_leaves_at_release_speed() {
    let mut m = menu();
    drag_open(&mut m, -640.0, -400.0);
    let before = fraction(&m);
    assert!((before - 0.8).abs() < 1e-9);
    m.tick(Duration::from_millis(1));
    let speed = (fraction(&m) - before) / 0.001 * CONTAINER.height();
    assert!(
        (300.0..600.0).contains(&speed),
        "panel left at {speed} pt/s after a 400 pt/s release"
    );
}

#[test]
fn pointer_samples_drive_the_presenting_gesture() {
    let mut m = menu();
    let ms = Duration::from_millis;
    m.host_pointer(&PointerEvent::down(200.0, 780.0, ms(0)));
    m.host_pointer(&PointerEvent::moved(200.0, 760.0, ms(16)));
    for i in 1..=20_u32 {
        let y = 760.0 - 20.0 * f64::from(i);
        m.host_pointer(&PointerEvent::moved(200.0, y, ms(16 + 16 * u64::from(i))));
    }
    // 400pt of travel, held still long enough to drop the velocity.
    m.host_pointer(&PointerEvent::up(200.0, 360.0, ms(2000)));
    assert!(m.frame().is_some_and(|f| f.fraction > 0.4));
    let events = run_to_rest(&mut m);
    assert!(events[0].committed());
    assert_eq!(m.state(), TransitionState::Opened);
}

// ============================================================================
// Reversal continuity
// ============================================================================

#[test]
fn dismissing_catch_mid_cancel_is_continuous() {
    let mut m = menu();
    drag_open(&mut m, -240.0, 0.0);
    // Released at 0.3: animating back toward closed.
    assert!((fraction(&m) - 0.3).abs() < 1e-9);

    m.handle_dismiss_pan(pan(PanPhase::Began, 0.0, 0.0));
    let driver = m
        .transition_delegate()
        .dismissal_interaction()
        .cloned()
        .expect("dismissing gesture in progress");
    assert!(driver.is_inverted());
    assert!((driver.offset() - 0.7).abs() < 1e-9);
    assert!((fraction(&m) - 0.3).abs() < 1e-9);

    m.handle_dismiss_pan(pan(PanPhase::Changed, 0.0, 0.0));
    assert!((fraction(&m) - 0.3).abs() < 1e-9);

    m.handle_dismiss_pan(pan(PanPhase::Changed, 80.0, 0.0));
    assert!((fraction(&m) - 0.2).abs() < 1e-9);

    // Committing the dismissal cancels the opening group.
    m.handle_dismiss_pan(pan(PanPhase::Ended, 80.0, 0.0));
    let events = run_to_rest(&mut m);
    assert!(!events[0].committed());
    assert_eq!(m.state(), TransitionState::Closed);
}

#[test]
fn presenting_catch_continues_same_direction() {
    let mut m = menu();
    m.open();
    for _ in 0..10 {
        m.tick(FRAME);
    }
    let caught = fraction(&m);
    assert!(caught > 0.0 && caught < 1.0);

    m.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_present_pan(pan(PanPhase::Changed, 0.0, 0.0));
    assert!((fraction(&m) - caught).abs() < 1e-9);
    assert!(!m.panel().is_some_and(|p| p.animator().is_running()));
}

#[test]
fn system_cancel_returns_to_rest() {
    let mut m = menu();
    m.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_present_pan(pan(PanPhase::Changed, -500.0, 0.0));
    m.handle_present_pan(pan(PanPhase::Cancelled, -500.0, 0.0));
    let events = run_to_rest(&mut m);
    assert!(!events[0].committed());
    assert_eq!(m.state(), TransitionState::Closed);
}

// ============================================================================
// Stagger
// ============================================================================

#[test]
fn lower_rows_reveal_first_when_opening() {
    let mut m = menu();
    m.open();
    let mut saw_lead = false;
    for _ in 0..200 {
        if !m.tick(FRAME).is_empty() {
            break;
        }
        let rows = m.panel().expect("panel").rows();
        assert_eq!(rows.len(), 4);
        // Rows 2 and 3 sit 55pt below rows 0 and 1.
        assert!(rows[2].alpha >= rows[0].alpha - 1e-12);
        saw_lead |= rows[2].alpha > rows[0].alpha;
    }
    assert!(saw_lead);
    let rows = m.panel().expect("panel").rows();
    assert!(rows.iter().all(|r| r.alpha == 1.0 && r.offset == 0.0));
}

// ============================================================================
// Trigger & state invariants
// ============================================================================

#[test]
fn trigger_hidden_once_per_build() {
    let mut m = menu();
    m.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    for i in 1..=30 {
        m.handle_present_pan(pan(PanPhase::Changed, -10.0 * f64::from(i), 0.0));
    }
    m.handle_present_pan(pan(PanPhase::Ended, -300.0, 0.0));
    run_to_rest(&mut m);
    assert_eq!(m.host().alpha_calls, vec![0.0, 1.0]);
}

#[test]
fn trigger_untouched_without_stand_in() {
    let mut m = menu_with(RecordingHost::default(), 0);
    m.open();
    assert!(m.host().alpha_calls.is_empty());
    assert!(m.frame().is_some_and(|f| f.stand_in.is_none()));
    run_to_rest(&mut m);
    assert_eq!(m.host().alpha_calls, vec![1.0]);
    assert_eq!(m.state(), TransitionState::Opened);
}

#[test]
fn state_flips_only_on_completion() {
    let mut m = menu();
    m.open();
    assert!(m.host().masked);
    let mut ticks = 0;
    loop {
        let events = m.tick(FRAME);
        if !events.is_empty() {
            break;
        }
        assert_eq!(m.state(), TransitionState::Closed);
        ticks += 1;
        assert!(ticks < 2000);
    }
    assert_eq!(m.state(), TransitionState::Opened);
    assert!(!m.host().masked);
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn committed_close_detaches_panel() {
    let mut m = menu();
    m.open();
    run_to_rest(&mut m);
    let id = m.panel().map(|p| p.id()).expect("panel");

    m.handle_dismiss_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Changed, 500.0, 0.0));
    assert!(m.panel().is_some_and(|p| p.stand_in().is_some()));
    m.handle_dismiss_pan(pan(PanPhase::Ended, 500.0, 0.0));
    let events = run_to_rest(&mut m);
    assert!(events[0].committed());
    assert!(m.panel().is_none());
    assert_eq!(m.host().detached, vec![id]);

    // A fresh panel instance on the next open.
    m.open();
    let next = m.panel().map(|p| p.id()).expect("panel");
    assert_ne!(next, id);
    assert_eq!(m.host().attached.len(), 2);
}

#[test]
fn cancelled_close_keeps_panel() {
    let mut m = menu();
    m.open();
    run_to_rest(&mut m);
    m.handle_dismiss_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Changed, 100.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Ended, 100.0, 0.0));
    let events = run_to_rest(&mut m);
    assert!(!events[0].committed());
    assert_eq!(m.state(), TransitionState::Opened);
    let panel = m.panel().expect("panel");
    assert!(panel.stand_in().is_none());
    assert!(panel.affordance().transform().is_identity());
}

#[test]
fn dismiss_gesture_without_panel_is_ignored() {
    let mut m = menu();
    m.handle_dismiss_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Changed, 300.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Ended, 300.0, 0.0));
    assert!(m.panel().is_none());
    assert!(m.tick(FRAME).is_empty());
}

// ============================================================================
// Preload
// ============================================================================

#[test]
fn requests_during_preload_last_call_wins() {
    let mut m = menu_with(RecordingHost::with_trigger(), 3);
    m.open();
    assert!(m.panel().is_some_and(|p| p.animator().is_preloading()));
    m.close();
    let events = run_to_rest(&mut m);
    assert_eq!(events.len(), 1);
    assert!(!events[0].committed());
    assert_eq!(m.state(), TransitionState::Closed);
    assert!(m.panel().is_none());
}

#[test]
fn gesture_progress_during_preload_is_replayed() {
    let mut m = menu_with(RecordingHost::with_trigger(), 2);
    m.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_present_pan(pan(PanPhase::Changed, -400.0, 0.0));
    assert_eq!(
        m.panel().and_then(|p| p.animator().pending_progress()),
        Some(0.5)
    );
    assert!(m.frame().is_none());
    m.tick(FRAME);
    m.tick(FRAME);
    assert!((fraction(&m) - 0.5).abs() < 1e-9);
}

#[test]
fn preload_gives_up_after_budget() {
    let mut m = PullUpMenu::new(
        RecordingHost::with_trigger(),
        TransitionConfig::default(),
        Box::new(|| {
            Box::new(NeverReady {
                items: items(1),
                steps: 0,
            })
        }),
    );
    m.open();
    for _ in 0..9 {
        m.tick(FRAME);
        assert!(m.panel().is_some_and(|p| p.animator().is_preloading()));
    }
    m.tick(FRAME);
    let panel = m.panel().expect("panel");
    assert!(panel.animator().is_running());
    assert_eq!(panel.alpha(), 1.0);
    assert_eq!(m.pending_tasks(), 0);
}

// ============================================================================
// Alternate presentation mode
// ============================================================================

#[test]
fn alternate_mode_bypasses_transition() {
    let mut host = RecordingHost::with_trigger();
    host.alternate = true;
    let mut m = menu_with(host, 0);
    m.open();
    assert_eq!(m.state(), TransitionState::Opened);
    assert!(m.frame().is_none());
    assert!(m.transition_delegate().presentation_animator().is_none());

    m.handle_dismiss_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_dismiss_pan(pan(PanPhase::Changed, 500.0, 0.0));
    assert!(m.frame().is_none());

    m.close();
    assert!(m.panel().is_none());
    assert_eq!(m.host().detached.len(), 1);
}

#[test]
fn bypass_mid_transition_restores_trigger() {
    let mut m = menu();
    m.handle_present_pan(pan(PanPhase::Began, 0.0, 0.0));
    m.handle_present_pan(pan(PanPhase::Changed, -200.0, 0.0));
    assert!(m.host().masked);
    assert_eq!(m.host().alpha_calls, vec![0.0]);

    m.host_mut().alternate = true;
    m.close();
    assert!(m.panel().is_none());
    assert!(!m.host().masked);
    assert_eq!(m.host().alpha_calls, vec![0.0, 1.0]);
    assert_eq!(m.state(), TransitionState::Closed);

    // The abandoned gesture's release goes nowhere.
    m.handle_present_pan(pan(PanPhase::Ended, -200.0, 0.0));
    assert!(m.frame().is_none());
}

#[test]
fn switching_to_alternate_mid_pan_cancels_gesture() {
    let mut m = menu();
    let ms = Duration::from_millis;
    m.host_pointer(&PointerEvent::down(200.0, 780.0, ms(0)));
    m.host_pointer(&PointerEvent::moved(200.0, 760.0, ms(16)));
    m.host_pointer(&PointerEvent::moved(200.0, 400.0, ms(32)));
    assert!(m.transition_delegate().presentation_interaction().is_some());

    m.host_mut().alternate = true;
    m.host_pointer(&PointerEvent::moved(200.0, 300.0, ms(48)));
    assert!(m.transition_delegate().presentation_interaction().is_none());
    let events = run_to_rest(&mut m);
    assert!(!events[0].committed());
}
