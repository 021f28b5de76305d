#![forbid(unsafe_code)]

//! Pan gesture recognition with velocity tracking.
//!
//! [`PanRecognizer`] is a stateful processor that turns raw pointer samples
//! (down / move / up / cancel) into continuous pan events carrying the
//! translation since the pan began and the instantaneous velocity.
//!
//! # State Machine
//!
//! ```text
//! Idle ──Down──► Tracking ──move past threshold──► Panning
//!                   │                                 │
//!                   └──Up/Cancel──► Idle ◄──Up (Ended)─┤
//!                                        ◄─Cancel/disable (Cancelled)
//! ```
//!
//! # Invariants
//!
//! 1. `Began` precedes every `Changed`, and exactly one of `Ended` or
//!    `Cancelled` closes a pan.
//! 2. `Began` reports zero translation: translation is measured from the
//!    point where the drag threshold was crossed.
//! 3. Velocity is computed over samples no older than
//!    [`PanConfig::velocity_window`] relative to the newest sample; a single
//!    sample yields zero velocity.
//! 4. A disabled recognizer emits nothing and ignores all samples.
//!
//! # Failure Modes
//!
//! - Non-monotonic sample times: samples older than the newest one are
//!   treated as simultaneous and contribute zero elapsed time.

use std::collections::VecDeque;
use std::time::Duration;

use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for pan recognition.
#[derive(Debug, Clone, PartialEq)]
pub struct PanConfig {
    /// Distance (points) a pointer must travel before a pan begins (default: 10).
    pub drag_threshold: f64,
    /// History window used for velocity estimation (default: 100ms).
    pub velocity_window: Duration,
}

impl Default for PanConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 10.0,
            velocity_window: Duration::from_millis(100),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Raw pointer phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// The system took the pointer away (not a user release).
    Cancel,
}

/// A raw pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    /// Timestamp on any monotonic clock.
    pub time: Duration,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point, time: Duration) -> Self {
        Self {
            phase,
            position,
            time,
        }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y), time)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y), time)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y), time)
    }

    #[must_use]
    pub const fn cancel(x: f64, y: f64, time: Duration) -> Self {
        Self::new(PointerPhase::Cancel, Point::new(x, y), time)
    }
}

/// Recognized pan phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// A recognized pan update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    /// Offset from where the pan began.
    pub translation: Point,
    /// Points per second.
    pub velocity: Point,
}

// ---------------------------------------------------------------------------
// PanRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Tracking {
    down: Point,
    anchor: Option<Point>,
    last: Point,
}

/// Stateful pan recognizer.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
    config: PanConfig,
    enabled: bool,
    tracking: Option<Tracking>,
    history: VecDeque<(Duration, Point)>,
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(PanConfig::default())
    }
}

impl PanRecognizer {
    #[must_use]
    pub fn new(config: PanConfig) -> Self {
        Self {
            config,
            enabled: true,
            tracking: None,
            history: VecDeque::with_capacity(16),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PanConfig {
        &self.config
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether a pan has begun and not yet ended.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.tracking.as_ref().is_some_and(|t| t.anchor.is_some())
    }

    /// Enable or disable recognition. Disabling mid-pan cancels it.
    pub fn set_enabled(&mut self, enabled: bool) -> Option<PanEvent> {
        if self.enabled == enabled {
            return None;
        }
        self.enabled = enabled;
        if enabled {
            return None;
        }
        let cancelled = self.is_panning().then(|| PanEvent {
            phase: PanPhase::Cancelled,
            translation: self.translation(),
            velocity: Point::ZERO,
        });
        self.reset();
        cancelled
    }

    /// Drop all tracking state without emitting anything.
    pub fn reset(&mut self) {
        self.tracking = None;
        self.history.clear();
    }

    /// Process one pointer sample.
    pub fn process(&mut self, event: &PointerEvent) -> Option<PanEvent> {
        if !self.enabled {
            return None;
        }
        match event.phase {
            PointerPhase::Down => {
                self.history.clear();
                self.tracking = Some(Tracking {
                    down: event.position,
                    anchor: None,
                    last: event.position,
                });
                self.record(event);
                None
            }
            PointerPhase::Move => self.on_move(event),
            PointerPhase::Up => self.on_release(event, PanPhase::Ended),
            PointerPhase::Cancel => self.on_release(event, PanPhase::Cancelled),
        }
    }

    fn on_move(&mut self, event: &PointerEvent) -> Option<PanEvent> {
        let threshold = self.config.drag_threshold;
        let tracking = self.tracking.as_mut()?;
        tracking.last = event.position;
        let phase = match tracking.anchor {
            Some(_) => Some(PanPhase::Changed),
            None if (event.position - tracking.down).length() >= threshold => {
                tracking.anchor = Some(event.position);
                Some(PanPhase::Began)
            }
            None => None,
        };
        self.record(event);
        let phase = phase?;
        Some(PanEvent {
            phase,
            translation: self.translation(),
            velocity: self.velocity(),
        })
    }

    fn on_release(&mut self, event: &PointerEvent, phase: PanPhase) -> Option<PanEvent> {
        let panning = self.is_panning();
        if let Some(tracking) = self.tracking.as_mut() {
            tracking.last = event.position;
        }
        self.record(event);
        let out = panning.then(|| PanEvent {
            phase,
            translation: self.translation(),
            velocity: if phase == PanPhase::Ended {
                self.velocity()
            } else {
                Point::ZERO
            },
        });
        self.reset();
        out
    }

    fn record(&mut self, event: &PointerEvent) {
        let newest = self.history.back().map_or(event.time, |(t, _)| (*t).max(event.time));
        self.history.push_back((newest, event.position));
        while let Some((t, _)) = self.history.front() {
            if newest.saturating_sub(*t) > self.config.velocity_window {
                self.history.pop_front();
            } else {
                break;
            }
        }
    }

    fn translation(&self) -> Point {
        self.tracking
            .as_ref()
            .and_then(|t| t.anchor.map(|anchor| t.last - anchor))
            .unwrap_or(Point::ZERO)
    }

    fn velocity(&self) -> Point {
        let (Some((t0, p0)), Some((t1, p1))) = (self.history.front(), self.history.back()) else {
            return Point::ZERO;
        };
        let dt = t1.saturating_sub(*t0).as_secs_f64();
        if dt <= 0.0 {
            return Point::ZERO;
        }
        (*p1 - *p0) * (1.0 / dt)
    }
}
