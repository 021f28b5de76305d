#![forbid(unsafe_code)]

//! The panel affordance: a chevron that flips between pointing up and down.
//!
//! The chevron is a three-point open path drawn inside the affordance rect,
//! inset by its stroke width. A [`DirectionMorph`] animates the path from the
//! reversed direction in a start rect to the target direction in an end rect,
//! optionally resizing the stroke and recoloring on the way.
//!
//! # Invariants
//!
//! 1. Stroke width is `5/40` of the affordance width.
//! 2. The chevron spans the arrow rect horizontally; its head and tail sit
//!    `arrow_height_factor` of the rect height apart, centered vertically.
//! 3. A morph always starts from the reversed direction, never from the
//!    current one.

use pullup_core::geometry::{Lerp, Point, Rect, Rgba, Size, Transform};

/// Vertical distance between chevron head and tail, as a fraction of the
/// arrow rect height.
pub const ARROW_HEIGHT_FACTOR: f64 = 0.4;

/// Which way the chevron points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Stroke width for an affordance of `size`.
#[must_use]
pub fn stroke_width(size: Size) -> f64 {
    5.0 / 40.0 * size.width
}

/// The rect the chevron is drawn in.
#[must_use]
pub fn arrow_rect(rect: Rect) -> Rect {
    rect.inset(stroke_width(rect.size))
}

/// A three-point chevron path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowPath {
    pub points: [Point; 3],
}

impl ArrowPath {
    /// The chevron for `direction` inside `rect`.
    #[must_use]
    pub fn new(direction: Direction, rect: Rect) -> Self {
        let r = arrow_rect(rect);
        let mut head = (1.0 - ARROW_HEIGHT_FACTOR) / 2.0 * r.height();
        let mut tail = (0.5 + ARROW_HEIGHT_FACTOR / 2.0) * r.height();
        if direction == Direction::Down {
            std::mem::swap(&mut head, &mut tail);
        }
        Self {
            points: [
                Point::new(r.min_x(), r.min_y() + tail),
                Point::new(r.mid_x(), r.min_y() + head),
                Point::new(r.max_x(), r.min_y() + tail),
            ],
        }
    }

    /// The middle point.
    #[must_use]
    pub fn apex(&self) -> Point {
        self.points[1]
    }
}

impl Lerp for ArrowPath {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            points: [
                self.points[0].lerp(&other.points[0], t),
                self.points[1].lerp(&other.points[1], t),
                self.points[2].lerp(&other.points[2], t),
            ],
        }
    }
}

/// A sampled chevron: path, stroke and tint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowSample {
    pub path: ArrowPath,
    pub stroke_width: f64,
    pub tint: Rgba,
}

// ---------------------------------------------------------------------------
// DirectionMorph
// ---------------------------------------------------------------------------

/// An animated direction flip.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionMorph {
    target: Direction,
    from: ArrowSample,
    to: ArrowSample,
}

impl DirectionMorph {
    /// Flip to `target` inside the bounds of `start`.
    ///
    /// With `end_size`, the path also resizes and the stroke width follows.
    #[must_use]
    pub fn new(target: Direction, start: Size, end_size: Option<Size>, tint: Rgba) -> Self {
        let start_rect = Rect::from_size(start);
        let end = end_size.unwrap_or(start);
        let end_rect = Rect::from_size(end);
        let stroke_from = stroke_width(start);
        let stroke_to = end_size.map_or(stroke_from, stroke_width);
        Self {
            target,
            from: ArrowSample {
                path: ArrowPath::new(target.reversed(), start_rect),
                stroke_width: stroke_from,
                tint,
            },
            to: ArrowSample {
                path: ArrowPath::new(target, end_rect),
                stroke_width: stroke_to,
                tint,
            },
        }
    }

    /// Recolor from the current tint to `tint` over the morph (builder).
    #[must_use]
    pub fn with_tint(mut self, tint: Rgba) -> Self {
        self.to.tint = tint;
        self
    }

    #[must_use]
    pub fn target(&self) -> Direction {
        self.target
    }

    /// Sample at shaped local progress `t`.
    #[must_use]
    pub fn sample(&self, t: f64) -> ArrowSample {
        let t = t.clamp(0.0, 1.0);
        ArrowSample {
            path: self.from.path.lerp(&self.to.path, t),
            stroke_width: self.from.stroke_width.lerp(&self.to.stroke_width, t),
            tint: self.from.tint.lerp(&self.to.tint, t),
        }
    }
}

// ---------------------------------------------------------------------------
// PanelAffordance
// ---------------------------------------------------------------------------

/// A live affordance instance in the panel's view graph.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelAffordance {
    frame: Rect,
    direction: Direction,
    tint: Rgba,
    alpha: f64,
    transform: Transform,
    morph: Option<DirectionMorph>,
    /// Last chevron mirrored from a sampled frame.
    drawn: Option<ArrowSample>,
}

impl PanelAffordance {
    #[must_use]
    pub fn new(frame: Rect, direction: Direction, tint: Rgba) -> Self {
        Self {
            frame,
            direction,
            tint,
            alpha: 1.0,
            transform: Transform::IDENTITY,
            morph: None,
            drawn: None,
        }
    }

    #[must_use]
    pub fn frame(&self) -> Rect {
        self.frame
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn tint(&self) -> Rgba {
        self.tint
    }

    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    #[must_use]
    pub fn morph(&self) -> Option<&DirectionMorph> {
        self.morph.as_ref()
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
    }

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Point the chevron at `direction`, dropping any running morph.
    pub fn set_direction(&mut self, direction: Direction) {
        self.morph = None;
        self.drawn = None;
        self.direction = direction;
    }

    /// Install a morph; the direction is considered flipped immediately.
    pub fn begin_morph(&mut self, morph: DirectionMorph) {
        self.direction = morph.target();
        self.drawn = Some(morph.sample(0.0));
        self.morph = Some(morph);
    }

    /// The chevron as currently drawn at morph progress `t`.
    #[must_use]
    pub fn arrow(&self, t: f64) -> ArrowSample {
        match &self.morph {
            Some(morph) => morph.sample(t),
            None => ArrowSample {
                path: ArrowPath::new(self.direction, self.frame.bounds()),
                stroke_width: stroke_width(self.frame.size),
                tint: self.tint,
            },
        }
    }

    /// Mirror a sampled chevron; its tint becomes the current tint.
    pub fn set_arrow(&mut self, arrow: ArrowSample) {
        self.tint = arrow.tint;
        self.drawn = Some(arrow);
    }

    /// The chevron as last drawn, or the resting chevron.
    #[must_use]
    pub fn drawn_arrow(&self) -> ArrowSample {
        self.drawn.unwrap_or_else(|| self.arrow(1.0))
    }
}
