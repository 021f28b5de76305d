#![forbid(unsafe_code)]

//! Panel content: menu items and the provider interface.
//!
//! The transition engine only needs three things from content: how many
//! rows there are, where each row sits in the container's coordinate space,
//! and whether the content has finished laying out. [`ContentProvider`] is
//! that capability; [`StaticContent`] is a ready-made two-column grid.

use pullup_core::geometry::{Rect, Rgba};

/// One row record.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub identifier: String,
    pub title: String,
    pub subtitle: Option<String>,
    /// Opaque image reference resolved by the host.
    pub icon: Option<String>,
    pub tint: Rgba,
    pub is_active: bool,
}

impl MenuItem {
    #[must_use]
    pub fn new(identifier: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: title.into(),
            subtitle: None,
            icon: None,
            tint: Rgba::WHITE,
            is_active: true,
        }
    }

    /// Placeholder used to pad a grid.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            identifier: String::new(),
            title: String::new(),
            subtitle: None,
            icon: None,
            tint: Rgba::CLEAR,
            is_active: false,
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn with_tint(mut self, tint: Rgba) -> Self {
        self.tint = tint;
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

/// What the panel needs from its content.
pub trait ContentProvider {
    /// Ordered rows.
    fn items(&self) -> &[MenuItem];

    /// Row frames inside `container`, one per visible row.
    fn row_frames(&self, container: Rect) -> Vec<Rect>;

    /// Whether content has been fully laid out.
    fn is_ready(&self) -> bool;

    /// Give the content one layout pass.
    fn preload_step(&mut self) {}

    /// A row was tapped.
    fn select(&mut self, index: usize);
}

// ---------------------------------------------------------------------------
// StaticContent
// ---------------------------------------------------------------------------

const GRID_INSET: f64 = 16.0;
const ROW_HEIGHT: f64 = 55.0;
const COLUMN_GAP: f64 = 8.0;

/// A fixed list laid out as a two-column grid.
#[derive(Debug, Clone, Default)]
pub struct StaticContent {
    items: Vec<MenuItem>,
    passes_needed: u32,
    passes_done: u32,
    selected: Option<usize>,
}

impl StaticContent {
    #[must_use]
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self {
            items,
            passes_needed: 0,
            passes_done: 0,
            selected: None,
        }
    }

    /// Become ready only after `passes` calls to
    /// [`preload_step`](ContentProvider::preload_step).
    #[must_use]
    pub fn with_layout_passes(mut self, passes: u32) -> Self {
        self.passes_needed = passes;
        self
    }

    /// The last selected row.
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn column_width(content_width: f64) -> f64 {
        (content_width / 2.0 - COLUMN_GAP).max(0.0)
    }
}

impl ContentProvider for StaticContent {
    fn items(&self) -> &[MenuItem] {
        &self.items
    }

    fn row_frames(&self, container: Rect) -> Vec<Rect> {
        let content = container.inset(GRID_INSET);
        let column = Self::column_width(content.width());
        (0..self.items.len())
            .map(|i| {
                let row = (i / 2) as f64;
                let col = (i % 2) as f64;
                Rect::new(
                    content.min_x() + col * (column + 2.0 * COLUMN_GAP),
                    content.min_y() + row * ROW_HEIGHT,
                    column,
                    ROW_HEIGHT,
                )
            })
            .collect()
    }

    fn is_ready(&self) -> bool {
        self.passes_done >= self.passes_needed
    }

    fn preload_step(&mut self) {
        self.passes_done = self.passes_done.saturating_add(1);
    }

    fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<MenuItem> {
        (0..n)
            .map(|i| MenuItem::new(format!("id{i}"), format!("Item {i}")))
            .collect()
    }

    #[test]
    fn grid_is_two_columns() {
        let c = StaticContent::new(items(3));
        let frames = c.row_frames(Rect::new(0.0, 0.0, 400.0, 800.0));
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].min_y(), frames[1].min_y());
        assert!(frames[1].min_x() > frames[0].max_x());
        assert_eq!(frames[2].min_y(), frames[0].min_y() + 55.0);
        // content width 368, column 176
        assert_eq!(frames[0].width(), 176.0);
        assert_eq!(frames[0].min_x(), 16.0);
    }

    #[test]
    fn readiness_after_layout_passes() {
        let mut c = StaticContent::new(items(2)).with_layout_passes(2);
        assert!(!c.is_ready());
        c.preload_step();
        assert!(!c.is_ready());
        c.preload_step();
        assert!(c.is_ready());
    }

    #[test]
    fn selection_ignores_out_of_range() {
        let mut c = StaticContent::new(items(2));
        c.select(5);
        assert_eq!(c.selected(), None);
        c.select(1);
        assert_eq!(c.selected(), Some(1));
    }

    #[test]
    fn empty_item_is_inactive() {
        let e = MenuItem::empty();
        assert!(!e.is_active);
        assert!(e.title.is_empty());
    }
}
