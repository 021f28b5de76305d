#![forbid(unsafe_code)]

//! The host container capability.

use pullup_core::geometry::Rect;

use crate::panel::PanelId;

/// How the host wants the panel presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresentationMode {
    /// Custom gesture-interactive transition.
    #[default]
    Interactive,
    /// Plain presentation (e.g. a popover in a regular-width layout). The
    /// custom transition and gestures are bypassed.
    Alternate,
}

/// What the panel needs from the screen that hosts it.
///
/// Handed to [`PullUpMenu`](crate::menu::PullUpMenu) at construction; the
/// menu owns it and calls back into it on the UI context only.
pub trait HostContainer {
    /// Bounds the panel occupies once opened.
    fn container_frame(&self) -> Rect;

    /// Current frame of the trigger affordance, if it exists and is visible.
    fn trigger_affordance(&self) -> Option<Rect>;

    fn presentation_mode(&self) -> PresentationMode {
        PresentationMode::Interactive
    }

    fn set_trigger_alpha(&mut self, alpha: f64);

    fn set_trigger_masked(&mut self, masked: bool);

    /// The panel's root view was attached to the host.
    fn panel_attached(&mut self, _id: PanelId) {}

    /// The panel's root view was removed from the host.
    fn panel_detached(&mut self, _id: PanelId) {}
}
