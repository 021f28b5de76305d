#![forbid(unsafe_code)]

//! pullup public facade.
//!
//! Re-exports the types a host needs to embed a slide-up menu, plus a
//! prelude for day-to-day use.

// --- Core re-exports -------------------------------------------------------

pub use pullup_core::animation::{GroupEnd, TimingCurve, TimingProfile};
pub use pullup_core::context::UiContext;
pub use pullup_core::geometry::{Point, Rect, Rgba, Size, Transform};
pub use pullup_core::gesture::{PanEvent, PanPhase, PointerEvent, PointerPhase};

// --- Menu re-exports -------------------------------------------------------

pub use pullup_menu::{
    BackdropEffect, BlurStyle, ConfigError, ContentGenerator, ContentProvider, Direction,
    HostContainer, MenuItem, Panel, PanelId, PresentationMode, PullUpMenu, StaticContent,
    TransitionConfig, TransitionDelegate, TransitionError, TransitionEvent, TransitionFrame,
    TransitionState,
};

/// Standard result type for fallible pullup APIs.
pub type Result<T> = std::result::Result<T, ConfigError>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ContentProvider, HostContainer, MenuItem, PointerEvent, PresentationMode, PullUpMenu, Rect,
        Result, StaticContent, TransitionConfig, TransitionEvent, TransitionState,
    };

    pub use crate::{core, menu};
}

pub use pullup_core as core;
pub use pullup_menu as menu;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use std::time::Duration;

    struct Screen;

    impl HostContainer for Screen {
        fn container_frame(&self) -> Rect {
            Rect::new(0.0, 0.0, 375.0, 667.0)
        }
        fn trigger_affordance(&self) -> Option<Rect> {
            None
        }
        fn set_trigger_alpha(&mut self, _alpha: f64) {}
        fn set_trigger_masked(&mut self, _masked: bool) {}
    }

    #[test]
    fn prelude_is_enough_to_open_a_menu() {
        let mut menu = PullUpMenu::new(
            Screen,
            TransitionConfig::default(),
            Box::new(|| Box::new(StaticContent::new(vec![MenuItem::new("id", "Title")]))),
        );
        menu.open();
        let mut events = Vec::new();
        for _ in 0..2000 {
            events.extend(menu.tick(Duration::from_millis(16)));
            if !events.is_empty() {
                break;
            }
        }
        assert_eq!(menu.state(), TransitionState::Opened);
        assert_eq!(events.len(), 1);
    }
}
