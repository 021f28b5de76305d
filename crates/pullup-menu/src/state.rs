#![forbid(unsafe_code)]

//! The panel's resting state.

/// Resting state of a panel. There is no in-between value: a transition in
/// progress is represented by a live animation group, not by this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionState {
    Opened,
    #[default]
    Closed,
}

impl TransitionState {
    /// The state a transition from `self` heads toward.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Opened => Self::Closed,
            Self::Closed => Self::Opened,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Opened)
    }
}
