#![forbid(unsafe_code)]

//! Error model and graceful fallback.
//!
//! # Design Principles
//!
//! 1. **No panics on the runtime path**: a missing precondition never aborts
//!    a transition.
//! 2. **Typed preconditions**: each missing precondition is a
//!    [`TransitionError`] variant so logs and tests can name it.
//! 3. **Fallback per variant**: [`TransitionError::fallback`] tells the
//!    caller what to do instead. Public operations resolve the fallback
//!    themselves and never hand these errors to the host.

use std::fmt;

use crate::panel::PanelId;

// ── Transition preconditions ───────────────────────────────────────────

/// A precondition that was not met while driving a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The host reported no trigger affordance at build time.
    MissingTrigger,
    /// An operation needed a panel and none is attached.
    MissingPanel,
    /// A deferred task referred to a panel that has since been replaced or
    /// detached.
    PanelGone { id: PanelId },
    /// The host is in its alternate presentation mode.
    PresentationBypassed,
    /// No live animation group: it already finished or was never built.
    GroupFinished,
    /// The group is not built yet because content is still preloading.
    Preloading,
    /// Content was still not realized after the preload budget.
    NotReady { attempts: u32 },
}

/// What to do instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Anchor traveling affordances at the bottom-center of the container.
    DefaultAnchor,
    /// Queue the request and apply it once the group exists.
    Defer,
    /// Ignore the request.
    NoOp,
    /// Build with whatever content is realized so far.
    ProceedUnready,
}

impl TransitionError {
    /// The fallback for this precondition.
    #[must_use]
    pub fn fallback(&self) -> Fallback {
        match self {
            Self::MissingTrigger => Fallback::DefaultAnchor,
            Self::MissingPanel | Self::PanelGone { .. } | Self::GroupFinished => Fallback::NoOp,
            Self::PresentationBypassed => Fallback::NoOp,
            Self::Preloading => Fallback::Defer,
            Self::NotReady { .. } => Fallback::ProceedUnready,
        }
    }

    /// Short label for tracing fields.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTrigger => "missing_trigger",
            Self::MissingPanel => "missing_panel",
            Self::PanelGone { .. } => "panel_gone",
            Self::PresentationBypassed => "presentation_bypassed",
            Self::GroupFinished => "group_finished",
            Self::Preloading => "preloading",
            Self::NotReady { .. } => "not_ready",
        }
    }

    /// Log the precondition and the chosen fallback, then return the fallback.
    pub(crate) fn resolve(self) -> Fallback {
        let fallback = self.fallback();
        tracing::debug!(error = self.kind(), ?fallback, "{self}");
        fallback
    }
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTrigger => write!(f, "host has no trigger affordance"),
            Self::MissingPanel => write!(f, "no panel attached"),
            Self::PanelGone { id } => write!(f, "panel {id} is gone"),
            Self::PresentationBypassed => {
                write!(f, "alternate presentation mode bypasses the transition")
            }
            Self::GroupFinished => write!(f, "no live animation group"),
            Self::Preloading => write!(f, "content is still preloading"),
            Self::NotReady { attempts } => {
                write!(f, "content not ready after {attempts} preload attempts")
            }
        }
    }
}

impl std::error::Error for TransitionError {}

// ── Configuration loading ──────────────────────────────────────────────

/// Errors that can occur when loading a transition configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "policy-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "policy-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "policy-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
