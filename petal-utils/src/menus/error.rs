//! Error taxonomy for menu sessions and page sources.

use thiserror::Error;

use super::action::Action;

/// Errors produced by menu controllers and page sources.
///
/// Only `OutOfRange`, `Render`, `Platform` and `AlreadyStarted` ever reach a
/// caller.
/// The others are contained inside the session that produced them and are
/// handed to logging or to the behavior's error hook.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("interaction from user {actor_id} ignored, menu belongs to {author_id}")]
    AuthorizationMismatch { actor_id: u64, author_id: u64 },

    #[error("menu action `{action}` failed: {source}")]
    HandlerFailure {
        action: Action,
        #[source]
        source: anyhow::Error,
    },

    #[error("menu action `{action}` panicked: {message}")]
    HandlerPanic { action: Action, message: String },

    #[error("menu finalize failed: {0}")]
    FinalizeFailure(#[source] anyhow::Error),

    #[error("page {index} is out of range (max pages: {max_pages})")]
    OutOfRange { index: usize, max_pages: usize },

    #[error("menu could not be rendered: {0}")]
    Render(#[source] anyhow::Error),

    #[error("menu platform request failed: {0}")]
    Platform(#[source] anyhow::Error),

    #[error("menu was already started")]
    AlreadyStarted,
}

impl MenuError {
    /// Static label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuthorizationMismatch { .. } => "authorization_mismatch",
            Self::HandlerFailure { .. } => "handler_failure",
            Self::HandlerPanic { .. } => "handler_panic",
            Self::FinalizeFailure(_) => "finalize_failure",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Render(_) => "render",
            Self::Platform(_) => "platform",
            Self::AlreadyStarted => "already_started",
        }
    }
}

/// Render a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
