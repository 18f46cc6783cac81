//! Errors surfaced by the fx-hud binary.

use fx_session_core::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum HudError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Terminal error: {context}: {source}")]
    Terminal {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install Ctrl-C handler: {0}")]
    Signal(String),

    #[error("Failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HudError>;

pub(crate) fn terminal(context: &'static str) -> impl FnOnce(std::io::Error) -> HudError {
    move |source| HudError::Terminal { context, source }
}
