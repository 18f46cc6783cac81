//! Error types for session-core operations.
//!
//! Ticks never fail. Everything here is raised at startup, either while
//! validating a session table or while loading configuration.

use std::path::PathBuf;

use crate::types::SessionName;

/// All errors that can occur in session-core operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    // ─────────────────────────────────────────────────────────────────────
    // Session Table Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Session {session} must open before it closes on the same UTC day (open {utc_open}:00, close {utc_close}:00)")]
    InvalidSessionWindow {
        session: SessionName,
        utc_open: u8,
        utc_close: u8,
    },

    #[error("Session {session} has an hour outside 0-23: {hour}")]
    HourOutOfRange { session: SessionName, hour: u8 },

    #[error("Session defined more than once: {0}")]
    DuplicateSession(SessionName),

    #[error("Session missing from table: {0}")]
    MissingSession(SessionName),

    #[error("Expected exactly 3 session definitions, got {0}")]
    SessionCount(usize),

    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Unknown IANA timezone: {0}")]
    UnknownTimezone(String),

    #[error("Configuration file malformed: {path}: {details}")]
    ConfigMalformed { path: PathBuf, details: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;
