//! # fx-session-core
//!
//! Forex session status engine for the trading-journal dashboard.
//!
//! Answers three questions at any instant:
//!
//! - Is Tokyo / London / New York `open`, `opening_soon`, or `closed`?
//! - What time is it locally, and in each session's home zone?
//! - Has the coaching prompt for the current open interval been shown yet?
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. The [`Ticker`] drives the runtime from two
//!   plain threads.
//! - **Pure engine**: [`classify_session`] and the formatters depend only on the
//!   instant passed in and the static session table.
//! - **Single lock**: [`SessionRuntime`] guards display state and prompt latches
//!   with one mutex.
//! - **Fail fast on config**: Bad session tables or config files are rejected at
//!   startup; ticks never fail.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fx_session_core::{SessionEngine, SessionRuntime, Ticker, LogSink};
//!
//! let runtime = Arc::new(SessionRuntime::with_system_clock(SessionEngine::default()));
//! let ticker = Ticker::spawn(runtime.clone(), Arc::new(LogSink), Default::default())?;
//! let state = runtime.snapshot();
//! ```

pub mod clock;
pub mod coaching;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod sessions;
pub mod state;
pub mod ticker;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use coaching::{coaching_tip, CoachingPrompt};
pub use config::{load_config, RuntimeConfig};
pub use engine::{
    classify_session, convert_utc_hour, format_local_time, format_session_window_local,
    format_zone_time, SessionEngine, SessionReading, TimeFormat, ViewerZone,
    OPENING_SOON_LEAD_MINUTES,
};
pub use error::{Result, SessionError};
pub use policy::{next_latch, LatchTransition, PromptLatch, SessionPromptPolicy};
pub use sessions::{SessionDefinition, SessionTable, FOREX_SESSIONS};
pub use state::{SessionRuntime, SessionRuntimeState};
pub use ticker::{ChannelSink, LogSink, PromptSink, Ticker, TickerConfig};
pub use types::{PerSession, SessionName, SessionStatus, SessionWindow};
