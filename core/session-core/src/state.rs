//! Runtime state shared by the clock tick and the prompt tick.
//!
//! A single mutex guards both the displayed state and the prompt latches, so the
//! prompt tick always evaluates a status map that the clock tick finished writing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::coaching::CoachingPrompt;
use crate::engine::{SessionEngine, SessionReading};
use crate::policy::SessionPromptPolicy;
use crate::types::{PerSession, SessionStatus, SessionWindow};

/// Display state for the session tracker. Derived only; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRuntimeState {
    pub updated_at: DateTime<Utc>,
    pub viewer_zone: String,
    pub local_time: String,
    pub session_local_time: PerSession<String>,
    pub status: PerSession<SessionStatus>,
    pub windows: PerSession<SessionWindow>,
    pub prompted: PerSession<bool>,
}

impl SessionRuntimeState {
    fn from_reading(reading: SessionReading, viewer_zone: String) -> Self {
        Self {
            updated_at: reading.at,
            viewer_zone,
            local_time: reading.local_time,
            session_local_time: reading.session_local_time,
            status: reading.status,
            windows: reading.windows,
            prompted: PerSession::default(),
        }
    }

    fn apply_reading(&mut self, reading: SessionReading) {
        self.updated_at = reading.at;
        self.local_time = reading.local_time;
        self.session_local_time = reading.session_local_time;
        self.status = reading.status;
        self.windows = reading.windows;
    }
}

struct RuntimeInner {
    state: SessionRuntimeState,
    policy: SessionPromptPolicy,
}

pub struct SessionRuntime<C: Clock = SystemClock> {
    engine: SessionEngine,
    clock: C,
    inner: Mutex<RuntimeInner>,
}

impl SessionRuntime<SystemClock> {
    pub fn with_system_clock(engine: SessionEngine) -> Self {
        Self::new(engine, SystemClock)
    }
}

impl<C: Clock> SessionRuntime<C> {
    /// Computes the initial state from the clock; every latch starts idle.
    pub fn new(engine: SessionEngine, clock: C) -> Self {
        let reading = engine.read(clock.now());
        let state = SessionRuntimeState::from_reading(reading, engine.viewer().label());
        Self {
            engine,
            clock,
            inner: Mutex::new(RuntimeInner {
                state,
                policy: SessionPromptPolicy::new(),
            }),
        }
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn lock(&self) -> MutexGuard<'_, RuntimeInner> {
        // Every write replaces whole fields, so a poisoned guard still holds a
        // consistent state.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Clock tick: recomputes times, windows and status from one instant.
    pub fn refresh_clock(&self) {
        let reading = self.engine.read(self.clock.now());
        let mut inner = self.lock();

        for (session, status) in reading.status.iter() {
            let previous = *inner.state.status.get(session);
            if previous != *status {
                debug!(session = %session, from = ?previous, to = ?status, "Session status changed");
            }
        }

        inner.state.apply_reading(reading);
    }

    /// Prompt tick: evaluates the latches against the last written status.
    pub fn check_prompts(&self) -> Vec<CoachingPrompt> {
        let mut inner = self.lock();
        let status = inner.state.status;
        let prompts = inner.policy.evaluate(&status);
        let prompted = inner.policy.latches().map(|_, latch| latch.is_prompted());
        inner.state.prompted = prompted;
        prompts
    }

    pub fn snapshot(&self) -> SessionRuntimeState {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::engine::ViewerZone;
    use crate::sessions::SessionTable;
    use crate::types::SessionName;
    use chrono::Duration;
    use std::sync::Arc;

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn runtime(start: &str) -> (Arc<FixedClock>, SessionRuntime<Arc<FixedClock>>) {
        let clock = Arc::new(FixedClock::new(at(start)));
        let engine = SessionEngine::new(SessionTable::standard(), ViewerZone::parse("UTC").unwrap());
        let runtime = SessionRuntime::new(engine, Arc::clone(&clock));
        (clock, runtime)
    }

    #[test]
    fn initial_state_is_computed_and_unprompted() {
        let (_, runtime) = runtime("2024-03-04T07:30:00Z");
        let state = runtime.snapshot();

        assert_eq!(state.local_time, "07:30:00");
        assert_eq!(state.viewer_zone, "UTC");
        assert_eq!(state.status.london, SessionStatus::Open);
        assert_eq!(state.status.new_york, SessionStatus::Closed);
        assert_eq!(state.prompted, PerSession::new(false, false, false));
    }

    #[test]
    fn prompt_tick_reads_status_written_by_clock_tick() {
        let (clock, runtime) = runtime("2024-03-04T11:59:58Z");
        runtime.check_prompts();
        assert!(!runtime.snapshot().prompted.new_york);

        clock.advance(Duration::seconds(2));
        // Status is stale until the clock tick runs.
        assert!(runtime
            .check_prompts()
            .iter()
            .all(|p| p.session != SessionName::NewYork));

        runtime.refresh_clock();
        let prompts = runtime.check_prompts();
        assert!(prompts.iter().any(|p| p.session == SessionName::NewYork));
        assert!(runtime.snapshot().prompted.new_york);
    }

    #[test]
    fn latch_resets_after_close_and_fires_next_day() {
        let (clock, runtime) = runtime("2024-03-04T07:00:00Z");
        let fired = runtime.check_prompts();
        assert!(fired.iter().any(|p| p.session == SessionName::London));

        clock.set(at("2024-03-04T12:00:00Z"));
        runtime.refresh_clock();
        let fired = runtime.check_prompts();
        assert!(fired.iter().all(|p| p.session != SessionName::London));

        clock.set(at("2024-03-04T16:00:00Z"));
        runtime.refresh_clock();
        runtime.check_prompts();
        assert!(!runtime.snapshot().prompted.london);

        clock.set(at("2024-03-05T07:00:05Z"));
        runtime.refresh_clock();
        let fired = runtime.check_prompts();
        assert!(fired.iter().any(|p| p.session == SessionName::London));
    }

    #[test]
    fn refresh_updates_session_local_times() {
        let (clock, runtime) = runtime("2024-01-15T07:00:00Z");
        clock.advance(Duration::seconds(1));
        runtime.refresh_clock();

        let state = runtime.snapshot();
        assert_eq!(state.session_local_time.tokyo, "16:00:01");
        assert_eq!(state.session_local_time.new_york, "02:00:01");
        assert_eq!(state.updated_at, at("2024-01-15T07:00:01Z"));
    }
}
