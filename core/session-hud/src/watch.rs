//! `fx-hud watch`: headless session ticks with prompts on stdout.

use fx_session_core::{
    ChannelSink, PerSession, RuntimeConfig, SessionRuntime, SessionRuntimeState, SessionStatus,
    Ticker,
};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::error::{HudError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub fn run(config: &RuntimeConfig) -> Result<()> {
    let engine = crate::build_engine(config)?;
    let runtime = Arc::new(SessionRuntime::with_system_clock(engine));
    let (sink, prompts) = ChannelSink::new();

    let (stop_tx, stop_rx) = mpsc::channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .map_err(|err| HudError::Signal(err.to_string()))?;

    let ticker = Ticker::spawn(Arc::clone(&runtime), Arc::new(sink), config.ticker_config())?;

    let initial = runtime.snapshot();
    print!("{}", crate::status::render_table(&initial));
    let mut last_status = initial.status;

    loop {
        match stop_rx.recv_timeout(POLL_INTERVAL) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }

        for prompt in prompts.try_iter() {
            println!("{}", prompt.headline());
        }

        let state = runtime.snapshot();
        for line in status_changes(&last_status, &state) {
            println!("{}", line);
        }
        last_status = state.status;
    }

    info!("Stopping session watch");
    ticker.stop();
    Ok(())
}

fn status_changes(previous: &PerSession<SessionStatus>, state: &SessionRuntimeState) -> Vec<String> {
    state
        .status
        .iter()
        .filter(|(session, status)| previous.get(*session) != *status)
        .map(|(session, status)| format!("[{}] {} is now {}", state.local_time, session, status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use fx_session_core::{FixedClock, SessionEngine, SessionTable, ViewerZone};

    #[test]
    fn reports_only_sessions_that_changed() {
        let now = DateTime::parse_from_rfc3339("2024-03-04T07:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let engine = SessionEngine::new(SessionTable::standard(), ViewerZone::parse("UTC").unwrap());
        let state = SessionRuntime::new(engine, FixedClock::new(now)).snapshot();

        let previous = PerSession::new(
            SessionStatus::Open,
            SessionStatus::OpeningSoon,
            SessionStatus::Closed,
        );
        assert_eq!(
            status_changes(&previous, &state),
            vec!["[07:00:00] London is now Open".to_string()]
        );
    }
}
