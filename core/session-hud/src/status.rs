//! `fx-hud status`: one snapshot, printed as a table or JSON.

use chrono::{DateTime, Utc};
use fx_session_core::{FixedClock, RuntimeConfig, SessionName, SessionRuntime, SessionRuntimeState};

use crate::error::Result;

pub fn run(config: &RuntimeConfig, at: Option<DateTime<Utc>>, json: bool) -> Result<()> {
    let engine = crate::build_engine(config)?;
    let now = at.unwrap_or_else(Utc::now);
    let runtime = SessionRuntime::new(engine, FixedClock::new(now));
    let state = runtime.snapshot();

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", render_table(&state));
    }
    Ok(())
}

pub fn render_table(state: &SessionRuntimeState) -> String {
    let mut out = format!("Local time: {} ({})\n", state.local_time, state.viewer_zone);
    for session in SessionName::ALL {
        out.push_str(&format!(
            "{:<8} {:<22} {:>8}  {}\n",
            session.as_str(),
            state.windows.get(session).to_string(),
            state.session_local_time.get(session),
            state.status.get(session).label(),
        ));
    }
    out
}
