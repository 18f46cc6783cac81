//! SessionStatusEngine - pure functions of the current instant and the session table.
//!
//! Every window is anchored to the UTC calendar day of `now`:
//!
//! ```text
//!   open - 30m        open                     close
//!      |-- opening_soon --|--------- open --------|---- closed ...
//!      [                  )[                      )
//! ```
//!
//! The one exception is the opening-soon lead for a session opening at 00:00 UTC,
//! which falls on the previous UTC day. When today's open has already passed, the
//! lead is measured against tomorrow's open instead.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::fmt;

use crate::error::{Result, SessionError};
use crate::sessions::{SessionDefinition, SessionTable};
use crate::types::{PerSession, SessionStatus, SessionWindow};

/// Minutes before the open during which a session reports `opening_soon`.
pub const OPENING_SOON_LEAD_MINUTES: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `HH:mm`
    HourMinute,
    /// `HH:mm:ss`
    HourMinuteSecond,
}

impl TimeFormat {
    fn pattern(self) -> &'static str {
        match self {
            Self::HourMinute => "%H:%M",
            Self::HourMinuteSecond => "%H:%M:%S",
        }
    }
}

/// The zone the viewer reads times in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// Whatever the host reports as its local zone.
    #[default]
    System,
    Named(Tz),
}

impl ViewerZone {
    pub fn parse(name: &str) -> Result<Self> {
        name.trim()
            .parse::<Tz>()
            .map(Self::Named)
            .map_err(|_| SessionError::UnknownTimezone(name.to_string()))
    }

    pub fn format(&self, instant: DateTime<Utc>, format: TimeFormat) -> String {
        match self {
            Self::System => format_local_time(instant, &Local, format),
            Self::Named(tz) => format_local_time(instant, tz, format),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::System => "Local".to_string(),
            Self::Named(tz) => tz.name().to_string(),
        }
    }
}

fn utc_hour_on(day: NaiveDate, hour: u8) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc() + Duration::hours(i64::from(hour))
}

pub fn classify_session(now: DateTime<Utc>, def: &SessionDefinition) -> SessionStatus {
    debug_assert!(def.validate().is_ok(), "unvalidated session definition");

    let today = now.date_naive();
    let open = utc_hour_on(today, def.utc_open);
    let close = utc_hour_on(today, def.utc_close);

    if open <= now && now < close {
        return SessionStatus::Open;
    }

    let next_open = if now < open {
        open
    } else {
        open + Duration::days(1)
    };
    let lead = Duration::minutes(OPENING_SOON_LEAD_MINUTES);
    if next_open - lead <= now && now < next_open {
        SessionStatus::OpeningSoon
    } else {
        SessionStatus::Closed
    }
}

pub fn format_local_time<Z>(now: DateTime<Utc>, zone: &Z, format: TimeFormat) -> String
where
    Z: TimeZone,
    Z::Offset: fmt::Display,
{
    now.with_timezone(zone).format(format.pattern()).to_string()
}

/// Current `HH:mm:ss` wall-clock time in an IANA zone.
pub fn format_zone_time(now: DateTime<Utc>, tz: Tz) -> String {
    format_local_time(now, &tz, TimeFormat::HourMinuteSecond)
}

/// Today's `utc_hour:00 UTC` rendered as `HH:mm` in the viewer's zone.
pub fn convert_utc_hour(now: DateTime<Utc>, utc_hour: u8, viewer: &ViewerZone) -> String {
    viewer.format(utc_hour_on(now.date_naive(), utc_hour), TimeFormat::HourMinute)
}

pub fn format_session_window_local(
    now: DateTime<Utc>,
    def: &SessionDefinition,
    viewer: &ViewerZone,
) -> SessionWindow {
    SessionWindow {
        open_local: convert_utc_hour(now, def.utc_open, viewer),
        close_local: convert_utc_hour(now, def.utc_close, viewer),
    }
}

/// Everything one clock tick displays, computed from a single instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReading {
    pub at: DateTime<Utc>,
    pub local_time: String,
    pub session_local_time: PerSession<String>,
    pub status: PerSession<SessionStatus>,
    pub windows: PerSession<SessionWindow>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionEngine {
    table: SessionTable,
    viewer: ViewerZone,
}

impl SessionEngine {
    pub fn new(table: SessionTable, viewer: ViewerZone) -> Self {
        Self { table, viewer }
    }

    pub fn table(&self) -> &SessionTable {
        &self.table
    }

    pub fn viewer(&self) -> &ViewerZone {
        &self.viewer
    }

    pub fn classify_all(&self, now: DateTime<Utc>) -> PerSession<SessionStatus> {
        PerSession::from_fn(|name| classify_session(now, self.table.get(name)))
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> String {
        self.viewer.format(now, TimeFormat::HourMinuteSecond)
    }

    pub fn session_local_times(&self, now: DateTime<Utc>) -> PerSession<String> {
        PerSession::from_fn(|name| format_zone_time(now, self.table.get(name).timezone))
    }

    pub fn windows(&self, now: DateTime<Utc>) -> PerSession<SessionWindow> {
        PerSession::from_fn(|name| format_session_window_local(now, self.table.get(name), &self.viewer))
    }

    pub fn read(&self, now: DateTime<Utc>) -> SessionReading {
        SessionReading {
            at: now,
            local_time: self.local_time(now),
            session_local_time: self.session_local_times(now),
            status: self.classify_all(now),
            windows: self.windows(now),
        }
    }
}
