//! Static session definitions and the validated session table.
//!
//! Windows are whole UTC hours and must open and close on the same UTC day.
//! Sessions that wrap past midnight UTC are rejected here rather than being
//! classified incorrectly later.

use chrono_tz::Tz;
use std::collections::HashSet;

use crate::error::{Result, SessionError};
use crate::types::{PerSession, SessionName};

/// UTC trading window and home timezone of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionDefinition {
    pub name: SessionName,
    /// Opening hour in UTC (inclusive), 0–23
    pub utc_open: u8,
    /// Closing hour in UTC (exclusive), 0–23
    pub utc_close: u8,
    pub timezone: Tz,
}

impl SessionDefinition {
    pub fn validate(&self) -> Result<()> {
        for hour in [self.utc_open, self.utc_close] {
            if hour > 23 {
                return Err(SessionError::HourOutOfRange {
                    session: self.name,
                    hour,
                });
            }
        }
        if self.utc_open >= self.utc_close {
            return Err(SessionError::InvalidSessionWindow {
                session: self.name,
                utc_open: self.utc_open,
                utc_close: self.utc_close,
            });
        }
        Ok(())
    }
}

pub const FOREX_SESSIONS: [SessionDefinition; 3] = [
    SessionDefinition {
        name: SessionName::Tokyo,
        utc_open: 0,
        utc_close: 9,
        timezone: chrono_tz::Asia::Tokyo,
    },
    SessionDefinition {
        name: SessionName::London,
        utc_open: 7,
        utc_close: 16,
        timezone: chrono_tz::Europe::London,
    },
    SessionDefinition {
        name: SessionName::NewYork,
        utc_open: 12,
        utc_close: 21,
        timezone: chrono_tz::America::New_York,
    },
];

/// Exactly one validated definition per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTable {
    definitions: PerSession<SessionDefinition>,
}

impl SessionTable {
    /// The built-in Tokyo / London / New York table.
    pub fn standard() -> Self {
        let [tokyo, london, new_york] = FOREX_SESSIONS;
        Self {
            definitions: PerSession::new(tokyo, london, new_york),
        }
    }

    pub fn from_definitions(definitions: Vec<SessionDefinition>) -> Result<Self> {
        if definitions.len() != SessionName::ALL.len() {
            return Err(SessionError::SessionCount(definitions.len()));
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            definition.validate()?;
            if !seen.insert(definition.name) {
                return Err(SessionError::DuplicateSession(definition.name));
            }
        }

        let find = |name: SessionName| {
            definitions
                .iter()
                .find(|d| d.name == name)
                .copied()
                .ok_or(SessionError::MissingSession(name))
        };

        Ok(Self {
            definitions: PerSession::new(
                find(SessionName::Tokyo)?,
                find(SessionName::London)?,
                find(SessionName::NewYork)?,
            ),
        })
    }

    pub fn get(&self, name: SessionName) -> &SessionDefinition {
        self.definitions.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionDefinition> {
        self.definitions.iter().map(|(_, definition)| definition)
    }
}

impl Default for SessionTable {
    fn default() -> Self {
        Self::standard()
    }
}
