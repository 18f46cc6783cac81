//! Core types shared by the engine, the prompt policy and every client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Session Names
// ═══════════════════════════════════════════════════════════════════════════════

/// One of the three major forex trading sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionName {
    Tokyo,
    London,
    NewYork,
}

impl SessionName {
    /// Fixed iteration order used everywhere sessions are listed.
    pub const ALL: [SessionName; 3] = [SessionName::Tokyo, SessionName::London, SessionName::NewYork];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokyo => "Tokyo",
            Self::London => "London",
            Self::NewYork => "NewYork",
        }
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tokyo" => Ok(Self::Tokyo),
            "london" => Ok(Self::London),
            "newyork" | "new_york" | "new-york" => Ok(Self::NewYork),
            other => Err(format!("Unknown session name: {}", other)),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Session Status
// ═══════════════════════════════════════════════════════════════════════════════

/// Derived status of a session at one instant. Recomputed every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    OpeningSoon,
    Closed,
}

impl SessionStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::OpeningSoon => "Opening Soon",
            Self::Closed => "Closed",
        }
    }

    pub fn is_open(self) -> bool {
        self == Self::Open
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Per-Session Map
// ═══════════════════════════════════════════════════════════════════════════════

/// A value for every session. Total by construction, so lookups cannot miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerSession<T> {
    #[serde(rename = "Tokyo")]
    pub tokyo: T,
    #[serde(rename = "London")]
    pub london: T,
    #[serde(rename = "NewYork")]
    pub new_york: T,
}

impl<T> PerSession<T> {
    pub fn new(tokyo: T, london: T, new_york: T) -> Self {
        Self {
            tokyo,
            london,
            new_york,
        }
    }

    pub fn from_fn(mut f: impl FnMut(SessionName) -> T) -> Self {
        Self {
            tokyo: f(SessionName::Tokyo),
            london: f(SessionName::London),
            new_york: f(SessionName::NewYork),
        }
    }

    pub fn get(&self, name: SessionName) -> &T {
        match name {
            SessionName::Tokyo => &self.tokyo,
            SessionName::London => &self.london,
            SessionName::NewYork => &self.new_york,
        }
    }

    pub fn get_mut(&mut self, name: SessionName) -> &mut T {
        match name {
            SessionName::Tokyo => &mut self.tokyo,
            SessionName::London => &mut self.london,
            SessionName::NewYork => &mut self.new_york,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SessionName, &T)> {
        SessionName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(SessionName, &T) -> U) -> PerSession<U> {
        PerSession::from_fn(|name| f(name, self.get(name)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Display Types
// ═══════════════════════════════════════════════════════════════════════════════

/// A session's UTC window rendered in the viewer's zone as `HH:mm`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionWindow {
    pub open_local: String,
    pub close_local: String,
}

impl fmt::Display for SessionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} (Local)", self.open_local, self.close_local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_name_parses_common_spellings() {
        assert_eq!("Tokyo".parse::<SessionName>(), Ok(SessionName::Tokyo));
        assert_eq!(" london ".parse::<SessionName>(), Ok(SessionName::London));
        assert_eq!("new_york".parse::<SessionName>(), Ok(SessionName::NewYork));
        assert_eq!("NewYork".parse::<SessionName>(), Ok(SessionName::NewYork));
        assert!("sydney".parse::<SessionName>().is_err());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SessionStatus::OpeningSoon).unwrap();
        assert_eq!(json, "\"opening_soon\"");
    }

    #[test]
    fn test_per_session_serializes_by_session_name() {
        let map = PerSession::new(1, 2, 3);
        let json = serde_json::to_value(map).unwrap();
        assert_eq!(json["Tokyo"], 1);
        assert_eq!(json["London"], 2);
        assert_eq!(json["NewYork"], 3);
    }

    #[test]
    fn test_per_session_get_mut_only_touches_one_entry() {
        let mut map = PerSession::new(false, false, false);
        *map.get_mut(SessionName::London) = true;
        assert_eq!(map, PerSession::new(false, true, false));
    }

    #[test]
    fn test_window_display() {
        let window = SessionWindow {
            open_local: "07:00".to_string(),
            close_local: "16:00".to_string(),
        };
        assert_eq!(window.to_string(), "07:00 - 16:00 (Local)");
    }
}
