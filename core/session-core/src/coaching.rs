//! Coaching tips shown when a session opens.

use serde::Serialize;

use crate::types::SessionName;

pub fn coaching_tip(session: SessionName) -> &'static str {
    match session {
        SessionName::Tokyo => "Tokyo session is known for JPY pair movements. Watch for early momentum and potential range breakouts. Consider the impact of Asian market news.",
        SessionName::London => "London is the largest Forex market. High volatility, especially at the open and during overlaps. EUR, GBP, CHF pairs are active. Watch for major news releases.",
        SessionName::NewYork => "New York session overlaps with London, often leading to peak liquidity. USD pairs are key. Important US economic data releases can cause significant moves.",
    }
}

/// One-shot notification emitted when a session opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoachingPrompt {
    pub session: SessionName,
    pub tip: &'static str,
}

impl CoachingPrompt {
    pub fn for_session(session: SessionName) -> Self {
        Self {
            session,
            tip: coaching_tip(session),
        }
    }

    pub fn headline(&self) -> String {
        format!("{} Session Tip: {}", self.session, self.tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_session_has_a_distinct_tip() {
        let tips: Vec<_> = SessionName::ALL.iter().map(|s| coaching_tip(*s)).collect();
        assert!(tips.iter().all(|tip| !tip.is_empty()));
        assert_ne!(tips[0], tips[1]);
        assert_ne!(tips[1], tips[2]);
    }

    #[test]
    fn headline_prefixes_session_name() {
        let prompt = CoachingPrompt::for_session(SessionName::London);
        assert!(prompt.headline().starts_with("London Session Tip: London is the largest"));
    }
}
