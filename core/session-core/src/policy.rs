//! SessionPromptPolicy - one coaching prompt per contiguous open interval.
//!
//! ```text
//! latch     status      next      event
//! Idle      open        Prompted  fire prompt
//! Prompted  not open    Idle      (reset only)
//! *         *           unchanged none
//! ```
//!
//! Each session has its own latch. Dismissing a prompt on screen never resets it;
//! only observing the session outside its open window does.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coaching::CoachingPrompt;
use crate::types::{PerSession, SessionName, SessionStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptLatch {
    /// No prompt since the session last closed.
    #[default]
    Idle,
    /// Prompt already shown for the current open interval.
    Prompted,
}

impl PromptLatch {
    pub fn is_prompted(self) -> bool {
        self == Self::Prompted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchTransition {
    Fire,
    Reset,
    Hold,
}

impl LatchTransition {
    pub fn apply(self, latch: PromptLatch) -> PromptLatch {
        match self {
            Self::Fire => PromptLatch::Prompted,
            Self::Reset => PromptLatch::Idle,
            Self::Hold => latch,
        }
    }
}

pub fn next_latch(latch: PromptLatch, status: SessionStatus) -> LatchTransition {
    match (latch, status.is_open()) {
        (PromptLatch::Idle, true) => LatchTransition::Fire,
        (PromptLatch::Prompted, false) => LatchTransition::Reset,
        _ => LatchTransition::Hold,
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionPromptPolicy {
    latches: PerSession<PromptLatch>,
}

impl SessionPromptPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latches(&self) -> &PerSession<PromptLatch> {
        &self.latches
    }

    pub fn is_prompted(&self, session: SessionName) -> bool {
        self.latches.get(session).is_prompted()
    }

    /// Applies one observation per session; returns the prompts to display.
    pub fn evaluate(&mut self, status: &PerSession<SessionStatus>) -> Vec<CoachingPrompt> {
        let mut prompts = Vec::new();

        for session in SessionName::ALL {
            let latch = self.latches.get_mut(session);
            let observed = *status.get(session);
            let transition = next_latch(*latch, observed);

            match transition {
                LatchTransition::Fire => {
                    info!(session = %session, "Session opened; coaching prompt fired");
                    prompts.push(CoachingPrompt::for_session(session));
                }
                LatchTransition::Reset => {
                    debug!(session = %session, status = ?observed, "Prompt latch reset");
                }
                LatchTransition::Hold => {}
            }

            *latch = transition.apply(*latch);
        }

        prompts
    }
}
