//! Hard-warning cooldown.
//!
//! A tick-driven state machine: nothing in here owns a timer. The host
//! calls [`Cooldown::tick`] once per second for as long as the warning is
//! on screen and stops calling it when the screen goes away.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> CountingDown(N) -> CountingDown(N-1) -> ... -> CountingDown(1) -> Expired
//!   \____________________\_____________________________________\_______-> Cancelled
//! ```

use serde::{Deserialize, Serialize};

use super::flow::SendDecision;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CooldownState {
    Idle,
    CountingDown { remaining: u32 },
    /// Proceed is enabled. Sending still needs an explicit confirm.
    Expired,
    /// No further ticks have any effect.
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cooldown {
    duration_secs: u32,
    state: CooldownState,
    ticks: u32,
}

impl Cooldown {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            state: CooldownState::Idle,
            ticks: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CooldownState {
        self.state
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Ticks applied while counting down.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn remaining(&self) -> u32 {
        match self.state {
            CooldownState::Idle => self.duration_secs,
            CooldownState::CountingDown { remaining } => remaining,
            CooldownState::Expired => 0,
            CooldownState::Cancelled => self.duration_secs - self.ticks.min(self.duration_secs),
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.state == CooldownState::Expired
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.state, CooldownState::Expired | CooldownState::Cancelled)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Present the warning. Only valid from `Idle`.
    pub fn show(&mut self) -> Option<Event> {
        if self.state != CooldownState::Idle {
            return None;
        }
        self.state = if self.duration_secs == 0 {
            CooldownState::Expired
        } else {
            CooldownState::CountingDown {
                remaining: self.duration_secs,
            }
        };
        Some(Event::WarningShown {
            cooldown_secs: self.duration_secs,
        })
    }

    /// Advance one second.
    pub fn tick(&mut self) -> Option<Event> {
        let CooldownState::CountingDown { remaining } = self.state else {
            return None;
        };
        self.ticks += 1;
        if remaining <= 1 {
            self.state = CooldownState::Expired;
            Some(Event::CooldownExpired)
        } else {
            self.state = CooldownState::CountingDown {
                remaining: remaining - 1,
            };
            Some(Event::CooldownTick {
                remaining: remaining - 1,
            })
        }
    }

    /// Back out of the warning. Allowed from any state except `Cancelled`.
    pub fn cancel(&mut self) -> Option<Event> {
        if self.state == CooldownState::Cancelled {
            return None;
        }
        let remaining = self.remaining();
        self.state = CooldownState::Cancelled;
        Some(Event::WarningCancelled { remaining })
    }

    /// The user pressed proceed. Only an expired cooldown lets the message
    /// through; the cooldown itself never sends.
    pub fn proceed(&self) -> SendDecision {
        if self.can_proceed() {
            SendDecision::Send
        } else {
            SendDecision::Blocked
        }
    }
}
