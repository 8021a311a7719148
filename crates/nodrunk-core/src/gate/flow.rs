//! The user's side of a gated send.
//!
//! [`SendFlow`] takes the gate's [`Action`] and tracks what the compose
//! screen is showing until the message is either sent or abandoned.
//! Nothing here sends on its own: every path to [`FlowStage::Sent`] other
//! than `Allow` goes through [`SendFlow::confirm`].

use serde::{Deserialize, Serialize};

use super::cooldown::Cooldown;
use super::risk_gate::Action;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStage {
    Ready,
    AwaitingConfirmation,
    CoolingDown,
    Sent,
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendDecision {
    Send,
    /// Not allowed yet (cooldown running) or already handled.
    Blocked,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct SendFlow {
    action: Action,
    cooldown: Option<Cooldown>,
    stage: FlowStage,
}

impl SendFlow {
    pub fn new(action: Action) -> Self {
        let cooldown = match &action {
            Action::HardWarn { cooldown_secs } => Some(Cooldown::new(*cooldown_secs)),
            _ => None,
        };
        Self {
            action,
            cooldown,
            stage: FlowStage::Ready,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    pub fn cooldown(&self) -> Option<&Cooldown> {
        self.cooldown.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.stage, FlowStage::Sent | FlowStage::Aborted)
    }

    /// Present whatever the action calls for. `Allow` sends right away.
    pub fn start(&mut self) -> Option<Event> {
        if self.stage != FlowStage::Ready {
            return None;
        }
        match &self.action {
            Action::Allow => {
                self.stage = FlowStage::Sent;
                Some(Event::MessageSent)
            }
            Action::SoftWarn { .. } => {
                self.stage = FlowStage::AwaitingConfirmation;
                None
            }
            Action::HardWarn { .. } => {
                let cooldown = self.cooldown.as_mut()?;
                let event = cooldown.show();
                self.stage = if cooldown.can_proceed() {
                    FlowStage::AwaitingConfirmation
                } else {
                    FlowStage::CoolingDown
                };
                event
            }
        }
    }

    /// One second of the hard-warning countdown.
    pub fn tick(&mut self) -> Option<Event> {
        if self.stage != FlowStage::CoolingDown {
            return None;
        }
        let cooldown = self.cooldown.as_mut()?;
        let event = cooldown.tick();
        if cooldown.can_proceed() {
            self.stage = FlowStage::AwaitingConfirmation;
        }
        event
    }

    pub fn confirm(&mut self) -> SendDecision {
        match self.stage {
            FlowStage::AwaitingConfirmation => {
                self.stage = FlowStage::Sent;
                SendDecision::Send
            }
            FlowStage::Aborted => SendDecision::Aborted,
            FlowStage::Ready | FlowStage::CoolingDown | FlowStage::Sent => SendDecision::Blocked,
        }
    }

    pub fn cancel(&mut self) -> Option<Event> {
        if self.is_finished() {
            return None;
        }
        self.stage = FlowStage::Aborted;
        match self.cooldown.as_mut() {
            Some(cooldown) => cooldown.cancel(),
            None => Some(Event::WarningCancelled { remaining: 0 }),
        }
    }
}
