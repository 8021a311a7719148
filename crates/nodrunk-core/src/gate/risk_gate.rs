//! Send-time risk gate.
//!
//! Combines the active-window verdict with the stored rating for the
//! recipient:
//!
//! | rating    | outside window | inside window |
//! |-----------|----------------|---------------|
//! | none (0)  | Allow          | Allow         |
//! | caution   | Allow          | SoftWarn      |
//! | high risk | Allow          | HardWarn(N)   |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rating::{Rating, RatingStore};
use crate::clock::{Calendar, LocalCalendar};
use crate::error::Result;
use crate::window::{TimeRange, TimeWindowPolicy};

pub const DEFAULT_COOLDOWN_SECS: u32 = 10;

pub const DEFAULT_CAUTION_MESSAGE: &str = "You're attempting to send a message during your \
designated cautionary hours. Are you sure you want to proceed?";

/// Gate configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u32,
    #[serde(default = "default_caution_message")]
    pub caution_message: String,
}

fn default_cooldown_secs() -> u32 {
    DEFAULT_COOLDOWN_SECS
}
fn default_caution_message() -> String {
    DEFAULT_CAUTION_MESSAGE.to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            caution_message: default_caution_message(),
        }
    }
}

/// What the compose screen should do with an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Allow,
    /// Confirm/cancel dialog, no timer.
    SoftWarn { message: String },
    /// Warning whose proceed control unlocks after the countdown.
    HardWarn { cooldown_secs: u32 },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Allow => "allow",
            Action::SoftWarn { .. } => "soft_warn",
            Action::HardWarn { .. } => "hard_warn",
        }
    }
}

/// Decides the send-time action for a recipient.
///
/// Ranges are handed in already decoded; the gate never touches the
/// store for them.
pub struct RiskGate<R, C = LocalCalendar> {
    ratings: R,
    ranges: Vec<TimeRange>,
    policy: TimeWindowPolicy<C>,
    config: GateConfig,
}

impl<R: RatingStore, C: Calendar> RiskGate<R, C> {
    pub fn new(ratings: R, ranges: Vec<TimeRange>, policy: TimeWindowPolicy<C>) -> Self {
        Self {
            ratings,
            ranges,
            policy,
            config: GateConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn policy(&self) -> &TimeWindowPolicy<C> {
        &self.policy
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn set_ranges(&mut self, ranges: Vec<TimeRange>) {
        self.ranges = ranges;
    }

    pub fn ratings(&self) -> &R {
        &self.ratings
    }

    pub fn rating(&self, contact_id: &str) -> Rating {
        self.ratings.rating(contact_id)
    }

    pub fn set_rating(&mut self, contact_id: &str, rating: Rating) -> Result<()> {
        self.ratings.set_rating(contact_id, rating)
    }

    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.policy.is_active(now, &self.ranges)
    }

    pub fn evaluate(&self, contact_id: &str, now: DateTime<Utc>) -> Action {
        let rating = self.ratings.rating(contact_id);
        let action = if rating == Rating::None || !self.is_active(now) {
            Action::Allow
        } else {
            match rating {
                Rating::Caution => Action::SoftWarn {
                    message: self.config.caution_message.clone(),
                },
                Rating::HighRisk => Action::HardWarn {
                    cooldown_secs: self.config.cooldown_secs,
                },
                Rating::None => Action::Allow,
            }
        };

        tracing::debug!(
            contact = contact_id,
            rating = rating.as_u8(),
            action = action.name(),
            "evaluated outgoing message"
        );
        action
    }
}
