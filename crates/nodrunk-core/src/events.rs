use serde::{Deserialize, Serialize};

use crate::game::Tier;

/// State changes reported by the warning flow and the mini-game.
/// Hosts render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A hard warning was presented and its countdown started.
    WarningShown {
        cooldown_secs: u32,
    },
    CooldownTick {
        remaining: u32,
    },
    /// The proceed control is now enabled.
    CooldownExpired,
    /// The user backed out; `remaining` is what was left on the countdown.
    WarningCancelled {
        remaining: u32,
    },
    MessageSent,
    GameFinished {
        composite: u8,
        tier: Tier,
    },
}
