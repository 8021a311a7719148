//! Send-time gating: ratings, the risk gate and the hard-warning cooldown.

mod cooldown;
mod flow;
pub mod rating;
mod risk_gate;

pub use cooldown::{Cooldown, CooldownState};
pub use flow::{FlowStage, SendDecision, SendFlow};
pub use rating::{
    rated_contacts, ContactDirectory, ContactEntry, ContactRating, MemoryRatingStore, Rating,
    RatingStore,
};
pub use risk_gate::{Action, GateConfig, RiskGate, DEFAULT_CAUTION_MESSAGE, DEFAULT_COOLDOWN_SECS};
