//! Sobriety mini-game.
//!
//! Three short tests measure reaction time, sequencing speed and hand
//! steadiness. The state machines here are driven by timestamps and
//! samples handed in by the host; none of them sleeps or spawns.

mod balance;
mod reaction;
mod scoring;
mod sequence;
mod session;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub use balance::{BalanceTest, TiltSampler};
pub use reaction::{ReactionState, ReactionTest};
pub use scoring::{
    balance_score, composite, reaction_score, sequence_score, tilt_magnitude, Tier, TILT_DAMPING,
};
pub use sequence::{SequenceState, SequenceTap, SequenceTest, TARGET_COUNT};
pub use session::{GameKind, GameReport, GameSession};

/// Upper bound for every configured game timing.
pub const MAX_TIMING_SECS: f64 = 60.0;

/// Shortest balance sampling interval honored.
pub const MIN_SAMPLE_INTERVAL_SECS: f64 = 0.01;

/// Game timing configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_reaction_min_delay_secs")]
    pub reaction_min_delay_secs: f64,
    #[serde(default = "default_reaction_max_delay_secs")]
    pub reaction_max_delay_secs: f64,
    #[serde(default = "default_balance_window_secs")]
    pub balance_window_secs: f64,
    #[serde(default = "default_balance_sample_interval_secs")]
    pub balance_sample_interval_secs: f64,
}

fn default_reaction_min_delay_secs() -> f64 {
    1.0
}
fn default_reaction_max_delay_secs() -> f64 {
    3.0
}
fn default_balance_window_secs() -> f64 {
    3.0
}
fn default_balance_sample_interval_secs() -> f64 {
    0.1
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            reaction_min_delay_secs: default_reaction_min_delay_secs(),
            reaction_max_delay_secs: default_reaction_max_delay_secs(),
            balance_window_secs: default_balance_window_secs(),
            balance_sample_interval_secs: default_balance_sample_interval_secs(),
        }
    }
}

impl GameConfig {
    /// Every timing must be finite and within `0..=MAX_TIMING_SECS`, and
    /// the reaction delay range must not be inverted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("game.reaction_min_delay_secs", self.reaction_min_delay_secs),
            ("game.reaction_max_delay_secs", self.reaction_max_delay_secs),
            ("game.balance_window_secs", self.balance_window_secs),
            ("game.balance_sample_interval_secs", self.balance_sample_interval_secs),
        ];
        for (key, secs) in fields {
            if !secs.is_finite() || !(0.0..=MAX_TIMING_SECS).contains(&secs) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("must be between 0 and {MAX_TIMING_SECS} seconds, got {secs}"),
                });
            }
        }
        if self.reaction_min_delay_secs > self.reaction_max_delay_secs {
            return Err(ConfigError::InvalidValue {
                key: "game.reaction_min_delay_secs".to_string(),
                message: "must not exceed game.reaction_max_delay_secs".to_string(),
            });
        }
        Ok(())
    }
}

/// Clamp a configured timing into `0..=MAX_TIMING_SECS`. NaN counts as 0.
fn clamp_secs(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, MAX_TIMING_SECS)
    }
}

fn secs_to_duration(secs: f64) -> Duration {
    Duration::try_milliseconds((clamp_secs(secs) * 1000.0).round() as i64)
        .unwrap_or_else(Duration::zero)
}
