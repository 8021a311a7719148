//! Sobriety mini-game scoring.
//!
//! Each test maps its measurement onto 0-100 with a clamped linear
//! function. The composite is the integer mean of the three scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tilt readings are damped before scoring.
pub const TILT_DAMPING: f64 = 0.7;

const REACTION_BEST_SECS: f64 = 0.2;
const REACTION_SPAN_SECS: f64 = 0.8;
const SEQUENCE_BEST_SECS: f64 = 2.0;
const SEQUENCE_SPAN_SECS: f64 = 6.0;
const BALANCE_SPAN: f64 = 1.5;

/// `100 * (1 - (value - best) / span)`, rounded and clamped to 0-100.
/// NaN and infinities score 0.
fn linear_score(value: f64, best: f64, span: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    let raw = (100.0 * (1.0 - (value - best) / span)).round();
    raw.clamp(0.0, 100.0) as u8
}

/// 0.2 s or faster scores 100, 1.0 s or slower scores 0.
pub fn reaction_score(reaction_secs: f64) -> u8 {
    linear_score(reaction_secs, REACTION_BEST_SECS, REACTION_SPAN_SECS)
}

/// 2 s or faster scores 100, 8 s or slower scores 0.
pub fn sequence_score(elapsed_secs: f64) -> u8 {
    linear_score(elapsed_secs, SEQUENCE_BEST_SECS, SEQUENCE_SPAN_SECS)
}

/// Perfectly still scores 100, a damped tilt of 1.5 or more scores 0.
pub fn balance_score(max_tilt: f64) -> u8 {
    linear_score(max_tilt, 0.0, BALANCE_SPAN)
}

/// Damped magnitude of a two-axis tilt reading.
pub fn tilt_magnitude(x: f64, y: f64) -> f64 {
    (x.abs().powi(2) + y.abs().powi(2)).sqrt() * TILT_DAMPING
}

/// Outcome band for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// 80-100
    Alert,
    /// 60-79
    SomewhatSlow,
    /// 0-59
    SignificantlyImpaired,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Tier::Alert
        } else if score >= 60 {
            Tier::SomewhatSlow
        } else {
            Tier::SignificantlyImpaired
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Tier::Alert => "You seem to be fully alert!",
            Tier::SomewhatSlow => "Your reactions are somewhat slow. Take care!",
            Tier::SignificantlyImpaired => {
                "Your reactions appear significantly impaired. Please don't drive or text!"
            }
        }
    }
}

impl From<u8> for Tier {
    fn from(score: u8) -> Self {
        Tier::from_score(score)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Integer mean of the three test scores, and its tier.
pub fn composite(scores: [u8; 3]) -> (u8, Tier) {
    let sum: u16 = scores.iter().map(|&s| u16::from(s)).sum();
    let score = (sum / 3) as u8;
    (score, Tier::from_score(score))
}
