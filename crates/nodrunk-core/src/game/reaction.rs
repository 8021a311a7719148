//! Reaction test: wait for the stimulus, then tap as fast as possible.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scoring::reaction_score;
use super::{clamp_secs, secs_to_duration, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReactionState {
    Idle,
    Waiting { fire_at: DateTime<Utc> },
    Stimulus { shown_at: DateTime<Utc> },
    /// Tapped before the stimulus.
    TooEarly,
    Reacted { reaction_secs: f64, score: u8 },
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ReactionTest {
    min_delay_secs: f64,
    max_delay_secs: f64,
    state: ReactionState,
}

impl ReactionTest {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            min_delay_secs: clamp_secs(config.reaction_min_delay_secs),
            max_delay_secs: clamp_secs(config.reaction_max_delay_secs),
            state: ReactionState::Idle,
        }
    }

    pub fn state(&self) -> ReactionState {
        self.state
    }

    /// Score once the test is over. Tapping early scores 0.
    pub fn score(&self) -> Option<u8> {
        match self.state {
            ReactionState::TooEarly => Some(0),
            ReactionState::Reacted { score, .. } => Some(score),
            _ => None,
        }
    }

    /// Start waiting with a random stimulus delay.
    pub fn arm<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) -> DateTime<Utc> {
        let (lo, hi) = (self.min_delay_secs, self.max_delay_secs);
        let delay_secs = if hi > lo {
            rng.gen_range(lo..=hi)
        } else {
            lo
        };
        self.arm_with_delay(now, secs_to_duration(delay_secs))
    }

    pub fn arm_with_delay(&mut self, now: DateTime<Utc>, delay: Duration) -> DateTime<Utc> {
        let fire_at = now + delay;
        self.state = ReactionState::Waiting { fire_at };
        fire_at
    }

    /// Show the stimulus once it is due. Returns true while it is showing.
    pub fn poll(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            ReactionState::Waiting { fire_at } if now >= fire_at => {
                self.state = ReactionState::Stimulus { shown_at: now };
                true
            }
            ReactionState::Stimulus { .. } => true,
            _ => false,
        }
    }

    /// Returns the score when the tap ends the test.
    pub fn tap(&mut self, now: DateTime<Utc>) -> Option<u8> {
        match self.state {
            ReactionState::Waiting { .. } => {
                self.state = ReactionState::TooEarly;
                Some(0)
            }
            ReactionState::Stimulus { shown_at } => {
                let reaction_secs = (now - shown_at).num_milliseconds() as f64 / 1000.0;
                let score = reaction_score(reaction_secs);
                self.state = ReactionState::Reacted {
                    reaction_secs,
                    score,
                };
                Some(score)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.state = ReactionState::Cancelled;
    }
}
