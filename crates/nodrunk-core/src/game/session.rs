//! A full mini-game run: reaction, then sequence, then balance.

use serde::{Deserialize, Serialize};

use super::scoring::{composite, Tier};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Reaction,
    Sequence,
    Balance,
}

impl GameKind {
    pub const ORDER: [GameKind; 3] = [GameKind::Reaction, GameKind::Sequence, GameKind::Balance];

    pub fn name(self) -> &'static str {
        match self {
            GameKind::Reaction => "reaction",
            GameKind::Sequence => "sequence",
            GameKind::Balance => "balance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub reaction: u8,
    pub sequence: u8,
    pub balance: u8,
    pub composite: u8,
    pub tier: Tier,
}

impl GameReport {
    pub fn from_scores(reaction: u8, sequence: u8, balance: u8) -> Self {
        let (composite, tier) = composite([reaction, sequence, balance]);
        Self {
            reaction,
            sequence,
            balance,
            composite,
            tier,
        }
    }

    pub fn message(&self) -> &'static str {
        self.tier.message()
    }
}

/// Collects one score per test in the fixed order.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    scores: Vec<u8>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The test to play next, or `None` once all three are scored.
    pub fn current(&self) -> Option<GameKind> {
        GameKind::ORDER.get(self.scores.len()).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.current().is_none()
    }

    /// Record the score for [`Self::current`]. The last one yields
    /// [`Event::GameFinished`].
    pub fn record(&mut self, score: u8) -> Option<Event> {
        self.current()?;
        self.scores.push(score.min(100));
        let report = self.report()?;
        tracing::info!(
            composite = report.composite,
            tier = ?report.tier,
            "mini-game finished"
        );
        Some(Event::GameFinished {
            composite: report.composite,
            tier: report.tier,
        })
    }

    pub fn report(&self) -> Option<GameReport> {
        match self.scores.as_slice() {
            &[reaction, sequence, balance] => Some(GameReport::from_scores(reaction, sequence, balance)),
            _ => None,
        }
    }
}
