//! Sequence test: tap the numbered buttons 1 to 4 in order.
//!
//! The buttons sit in a shuffled 2x2 grid, stored row-major.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::scoring::sequence_score;

pub const TARGET_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequenceState {
    Idle,
    Running { started_at: DateTime<Utc>, next: u8 },
    Completed { elapsed_secs: f64, score: u8 },
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SequenceTap {
    Correct { next: u8 },
    Completed { score: u8 },
    Wrong,
    /// Test not running.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct SequenceTest {
    layout: [u8; TARGET_COUNT as usize],
    state: SequenceState,
}

impl Default for SequenceTest {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceTest {
    pub fn new() -> Self {
        Self {
            layout: [1, 2, 3, 4],
            state: SequenceState::Idle,
        }
    }

    pub fn layout(&self) -> [u8; TARGET_COUNT as usize] {
        self.layout
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn score(&self) -> Option<u8> {
        match self.state {
            SequenceState::Completed { score, .. } => Some(score),
            SequenceState::Failed => Some(0),
            _ => None,
        }
    }

    pub fn start<R: Rng>(&mut self, now: DateTime<Utc>, rng: &mut R) {
        let mut layout = [1, 2, 3, 4];
        layout.shuffle(rng);
        self.start_with_layout(now, layout);
    }

    pub fn start_with_layout(&mut self, now: DateTime<Utc>, layout: [u8; TARGET_COUNT as usize]) {
        self.layout = layout;
        self.state = SequenceState::Running {
            started_at: now,
            next: 1,
        };
    }

    pub fn tap(&mut self, target: u8, now: DateTime<Utc>) -> SequenceTap {
        let SequenceState::Running { started_at, next } = self.state else {
            return SequenceTap::Ignored;
        };
        if target != next {
            self.state = SequenceState::Failed;
            return SequenceTap::Wrong;
        }
        if next < TARGET_COUNT {
            self.state = SequenceState::Running {
                started_at,
                next: next + 1,
            };
            return SequenceTap::Correct { next: next + 1 };
        }

        let elapsed_secs = (now - started_at).num_milliseconds() as f64 / 1000.0;
        let score = sequence_score(elapsed_secs);
        self.state = SequenceState::Completed {
            elapsed_secs,
            score,
        };
        SequenceTap::Completed { score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 23, 0, 0).unwrap()
    }

    #[test]
    fn shuffled_layout_is_a_permutation() {
        let mut rng = Mcg128Xsl64::seed_from_u64(42);
        let mut test = SequenceTest::new();
        test.start(t0(), &mut rng);
        let mut sorted = test.layout();
        sorted.sort_unstable();
        assert_eq!(sorted, [1, 2, 3, 4]);
    }

    #[test]
    fn in_order_taps_complete() {
        let mut test = SequenceTest::new();
        test.start_with_layout(t0(), [3, 1, 4, 2]);
        assert_eq!(test.tap(1, t0()), SequenceTap::Correct { next: 2 });
        assert_eq!(test.tap(2, t0()), SequenceTap::Correct { next: 3 });
        assert_eq!(test.tap(3, t0()), SequenceTap::Correct { next: 4 });
        assert_eq!(
            test.tap(4, t0() + Duration::seconds(5)),
            SequenceTap::Completed { score: 50 }
        );
        assert_eq!(test.score(), Some(50));
    }

    #[test]
    fn wrong_tap_fails_with_zero() {
        let mut test = SequenceTest::new();
        test.start_with_layout(t0(), [1, 2, 3, 4]);
        test.tap(1, t0());
        assert_eq!(test.tap(3, t0()), SequenceTap::Wrong);
        assert_eq!(test.score(), Some(0));
        assert_eq!(test.tap(2, t0()), SequenceTap::Ignored);
    }
}
