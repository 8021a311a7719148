//! Balance test: hold the device still while tilt is sampled.

use chrono::{DateTime, Duration, Utc};

use super::scoring::{balance_score, tilt_magnitude};
use super::{clamp_secs, secs_to_duration, GameConfig, MIN_SAMPLE_INTERVAL_SECS};

/// Device-motion source. Returns the current `(x, y)` tilt reading.
pub trait TiltSampler {
    fn tilt(&mut self) -> (f64, f64);
}

impl<F: FnMut() -> (f64, f64)> TiltSampler for F {
    fn tilt(&mut self) -> (f64, f64) {
        self()
    }
}

#[derive(Debug, Clone)]
pub struct BalanceTest {
    window: Duration,
    sample_interval_secs: f64,
    started_at: Option<DateTime<Utc>>,
    max_tilt: f64,
    samples: u32,
    finished: bool,
}

impl BalanceTest {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            window: secs_to_duration(config.balance_window_secs),
            sample_interval_secs: clamp_secs(config.balance_sample_interval_secs),
            started_at: None,
            max_tilt: 0.0,
            samples: 0,
            finished: false,
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.started_at = Some(now);
        self.max_tilt = 0.0;
        self.samples = 0;
        self.finished = false;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && !self.finished
    }

    /// The sampling window has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.started_at
            .is_some_and(|started| now - started >= self.window)
    }

    pub fn max_tilt(&self) -> f64 {
        self.max_tilt
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Record one reading; returns the running maximum.
    pub fn sample(&mut self, x: f64, y: f64) -> f64 {
        if self.is_running() {
            self.max_tilt = self.max_tilt.max(tilt_magnitude(x, y));
            self.samples += 1;
        }
        self.max_tilt
    }

    /// Stop sampling and score the worst tilt seen.
    pub fn finish(&mut self) -> Option<u8> {
        self.started_at?;
        self.finished = true;
        Some(balance_score(self.max_tilt))
    }

    /// Samples needed to cover the window at the configured interval.
    pub fn sample_count(&self) -> u32 {
        let window_secs = self.window.num_milliseconds() as f64 / 1000.0;
        if self.sample_interval_secs > 0.0 {
            let interval = self.sample_interval_secs.max(MIN_SAMPLE_INTERVAL_SECS);
            (window_secs / interval).round().max(1.0) as u32
        } else {
            1
        }
    }

    /// Run a full window against `sampler` without waiting between reads.
    pub fn sample_window<T: TiltSampler + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        sampler: &mut T,
    ) -> u8 {
        self.start(now);
        for _ in 0..self.sample_count() {
            let (x, y) = sampler.tilt();
            self.sample(x, y);
        }
        self.finish().unwrap_or(0)
    }
}
