//! Active-window evaluation.
//!
//! Ranges are independent of each other: the first range that contains
//! the local minute wins and no merging or precedence is applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::range::TimeRange;
use crate::clock::{Calendar, LocalCalendar, LocalTime};

/// Window configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Skip ranges whose repeat days do not include the current day.
    #[serde(default = "default_true")]
    pub honor_repeat_days: bool,
}

fn default_true() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            honor_repeat_days: true,
        }
    }
}

/// Decides whether an instant falls inside any configured range.
#[derive(Debug, Clone)]
pub struct TimeWindowPolicy<C = LocalCalendar> {
    calendar: C,
    honor_repeat_days: bool,
}

impl Default for TimeWindowPolicy<LocalCalendar> {
    fn default() -> Self {
        Self::new(LocalCalendar)
    }
}

impl<C: Calendar> TimeWindowPolicy<C> {
    /// Policy with day-of-week filtering enabled.
    pub fn new(calendar: C) -> Self {
        Self {
            calendar,
            honor_repeat_days: true,
        }
    }

    pub fn from_config(calendar: C, config: &WindowConfig) -> Self {
        Self::new(calendar).with_day_filter(config.honor_repeat_days)
    }

    /// Turn repeat-day filtering on or off. With filtering off every range
    /// applies every day regardless of its repeat set.
    pub fn with_day_filter(mut self, enabled: bool) -> Self {
        self.honor_repeat_days = enabled;
        self
    }

    pub fn is_active(&self, now: DateTime<Utc>, ranges: &[TimeRange]) -> bool {
        self.first_match(now, ranges).is_some()
    }

    /// The range that made `now` active, if any.
    pub fn first_match<'a>(
        &self,
        now: DateTime<Utc>,
        ranges: &'a [TimeRange],
    ) -> Option<&'a TimeRange> {
        self.first_match_at(self.calendar.local_time(now), ranges)
    }

    pub fn is_active_at(&self, local: LocalTime, ranges: &[TimeRange]) -> bool {
        self.first_match_at(local, ranges).is_some()
    }

    pub fn first_match_at<'a>(
        &self,
        local: LocalTime,
        ranges: &'a [TimeRange],
    ) -> Option<&'a TimeRange> {
        ranges.iter().find(|range| self.matches(range, local))
    }

    fn matches(&self, range: &TimeRange, local: LocalTime) -> bool {
        if self.honor_repeat_days && !range.applies_on(local.day_of_week) {
            return false;
        }
        range.contains_minute(local.minute_of_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedOffsetCalendar;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        // Wednesday
        Utc.with_ymd_and_hms(2025, 3, 12, hour, minute, 0).unwrap()
    }

    fn policy() -> TimeWindowPolicy<FixedOffsetCalendar> {
        TimeWindowPolicy::new(FixedOffsetCalendar::utc())
    }

    #[test]
    fn midnight_crossing_range() {
        let ranges = vec![TimeRange::from_minutes(22 * 60, 5 * 60)];
        let policy = policy();

        assert!(policy.is_active(at(23, 59), &ranges));
        assert!(policy.is_active(at(0, 0), &ranges));
        assert!(policy.is_active(at(5, 0), &ranges));
        assert!(policy.is_active(at(22, 0), &ranges));
        assert!(!policy.is_active(at(5, 1), &ranges));
        assert!(!policy.is_active(at(21, 59), &ranges));
    }

    #[test]
    fn same_day_range_is_inclusive() {
        let ranges = vec![TimeRange::from_minutes(9 * 60, 17 * 60)];
        let policy = policy();

        assert!(policy.is_active(at(9, 0), &ranges));
        assert!(policy.is_active(at(17, 0), &ranges));
        assert!(!policy.is_active(at(8, 59), &ranges));
        assert!(!policy.is_active(at(17, 1), &ranges));
    }

    #[test]
    fn empty_list_is_never_active() {
        let policy = policy();
        for hour in 0..24 {
            assert!(!policy.is_active(at(hour, 30), &[]));
        }
    }

    #[test]
    fn first_match_short_circuits_in_order() {
        let ranges = vec![
            TimeRange::from_minutes(60, 120).with_name("first"),
            TimeRange::from_minutes(90, 180).with_name("second"),
        ];
        let hit = policy().first_match(at(1, 45), &ranges).unwrap();
        assert_eq!(hit.name, "first");
        let hit = policy().first_match(at(2, 30), &ranges).unwrap();
        assert_eq!(hit.name, "second");
    }

    #[test]
    fn repeat_days_filter_can_be_disabled() {
        // Saturday only; 2025-03-12 is a Wednesday.
        let ranges = vec![TimeRange::from_minutes(0, 23 * 60).with_repeat_days([7])];
        assert!(!policy().is_active(at(12, 0), &ranges));
        assert!(policy().with_day_filter(false).is_active(at(12, 0), &ranges));
    }
}
