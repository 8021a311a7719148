//! Active time ranges.
//!
//! A range is stored as two minute-of-day values with no date or timezone
//! attached. When `end <= start` the range crosses midnight and runs into
//! the next day; `end == start` is treated the same way.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::clock::MINUTES_PER_DAY;
use crate::error::ValidationError;

/// Day names indexed by repeat-day number (1 = Sunday).
const DAY_NAMES: [&str; 8] = ["", "Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Hour and minute on a 24h clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTimeOfDay(format!("{hour}:{minute}")));
        }
        Ok(Self { hour, minute })
    }

    /// Minutes past midnight, wrapped into a single day.
    pub fn from_minute_of_day(minute_of_day: u16) -> Self {
        let m = minute_of_day % MINUTES_PER_DAY;
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub fn minute_of_day(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

impl FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTimeOfDay(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// A user-configured active window.
///
/// Serialized in the canonical shared-store schema:
/// `{name, startMinuteOfDay, endMinuteOfDay, repeatDays}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    #[serde(default)]
    pub name: String,
    pub start_minute_of_day: u16,
    pub end_minute_of_day: u16,
    /// 1 = Sunday .. 7 = Saturday. Empty means every day.
    #[serde(default)]
    pub repeat_days: BTreeSet<u8>,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self::from_minutes(start.minute_of_day(), end.minute_of_day())
    }

    pub fn from_minutes(start_minute_of_day: u16, end_minute_of_day: u16) -> Self {
        Self {
            name: String::new(),
            start_minute_of_day,
            end_minute_of_day,
            repeat_days: BTreeSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_repeat_days(mut self, days: impl IntoIterator<Item = u8>) -> Self {
        self.repeat_days = days.into_iter().collect();
        self
    }

    pub fn start(&self) -> TimeOfDay {
        TimeOfDay::from_minute_of_day(self.start_minute_of_day)
    }

    pub fn end(&self) -> TimeOfDay {
        TimeOfDay::from_minute_of_day(self.end_minute_of_day)
    }

    /// `end <= start`, including the degenerate `end == start`.
    pub fn crosses_midnight(&self) -> bool {
        self.end_minute_of_day <= self.start_minute_of_day
    }

    /// Inclusive on both ends.
    pub fn contains_minute(&self, minute_of_day: u16) -> bool {
        let (s, e) = (self.start_minute_of_day, self.end_minute_of_day);
        if e > s {
            s <= minute_of_day && minute_of_day <= e
        } else {
            minute_of_day >= s || minute_of_day <= e
        }
    }

    /// Whether the range repeats on the given day (1 = Sunday).
    pub fn applies_on(&self, day_of_week: u8) -> bool {
        self.repeat_days.is_empty() || self.repeat_days.contains(&day_of_week)
    }

    /// Check a proposed range before it is added to the store.
    ///
    /// Same-day ranges need `start < end`; anything with `end <= start`
    /// is read as crossing midnight and is always accepted, so only the
    /// field bounds can fail here.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("startMinuteOfDay", self.start_minute_of_day),
            ("endMinuteOfDay", self.end_minute_of_day),
        ] {
            if value >= MINUTES_PER_DAY {
                return Err(ValidationError::MinuteOutOfRange { field, value });
            }
        }

        if let Some(&day) = self.repeat_days.iter().find(|d| !(1..=7).contains(*d)) {
            return Err(ValidationError::InvalidRepeatDay(day));
        }

        Ok(())
    }

    /// Short label for the repeat set, as shown in the range list.
    pub fn repeat_days_description(&self) -> String {
        if self.repeat_days.is_empty() {
            return "No repeat".to_string();
        }

        let weekdays: BTreeSet<u8> = (2..=6).collect();
        let weekends: BTreeSet<u8> = [1, 7].into_iter().collect();
        if self.repeat_days.len() == 7 {
            return "Every day".to_string();
        } else if self.repeat_days == weekdays {
            return "Weekdays".to_string();
        } else if self.repeat_days == weekends {
            return "Weekends".to_string();
        }

        self.repeat_days
            .iter()
            .filter_map(|&d| DAY_NAMES.get(d as usize).filter(|name| !name.is_empty()))
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.name.is_empty() {
            write!(f, "{}: ", self.name)?;
        }
        write!(f, "{} - {}", self.start(), self.end())
    }
}
