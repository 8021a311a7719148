//! Clock and calendar collaborators.
//!
//! Everything in the core takes time as an argument. These traits let the
//! host decide where "now" comes from and which local calendar turns an
//! instant into a minute-of-day and a day-of-week.

use chrono::{DateTime, Datelike, FixedOffset, Local, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// An instant reduced to what the window policy cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalTime {
    /// 0..=1439
    pub minute_of_day: u16,
    /// 1 = Sunday .. 7 = Saturday
    pub day_of_week: u8,
}

impl LocalTime {
    pub fn new(minute_of_day: u16, day_of_week: u8) -> Self {
        Self {
            minute_of_day,
            day_of_week,
        }
    }

    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            minute_of_day: (dt.hour() * 60 + dt.minute()) as u16,
            day_of_week: dt.weekday().number_from_sunday() as u8,
        }
    }
}

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Converts instants into local minute-of-day and day-of-week.
pub trait Calendar {
    fn local_time(&self, instant: DateTime<Utc>) -> LocalTime;

    fn minute_of_day(&self, instant: DateTime<Utc>) -> u16 {
        self.local_time(instant).minute_of_day
    }

    fn day_of_week(&self, instant: DateTime<Utc>) -> u8 {
        self.local_time(instant).day_of_week
    }
}

impl<C: Calendar + ?Sized> Calendar for &C {
    fn local_time(&self, instant: DateTime<Utc>) -> LocalTime {
        (**self).local_time(instant)
    }
}

impl<C: Calendar + ?Sized> Calendar for Box<C> {
    fn local_time(&self, instant: DateTime<Utc>) -> LocalTime {
        (**self).local_time(instant)
    }
}

/// The system's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCalendar;

impl Calendar for LocalCalendar {
    fn local_time(&self, instant: DateTime<Utc>) -> LocalTime {
        LocalTime::from_datetime(&instant.with_timezone(&Local))
    }
}

/// A fixed UTC offset, independent of the host timezone.
#[derive(Debug, Clone, Copy)]
pub struct FixedOffsetCalendar {
    offset: FixedOffset,
}

impl FixedOffsetCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Parse `+HH:MM`, `-HH:MM` or `Z`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidUtcOffset(value.to_string());
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("z") {
            return Ok(Self::utc());
        }

        let (sign, rest) = match trimmed.chars().next() {
            Some('+') => (1, &trimmed[1..]),
            Some('-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }

        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(Self::new)
            .ok_or_else(invalid)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Calendar for FixedOffsetCalendar {
    fn local_time(&self, instant: DateTime<Utc>) -> LocalTime {
        LocalTime::from_datetime(&instant.with_timezone(&self.offset))
    }
}
