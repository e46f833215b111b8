//! Time ranges, calendar months and day-boundary helpers.

use std::fmt;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while building time values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("time range must not end before it starts ({from} > {to})")]
    Inverted {
        from: NaiveDateTime,
        to: NaiveDateTime,
    },
    #[error("invalid month {year}-{number:02}")]
    InvalidMonth { year: i32, number: u32 },
    #[error("count must be positive")]
    EmptyCount,
    #[error("date arithmetic left the supported calendar")]
    OutOfCalendar,
}

/// First instant of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last representable instant of `date` (23:59:59.999999999).
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    // NaiveTime subtraction wraps around midnight.
    date.and_time(NaiveTime::MIN - Duration::nanoseconds(1))
}

/// Number of days in the given calendar month.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, TimeError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(TimeError::InvalidMonth { year, number: month })?;
    let first_next = first
        .checked_add_months(Months::new(1))
        .ok_or(TimeError::OutOfCalendar)?;
    Ok((first_next - first).num_days() as u32)
}

/// Moves `date` by whole calendar months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: i32) -> Result<NaiveDate, TimeError> {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or(TimeError::OutOfCalendar)
}

/// Pair of instants describing a window of time. `from <= to` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawTimeRange {
    from: NaiveDateTime,
    to: NaiveDateTime,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = TimeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        TimeRange::new(raw.from, raw.to)
    }
}

impl TimeRange {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Result<Self, TimeError> {
        if from > to {
            return Err(TimeError::Inverted { from, to });
        }
        Ok(Self { from, to })
    }

    /// Range between two instants in whichever order they are given.
    pub fn spanning(a: NaiveDateTime, b: NaiveDateTime) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    /// Covers whole days: start of `first` through end of `last`.
    pub fn for_days(first: NaiveDate, last: NaiveDate) -> Result<Self, TimeError> {
        Self::new(start_of_day(first), end_of_day(last))
    }

    pub fn from(&self) -> NaiveDateTime {
        self.from
    }

    pub fn to(&self) -> NaiveDateTime {
        self.to
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.from && instant <= self.to
    }

    /// Whole calendar days between the first and the last date of the range.
    pub fn length_days(&self) -> i64 {
        (self.to.date() - self.from.date()).num_days()
    }

    /// Moves both bounds by `days` (negative moves backwards).
    pub fn shift_days(&self, days: i64) -> Result<Self, TimeError> {
        let delta = Duration::try_days(days).ok_or(TimeError::OutOfCalendar)?;
        let from = self
            .from
            .checked_add_signed(delta)
            .ok_or(TimeError::OutOfCalendar)?;
        let to = self
            .to
            .checked_add_signed(delta)
            .ok_or(TimeError::OutOfCalendar)?;
        Self::new(from, to)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {}",
            self.from.format("%Y-%m-%d %H:%M"),
            self.to.format("%Y-%m-%d %H:%M")
        )
    }
}

/// Calendar units used by "in the last N units" selections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    /// Moves `date` by `amount` units; month and year steps clamp the day.
    pub fn add_to(self, date: NaiveDate, amount: i32) -> Result<NaiveDate, TimeError> {
        let amount = i64::from(amount);
        match self {
            TimeUnit::Day => Duration::try_days(amount)
                .and_then(|delta| date.checked_add_signed(delta))
                .ok_or(TimeError::OutOfCalendar),
            TimeUnit::Week => Duration::try_weeks(amount)
                .and_then(|delta| date.checked_add_signed(delta))
                .ok_or(TimeError::OutOfCalendar),
            TimeUnit::Month => add_months(date, amount as i32),
            TimeUnit::Year => {
                let months = amount
                    .checked_mul(12)
                    .and_then(|months| i32::try_from(months).ok())
                    .ok_or(TimeError::OutOfCalendar)?;
                add_months(date, months)
            }
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimeUnit::Day => "day",
            TimeUnit::Week => "week",
            TimeUnit::Month => "month",
            TimeUnit::Year => "year",
        };
        f.write_str(label)
    }
}

/// Calendar month identifier (year + month number 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMonth")]
pub struct Month {
    year: i32,
    number: u32,
}

#[derive(Deserialize)]
struct RawMonth {
    year: i32,
    number: u32,
}

impl TryFrom<RawMonth> for Month {
    type Error = TimeError;

    fn try_from(raw: RawMonth) -> Result<Self, Self::Error> {
        Month::new(raw.year, raw.number)
    }
}

impl Month {
    pub fn new(year: i32, number: u32) -> Result<Self, TimeError> {
        if NaiveDate::from_ymd_opt(year, number, 1).is_none() {
            return Err(TimeError::InvalidMonth { year, number });
        }
        Ok(Self { year, number })
    }

    /// Month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            number: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn first_day(&self) -> Result<NaiveDate, TimeError> {
        self.day_clamped(1)
    }

    pub fn last_day(&self) -> Result<NaiveDate, TimeError> {
        self.day_clamped(31)
    }

    pub fn days(&self) -> Result<u32, TimeError> {
        days_in_month(self.year, self.number)
    }

    /// Date for `day` in this month, clamped to the month's last day.
    pub fn day_clamped(&self, day: u32) -> Result<NaiveDate, TimeError> {
        let day = day.clamp(1, self.days()?);
        NaiveDate::from_ymd_opt(self.year, self.number, day).ok_or(TimeError::InvalidMonth {
            year: self.year,
            number: self.number,
        })
    }

    pub fn next(&self) -> Self {
        if self.number == 12 {
            Self {
                year: self.year + 1,
                number: 1,
            }
        } else {
            Self {
                year: self.year,
                number: self.number + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.number == 1 {
            Self {
                year: self.year - 1,
                number: 12,
            }
        } else {
            Self {
                year: self.year,
                number: self.number - 1,
            }
        }
    }

    /// The whole calendar month as a range.
    pub fn range(&self) -> Result<TimeRange, TimeError> {
        TimeRange::for_days(self.first_day()?, self.last_day()?)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.number)
    }
}
