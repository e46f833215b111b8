//! The closed set of period selections.

use std::fmt;

use chrono::{Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::time::{end_of_day, start_of_day, Month, TimeError, TimeRange, TimeUnit};

/// How far past "now" the all-time upper bound reaches.
pub const ALL_TIME_HORIZON_YEARS: u32 = 100;

/// Range covering every transaction: from the Unix epoch to far past `now`.
pub fn all_time(now: NaiveDateTime) -> TimeRange {
    let today = now.date();
    let epoch = NaiveDate::default().min(today);
    let horizon = today
        .checked_add_months(Months::new(ALL_TIME_HORIZON_YEARS * 12))
        .unwrap_or(NaiveDate::MAX);
    TimeRange::spanning(start_of_day(epoch), end_of_day(horizon))
}

/// Active window of time. Ranges are always derived from the variant's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectedPeriod {
    AllTime {
        range: TimeRange,
    },
    CustomRange {
        range: TimeRange,
    },
    InTheLast {
        n: u32,
        unit: TimeUnit,
        range: TimeRange,
    },
    Monthly {
        month: Month,
        range: TimeRange,
        start_day_of_month: u32,
    },
}

impl SelectedPeriod {
    pub fn all_time(now: NaiveDateTime) -> Self {
        SelectedPeriod::AllTime {
            range: all_time(now),
        }
    }

    pub fn custom(range: TimeRange) -> Self {
        SelectedPeriod::CustomRange { range }
    }

    /// The last `n` units counting today: `[today - (n-1) units, end of today]`.
    pub fn in_the_last(n: u32, unit: TimeUnit, now: NaiveDateTime) -> Result<Self, TimeError> {
        if n == 0 {
            return Err(TimeError::EmptyCount);
        }
        let today = now.date();
        let back = i32::try_from(n - 1).map_err(|_| TimeError::OutOfCalendar)?;
        let first = unit.add_to(today, -back)?;
        Ok(SelectedPeriod::InTheLast {
            n,
            unit,
            range: TimeRange::for_days(first, today)?,
        })
    }

    /// January 1st through December 31st of `year`.
    pub fn calendar_year(year: i32) -> Result<Self, TimeError> {
        let first = Month::new(year, 1)?.first_day()?;
        let last = Month::new(year, 12)?.last_day()?;
        Ok(SelectedPeriod::CustomRange {
            range: TimeRange::for_days(first, last)?,
        })
    }

    pub fn range(&self) -> TimeRange {
        match self {
            SelectedPeriod::AllTime { range }
            | SelectedPeriod::CustomRange { range }
            | SelectedPeriod::InTheLast { range, .. }
            | SelectedPeriod::Monthly { range, .. } => *range,
        }
    }

    pub fn is_all_time(&self) -> bool {
        matches!(self, SelectedPeriod::AllTime { .. })
    }
}

impl fmt::Display for SelectedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedPeriod::AllTime { .. } => f.write_str("all time"),
            SelectedPeriod::CustomRange { range } => write!(f, "custom {range}"),
            SelectedPeriod::InTheLast { n, unit, .. } => {
                write!(f, "last {n} {unit}{}", if *n == 1 { "" } else { "s" })
            }
            SelectedPeriod::Monthly {
                month,
                start_day_of_month,
                ..
            } => write!(f, "month {month} (starts day {start_day_of_month})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_seven_days_ends_today() {
        let period = SelectedPeriod::in_the_last(7, TimeUnit::Day, now()).unwrap();
        let range = period.range();
        assert_eq!(range.from(), start_of_day(date(2024, 3, 14)));
        assert_eq!(range.to(), end_of_day(date(2024, 3, 20)));
        assert_eq!(range.length_days(), 6);
    }

    #[test]
    fn last_one_week_is_today_only() {
        let period = SelectedPeriod::in_the_last(1, TimeUnit::Week, now()).unwrap();
        assert_eq!(period.range().from(), start_of_day(date(2024, 3, 20)));
    }

    #[test]
    fn last_three_months_clamps_to_calendar() {
        let period = SelectedPeriod::in_the_last(3, TimeUnit::Month, now()).unwrap();
        assert_eq!(period.range().from(), start_of_day(date(2024, 1, 20)));
    }

    #[test]
    fn zero_count_is_rejected() {
        assert_eq!(
            SelectedPeriod::in_the_last(0, TimeUnit::Day, now()),
            Err(TimeError::EmptyCount)
        );
    }

    #[test]
    fn calendar_year_spans_jan_to_dec() {
        let range = SelectedPeriod::calendar_year(2023).unwrap().range();
        assert_eq!(range.from(), start_of_day(date(2023, 1, 1)));
        assert_eq!(range.to(), end_of_day(date(2023, 12, 31)));
    }

    #[test]
    fn all_time_tracks_now() {
        let range = all_time(now());
        assert_eq!(range.from(), start_of_day(NaiveDate::default()));
        assert!(range.contains(now()));
        assert_eq!(range.to().date(), date(2124, 3, 20));
    }

    #[test]
    fn period_serializes_with_kind_tag() {
        let period = SelectedPeriod::calendar_year(2024).unwrap();
        let json = serde_json::to_value(&period).unwrap();
        assert_eq!(json["kind"], "custom_range");
        let back: SelectedPeriod = serde_json::from_value(json).unwrap();
        assert_eq!(back, period);
    }
}
