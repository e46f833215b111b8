//! Custom months: month-length windows that begin on a configurable day.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use fintrack_domain::{Month, SelectedPeriod, TimeError, TimeRange};

use crate::CoreError;

pub const MIN_START_DAY: u32 = 1;
pub const MAX_START_DAY: u32 = 31;

/// Every custom month contains exactly one 10th; that calendar month names it.
pub const MONTH_LABEL_DAY: u32 = 10;

pub fn validate_start_day(start_day_of_month: u32) -> Result<u32, CoreError> {
    if (MIN_START_DAY..=MAX_START_DAY).contains(&start_day_of_month) {
        Ok(start_day_of_month)
    } else {
        Err(CoreError::InvalidStartDay(start_day_of_month))
    }
}

/// Maps dates and month identifiers onto custom months.
pub struct MonthlyPeriodResolver;

impl MonthlyPeriodResolver {
    /// The custom month that `date_in_period` falls into.
    pub fn resolve(
        date_in_period: NaiveDate,
        start_day_of_month: u32,
    ) -> Result<SelectedPeriod, CoreError> {
        validate_start_day(start_day_of_month)?;
        let month = Month::of(date_in_period);
        let start_in_month = month.day_clamped(start_day_of_month)?;
        let first_month = if date_in_period >= start_in_month {
            month
        } else {
            month.previous()
        };
        Self::starting_in(first_month, start_day_of_month)
    }

    /// The custom month labelled `month`.
    pub fn resolve_month(month: Month, start_day_of_month: u32) -> Result<SelectedPeriod, CoreError> {
        validate_start_day(start_day_of_month)?;
        let first_month = if start_day_of_month <= MONTH_LABEL_DAY {
            month
        } else {
            month.previous()
        };
        Self::starting_in(first_month, start_day_of_month)
    }

    /// The custom month containing `now`.
    pub fn current(now: NaiveDateTime, start_day_of_month: u32) -> Result<SelectedPeriod, CoreError> {
        Self::resolve(now.date(), start_day_of_month)
    }

    fn starting_in(first_month: Month, start_day_of_month: u32) -> Result<SelectedPeriod, CoreError> {
        let first = first_month.day_clamped(start_day_of_month)?;
        let next_start = first_month.next().day_clamped(start_day_of_month)?;
        let last = next_start.pred_opt().ok_or(TimeError::OutOfCalendar)?;
        let month = if first.day() <= MONTH_LABEL_DAY {
            first_month
        } else {
            first_month.next()
        };
        Ok(SelectedPeriod::Monthly {
            month,
            range: TimeRange::for_days(first, last)?,
            start_day_of_month,
        })
    }
}
