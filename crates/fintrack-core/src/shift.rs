//! Moving a selected period one period-length forward or backward.

use chrono::NaiveDateTime;
use fintrack_domain::{add_months, SelectedPeriod, TimeRange};

use crate::{monthly::MonthlyPeriodResolver, CoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    Forward,
    Backward,
}

impl ShiftDirection {
    fn sign(self) -> i64 {
        match self {
            ShiftDirection::Forward => 1,
            ShiftDirection::Backward => -1,
        }
    }
}

pub struct PeriodShiftEngine;

impl PeriodShiftEngine {
    pub fn shift_forward(period: &SelectedPeriod, now: NaiveDateTime) -> Result<SelectedPeriod, CoreError> {
        Self::shift(period, ShiftDirection::Forward, now, None)
    }

    pub fn shift_backward(period: &SelectedPeriod, now: NaiveDateTime) -> Result<SelectedPeriod, CoreError> {
        Self::shift(period, ShiftDirection::Backward, now, None)
    }

    /// Shifts `period` by one period-length.
    ///
    /// Monthly periods are re-resolved with `start_day_of_month` when given,
    /// otherwise with their own start day. Ranges that no longer mean
    /// "relative to now" come back as `CustomRange`.
    pub fn shift(
        period: &SelectedPeriod,
        direction: ShiftDirection,
        now: NaiveDateTime,
        start_day_of_month: Option<u32>,
    ) -> Result<SelectedPeriod, CoreError> {
        match period {
            SelectedPeriod::AllTime { .. } => Ok(SelectedPeriod::all_time(now)),
            SelectedPeriod::CustomRange { range } | SelectedPeriod::InTheLast { range, .. } => {
                Self::shift_range(range, direction)
            }
            SelectedPeriod::Monthly {
                month,
                range,
                start_day_of_month: own_start_day,
            } => {
                let start_day = start_day_of_month.unwrap_or(*own_start_day);
                let step = match direction {
                    ShiftDirection::Forward => 1,
                    ShiftDirection::Backward => -1,
                };
                let target = add_months(range.from().date(), step)?;
                let shifted = MonthlyPeriodResolver::resolve(target, start_day)?;
                if shifted.range() != *range {
                    return Ok(shifted);
                }
                // A clamped start day can map the target date back into the same period.
                let label = match direction {
                    ShiftDirection::Forward => month.next(),
                    ShiftDirection::Backward => month.previous(),
                };
                MonthlyPeriodResolver::resolve_month(label, start_day)
            }
        }
    }

    /// Moves `range` so the result starts the day after it ends (or ends the day before it starts).
    pub fn shift_range(range: &TimeRange, direction: ShiftDirection) -> Result<SelectedPeriod, CoreError> {
        let days = (range.length_days() + 1) * direction.sign();
        Ok(SelectedPeriod::custom(range.shift_days(days)?))
    }
}
