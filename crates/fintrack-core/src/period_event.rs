//! Period selection events and the reducer that applies them.

use chrono::{Datelike, NaiveDateTime};
use fintrack_domain::{Month, SelectedPeriod, TimeRange, TimeUnit};

use crate::{
    monthly::MonthlyPeriodResolver,
    shift::{PeriodShiftEngine, ShiftDirection},
    CoreError,
};

/// The closed set of selection events a user can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodEvent {
    AllTime,
    CustomRange(TimeRange),
    InTheLast { n: u32, unit: TimeUnit },
    Monthly(Month),
    ResetToCurrentPeriod,
    LastYear,
    ThisYear,
    ShiftForward,
    ShiftBackward,
}

/// State the reducer reads: the current selection and the configured start day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodContext {
    pub selected_period: SelectedPeriod,
    pub start_day_of_month: u32,
}

impl PeriodContext {
    pub fn new(selected_period: SelectedPeriod, start_day_of_month: u32) -> Self {
        Self {
            selected_period,
            start_day_of_month,
        }
    }

    /// Computes the selection that `event` produces. Never mutates `self`.
    pub fn reduce(&self, event: &PeriodEvent, now: NaiveDateTime) -> Result<SelectedPeriod, CoreError> {
        let period = match event {
            PeriodEvent::AllTime => SelectedPeriod::all_time(now),
            PeriodEvent::CustomRange(range) => SelectedPeriod::custom(*range),
            PeriodEvent::InTheLast { n, unit } => SelectedPeriod::in_the_last(*n, *unit, now)?,
            PeriodEvent::Monthly(month) => {
                MonthlyPeriodResolver::resolve_month(*month, self.start_day_of_month)?
            }
            PeriodEvent::ResetToCurrentPeriod => {
                MonthlyPeriodResolver::current(now, self.start_day_of_month)?
            }
            PeriodEvent::LastYear => SelectedPeriod::calendar_year(now.year() - 1)?,
            PeriodEvent::ThisYear => SelectedPeriod::calendar_year(now.year())?,
            PeriodEvent::ShiftForward => self.shift(ShiftDirection::Forward, now)?,
            PeriodEvent::ShiftBackward => self.shift(ShiftDirection::Backward, now)?,
        };
        Ok(period)
    }

    fn shift(&self, direction: ShiftDirection, now: NaiveDateTime) -> Result<SelectedPeriod, CoreError> {
        PeriodShiftEngine::shift(
            &self.selected_period,
            direction,
            now,
            Some(self.start_day_of_month),
        )
    }
}
