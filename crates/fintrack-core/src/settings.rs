use tokio::sync::watch;
use tracing::debug;

use crate::{monthly::validate_start_day, CoreError};

/// Observable user settings consumed by the period engine.
#[derive(Debug)]
pub struct SettingsFlow {
    start_day_of_month: watch::Sender<u32>,
}

impl SettingsFlow {
    pub fn new(start_day_of_month: u32) -> Result<Self, CoreError> {
        let (start_day_of_month, _) = watch::channel(validate_start_day(start_day_of_month)?);
        Ok(Self { start_day_of_month })
    }

    /// Emits the current start day and every later change.
    pub fn start_day_of_month(&self) -> watch::Receiver<u32> {
        self.start_day_of_month.subscribe()
    }

    pub fn current_start_day(&self) -> u32 {
        *self.start_day_of_month.borrow()
    }

    /// Updates the start day; observers are only woken when the value changes.
    pub fn set_start_day_of_month(&self, day: u32) -> Result<(), CoreError> {
        let day = validate_start_day(day)?;
        let changed = self.start_day_of_month.send_if_modified(|current| {
            if *current == day {
                false
            } else {
                *current = day;
                true
            }
        });
        if changed {
            debug!(start_day_of_month = day, "start day of month changed");
        }
        Ok(())
    }
}
