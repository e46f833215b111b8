use chrono::{Datelike, NaiveDate};
use fintrack_domain::Month;

/// One selectable month in the month picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthEntry {
    pub month: Month,
    pub current_year: bool,
}

/// Supplies the months offered for selection around `today`.
pub trait MonthsProvider: Send + Sync {
    fn months(&self, today: NaiveDate) -> Vec<MonthEntry>;
}

/// Every month of the previous, current and next calendar year.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalendarMonths;

impl MonthsProvider for CalendarMonths {
    fn months(&self, today: NaiveDate) -> Vec<MonthEntry> {
        let current = today.year();
        ((current - 1)..=(current + 1))
            .flat_map(|year| (1..=12).filter_map(move |number| Month::new(year, number).ok()))
            .map(|month| MonthEntry {
                month,
                current_year: month.year() == current,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_three_years_in_order() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let months = CalendarMonths.months(today);

        assert_eq!(months.len(), 36);
        assert_eq!(months[0].month, Month::new(2023, 1).unwrap());
        assert_eq!(months[35].month, Month::new(2025, 12).unwrap());
        assert!(months.windows(2).all(|pair| pair[0].month < pair[1].month));
        assert_eq!(months.iter().filter(|entry| entry.current_year).count(), 12);
    }
}
