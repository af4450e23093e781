use chrono::{Datelike, NaiveDate};

/// Inclusive date window, resolved to the calendar months it touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl MonthWindow {
    /// `None` when `since` is after `until`
    pub fn new(since: NaiveDate, until: NaiveDate) -> Option<Self> {
        (since <= until).then_some(Self { since, until })
    }

    pub fn first_month(&self) -> (i32, u32) {
        (self.since.year(), self.since.month())
    }

    pub fn last_month(&self) -> (i32, u32) {
        (self.until.year(), self.until.month())
    }

    pub fn contains_month(&self, year: i32, month: u32) -> bool {
        let key = (year, month);
        self.first_month() <= key && key <= self.last_month()
    }
}
