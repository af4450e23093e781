use super::config::MonthWindow;

/// Walks the months of a window, oldest first
pub struct MonthIterator {
    current: (i32, u32),
    last: (i32, u32),
    done: bool,
}

impl MonthIterator {
    pub fn new(window: &MonthWindow) -> Self {
        Self {
            current: window.first_month(),
            last: window.last_month(),
            done: false,
        }
    }

    fn advance(&mut self) {
        let (year, month) = self.current;
        self.current = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
    }
}

impl Iterator for MonthIterator {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.current > self.last {
            return None;
        }

        let item = self.current;
        if item == self.last {
            self.done = true;
        } else {
            self.advance();
        }
        Some(item)
    }
}
