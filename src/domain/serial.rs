//! Serial-number format: month letter, two-digit year, five-digit counter.

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Month letters: January is `A`, December is `L`.
const MONTH_LETTERS: [char; 12] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L'];

/// A serial number such as `J25 00138`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialNumber {
    month_letter: char,
    year: u8,
    counter: u32,
}

impl SerialNumber {
    /// Build a serial for the given date and counter.
    pub fn new(date: NaiveDate, counter: u32) -> Self {
        Self {
            month_letter: month_letter(date.month()),
            year: (date.year().rem_euclid(100)) as u8,
            counter,
        }
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02} {:05}",
            self.month_letter, self.year, self.counter
        )
    }
}

/// Letter for a 1-based month number.
pub fn month_letter(month: u32) -> char {
    MONTH_LETTERS[(month as usize - 1) % 12]
}
