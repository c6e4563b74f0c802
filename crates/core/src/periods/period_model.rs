//! Calendar-month value types for reporting windows.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MIN_PLAN_YEAR;

/// Errors produced while resolving a reporting window.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PeriodError {
    #[error("'{0}' is not a valid YYYY-MM month key")]
    InvalidMonthKey(String),

    #[error("month {0} is out of range (1-12)")]
    InvalidMonth(u32),

    #[error("start month {start} is after end month {end}")]
    StartAfterEnd { start: MonthKey, end: MonthKey },

    #[error("year {0} is out of range (>= {MIN_PLAN_YEAR})")]
    YearOutOfRange(i32),
}

/// A calendar month, ordered chronologically, with a canonical `YYYY-MM`
/// string form used on all external interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(MonthKey { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of this month.
    pub fn first_day(&self) -> NaiveDate {
        // new() guarantees a valid month, so day 1 always exists
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .unwrap_or_else(|| panic!("invalid month key {self}"))
    }

    /// The following calendar month.
    pub fn next(&self) -> MonthKey {
        if self.month == 12 {
            MonthKey {
                year: self.year + 1,
                month: 1,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Month key for an arbitrary date.
    pub fn from_date(date: NaiveDate) -> MonthKey {
        use chrono::Datelike;
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PeriodError;

    /// Strict parse of the canonical `YYYY-MM` form; anything else is
    /// rejected at the boundary.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PeriodError::InvalidMonthKey(s.to_string());
        if s.len() != 7 || s.as_bytes()[4] != b'-' {
            return Err(invalid());
        }
        let year: i32 = s[..4].parse().map_err(|_| invalid())?;
        let month: u32 = s[5..].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(MonthKey { year, month })
    }
}

impl TryFrom<String> for MonthKey {
    type Error = PeriodError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// A requested reporting window, before resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum PeriodQuery {
    /// Explicit inclusive month range.
    Explicit {
        start_month: MonthKey,
        end_month: MonthKey,
    },
    /// Legacy form: a plan year with an optional cutoff month
    /// (January through `up_to_month`, defaulting to December).
    ByYear {
        year: i32,
        #[serde(skip_serializing_if = "Option::is_none")]
        up_to_month: Option<u32>,
    },
}

/// A resolved reporting window: the ordered, contiguous month sequence plus
/// the half-open `[start_date, end_exclusive)` date range backing the SQL
/// filters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPeriod {
    pub months: Vec<MonthKey>,
    pub start_date: NaiveDate,
    pub end_exclusive: NaiveDate,
}

impl ResolvedPeriod {
    pub fn start_month(&self) -> MonthKey {
        self.months[0]
    }

    pub fn end_month(&self) -> MonthKey {
        self.months[self.months.len() - 1]
    }

    pub fn contains(&self, key: MonthKey) -> bool {
        self.months.contains(&key)
    }
}
