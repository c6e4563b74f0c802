//! Normalizes a requested reporting window into an ordered month sequence.

use crate::constants::MIN_PLAN_YEAR;

use super::{MonthKey, PeriodError, PeriodQuery, ResolvedPeriod};

impl PeriodQuery {
    /// Resolves this query into the ordered month sequence and the half-open
    /// date range `[start_date, end_exclusive)`.
    pub fn resolve(&self) -> Result<ResolvedPeriod, PeriodError> {
        let (start, end) = match *self {
            PeriodQuery::Explicit {
                start_month,
                end_month,
            } => (start_month, end_month),
            PeriodQuery::ByYear { year, up_to_month } => {
                if year < MIN_PLAN_YEAR {
                    return Err(PeriodError::YearOutOfRange(year));
                }
                let cutoff = up_to_month.unwrap_or(12);
                (MonthKey::new(year, 1)?, MonthKey::new(year, cutoff)?)
            }
        };

        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }

        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.next();
        }

        Ok(ResolvedPeriod {
            start_date: start.first_day(),
            end_exclusive: end.next().first_day(),
            months,
        })
    }
}
