//! Reporting-window resolution.
//!
//! A requested window (explicit start/end month, or the legacy year+cutoff
//! form) is normalized into an ordered month sequence and a half-open date
//! range before any aggregation runs.

mod period_model;
mod period_resolver;

pub use period_model::{MonthKey, PeriodError, PeriodQuery, ResolvedPeriod};
