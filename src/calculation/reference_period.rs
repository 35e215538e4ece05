//! Reference-period resolution.
//!
//! Maps a date to the leave reference period containing it and to the
//! settings snapshot that governs that whole period.

use chrono::{Datelike, NaiveDate};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ContractSettingsSnapshot, LeaveReferencePeriod, SettingsTimeline};

/// A reference period with its authoritative settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPeriod {
    /// The period containing the query date.
    pub period: LeaveReferencePeriod,
    /// The snapshot governing the period's last day, applied to the whole
    /// period.
    pub governing_snapshot: ContractSettingsSnapshot,
}

/// Returns the reference period starting in `start_month` that contains
/// `date`.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::calculation::reference_period_containing;
/// use chrono::NaiveDate;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let period = reference_period_containing(d(2025, 3, 15), 6).unwrap();
/// assert_eq!(period.start, d(2024, 6, 1));
/// assert_eq!(period.end, d(2025, 6, 1));
/// ```
pub fn reference_period_containing(
    date: NaiveDate,
    start_month: u32,
) -> EngineResult<LeaveReferencePeriod> {
    let year = if date.month() >= start_month {
        date.year()
    } else {
        date.year() - 1
    };
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(|| {
        EngineError::InvalidSettings {
            effective_from: date,
            field: "leave_reference_period_start_month".to_string(),
            message: format!("must be within 1..=12 (got {})", start_month),
        }
    })?;
    Ok(LeaveReferencePeriod::new(start))
}

/// Returns every period from the one containing `first` to the one
/// containing `last`, oldest first. Empty when `first > last`.
pub fn reference_periods_between(
    first: NaiveDate,
    last: NaiveDate,
    start_month: u32,
) -> EngineResult<Vec<LeaveReferencePeriod>> {
    if first > last {
        return Ok(Vec::new());
    }
    let mut period = reference_period_containing(first, start_month)?;
    let mut periods = Vec::new();
    while period.start <= last {
        periods.push(period);
        period = period.next();
    }
    Ok(periods)
}

/// Resolves the reference period containing `date` and its governing
/// settings.
///
/// The period's start month comes from the snapshot in force on `date`
/// (or the configured default); the snapshot in force on the period's last
/// day then governs the whole period.
///
/// # Errors
///
/// Returns `NoApplicableSettings` if `date` precedes every snapshot.
pub fn resolve(
    date: NaiveDate,
    timeline: &SettingsTimeline,
    config: &EngineConfig,
) -> EngineResult<ResolvedPeriod> {
    let query_snapshot = timeline.governing_or_err(date)?;
    let start_month =
        query_snapshot.reference_start_month(config.leave().reference_period_start_month);
    let period = reference_period_containing(date, start_month)?;
    let governing_snapshot = timeline.governing_or_err(period.last_day())?.clone();

    Ok(ResolvedPeriod {
        period,
        governing_snapshot,
    })
}
