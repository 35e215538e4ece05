//! Day-record model and related types.
//!
//! A day-record is the raw calendar fact the engine consumes: one record per
//! contract and date, saying what kind of day it was and how many hours
//! were scheduled.

use chrono::{NaiveDate, NaiveTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of a calendar day for a childminder contract.
///
/// The serialized names are the vocabulary used at the boundary with the
/// storage and HTTP layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// A worked day.
    Normal,
    /// Unpaid absence requested by the parent employer.
    Absence,
    /// Employer-granted paid leave; consumes entitlement.
    AssmatLeave,
    /// Unpaid leave; deducted from the monthly salary.
    UnpaidLeave,
    /// Public holiday; never a working day whatever the schedule says.
    Holiday,
}

impl DayKind {
    /// Returns true if hours on this day are worked hours.
    pub fn is_worked(&self) -> bool {
        matches!(self, DayKind::Normal)
    }

    /// Returns true if this day draws down the paid-leave balance.
    pub fn consumes_entitlement(&self) -> bool {
        matches!(self, DayKind::AssmatLeave)
    }
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Normal => write!(f, "normal"),
            DayKind::Absence => write!(f, "absence"),
            DayKind::AssmatLeave => write!(f, "assmat_leave"),
            DayKind::UnpaidLeave => write!(f, "unpaid_leave"),
            DayKind::Holiday => write!(f, "holiday"),
        }
    }
}

/// A single calendar fact for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// What kind of day this was.
    pub kind: DayKind,
    /// The hours scheduled (or worked) on that day.
    pub scheduled_hours: Decimal,
    /// Optional arrival time of the child.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// Optional departure time of the child.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    /// Whether a meal fee is due for the day.
    #[serde(default)]
    pub meal_fee_flag: bool,
    /// Whether a maintenance (upkeep) fee is due for the day.
    #[serde(default)]
    pub maintenance_fee_flag: bool,
}

impl DayRecord {
    /// Creates a record with no times and no fees.
    ///
    /// # Example
    ///
    /// ```
    /// use assmat_leave_engine::models::{DayKind, DayRecord};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let record = DayRecord::new(
    ///     NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
    ///     DayKind::Normal,
    ///     Decimal::from(7),
    /// );
    /// assert_eq!(record.worked_hours(), Decimal::from(7));
    /// ```
    pub fn new(date: NaiveDate, kind: DayKind, scheduled_hours: Decimal) -> Self {
        Self {
            date,
            kind,
            scheduled_hours,
            start_time: None,
            end_time: None,
            meal_fee_flag: false,
            maintenance_fee_flag: false,
        }
    }

    /// Returns the hours that count as worked time.
    ///
    /// Only `normal` days carry worked hours; a `holiday` contributes nothing
    /// even when hours were scheduled.
    pub fn worked_hours(&self) -> Decimal {
        if self.kind.is_worked() {
            self.scheduled_hours
        } else {
            Decimal::ZERO
        }
    }

    /// Returns true if this day earns paid leave for its month.
    ///
    /// Only worked days with hours earn leave. Leave days draw a balance
    /// down and never create one.
    pub fn qualifies_for_accrual(&self) -> bool {
        self.kind.is_worked() && self.scheduled_hours > Decimal::ZERO
    }

    /// Returns the span between start and end times, in hours.
    ///
    /// Returns `None` unless both times are present.
    pub fn hours_from_times(&self) -> Option<Decimal> {
        let (start, end) = (self.start_time?, self.end_time?);
        let start_minutes = i64::from(start.hour() * 60 + start.minute());
        let end_minutes = i64::from(end.hour() * 60 + end.minute());
        Some(Decimal::new(end_minutes - start_minutes, 0) / Decimal::from(60))
    }

    /// Checks the record for internal consistency.
    ///
    /// When both times are present, the scheduled hours must fit between
    /// them; fewer hours are allowed for breaks.
    pub fn validate(&self) -> EngineResult<()> {
        if self.scheduled_hours < Decimal::ZERO {
            return Err(EngineError::InvalidDayRecord {
                date: self.date,
                message: format!("scheduled_hours must be >= 0 (got {})", self.scheduled_hours),
            });
        }
        if self.scheduled_hours > Decimal::from(24) {
            return Err(EngineError::InvalidDayRecord {
                date: self.date,
                message: format!("scheduled_hours must be <= 24 (got {})", self.scheduled_hours),
            });
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                return Err(EngineError::InvalidDayRecord {
                    date: self.date,
                    message: "end time must be after start time".to_string(),
                });
            }
        }
        if let Some(span) = self.hours_from_times() {
            if self.scheduled_hours > span {
                return Err(EngineError::InvalidDayRecord {
                    date: self.date,
                    message: format!(
                        "scheduled_hours {} exceed the {} hours between start and end times",
                        self.scheduled_hours, span
                    ),
                });
            }
        }
        Ok(())
    }
}
