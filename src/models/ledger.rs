//! Reference periods and the derived entitlement ledger.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A leave reference period, the half-open interval `[start, end)` over
/// which entitlement is earned.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::models::LeaveReferencePeriod;
/// use chrono::NaiveDate;
///
/// let period = LeaveReferencePeriod::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
/// assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
/// assert_eq!(period.last_day(), NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
/// assert_eq!(period.months().len(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LeaveReferencePeriod {
    /// First day of the period.
    pub start: NaiveDate,
    /// First day after the period.
    pub end: NaiveDate,
}

impl LeaveReferencePeriod {
    /// Creates the twelve-month period starting on `start`.
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Months::new(12),
        }
    }

    /// Returns true if `date` falls inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    /// Returns true if the period intersects `[start, end)`.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start < end && start < self.end
    }

    /// Returns the last day of the period.
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.end)
    }

    /// Returns the number of days in the period.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns the first day of each calendar month of the period.
    pub fn months(&self) -> Vec<NaiveDate> {
        let mut months = Vec::with_capacity(12);
        let mut month = self.start.with_day(1).unwrap_or(self.start);
        while month < self.end {
            months.push(month);
            month = month + Months::new(1);
        }
        months
    }

    /// Returns the next period.
    pub fn next(&self) -> Self {
        Self::new(self.end)
    }
}

impl std::fmt::Display for LeaveReferencePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The derived balance of one reference period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementLedgerEntry {
    /// The period the entitlement was earned in.
    pub reference_period: LeaveReferencePeriod,
    /// Exact days earned (never rounded).
    pub days_earned: Decimal,
    /// Unused balance of all older periods after allocation.
    pub days_carried_over: Decimal,
    /// Days earned rounded up at the consumption granularity.
    pub days_consumable: Decimal,
    /// Days drawn from this period.
    pub days_consumed: Decimal,
    /// `days_consumable - days_consumed`.
    pub days_remaining: Decimal,
}

impl EntitlementLedgerEntry {
    /// Creates an unconsumed entry whose consumable balance is the exact
    /// earned amount; consumption tracking applies the rounding.
    pub fn new(reference_period: LeaveReferencePeriod, days_earned: Decimal) -> Self {
        Self {
            reference_period,
            days_earned,
            days_carried_over: Decimal::ZERO,
            days_consumable: days_earned,
            days_consumed: Decimal::ZERO,
            days_remaining: days_earned,
        }
    }
}

/// One leave day matched to the period it draws down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllocation {
    /// The leave date.
    pub date: NaiveDate,
    /// The period whose balance was consumed.
    pub reference_period: LeaveReferencePeriod,
}

/// Leave days taken with no balance left to draw from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverConsumption {
    /// Number of unbacked leave days.
    pub days: Decimal,
    /// The unbacked leave dates.
    pub dates: Vec<NaiveDate>,
}

impl OverConsumption {
    /// Returns true if no leave day was left unbacked.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A reference period that could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodFailure {
    /// The affected period.
    pub reference_period: LeaveReferencePeriod,
    /// Machine-readable error code.
    pub code: String,
    /// Error description.
    pub message: String,
}
