//! Computation result models for the paid-leave engine.
//!
//! This module contains the [`PeriodComputation`] type and its associated
//! structures that capture every output of a leave computation: the ledger,
//! allocations, valuations, the period summary and the audit trace.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    EntitlementLedgerEntry, LeaveAllocation, OverConsumption, PeriodFailure, ValuationResult,
};

/// A half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// First day after the range.
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns true if `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the Code du travail article for this rule.
    pub clause_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a computation.
///
/// Warnings flag conditions that do not stop the computation but need a
/// human to look at them (over-consumed leave, a period with missing
/// settings, a valuation fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(code: &str, message: impl Into<String>, severity: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            severity: severity.to_string(),
        }
    }
}

/// The complete audit trace for a computation.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the computation.
    pub warnings: Vec<AuditWarning>,
}

/// Pay and day-count aggregates over a date range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Contracted hours prorated per calendar day.
    pub theoretical_hours: Decimal,
    /// Contracted salary prorated per calendar day.
    pub theoretical_salary: Decimal,
    /// Hours actually worked.
    pub hours_real: Decimal,
    /// Worked hours at or below the daily majoration threshold.
    pub normal_hours: Decimal,
    /// Worked hours above the daily majoration threshold.
    pub majorated_hours: Decimal,
    /// Pay for the worked hours at the hourly rate.
    pub salary_base: Decimal,
    /// Extra pay for majorated hours.
    pub majoration_salary: Decimal,
    /// `salary_base + majoration_salary`.
    pub salary_real: Decimal,
    /// Meal fees owed.
    pub fee_meal_total: Decimal,
    /// Maintenance fees owed.
    pub fee_maintenance_total: Decimal,
    /// Number of unpaid-leave days.
    pub unpaid_leave_days: u32,
    /// Salary deducted for unpaid leave.
    pub unpaid_leave_deduction: Decimal,
    /// Number of worked days.
    pub worked_days: u32,
    /// Number of parental-absence days.
    pub absence_days: u32,
    /// Number of public-holiday days.
    pub holiday_days: u32,
    /// Number of paid-leave days.
    pub leave_days: u32,
}

/// The complete result of a leave computation over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodComputation {
    /// The contract the computation is for.
    pub contract_id: String,
    /// The requested range.
    pub range: DateRange,
    /// Ledger entries relevant to the range, oldest first.
    pub ledger: Vec<EntitlementLedgerEntry>,
    /// Leave days in the range matched to their source period.
    pub allocations: Vec<LeaveAllocation>,
    /// Leave days in the range with no balance to draw from.
    pub over_consumption: OverConsumption,
    /// Valuations of the leave blocks in the range.
    pub valuations: Vec<ValuationResult>,
    /// Reference periods that could not be computed.
    pub period_failures: Vec<PeriodFailure>,
    /// Pay and day-count aggregates for the range.
    pub summary: PeriodSummary,
    /// Complete audit trace of computation decisions.
    pub audit_trace: AuditTrace,
    /// The version of the engine that performed the computation.
    pub engine_version: String,
}

/// Totals over one reference year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTotals {
    /// Days earned in the year's reference period.
    pub days_earned: Decimal,
    /// Days of the year's entitlement consumed so far.
    pub days_consumed: Decimal,
    /// Days of the year's entitlement still available.
    pub days_remaining: Decimal,
    /// Leave days valued within the year.
    pub days_valued: Decimal,
    /// Leave days within the year with no balance.
    pub over_consumed_days: Decimal,
    /// Sum of maintenance amounts.
    pub maintenance_total: Decimal,
    /// Sum of one-tenth amounts.
    pub one_tenth_total: Decimal,
    /// Sum of amounts due.
    pub amount_due_total: Decimal,
}

/// A computation over one reference period with yearly totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearComputation {
    /// The underlying range computation.
    pub computation: PeriodComputation,
    /// Totals for the year.
    pub year_totals: YearTotals,
}
