//! Leave consumption tracking.
//!
//! Draws leave days down from the ledger oldest period first (FIFO) and
//! reports any day that no period can back.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::RoundingGranularity;
use crate::models::{
    AuditStep, AuditWarning, EntitlementLedgerEntry, LeaveAllocation, OverConsumption,
};

/// The result of consumption tracking.
#[derive(Debug, Clone)]
pub struct ConsumptionResult {
    /// Ledger entries with consumption applied, oldest first.
    pub ledger: Vec<EntitlementLedgerEntry>,
    /// One allocation per backed leave day, in date order.
    pub allocations: Vec<LeaveAllocation>,
    /// Leave days with no balance to draw from.
    pub over_consumption: OverConsumption,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// One warning when any leave day was over-consumed.
    pub warnings: Vec<AuditWarning>,
}

/// Applies leave days to the ledger, oldest period first.
///
/// Each period's consumable balance is its exact `days_earned` rounded up to
/// `rounding` (L3141-7). Every leave date consumes one day from the oldest
/// period that started on or before it and still holds a full day.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::calculation::track_consumption;
/// use assmat_leave_engine::config::RoundingGranularity;
/// use assmat_leave_engine::models::{EntitlementLedgerEntry, LeaveReferencePeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let entries = vec![EntitlementLedgerEntry::new(
///     LeaveReferencePeriod::new(d(2024, 6, 1)),
///     Decimal::new(25, 1),
/// )];
///
/// let result = track_consumption(
///     &entries,
///     &[d(2025, 7, 1), d(2025, 7, 2), d(2025, 7, 3), d(2025, 7, 4)],
///     RoundingGranularity::WholeDay,
///     1,
/// );
/// assert_eq!(result.ledger[0].days_consumable, Decimal::from(3));
/// assert_eq!(result.allocations.len(), 3);
/// assert_eq!(result.over_consumption.dates, vec![d(2025, 7, 4)]);
/// ```
pub fn track_consumption(
    entries: &[EntitlementLedgerEntry],
    leave_dates: &[NaiveDate],
    rounding: RoundingGranularity,
    step_number: u32,
) -> ConsumptionResult {
    let mut ledger: Vec<EntitlementLedgerEntry> = entries
        .iter()
        .map(|entry| {
            let consumable = rounding.round_up(entry.days_earned);
            EntitlementLedgerEntry {
                reference_period: entry.reference_period,
                days_earned: entry.days_earned,
                days_carried_over: Decimal::ZERO,
                days_consumable: consumable,
                days_consumed: Decimal::ZERO,
                days_remaining: consumable,
            }
        })
        .collect();
    ledger.sort_by_key(|e| e.reference_period.start);

    let mut dates = leave_dates.to_vec();
    dates.sort();

    let mut allocations = Vec::with_capacity(dates.len());
    let mut over_consumption = OverConsumption::default();

    for date in dates {
        let source = ledger
            .iter_mut()
            .take_while(|e| e.reference_period.start <= date)
            .find(|e| e.days_remaining >= Decimal::ONE);

        match source {
            Some(entry) => {
                entry.days_consumed += Decimal::ONE;
                entry.days_remaining -= Decimal::ONE;
                allocations.push(LeaveAllocation {
                    date,
                    reference_period: entry.reference_period,
                });
            }
            None => {
                over_consumption.days += Decimal::ONE;
                over_consumption.dates.push(date);
            }
        }
    }

    let mut carried = Decimal::ZERO;
    for entry in ledger.iter_mut() {
        entry.days_carried_over = carried;
        carried += entry.days_remaining;
    }

    let warnings = if over_consumption.is_empty() {
        Vec::new()
    } else {
        vec![AuditWarning::new(
            "OVER_CONSUMPTION",
            format!(
                "{} leave day(s) taken without available entitlement, first on {}",
                over_consumption.days,
                over_consumption.dates[0]
            ),
            "high",
        )]
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_consumption".to_string(),
        rule_name: "Paid Leave Consumption (FIFO)".to_string(),
        clause_ref: "L3141-7".to_string(),
        input: serde_json::json!({
            "periods": ledger.len(),
            "leave_days": allocations.len() + over_consumption.dates.len(),
            "rounding": rounding
        }),
        output: serde_json::json!({
            "allocated_days": allocations.len(),
            "over_consumed_days": over_consumption.dates.len(),
            "remaining_days": carried.to_string()
        }),
        reasoning: format!(
            "Allocated {} leave day(s) oldest period first; {} day(s) without balance",
            allocations.len(),
            over_consumption.dates.len()
        ),
    };

    ConsumptionResult {
        ledger,
        allocations,
        over_consumption,
        audit_step,
        warnings,
    }
}
