//! Leave accrual functionality.
//!
//! This module computes the exact number of paid-leave days a contract
//! earns over one reference period, as per article L3141-3 of the Code du
//! travail: 2.5 working days per month of effective work, capped at 30.

use std::collections::BTreeSet;

use chrono::{Datelike, Months};
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, Contract, ContractKind, DayRecord, LeaveReferencePeriod, SettingsTimeline,
};

/// The result of an accrual calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct AccrualResult {
    /// The period the entitlement was earned in.
    pub period: LeaveReferencePeriod,
    /// Calendar months with at least one qualifying day.
    pub months_with_work: u32,
    /// The cap applied to this period.
    pub cap_days: Decimal,
    /// Exact days earned, never rounded.
    pub days_earned: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the entitlement earned over a reference period.
///
/// # Arguments
///
/// * `period` - The reference period to accrue
/// * `records` - The contract's day-records within the period
/// * `timeline` - The contract's settings history
/// * `contract` - The contract (its active span prorates incomplete-year caps)
/// * `config` - The engine configuration
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// `days_earned = min(days_per_month × months_with_work, cap)` where the cap
/// is the configured annual cap, prorated by the contract's active days
/// for incomplete-year contracts.
///
/// # Errors
///
/// Returns `IncompletePeriodData` when a day-record predates the first
/// settings snapshot or a month of the period in which the contract is
/// active has no applicable settings.
///
/// # Code du travail Reference
///
/// L3141-3 (accrual and cap).
pub fn calculate_accrual(
    period: LeaveReferencePeriod,
    records: &[DayRecord],
    timeline: &SettingsTimeline,
    contract: &Contract,
    config: &EngineConfig,
    step_number: u32,
) -> EngineResult<AccrualResult> {
    let incomplete = |message: String| EngineError::IncompletePeriodData {
        period_start: period.start,
        period_end: period.end,
        message,
    };

    let earliest = records.iter().map(|r| r.date).min();
    if let (Some(first), Some(earliest)) = (timeline.first(), earliest) {
        if earliest < first.effective_from {
            return Err(incomplete(format!(
                "day record on {} predates the first settings snapshot ({})",
                earliest, first.effective_from
            )));
        }
    }

    for month_start in period.months() {
        let month_end = month_start + Months::new(1);
        let from = month_start.max(period.start).max(contract.start_date);
        let to = match contract.end_date.and_then(|d| d.succ_opt()) {
            Some(after_last) => month_end.min(period.end).min(after_last),
            None => month_end.min(period.end),
        };
        if from >= to {
            continue;
        }
        if timeline.governing(from).is_none() {
            return Err(incomplete(format!(
                "month {}-{:02} has no applicable settings",
                month_start.year(),
                month_start.month()
            )));
        }
    }

    let governing = timeline.governing(period.last_day()).ok_or_else(|| {
        incomplete(format!(
            "no settings govern the period's last day ({})",
            period.last_day()
        ))
    })?;

    let worked_months: BTreeSet<(i32, u32)> = records
        .iter()
        .filter(|r| r.qualifies_for_accrual())
        .map(|r| (r.date.year(), r.date.month()))
        .collect();
    let months_with_work = worked_months.len() as u32;

    let rules = config.leave();
    let active_days = contract.active_days_within(period.start, period.end);
    let cap_days = match governing.contract_kind {
        ContractKind::FullYear => rules.annual_cap_days,
        ContractKind::IncompleteYear => {
            rules.annual_cap_days * Decimal::from(active_days) / Decimal::from(period.num_days())
        }
    };

    let raw_days = rules.days_per_month * Decimal::from(months_with_work);
    let days_earned = raw_days.min(cap_days);
    let capped = raw_days > cap_days;

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_accrual".to_string(),
        rule_name: "Paid Leave Accrual".to_string(),
        clause_ref: rules.clause.clone(),
        input: serde_json::json!({
            "period_start": period.start.to_string(),
            "period_end": period.end.to_string(),
            "months_with_work": months_with_work,
            "days_per_month": rules.days_per_month.to_string(),
            "contract_kind": governing.contract_kind,
            "active_days": active_days
        }),
        output: serde_json::json!({
            "cap_days": cap_days.to_string(),
            "days_earned": days_earned.to_string(),
            "capped": capped
        }),
        reasoning: if capped {
            format!(
                "{} months x {} days = {} days, capped at {} days",
                months_with_work, rules.days_per_month, raw_days, cap_days
            )
        } else {
            format!(
                "{} months x {} days = {} days",
                months_with_work, rules.days_per_month, days_earned
            )
        },
    };

    Ok(AccrualResult {
        period,
        months_with_work,
        cap_days,
        days_earned,
        audit_step,
    })
}
