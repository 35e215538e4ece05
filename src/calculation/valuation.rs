//! Leave valuation functionality.
//!
//! This module prices consumed leave under the two methods of article
//! L3141-24 of the Code du travail and pays the more favourable one:
//!
//! - maintenance of salary: what the childminder would have earned working;
//! - one tenth (dixième): 10% of the reference-period gross pay, spread over
//!   the days of entitlement of that period.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, ContractFacts, ContractSettingsSnapshot, DayKind, DayRecord,
    LeaveAllocation, LeaveReferencePeriod, SettingsTimeline, ValuationFallback, ValuationMethod,
    ValuationResult,
};

use super::rates::{day_pay, lookup_rates};

/// Consecutive leave days drawing on the same reference period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveBlock {
    /// The period whose entitlement the block consumes.
    pub period: LeaveReferencePeriod,
    /// The leave records of the block, in date order.
    pub days: Vec<DayRecord>,
}

impl LeaveBlock {
    /// Returns the first leave date of the block.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|r| r.date)
    }

    /// Returns the leave dates of the block.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.days.iter().map(|r| r.date).collect()
    }
}

/// The one-tenth reference figures of a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneTenthBase {
    /// The period the figures describe.
    pub period: LeaveReferencePeriod,
    /// Gross pay for work over the period.
    pub gross_pay: Decimal,
    /// Consumable entitlement days of the period.
    pub entitled_days: Decimal,
}

/// The result of valuing one leave block, including its audit steps.
#[derive(Debug, Clone)]
pub struct BlockValuation {
    /// The valuation.
    pub valuation: ValuationResult,
    /// Rate derivation followed by the valuation decision.
    pub audit_steps: Vec<AuditStep>,
    /// Set when the one-tenth method fell back.
    pub warning: Option<AuditWarning>,
}

/// Splits allocated leave days into blocks.
///
/// A new block starts when the source period changes or when a worked day
/// lies between two leave dates.
pub fn group_into_blocks(allocations: &[LeaveAllocation], facts: &ContractFacts) -> Vec<LeaveBlock> {
    let mut blocks: Vec<LeaveBlock> = Vec::new();

    for allocation in allocations {
        let Some(record) = facts.record_on(allocation.date) else {
            continue;
        };

        let extends_last = blocks.last().is_some_and(|block| {
            block.period == allocation.reference_period
                && block.days.last().is_some_and(|prev| {
                    let between = prev
                        .date
                        .succ_opt()
                        .map(|next| facts.records_between(next, allocation.date))
                        .unwrap_or_default();
                    !between
                        .iter()
                        .any(|r| r.kind == DayKind::Normal && r.scheduled_hours > Decimal::ZERO)
                })
        });

        match blocks.last_mut() {
            Some(block) if extends_last => block.days.push(record.clone()),
            _ => blocks.push(LeaveBlock {
                period: allocation.reference_period,
                days: vec![record.clone()],
            }),
        }
    }

    blocks
}

/// Sums the gross pay for work over a period.
///
/// Only `normal` days count (prior leave payments are excluded). Each day
/// is priced, majoration included, under the snapshot in force that day.
///
/// # Errors
///
/// Returns `NoApplicableSettings` for a worked day with no snapshot.
pub fn reference_gross_pay(
    period: LeaveReferencePeriod,
    facts: &ContractFacts,
    timeline: &SettingsTimeline,
    config: &EngineConfig,
) -> EngineResult<Decimal> {
    let mut total = Decimal::ZERO;
    for record in facts
        .records_between(period.start, period.end)
        .iter()
        .filter(|r| r.kind.is_worked())
    {
        let snapshot = timeline.governing_or_err(record.date)?;
        total += day_pay(record, snapshot, config).total();
    }
    Ok(total)
}

/// Computes the unrounded one-tenth amount for `days` leave days.
///
/// # Errors
///
/// Returns `ZeroEntitlementDays` when the period has no entitled days.
pub fn one_tenth_amount(
    base: &OneTenthBase,
    days: Decimal,
    config: &EngineConfig,
) -> EngineResult<Decimal> {
    if base.entitled_days <= Decimal::ZERO {
        return Err(EngineError::ZeroEntitlementDays {
            period_start: base.period.start,
        });
    }
    Ok(base.gross_pay * config.valuation().one_tenth_rate / base.entitled_days * days)
}

/// Values a leave block under both methods and pays the larger.
///
/// Both amounts are rounded to the configured money precision before they
/// are compared; a tie pays maintenance. When the one-tenth method has no
/// entitled days to divide by, its amount is zero, maintenance is paid, and
/// a `fallback` plus a warning are reported.
///
/// # Arguments
///
/// * `block` - The leave block to value
/// * `governing` - The snapshot governing the block's reference period
/// * `base` - One-tenth figures of the period the block draws down
/// * `config` - The engine configuration
/// * `step_number` - The first step number for audit trail sequencing
///
/// # Code du travail Reference
///
/// L3141-24 (maintenance vs one tenth).
pub fn value_leave_block(
    block: &LeaveBlock,
    governing: &ContractSettingsSnapshot,
    base: &OneTenthBase,
    config: &EngineConfig,
    step_number: u32,
) -> BlockValuation {
    let rates = lookup_rates(governing, config, step_number);
    let days_valued = Decimal::from(block.days.len());

    let maintenance_hours: Decimal = block
        .days
        .iter()
        .map(|r| {
            if r.scheduled_hours > Decimal::ZERO {
                r.scheduled_hours
            } else {
                rates.daily_reference_hours
            }
        })
        .sum();
    let maintenance_amount = config.round_money(maintenance_hours * rates.hourly_rate);

    let (one_tenth_amount, fallback) = match one_tenth_amount(base, days_valued, config) {
        Ok(amount) => (config.round_money(amount), None),
        Err(_) => (Decimal::ZERO, Some(ValuationFallback::ZeroEntitlementDays)),
    };

    let (amount_due, method_applied) = if one_tenth_amount > maintenance_amount {
        (one_tenth_amount, ValuationMethod::OneTenth)
    } else {
        (maintenance_amount, ValuationMethod::Maintenance)
    };

    let dates = block.dates();
    let warning = fallback.map(|_| {
        AuditWarning::new(
            "ONE_TENTH_UNAVAILABLE",
            format!(
                "No entitled days in reference period {}; leave from {} valued by maintenance only",
                base.period,
                dates.first().map(|d| d.to_string()).unwrap_or_default()
            ),
            "medium",
        )
    });

    let valuation_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "leave_valuation".to_string(),
        rule_name: "Paid Leave Valuation".to_string(),
        clause_ref: config.valuation().clause.clone(),
        input: serde_json::json!({
            "period_start": base.period.start.to_string(),
            "dates": dates.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            "maintenance_hours": maintenance_hours.to_string(),
            "reference_gross_pay": config.round_money(base.gross_pay).to_string(),
            "entitled_days": base.entitled_days.to_string()
        }),
        output: serde_json::json!({
            "maintenance_amount": maintenance_amount.to_string(),
            "one_tenth_amount": one_tenth_amount.to_string(),
            "amount_due": amount_due.to_string(),
            "method_applied": method_applied,
            "fallback": fallback
        }),
        reasoning: match method_applied {
            ValuationMethod::OneTenth => format!(
                "One tenth {} exceeds maintenance {} for {} day(s)",
                one_tenth_amount, maintenance_amount, days_valued
            ),
            ValuationMethod::Maintenance => format!(
                "Maintenance {} is at least one tenth {} for {} day(s)",
                maintenance_amount, one_tenth_amount, days_valued
            ),
        },
    };

    BlockValuation {
        valuation: ValuationResult {
            period: block.period,
            dates,
            days_valued,
            maintenance_amount,
            one_tenth_amount,
            amount_due,
            method_applied,
            fallback,
        },
        audit_steps: vec![rates.audit_step, valuation_step],
        warning,
    }
}
