//! Orchestration of leave computations.
//!
//! The functions here chain the calculation steps into the three public
//! operations: a ledger and valuation over a date range, the same for one
//! reference year, and the regularization diff between two sets of inputs.
//! They are pure: identical inputs always produce identical outputs.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    OneTenthBase, ResolvedPeriod, calculate_accrual, diff_valuations, group_into_blocks,
    reference_gross_pay, reference_periods_between, resolve, summarize_period,
    track_consumption, value_leave_block,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, ComputationInputs, ContractFacts, DateRange,
    EntitlementLedgerEntry, LeaveAllocation, LeaveReferencePeriod, OverConsumption,
    PeriodComputation, PeriodFailure, RegularizationDelta, SettingsTimeline, YearComputation,
    YearTotals,
};

/// The version stamped on every computation result.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Computes the ledger, allocations and valuations of a contract over the
/// half-open range `[start, end)`.
///
/// All reference periods from the contract start up to the one containing
/// `end - 1 day` are accrued, and every leave day before `end` is consumed
/// FIFO. The result keeps the ledger entries overlapping the range (or
/// backing leave taken in it) and values only leave taken in the range.
/// A reference period with incomplete settings is reported in
/// `period_failures` and skipped; the other periods are still computed.
///
/// # Errors
///
/// - `InvalidRange` if `start >= end`
/// - `NoApplicableSettings` if no snapshot governs `end - 1 day` or a
///   valued leave day
///
/// # Example
///
/// ```no_run
/// use assmat_leave_engine::config::ConfigLoader;
/// use assmat_leave_engine::engine::compute_period;
/// use assmat_leave_engine::models::{
///     Contract, ContractFacts, ContractKind, ContractSettingsSnapshot, SettingsTimeline,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/assmat")?.into_config();
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let facts = ContractFacts::new(Contract::new("c1", d(2024, 6, 1)), vec![])?;
/// let settings = SettingsTimeline::new(vec![ContractSettingsSnapshot::new(
///     d(2024, 6, 1),
///     Decimal::from(35),
///     Decimal::from(1600),
///     ContractKind::FullYear,
/// )])?;
///
/// let result = compute_period(&facts, &settings, d(2024, 6, 1), d(2025, 6, 1), &config)?;
/// assert_eq!(result.contract_id, "c1");
/// # Ok::<(), assmat_leave_engine::error::EngineError>(())
/// ```
pub fn compute_period(
    facts: &ContractFacts,
    settings: &SettingsTimeline,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<PeriodComputation> {
    if start >= end {
        return Err(EngineError::InvalidRange { start, end });
    }
    let contract = facts.contract();
    let range = DateRange { start, end };
    info!(contract_id = %contract.id, %start, %end, "Computing paid leave");

    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    let last_day = end.pred_opt().ok_or(EngineError::InvalidRange { start, end })?;
    let resolved = resolve(last_day, settings, config)?;
    steps.push(resolution_step(&resolved, last_day, step_number));
    step_number += 1;

    // Every period shares the calendar of the period containing the range end.
    let start_month = resolved.period.start.month();
    let periods =
        reference_periods_between(contract.start_date, resolved.period.last_day(), start_month)?;

    let mut entries: Vec<EntitlementLedgerEntry> = Vec::with_capacity(periods.len());
    let mut period_failures: Vec<PeriodFailure> = Vec::new();
    for period in periods {
        let records = facts.records_between(period.start, period.end);
        match calculate_accrual(period, records, settings, contract, config, step_number) {
            Ok(accrual) => {
                debug!(
                    contract_id = %contract.id,
                    period_start = %period.start,
                    months_with_work = accrual.months_with_work,
                    days_earned = %accrual.days_earned,
                    "Accrued reference period"
                );
                entries.push(EntitlementLedgerEntry::new(period, accrual.days_earned));
                steps.push(accrual.audit_step);
                step_number += 1;
            }
            Err(error @ EngineError::IncompletePeriodData { .. }) => {
                warn!(
                    contract_id = %contract.id,
                    period_start = %period.start,
                    error = %error,
                    "Skipping reference period with incomplete data"
                );
                warnings.push(AuditWarning::new(error.code(), error.to_string(), "high"));
                period_failures.push(PeriodFailure {
                    reference_period: period,
                    code: error.code().to_string(),
                    message: error.to_string(),
                });
            }
            Err(error) => return Err(error),
        }
    }

    let leave_dates: Vec<NaiveDate> = facts
        .records()
        .iter()
        .filter(|r| r.kind.consumes_entitlement() && r.date < end)
        .map(|r| r.date)
        .collect();
    let consumption = track_consumption(
        &entries,
        &leave_dates,
        config.leave().consumption_rounding,
        step_number,
    );
    steps.push(consumption.audit_step);
    step_number += 1;
    if !consumption.over_consumption.is_empty() {
        warn!(
            contract_id = %contract.id,
            over_consumed_days = %consumption.over_consumption.days,
            "Leave taken without available entitlement"
        );
    }
    warnings.extend(consumption.warnings);

    let allocations: Vec<LeaveAllocation> = consumption
        .allocations
        .iter()
        .filter(|a| range.contains(a.date))
        .copied()
        .collect();
    let over_dates: Vec<NaiveDate> = consumption
        .over_consumption
        .dates
        .iter()
        .copied()
        .filter(|d| range.contains(*d))
        .collect();
    let over_consumption = OverConsumption {
        days: Decimal::from(over_dates.len()),
        dates: over_dates,
    };

    let mut bases: BTreeMap<LeaveReferencePeriod, OneTenthBase> = BTreeMap::new();
    let mut valuations = Vec::new();
    for block in group_into_blocks(&allocations, facts) {
        let Some(first_date) = block.first_date() else {
            continue;
        };
        let governing = resolve(first_date, settings, config)?.governing_snapshot;

        let base = match bases.get(&block.period) {
            Some(base) => *base,
            None => {
                let base =
                    one_tenth_base(block.period, &consumption.ledger, facts, settings, config)?;
                bases.insert(block.period, base);
                base
            }
        };

        let outcome = value_leave_block(&block, &governing, &base, config, step_number);
        step_number += outcome.audit_steps.len() as u32;
        steps.extend(outcome.audit_steps);
        if let Some(warning) = outcome.warning {
            warn!(
                contract_id = %contract.id,
                period_start = %block.period.start,
                "One-tenth valuation unavailable, maintenance applied"
            );
            warnings.push(warning);
        }
        debug!(
            contract_id = %contract.id,
            first_date = %first_date,
            days = %outcome.valuation.days_valued,
            amount_due = %outcome.valuation.amount_due,
            "Valued leave block"
        );
        valuations.push(outcome.valuation);
    }

    let ledger: Vec<EntitlementLedgerEntry> = consumption
        .ledger
        .into_iter()
        .filter(|entry| {
            entry.reference_period.overlaps(start, end)
                || allocations
                    .iter()
                    .any(|a| a.reference_period == entry.reference_period)
        })
        .collect();

    let summary = summarize_period(facts, settings, start, end, config)?;

    let amount_due_total: Decimal = valuations.iter().map(|v| v.amount_due).sum();
    info!(
        contract_id = %contract.id,
        ledger_entries = ledger.len(),
        valued_blocks = valuations.len(),
        amount_due_total = %amount_due_total,
        failures = period_failures.len(),
        "Paid leave computation complete"
    );

    Ok(PeriodComputation {
        contract_id: contract.id.clone(),
        range,
        ledger,
        allocations,
        over_consumption,
        valuations,
        period_failures,
        summary,
        audit_trace: AuditTrace { steps, warnings },
        engine_version: ENGINE_VERSION.to_string(),
    })
}

/// Computes the reference period that starts in `year`, with yearly totals.
///
/// The period's start month comes from the snapshot governing December 31
/// of `year`, or from the configured default when settings only begin
/// later. The period itself is then resolved from its last day like any
/// other range.
///
/// # Errors
///
/// Returns `NoApplicableSettings` if no snapshot governs the last day of
/// the period, plus any error of [`compute_period`].
pub fn compute_year(
    facts: &ContractFacts,
    settings: &SettingsTimeline,
    year: i32,
    config: &EngineConfig,
) -> EngineResult<YearComputation> {
    let out_of_range = EngineError::InvalidRange {
        start: NaiveDate::MIN,
        end: NaiveDate::MAX,
    };
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(out_of_range.clone())?;
    let default_month = config.leave().reference_period_start_month;
    let start_month = settings
        .governing(year_end)
        .map_or(default_month, |s| s.reference_start_month(default_month));
    let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or(out_of_range)?;
    let period = LeaveReferencePeriod::new(start);

    info!(contract_id = %facts.contract().id, year, period = %period, "Computing reference year");
    let computation = compute_period(facts, settings, period.start, period.end, config)?;
    let year_totals = year_totals(&computation, period);

    Ok(YearComputation {
        computation,
        year_totals,
    })
}

/// Recomputes a range from two sets of inputs and reports every reference
/// period whose valuations changed, with its amount due before and after.
///
/// Neither input is modified; nothing is stored.
pub fn regularize(
    before: &ComputationInputs,
    after: &ComputationInputs,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<Vec<RegularizationDelta>> {
    let previous = compute_period(&before.facts, &before.settings, start, end, config)?;
    let recomputed = compute_period(&after.facts, &after.settings, start, end, config)?;
    let deltas = diff_valuations(&previous.valuations, &recomputed.valuations);

    let net: Decimal = deltas.iter().map(|d| d.difference).sum();
    info!(
        contract_id = %after.facts.contract().id,
        %start,
        %end,
        changed_periods = deltas.len(),
        net_difference = %net,
        "Regularization computed"
    );
    Ok(deltas)
}

fn one_tenth_base(
    period: LeaveReferencePeriod,
    ledger: &[EntitlementLedgerEntry],
    facts: &ContractFacts,
    settings: &SettingsTimeline,
    config: &EngineConfig,
) -> EngineResult<OneTenthBase> {
    let entitled_days = ledger
        .iter()
        .find(|e| e.reference_period == period)
        .map(|e| e.days_consumable)
        .unwrap_or(Decimal::ZERO);
    let gross_pay = reference_gross_pay(period, facts, settings, config)?;
    Ok(OneTenthBase {
        period,
        gross_pay,
        entitled_days,
    })
}

fn year_totals(computation: &PeriodComputation, period: LeaveReferencePeriod) -> YearTotals {
    let entry = computation
        .ledger
        .iter()
        .find(|e| e.reference_period == period);
    let valuations = &computation.valuations;

    YearTotals {
        days_earned: entry.map(|e| e.days_earned).unwrap_or_default(),
        days_consumed: entry.map(|e| e.days_consumed).unwrap_or_default(),
        days_remaining: entry.map(|e| e.days_remaining).unwrap_or_default(),
        days_valued: valuations.iter().map(|v| v.days_valued).sum(),
        over_consumed_days: computation.over_consumption.days,
        maintenance_total: valuations.iter().map(|v| v.maintenance_amount).sum(),
        one_tenth_total: valuations.iter().map(|v| v.one_tenth_amount).sum(),
        amount_due_total: valuations.iter().map(|v| v.amount_due).sum(),
    }
}

fn resolution_step(resolved: &ResolvedPeriod, query: NaiveDate, step_number: u32) -> AuditStep {
    let snapshot = &resolved.governing_snapshot;
    AuditStep {
        step_number,
        rule_id: "reference_period_resolution".to_string(),
        rule_name: "Reference Period Resolution".to_string(),
        clause_ref: "R3141-4".to_string(),
        input: serde_json::json!({
            "date": query.to_string()
        }),
        output: serde_json::json!({
            "period_start": resolved.period.start.to_string(),
            "period_end": resolved.period.end.to_string(),
            "settings_effective_from": snapshot.effective_from.to_string(),
            "contract_kind": snapshot.contract_kind
        }),
        reasoning: format!(
            "{} falls in reference period {}; settings effective {} govern the period",
            query, resolved.period, snapshot.effective_from
        ),
    }
}
