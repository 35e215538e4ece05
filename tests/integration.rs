//! Integration tests for the paid-leave engine.
//!
//! This test suite runs the public operations against the shipped
//! configuration in `config/assmat`:
//! - Accrual over a full reference period (35h / 1600 EUR contract)
//! - Valuation of a leave block (maintenance vs one tenth)
//! - Idempotence and recomputability
//! - Regularization after a forgotten worked day
//! - Incomplete settings, over-consumption and error cases

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

use assmat_leave_engine::config::{ConfigLoader, EngineConfig};
use assmat_leave_engine::engine::{compute_period, compute_year, regularize};
use assmat_leave_engine::error::EngineError;
use assmat_leave_engine::models::{
    ComputationInputs, Contract, ContractFacts, ContractKind, ContractSettingsSnapshot, DayKind,
    DayRecord, SettingsTimeline, ValuationMethod,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn load_config() -> EngineConfig {
    ConfigLoader::load("./config/assmat")
        .expect("Failed to load config")
        .into_config()
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot(effective_from: NaiveDate, weekly: &str, salary: &str) -> ContractSettingsSnapshot {
    ContractSettingsSnapshot::new(
        effective_from,
        decimal(weekly),
        decimal(salary),
        ContractKind::FullYear,
    )
}

fn standard_settings() -> SettingsTimeline {
    SettingsTimeline::new(vec![snapshot(date(2024, 6, 1), "35", "1600")]).unwrap()
}

/// Worked weekdays of `hours` over `[start, end)`, with paid leave on `leave`.
fn weekday_records(
    start: NaiveDate,
    end: NaiveDate,
    hours: &str,
    leave: &[NaiveDate],
) -> Vec<DayRecord> {
    start
        .iter_days()
        .take_while(|d| *d < end)
        .filter_map(|d| {
            if leave.contains(&d) {
                Some(DayRecord::new(d, DayKind::AssmatLeave, Decimal::ZERO))
            } else if d.weekday().number_from_monday() <= 5 {
                Some(DayRecord::new(d, DayKind::Normal, decimal(hours)))
            } else {
                None
            }
        })
        .collect()
}

fn july_2025_leave() -> Vec<NaiveDate> {
    (7..=11).map(|d| date(2025, 7, d)).collect()
}

fn facts_with(hours: &str, leave: &[NaiveDate]) -> ContractFacts {
    ContractFacts::new(
        Contract::new("contract_001", date(2024, 6, 1)),
        weekday_records(date(2024, 6, 1), date(2025, 7, 12), hours, leave),
    )
    .unwrap()
}

// =============================================================================
// Accrual and valuation
// =============================================================================

#[test]
fn test_full_reference_period_earns_thirty_days() {
    let config = load_config();
    let facts = facts_with("7", &[]);

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2024, 6, 1),
        date(2025, 6, 1),
        &config,
    )
    .unwrap();

    assert_eq!(result.ledger.len(), 1);
    assert_eq!(result.ledger[0].days_earned, decimal("30"));
    assert_eq!(result.ledger[0].days_remaining, decimal("30"));
    assert!(result.period_failures.is_empty());
    assert!(
        result
            .audit_trace
            .steps
            .iter()
            .any(|s| s.rule_id == "leave_accrual" && s.clause_ref == "L3141-3")
    );
}

#[test]
fn test_leave_block_pays_the_larger_method() {
    let config = load_config();
    let facts = facts_with("7", &july_2025_leave());

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2025, 7, 1),
        date(2025, 8, 1),
        &config,
    )
    .unwrap();

    assert_eq!(result.valuations.len(), 1);
    let valuation = &result.valuations[0];
    assert_eq!(valuation.days_valued, decimal("5"));
    assert_eq!(valuation.period.start, date(2024, 6, 1));
    // 5 days x 7h x (1600 x 12 / 1820)
    assert_eq!(valuation.maintenance_amount, decimal("369.23"));
    assert!(valuation.one_tenth_amount < valuation.maintenance_amount);
    assert_eq!(valuation.amount_due, valuation.maintenance_amount);
    assert_eq!(valuation.method_applied, ValuationMethod::Maintenance);

    let source = result
        .ledger
        .iter()
        .find(|e| e.reference_period.start == date(2024, 6, 1))
        .unwrap();
    assert_eq!(source.days_consumed, decimal("5"));
    assert_eq!(source.days_remaining, decimal("25"));
}

#[test]
fn test_long_days_make_one_tenth_win() {
    let config = load_config();
    let facts = facts_with("10", &july_2025_leave());

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2025, 7, 1),
        date(2025, 8, 1),
        &config,
    )
    .unwrap();

    let valuation = &result.valuations[0];
    assert!(valuation.one_tenth_amount > valuation.maintenance_amount);
    assert_eq!(valuation.amount_due, valuation.one_tenth_amount);
    assert_eq!(valuation.method_applied, ValuationMethod::OneTenth);
}

#[test]
fn test_settings_of_period_last_day_govern_valuation() {
    let config = load_config();
    let facts = facts_with("7", &july_2025_leave());
    let settings = SettingsTimeline::new(vec![
        snapshot(date(2024, 6, 1), "35", "1600"),
        snapshot(date(2025, 9, 1), "35", "1820"),
    ])
    .unwrap();

    let result =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    // 1820 x 12 / 1820 = 12 per hour; 35h
    assert_eq!(result.valuations[0].maintenance_amount, decimal("420.00"));
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_identical_inputs_give_identical_json() {
    let config = load_config();
    let facts = facts_with("7", &july_2025_leave());
    let settings = standard_settings();

    let first =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();
    let second =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_later_facts_do_not_change_past_valuation() {
    let config = load_config();
    let settings = standard_settings();
    let facts = facts_with("7", &july_2025_leave());

    let before =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    let later = facts
        .with_record(DayRecord::new(date(2026, 7, 6), DayKind::AssmatLeave, Decimal::ZERO))
        .unwrap()
        .with_record(DayRecord::new(date(2026, 7, 3), DayKind::Normal, decimal("7")))
        .unwrap();
    let after =
        compute_period(&later, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    assert_eq!(before.valuations, after.valuations);
    assert_eq!(before.ledger, after.ledger);
}

// =============================================================================
// Regularization
// =============================================================================

#[test]
fn test_forgotten_worked_day_creates_regularization() {
    let config = load_config();
    let settings = standard_settings();
    let facts = facts_with("10", &july_2025_leave());
    let before = ComputationInputs::new(facts.clone(), settings.clone());

    // Saturday 2024-09-07 was worked but never recorded.
    let corrected = facts
        .with_record(DayRecord::new(date(2024, 9, 7), DayKind::Normal, decimal("10")))
        .unwrap();
    let after = ComputationInputs::new(corrected, settings.clone());

    let previous =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();
    let deltas = regularize(&before, &after, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    assert_eq!(deltas.len(), 1);
    let delta = &deltas[0];
    assert_eq!(delta.period.start, date(2024, 6, 1));
    assert_eq!(delta.previous_amount_due, previous.valuations[0].amount_due);
    assert!(delta.difference > Decimal::ZERO);
    assert_eq!(
        delta.difference,
        delta.recomputed_amount_due - delta.previous_amount_due
    );

    // The stored inputs are untouched by the recomputation.
    let again =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();
    assert_eq!(again.valuations, previous.valuations);
}

#[test]
fn test_forgotten_day_reported_when_maintenance_still_wins() {
    let config = load_config();
    let settings = standard_settings();
    let facts = facts_with("7", &july_2025_leave());
    let before = ComputationInputs::new(facts.clone(), settings.clone());

    // Saturday 2024-08-03, in the third month of the period.
    let corrected = facts
        .with_record(DayRecord::new(date(2024, 8, 3), DayKind::Normal, decimal("7")))
        .unwrap();
    let after = ComputationInputs::new(corrected.clone(), settings.clone());

    let previous =
        compute_period(&facts, &settings, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();
    let recomputed =
        compute_period(&corrected, &settings, date(2025, 7, 1), date(2025, 8, 1), &config)
            .unwrap();
    assert!(recomputed.valuations[0].one_tenth_amount > previous.valuations[0].one_tenth_amount);

    let deltas = regularize(&before, &after, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();

    assert_eq!(deltas.len(), 1);
    assert_eq!(deltas[0].period.start, date(2024, 6, 1));
    assert_eq!(deltas[0].previous_amount_due, decimal("369.23"));
    assert_eq!(deltas[0].recomputed_amount_due, decimal("369.23"));
    assert!(deltas[0].difference.is_zero());
}

#[test]
fn test_unchanged_inputs_need_no_regularization() {
    let config = load_config();
    let inputs = ComputationInputs::new(facts_with("7", &july_2025_leave()), standard_settings());

    let deltas =
        regularize(&inputs, &inputs, date(2025, 7, 1), date(2025, 8, 1), &config).unwrap();
    assert!(deltas.is_empty());
}

// =============================================================================
// Partial failures and warnings
// =============================================================================

#[test]
fn test_period_without_settings_is_reported_and_skipped() {
    let config = load_config();
    let facts = ContractFacts::new(
        Contract::new("contract_001", date(2023, 6, 1)),
        weekday_records(date(2023, 6, 1), date(2025, 6, 1), "7", &[]),
    )
    .unwrap();

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2023, 6, 1),
        date(2025, 6, 1),
        &config,
    )
    .unwrap();

    assert_eq!(result.period_failures.len(), 1);
    assert_eq!(
        result.period_failures[0].reference_period.start,
        date(2023, 6, 1)
    );
    assert_eq!(result.period_failures[0].code, "INCOMPLETE_PERIOD_DATA");
    assert_eq!(result.ledger.len(), 1);
    assert_eq!(result.ledger[0].days_earned, decimal("30"));
    assert!(
        result
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "INCOMPLETE_PERIOD_DATA")
    );
}

#[test]
fn test_over_consumption_is_flagged_not_valued() {
    let config = load_config();
    let leave: Vec<NaiveDate> = (1..=5).map(|d| date(2024, 7, d)).collect();
    let facts = ContractFacts::new(
        Contract::new("contract_001", date(2024, 6, 1)),
        weekday_records(date(2024, 6, 1), date(2024, 7, 13), "7", &leave),
    )
    .unwrap();

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2024, 7, 1),
        date(2024, 8, 1),
        &config,
    )
    .unwrap();

    // June and July worked: 5 days earned, all consumable.
    assert_eq!(result.ledger[0].days_earned, decimal("5"));
    assert_eq!(result.allocations.len(), 5);
    assert!(result.over_consumption.is_empty());

    let more_leave = facts
        .with_record(DayRecord::new(date(2024, 7, 15), DayKind::AssmatLeave, Decimal::ZERO))
        .unwrap();
    let result = compute_period(
        &more_leave,
        &standard_settings(),
        date(2024, 7, 1),
        date(2024, 8, 1),
        &config,
    )
    .unwrap();

    assert_eq!(result.over_consumption.dates, vec![date(2024, 7, 15)]);
    assert_eq!(result.over_consumption.days, decimal("1"));
    let valued: Decimal = result.valuations.iter().map(|v| v.days_valued).sum();
    assert_eq!(valued, decimal("5"));
    assert!(
        result
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "OVER_CONSUMPTION")
    );
}

#[test]
fn test_leave_in_unworked_month_only_lowers_balance() {
    let config = load_config();
    let facts = ContractFacts::new(
        Contract::new("contract_001", date(2024, 6, 1)),
        weekday_records(date(2024, 6, 1), date(2025, 3, 1), "7", &[]),
    )
    .unwrap();
    let with_leave = facts
        .with_record(DayRecord::new(date(2025, 3, 10), DayKind::AssmatLeave, Decimal::ZERO))
        .unwrap();
    let run = |facts: &ContractFacts| {
        compute_period(
            facts,
            &standard_settings(),
            date(2024, 6, 1),
            date(2025, 6, 1),
            &config,
        )
        .unwrap()
    };

    let before = run(&facts);
    let after = run(&with_leave);

    assert_eq!(before.ledger[0].days_earned, decimal("22.5"));
    assert_eq!(after.ledger[0].days_earned, decimal("22.5"));
    assert_eq!(before.ledger[0].days_remaining, decimal("23"));
    assert_eq!(after.ledger[0].days_remaining, decimal("22"));
}

// =============================================================================
// Year computation
// =============================================================================

#[test]
fn test_compute_year_reports_totals() {
    let config = load_config();
    let facts = facts_with("7", &[date(2024, 8, 5), date(2024, 8, 6)]);

    let result = compute_year(&facts, &standard_settings(), 2024, &config).unwrap();

    assert_eq!(result.computation.range.start, date(2024, 6, 1));
    assert_eq!(result.year_totals.days_earned, decimal("30"));
    assert_eq!(result.year_totals.days_consumed, decimal("2"));
    assert_eq!(result.year_totals.days_remaining, decimal("28"));
    assert_eq!(result.year_totals.days_valued, decimal("2"));
    assert_eq!(
        result.year_totals.amount_due_total,
        result.computation.valuations[0].amount_due
    );
}

// =============================================================================
// Error cases
// =============================================================================

#[test]
fn test_range_before_first_snapshot_fails() {
    let config = load_config();
    let facts = facts_with("7", &[]);

    let result = compute_period(
        &facts,
        &standard_settings(),
        date(2024, 1, 1),
        date(2024, 3, 1),
        &config,
    );

    assert_eq!(
        result.unwrap_err(),
        EngineError::NoApplicableSettings {
            date: date(2024, 2, 29)
        }
    );
}

#[test]
fn test_empty_range_is_rejected() {
    let config = load_config();
    let result = compute_period(
        &facts_with("7", &[]),
        &standard_settings(),
        date(2025, 1, 1),
        date(2025, 1, 1),
        &config,
    );
    assert!(matches!(result, Err(EngineError::InvalidRange { .. })));
}

#[test]
fn test_inputs_deserialize_from_boundary_json() {
    let config = load_config();
    let json = r#"{
        "facts": {
            "contract": {"id": "contract_json", "start_date": "2024-06-01"},
            "records": [
                {"date": "2024-06-03", "kind": "normal", "scheduled_hours": "9"},
                {"date": "2024-06-04", "kind": "holiday", "scheduled_hours": "9"},
                {"date": "2024-06-05", "kind": "absence", "scheduled_hours": "0"},
                {"date": "2024-06-06", "kind": "unpaid_leave", "scheduled_hours": "0"},
                {"date": "2024-07-01", "kind": "assmat_leave", "scheduled_hours": "0"}
            ]
        },
        "settings": [
            {"effective_from": "2024-06-01", "weekly_contracted_hours": "35",
             "monthly_gross_salary": "1600", "contract_kind": "full_year"}
        ]
    }"#;

    let inputs: ComputationInputs = serde_json::from_str(json).unwrap();
    let result = compute_period(
        &inputs.facts,
        &inputs.settings,
        date(2024, 6, 1),
        date(2024, 8, 1),
        &config,
    )
    .unwrap();

    assert_eq!(result.contract_id, "contract_json");
    assert_eq!(result.summary.worked_days, 1);
    assert_eq!(result.summary.holiday_days, 1);
    assert_eq!(result.summary.unpaid_leave_days, 1);
    assert_eq!(result.summary.leave_days, 1);
    // Only June was worked; the July leave day earns nothing.
    assert_eq!(result.ledger[0].days_earned, decimal("2.5"));
}

#[test]
fn test_duplicate_records_rejected_at_boundary() {
    let json = r#"{
        "facts": {
            "contract": {"id": "c1", "start_date": "2024-06-01"},
            "records": [
                {"date": "2024-06-03", "kind": "normal", "scheduled_hours": "9"},
                {"date": "2024-06-03", "kind": "assmat_leave", "scheduled_hours": "0"}
            ]
        },
        "settings": [
            {"effective_from": "2024-06-01", "weekly_contracted_hours": "35",
             "monthly_gross_salary": "1600", "contract_kind": "full_year"}
        ]
    }"#;

    let error = serde_json::from_str::<ComputationInputs>(json).unwrap_err();
    assert!(error.to_string().contains("Duplicate day record"));
}
