//! Pay and day-count summary over a date range.

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ContractFacts, DayKind, PeriodSummary, SettingsTimeline};

use super::rates::{daily_reference_hours, day_pay, hourly_rate, monthly_contracted_hours};

/// Returns the number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> i64 {
    let first = date.with_day(1).unwrap_or(date);
    ((first + Months::new(1)) - first).num_days()
}

/// Summarizes contracted and actual pay over `[start, end)`.
///
/// Theoretical hours and salary accrue per calendar day of contract
/// activity (monthly figure of the governing snapshot / days in month), so
/// a settings change mid-month is prorated by day. Actual figures price
/// each record under the snapshot in force that day. Days without a
/// governing snapshot only count toward the day counts.
///
/// # Errors
///
/// Returns `InvalidRange` if `start >= end`.
pub fn summarize_period(
    facts: &ContractFacts,
    timeline: &SettingsTimeline,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<PeriodSummary> {
    if start >= end {
        return Err(EngineError::InvalidRange { start, end });
    }

    let mut summary = PeriodSummary::default();
    let contract = facts.contract();

    for day in start.iter_days().take_while(|d| *d < end) {
        if !contract.is_active_on(day) {
            continue;
        }
        if let Some(snapshot) = timeline.governing(day) {
            let month_days = Decimal::from(days_in_month(day));
            summary.theoretical_hours += monthly_contracted_hours(snapshot, config) / month_days;
            summary.theoretical_salary += snapshot.monthly_gross_salary / month_days;
        }
    }

    for record in facts.records_between(start, end) {
        match record.kind {
            DayKind::Normal => summary.worked_days += 1,
            DayKind::Absence => summary.absence_days += 1,
            DayKind::AssmatLeave => summary.leave_days += 1,
            DayKind::UnpaidLeave => summary.unpaid_leave_days += 1,
            DayKind::Holiday => summary.holiday_days += 1,
        }

        let Some(snapshot) = timeline.governing(record.date) else {
            continue;
        };

        let pay = day_pay(record, snapshot, config);
        summary.hours_real += record.worked_hours();
        summary.normal_hours += pay.normal_hours;
        summary.majorated_hours += pay.majorated_hours;
        summary.salary_base += pay.base;
        summary.majoration_salary += pay.majoration;

        if record.meal_fee_flag {
            summary.fee_meal_total += snapshot.fee_meal_amount.unwrap_or(Decimal::ZERO);
        }
        if record.maintenance_fee_flag {
            summary.fee_maintenance_total +=
                snapshot.fee_maintenance_amount.unwrap_or(Decimal::ZERO);
        }
        if record.kind == DayKind::UnpaidLeave {
            summary.unpaid_leave_deduction +=
                daily_reference_hours(snapshot, config) * hourly_rate(snapshot, config);
        }
    }

    summary.theoretical_hours = summary.theoretical_hours.round_dp(2);
    summary.theoretical_salary = config.round_money(summary.theoretical_salary);
    summary.salary_base = config.round_money(summary.salary_base);
    summary.majoration_salary = config.round_money(summary.majoration_salary);
    summary.salary_real = summary.salary_base + summary.majoration_salary;
    summary.fee_meal_total = config.round_money(summary.fee_meal_total);
    summary.fee_maintenance_total = config.round_money(summary.fee_maintenance_total);
    summary.unpaid_leave_deduction = config.round_money(summary.unpaid_leave_deduction);

    Ok(summary)
}
