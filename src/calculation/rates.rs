//! Rate derivation from contract settings.
//!
//! This module turns a settings snapshot into the figures every other
//! calculation prices with: the mensualised hourly rate, the daily reference
//! hours and the pay of a single worked day.

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::models::{AuditStep, ContractKind, ContractSettingsSnapshot, DayRecord};

/// Rates derived from one settings snapshot, with the audit step recording
/// the derivation.
#[derive(Debug, Clone)]
pub struct RateLookupResult {
    /// Gross pay per contracted hour.
    pub hourly_rate: Decimal,
    /// Hours in one contracted working day.
    pub daily_reference_hours: Decimal,
    /// Weeks per year used to mensualise the salary.
    pub weeks_per_year: Decimal,
    /// Working days per week.
    pub days_per_week: Decimal,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Returns the weeks per year used to mensualise a contract.
///
/// Full-year contracts use the configured figure (52); incomplete-year
/// contracts use their own.
pub fn weeks_per_year(snapshot: &ContractSettingsSnapshot, config: &EngineConfig) -> Decimal {
    match snapshot.contract_kind {
        ContractKind::FullYear => config.valuation().full_year_weeks_per_year,
        ContractKind::IncompleteYear => snapshot
            .weeks_per_year
            .unwrap_or(config.valuation().full_year_weeks_per_year),
    }
}

/// Returns the working days per week of a contract.
pub fn days_per_week(snapshot: &ContractSettingsSnapshot, config: &EngineConfig) -> Decimal {
    snapshot
        .days_per_week
        .unwrap_or(config.valuation().default_days_per_week)
}

/// Returns the gross hourly rate:
/// `monthly_gross_salary × 12 / (weekly_contracted_hours × weeks_per_year)`.
///
/// # Example
///
/// ```no_run
/// use assmat_leave_engine::calculation::hourly_rate;
/// use assmat_leave_engine::config::ConfigLoader;
/// use assmat_leave_engine::models::{ContractKind, ContractSettingsSnapshot};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let config = ConfigLoader::load("./config/assmat").unwrap().into_config();
/// let snapshot = ContractSettingsSnapshot::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     Decimal::from(35),
///     Decimal::from(1600),
///     ContractKind::FullYear,
/// );
/// // 1600 × 12 / (35 × 52)
/// assert_eq!(hourly_rate(&snapshot, &config).round_dp(4), Decimal::new(105495, 4));
/// ```
pub fn hourly_rate(snapshot: &ContractSettingsSnapshot, config: &EngineConfig) -> Decimal {
    snapshot.monthly_gross_salary * Decimal::from(12)
        / (snapshot.weekly_contracted_hours * weeks_per_year(snapshot, config))
}

/// Returns the hours of one contracted day: `weekly hours / days per week`.
pub fn daily_reference_hours(
    snapshot: &ContractSettingsSnapshot,
    config: &EngineConfig,
) -> Decimal {
    snapshot.weekly_contracted_hours / days_per_week(snapshot, config)
}

/// Returns the mensualised monthly hours: `weekly hours × weeks per year / 12`.
pub fn monthly_contracted_hours(
    snapshot: &ContractSettingsSnapshot,
    config: &EngineConfig,
) -> Decimal {
    snapshot.weekly_contracted_hours * weeks_per_year(snapshot, config) / Decimal::from(12)
}

/// Derives all rates of a snapshot and records the derivation.
pub fn lookup_rates(
    snapshot: &ContractSettingsSnapshot,
    config: &EngineConfig,
    step_number: u32,
) -> RateLookupResult {
    let weeks = weeks_per_year(snapshot, config);
    let days = days_per_week(snapshot, config);
    let rate = hourly_rate(snapshot, config);
    let daily = daily_reference_hours(snapshot, config);

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_lookup".to_string(),
        rule_name: "Hourly Rate Derivation".to_string(),
        clause_ref: "L423-19".to_string(),
        input: serde_json::json!({
            "effective_from": snapshot.effective_from.to_string(),
            "weekly_contracted_hours": snapshot.weekly_contracted_hours.to_string(),
            "monthly_gross_salary": snapshot.monthly_gross_salary.to_string(),
            "weeks_per_year": weeks.to_string(),
            "days_per_week": days.to_string()
        }),
        output: serde_json::json!({
            "hourly_rate": rate.round_dp(6).to_string(),
            "daily_reference_hours": daily.round_dp(6).to_string()
        }),
        reasoning: format!(
            "{} x 12 / ({}h x {} weeks) = {} per hour; {}h / {} days = {}h per day",
            snapshot.monthly_gross_salary,
            snapshot.weekly_contracted_hours,
            weeks,
            rate.round_dp(4),
            snapshot.weekly_contracted_hours,
            days,
            daily.round_dp(4)
        ),
    };

    RateLookupResult {
        hourly_rate: rate,
        daily_reference_hours: daily,
        weeks_per_year: weeks,
        days_per_week: days,
        audit_step,
    }
}

/// The pay of one worked day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayPay {
    /// Worked hours up to the majoration threshold.
    pub normal_hours: Decimal,
    /// Worked hours above the majoration threshold.
    pub majorated_hours: Decimal,
    /// All worked hours at the hourly rate.
    pub base: Decimal,
    /// Extra pay on majorated hours.
    pub majoration: Decimal,
}

impl DayPay {
    /// Returns `base + majoration`.
    pub fn total(&self) -> Decimal {
        self.base + self.majoration
    }
}

/// Prices a day-record under a snapshot.
///
/// Hours above `majoration_threshold` are paid at
/// `hourly_rate × majoration_rate`. Non-worked days price at zero.
pub fn day_pay(
    record: &DayRecord,
    snapshot: &ContractSettingsSnapshot,
    config: &EngineConfig,
) -> DayPay {
    let hours = record.worked_hours();
    if hours <= Decimal::ZERO {
        return DayPay::default();
    }
    let rate = hourly_rate(snapshot, config);

    let (normal_hours, majorated_hours, majoration) =
        match (snapshot.majoration_threshold, snapshot.majoration_rate) {
            (Some(threshold), Some(multiplier)) if hours > threshold => {
                let above = hours - threshold;
                (threshold, above, above * rate * (multiplier - Decimal::ONE))
            }
            _ => (hours, Decimal::ZERO, Decimal::ZERO),
        };

    DayPay {
        normal_hours,
        majorated_hours,
        base: hours * rate,
        majoration,
    }
}
