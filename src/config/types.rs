//! Configuration types for leave computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML rule files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Metadata about the labor regime the rules implement.
#[derive(Debug, Clone, Deserialize)]
pub struct RegimeMetadata {
    /// Short identifier of the regime (e.g., "IDCC-3239").
    pub code: String,
    /// The human-readable name of the regime.
    pub name: String,
    /// The version or effective date of the rule set.
    pub version: String,
    /// URL to the official documentation.
    pub source_url: String,
}

/// Granularity to which fractional entitlement is rounded up when consumed.
///
/// Accrual always keeps exact values; rounding only happens when the
/// consumable balance of a reference period is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingGranularity {
    /// Round up to the next whole day (Code du travail L3141-7).
    WholeDay,
    /// Round up to the next half day.
    HalfDay,
    /// Round up to the next quarter day.
    QuarterDay,
}

impl RoundingGranularity {
    /// Returns the size of one rounding step, in days.
    pub fn step(&self) -> Decimal {
        match self {
            RoundingGranularity::WholeDay => Decimal::ONE,
            RoundingGranularity::HalfDay => Decimal::new(5, 1),
            RoundingGranularity::QuarterDay => Decimal::new(25, 2),
        }
    }

    /// Rounds a day count up to the next multiple of the step.
    ///
    /// # Example
    ///
    /// ```
    /// use assmat_leave_engine::config::RoundingGranularity;
    /// use rust_decimal::Decimal;
    ///
    /// let days = Decimal::new(225, 1); // 22.5
    /// assert_eq!(RoundingGranularity::WholeDay.round_up(days), Decimal::from(23));
    /// assert_eq!(RoundingGranularity::HalfDay.round_up(days), Decimal::new(225, 1));
    /// ```
    pub fn round_up(&self, days: Decimal) -> Decimal {
        if days <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        let step = self.step();
        ((days / step).ceil() * step).normalize()
    }
}

/// Leave accrual rules, loaded from `leave.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveRules {
    /// Days earned per calendar month with work (2.5 in the French regime).
    pub days_per_month: Decimal,
    /// Maximum days earned over one full reference period (30).
    pub annual_cap_days: Decimal,
    /// Default first month of the reference period when a snapshot omits it.
    pub reference_period_start_month: u32,
    /// Granularity used when fractional entitlement is consumed.
    pub consumption_rounding: RoundingGranularity,
    /// Reference to the legal clause for accrual.
    #[serde(default = "default_accrual_clause")]
    pub clause: String,
}

fn default_accrual_clause() -> String {
    "L3141-3".to_string()
}

impl LeaveRules {
    /// Checks that the rule values are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.days_per_month <= Decimal::ZERO {
            return Err("days_per_month must be > 0".to_string());
        }
        if self.annual_cap_days <= Decimal::ZERO {
            return Err("annual_cap_days must be > 0".to_string());
        }
        if !(1..=12).contains(&self.reference_period_start_month) {
            return Err(format!(
                "reference_period_start_month must be within 1..=12 (got {})",
                self.reference_period_start_month
            ));
        }
        Ok(())
    }
}

/// Leave valuation rules, loaded from `valuation.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuationRules {
    /// Fraction of reference-period gross pay owed as leave pay (0.10).
    pub one_tenth_rate: Decimal,
    /// Weeks per year used to mensualise full-year contracts (52).
    pub full_year_weeks_per_year: Decimal,
    /// Working days per week when a snapshot does not state it.
    pub default_days_per_week: Decimal,
    /// Decimal places monetary amounts are rounded to.
    pub money_decimal_places: u32,
    /// Reference to the legal clause for valuation.
    #[serde(default = "default_valuation_clause")]
    pub clause: String,
}

fn default_valuation_clause() -> String {
    "L3141-24".to_string()
}

impl ValuationRules {
    /// Checks that the rule values are usable.
    pub fn validate(&self) -> Result<(), String> {
        if self.one_tenth_rate <= Decimal::ZERO || self.one_tenth_rate > Decimal::ONE {
            return Err(format!(
                "one_tenth_rate must be within (0, 1] (got {})",
                self.one_tenth_rate
            ));
        }
        if self.full_year_weeks_per_year <= Decimal::ZERO {
            return Err("full_year_weeks_per_year must be > 0".to_string());
        }
        if self.default_days_per_week <= Decimal::ZERO || self.default_days_per_week > Decimal::from(7)
        {
            return Err(format!(
                "default_days_per_week must be within (0, 7] (got {})",
                self.default_days_per_week
            ));
        }
        Ok(())
    }
}

/// The complete engine configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Regime metadata.
    metadata: RegimeMetadata,
    /// Accrual rules.
    leave: LeaveRules,
    /// Valuation rules.
    valuation: ValuationRules,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(metadata: RegimeMetadata, leave: LeaveRules, valuation: ValuationRules) -> Self {
        Self {
            metadata,
            leave,
            valuation,
        }
    }

    /// Returns the regime metadata.
    pub fn regime(&self) -> &RegimeMetadata {
        &self.metadata
    }

    /// Returns the accrual rules.
    pub fn leave(&self) -> &LeaveRules {
        &self.leave
    }

    /// Returns the valuation rules.
    pub fn valuation(&self) -> &ValuationRules {
        &self.valuation
    }

    /// Returns a copy of this configuration with different accrual rules.
    pub fn with_leave_rules(&self, leave: LeaveRules) -> Self {
        Self {
            metadata: self.metadata.clone(),
            leave,
            valuation: self.valuation.clone(),
        }
    }

    /// Rounds a monetary amount to the configured number of decimal places.
    pub fn round_money(&self, amount: Decimal) -> Decimal {
        amount.round_dp_with_strategy(
            self.valuation.money_decimal_places,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        )
    }
}
