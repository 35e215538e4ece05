//! Leave valuation outputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LeaveReferencePeriod;

/// The method whose amount was paid for a leave block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationMethod {
    /// Salary the childminder would have earned had they worked.
    Maintenance,
    /// One tenth of the reference-period gross pay, spread per day.
    OneTenth,
}

/// Why the one-tenth method could not be applied to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuationFallback {
    /// The source period has no consumable entitlement to divide by.
    ZeroEntitlementDays,
}

/// The valuation of one block of consecutive leave days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationResult {
    /// The period whose entitlement the block draws down.
    pub period: LeaveReferencePeriod,
    /// The leave dates in the block.
    pub dates: Vec<NaiveDate>,
    /// Number of days valued.
    pub days_valued: Decimal,
    /// Amount under the maintenance-of-salary method.
    pub maintenance_amount: Decimal,
    /// Amount under the one-tenth method.
    pub one_tenth_amount: Decimal,
    /// The larger of the two amounts.
    pub amount_due: Decimal,
    /// Which method produced `amount_due`.
    pub method_applied: ValuationMethod,
    /// Set when the one-tenth method was not applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<ValuationFallback>,
}

/// The change in amount due for one reference period after a recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularizationDelta {
    /// The reference period concerned.
    pub period: LeaveReferencePeriod,
    /// Amount due according to the previous inputs.
    pub previous_amount_due: Decimal,
    /// Amount due according to the corrected inputs.
    pub recomputed_amount_due: Decimal,
    /// `recomputed_amount_due - previous_amount_due`.
    pub difference: Decimal,
}
