//! Calculation logic for the paid-leave engine.
//!
//! This module contains the pure calculation steps the engine chains
//! together: reference-period resolution, accrual, FIFO consumption, rate
//! derivation, valuation of consumed leave, regularization diffs and the
//! period pay summary.

mod accrual;
mod consumption;
mod period_summary;
mod rates;
mod reference_period;
mod regularization;
mod valuation;

pub use accrual::{AccrualResult, calculate_accrual};
pub use consumption::{ConsumptionResult, track_consumption};
pub use period_summary::{days_in_month, summarize_period};
pub use rates::{
    DayPay, RateLookupResult, daily_reference_hours, day_pay, days_per_week, hourly_rate,
    lookup_rates, monthly_contracted_hours, weeks_per_year,
};
pub use reference_period::{
    ResolvedPeriod, reference_period_containing, reference_periods_between, resolve,
};
pub use regularization::{amount_due_by_period, diff_valuations};
pub use valuation::{
    BlockValuation, LeaveBlock, OneTenthBase, group_into_blocks, one_tenth_amount,
    reference_gross_pay, value_leave_block,
};
