//! Core data models for the paid-leave engine.
//!
//! Input facts (day-records, contracts, settings snapshots) and the derived
//! outputs (ledger, valuations, computation results) live here.

mod calculation_result;
mod contract;
mod day_record;
mod ledger;
mod settings;
mod valuation;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, DateRange, PeriodComputation, PeriodSummary,
    YearComputation, YearTotals,
};
pub use contract::{ComputationInputs, Contract, ContractFacts};
pub use day_record::{DayKind, DayRecord};
pub use ledger::{
    EntitlementLedgerEntry, LeaveAllocation, LeaveReferencePeriod, OverConsumption, PeriodFailure,
};
pub use settings::{ContractKind, ContractSettingsSnapshot, SettingsTimeline};
pub use valuation::{RegularizationDelta, ValuationFallback, ValuationMethod, ValuationResult};
