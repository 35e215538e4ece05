//! Error types for the paid-leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while resolving settings,
//! accruing, consuming and valuing paid leave.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the paid-leave engine.
///
/// Every fallible operation in the engine returns this error type. Some
/// variants are fatal for a whole computation (`NoApplicableSettings`), some
/// only for one reference period (`IncompletePeriodData`) and one is always
/// recovered locally (`ZeroEntitlementDays`).
///
/// # Example
///
/// ```
/// use assmat_leave_engine::error::EngineError;
/// use chrono::NaiveDate;
///
/// let error = EngineError::NoApplicableSettings {
///     date: NaiveDate::from_ymd_opt(2023, 5, 2).unwrap(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "No contract settings applicable on 2023-05-02"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or holds invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The query date precedes every settings snapshot of the contract.
    #[error("No contract settings applicable on {date}")]
    NoApplicableSettings {
        /// The date for which settings were requested.
        date: NaiveDate,
    },

    /// A reference period has a hole in its settings timeline.
    #[error("Incomplete data for reference period {period_start} to {period_end}: {message}")]
    IncompletePeriodData {
        /// First day of the affected reference period.
        period_start: NaiveDate,
        /// Exclusive end of the affected reference period.
        period_end: NaiveDate,
        /// A description of the missing coverage.
        message: String,
    },

    /// The one-tenth method has no entitled days to divide by.
    #[error("No entitlement days accrued for reference period starting {period_start}")]
    ZeroEntitlementDays {
        /// First day of the reference period with zero entitlement.
        period_start: NaiveDate,
    },

    /// A requested date range is empty or inverted.
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidRange {
        /// The requested start date (inclusive).
        start: NaiveDate,
        /// The requested end date (exclusive).
        end: NaiveDate,
    },

    /// A day-record was invalid or contained inconsistent data.
    #[error("Invalid day record on {date}: {message}")]
    InvalidDayRecord {
        /// The date of the invalid record.
        date: NaiveDate,
        /// A description of what made the record invalid.
        message: String,
    },

    /// Two day-records were supplied for the same date.
    #[error("Duplicate day record for contract '{contract_id}' on {date}")]
    DuplicateDayRecord {
        /// The contract owning the records.
        contract_id: String,
        /// The duplicated date.
        date: NaiveDate,
    },

    /// Two settings snapshots share the same effective date.
    #[error("Duplicate settings snapshot effective from {effective_from}")]
    DuplicateSnapshot {
        /// The duplicated effective date.
        effective_from: NaiveDate,
    },

    /// A snapshot was appended out of order.
    #[error("Settings snapshot effective from {effective_from} is not after the latest snapshot ({latest})")]
    NonMonotonicSnapshot {
        /// The effective date of the rejected snapshot.
        effective_from: NaiveDate,
        /// The effective date of the latest snapshot already in the timeline.
        latest: NaiveDate,
    },

    /// A settings snapshot held an unusable value.
    #[error("Invalid settings field '{field}' (effective {effective_from}): {message}")]
    InvalidSettings {
        /// The effective date of the offending snapshot.
        effective_from: NaiveDate,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

impl EngineError {
    /// Returns a stable, machine-readable code for this error.
    ///
    /// Used when an error is reported inside a result (period failures)
    /// rather than returned.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::NoApplicableSettings { .. } => "NO_APPLICABLE_SETTINGS",
            EngineError::IncompletePeriodData { .. } => "INCOMPLETE_PERIOD_DATA",
            EngineError::ZeroEntitlementDays { .. } => "ZERO_ENTITLEMENT_DAYS",
            EngineError::InvalidRange { .. } => "INVALID_RANGE",
            EngineError::InvalidDayRecord { .. } => "INVALID_DAY_RECORD",
            EngineError::DuplicateDayRecord { .. } => "DUPLICATE_DAY_RECORD",
            EngineError::DuplicateSnapshot { .. } => "DUPLICATE_SNAPSHOT",
            EngineError::NonMonotonicSnapshot { .. } => "NON_MONOTONIC_SNAPSHOT",
            EngineError::InvalidSettings { .. } => "INVALID_SETTINGS",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
