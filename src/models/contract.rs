//! Contract identity and the validated set of day-records attached to it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{DayRecord, SettingsTimeline};

/// A childminder contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    /// Stable identifier of the contract.
    pub id: String,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract (inclusive); open-ended when absent.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Contract {
    /// Creates an open-ended contract.
    pub fn new(id: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            start_date,
            end_date: None,
        }
    }

    /// Returns true if the contract is in force on `date`.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Counts the contract's active days within `[start, end)`.
    pub fn active_days_within(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let from = start.max(self.start_date);
        let to = match self.end_date.and_then(|d| d.succ_opt()) {
            Some(after_last) => end.min(after_last),
            None => end,
        };
        (to - from).num_days().max(0)
    }
}

#[derive(Deserialize)]
struct RawContractFacts {
    contract: Contract,
    #[serde(default)]
    records: Vec<DayRecord>,
}

/// A contract together with its validated, date-ordered day-records.
///
/// Holds at most one record per date, each inside the contract's active
/// span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawContractFacts")]
pub struct ContractFacts {
    contract: Contract,
    records: Vec<DayRecord>,
}

impl ContractFacts {
    /// Validates and orders the records of a contract.
    ///
    /// # Errors
    ///
    /// - `DuplicateDayRecord` if two records share a date
    /// - `InvalidDayRecord` if a record is malformed or dated outside the
    ///   contract
    ///
    /// # Example
    ///
    /// ```
    /// use assmat_leave_engine::models::{Contract, ContractFacts, DayKind, DayRecord};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
    /// let contract = Contract::new("contract_001", d(1, 1));
    /// let facts = ContractFacts::new(
    ///     contract,
    ///     vec![
    ///         DayRecord::new(d(1, 3), DayKind::Normal, Decimal::from(8)),
    ///         DayRecord::new(d(1, 2), DayKind::Normal, Decimal::from(8)),
    ///     ],
    /// )
    /// .unwrap();
    /// assert_eq!(facts.records()[0].date, d(1, 2));
    /// ```
    pub fn new(contract: Contract, mut records: Vec<DayRecord>) -> EngineResult<Self> {
        records.sort_by_key(|r| r.date);
        for record in &records {
            record.validate()?;
            if !contract.is_active_on(record.date) {
                return Err(EngineError::InvalidDayRecord {
                    date: record.date,
                    message: format!("outside the active span of contract '{}'", contract.id),
                });
            }
        }
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(EngineError::DuplicateDayRecord {
                contract_id: contract.id.clone(),
                date: pair[0].date,
            });
        }
        Ok(Self { contract, records })
    }

    /// Returns a copy of these facts with one more record.
    pub fn with_record(&self, record: DayRecord) -> EngineResult<Self> {
        let mut records = self.records.clone();
        records.push(record);
        Self::new(self.contract.clone(), records)
    }

    /// Returns the contract.
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Returns every record, oldest first.
    pub fn records(&self) -> &[DayRecord] {
        &self.records
    }

    /// Returns the records dated within `[start, end)`.
    pub fn records_between(&self, start: NaiveDate, end: NaiveDate) -> &[DayRecord] {
        let lo = self.records.partition_point(|r| r.date < start);
        let hi = self.records.partition_point(|r| r.date < end);
        &self.records[lo..hi.max(lo)]
    }

    /// Returns the record on `date`, if any.
    pub fn record_on(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.records
            .binary_search_by_key(&date, |r| r.date)
            .ok()
            .map(|i| &self.records[i])
    }
}

impl TryFrom<RawContractFacts> for ContractFacts {
    type Error = EngineError;

    fn try_from(raw: RawContractFacts) -> Result<Self, Self::Error> {
        ContractFacts::new(raw.contract, raw.records)
    }
}

/// Everything the engine reads for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationInputs {
    /// The contract and its day-records.
    pub facts: ContractFacts,
    /// The contract's settings history.
    pub settings: SettingsTimeline,
}

impl ComputationInputs {
    /// Bundles facts and settings.
    pub fn new(facts: ContractFacts, settings: SettingsTimeline) -> Self {
        Self { facts, settings }
    }
}
