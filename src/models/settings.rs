//! Time-versioned contract settings.
//!
//! Settings are never edited in place: every change is a new
//! [`ContractSettingsSnapshot`] appended to a [`SettingsTimeline`], and the
//! settings governing a date are those of the latest snapshot effective on
//! or before it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The kind of childminder contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// The child is cared for all year (52 paid weeks).
    FullYear,
    /// The contract covers fewer weeks per year (année incomplète).
    IncompleteYear,
}

/// The settings of a contract from a given date onward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractSettingsSnapshot {
    /// First day these settings apply.
    pub effective_from: NaiveDate,
    /// Contracted hours per week.
    pub weekly_contracted_hours: Decimal,
    /// Mensualised gross monthly salary.
    pub monthly_gross_salary: Decimal,
    /// Full-year or incomplete-year contract.
    pub contract_kind: ContractKind,
    /// First month of the leave reference period; the configured default
    /// applies when absent.
    #[serde(default)]
    pub leave_reference_period_start_month: Option<u32>,
    /// Weeks of care per year; required for incomplete-year contracts.
    #[serde(default)]
    pub weeks_per_year: Option<Decimal>,
    /// Working days per week.
    #[serde(default)]
    pub days_per_week: Option<Decimal>,
    /// Daily hours above which a majoration applies.
    #[serde(default)]
    pub majoration_threshold: Option<Decimal>,
    /// Multiplier applied to hours above the majoration threshold.
    #[serde(default)]
    pub majoration_rate: Option<Decimal>,
    /// Meal fee owed per flagged day.
    #[serde(default)]
    pub fee_meal_amount: Option<Decimal>,
    /// Maintenance fee owed per flagged day.
    #[serde(default)]
    pub fee_maintenance_amount: Option<Decimal>,
}

impl ContractSettingsSnapshot {
    /// Creates a snapshot with only the mandatory fields set.
    pub fn new(
        effective_from: NaiveDate,
        weekly_contracted_hours: Decimal,
        monthly_gross_salary: Decimal,
        contract_kind: ContractKind,
    ) -> Self {
        Self {
            effective_from,
            weekly_contracted_hours,
            monthly_gross_salary,
            contract_kind,
            leave_reference_period_start_month: None,
            weeks_per_year: None,
            days_per_week: None,
            majoration_threshold: None,
            majoration_rate: None,
            fee_meal_amount: None,
            fee_maintenance_amount: None,
        }
    }

    /// Returns the first month of the reference period for this snapshot.
    pub fn reference_start_month(&self, default_month: u32) -> u32 {
        self.leave_reference_period_start_month
            .unwrap_or(default_month)
    }

    fn invalid(&self, field: &str, message: impl Into<String>) -> EngineError {
        EngineError::InvalidSettings {
            effective_from: self.effective_from,
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Checks the snapshot for unusable values.
    pub fn validate(&self) -> EngineResult<()> {
        if self.weekly_contracted_hours <= Decimal::ZERO {
            return Err(self.invalid("weekly_contracted_hours", "must be > 0"));
        }
        if self.monthly_gross_salary <= Decimal::ZERO {
            return Err(self.invalid("monthly_gross_salary", "must be > 0"));
        }
        if let Some(month) = self.leave_reference_period_start_month {
            if !(1..=12).contains(&month) {
                return Err(self.invalid(
                    "leave_reference_period_start_month",
                    format!("must be within 1..=12 (got {})", month),
                ));
            }
        }
        match self.weeks_per_year {
            Some(weeks) if weeks <= Decimal::ZERO || weeks > Decimal::from(52) => {
                return Err(self.invalid(
                    "weeks_per_year",
                    format!("must be within (0, 52] (got {})", weeks),
                ));
            }
            None if self.contract_kind == ContractKind::IncompleteYear => {
                return Err(self.invalid(
                    "weeks_per_year",
                    "is required for incomplete-year contracts",
                ));
            }
            _ => {}
        }
        if let Some(days) = self.days_per_week {
            if days <= Decimal::ZERO || days > Decimal::from(7) {
                return Err(self.invalid(
                    "days_per_week",
                    format!("must be within (0, 7] (got {})", days),
                ));
            }
        }
        if self.majoration_threshold.is_some() != self.majoration_rate.is_some() {
            return Err(self.invalid(
                "majoration_rate",
                "majoration_threshold and majoration_rate must be set together",
            ));
        }
        Ok(())
    }
}

/// An append-only, ordered sequence of settings snapshots for one contract.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::models::{ContractKind, ContractSettingsSnapshot, SettingsTimeline};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
/// let mut timeline = SettingsTimeline::new(vec![ContractSettingsSnapshot::new(
///     d(2024, 1, 1),
///     Decimal::from(35),
///     Decimal::from(1600),
///     ContractKind::FullYear,
/// )])
/// .unwrap();
///
/// timeline
///     .push(ContractSettingsSnapshot::new(
///         d(2024, 9, 1),
///         Decimal::from(40),
///         Decimal::from(1800),
///         ContractKind::FullYear,
///     ))
///     .unwrap();
///
/// let governing = timeline.governing(d(2024, 8, 31)).unwrap();
/// assert_eq!(governing.weekly_contracted_hours, Decimal::from(35));
/// assert!(timeline.governing(d(2023, 12, 31)).is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<ContractSettingsSnapshot>",
    into = "Vec<ContractSettingsSnapshot>"
)]
pub struct SettingsTimeline {
    snapshots: Vec<ContractSettingsSnapshot>,
}

impl SettingsTimeline {
    /// Builds a timeline from snapshots in any order.
    ///
    /// Fails if two snapshots share an effective date or any snapshot is
    /// invalid.
    pub fn new(mut snapshots: Vec<ContractSettingsSnapshot>) -> EngineResult<Self> {
        snapshots.sort_by_key(|s| s.effective_from);
        for snapshot in &snapshots {
            snapshot.validate()?;
        }
        if let Some(pair) = snapshots
            .windows(2)
            .find(|w| w[0].effective_from == w[1].effective_from)
        {
            return Err(EngineError::DuplicateSnapshot {
                effective_from: pair[0].effective_from,
            });
        }
        Ok(Self { snapshots })
    }

    /// Appends a snapshot that takes effect after every existing one.
    pub fn push(&mut self, snapshot: ContractSettingsSnapshot) -> EngineResult<()> {
        snapshot.validate()?;
        if let Some(latest) = self.snapshots.last() {
            if snapshot.effective_from == latest.effective_from {
                return Err(EngineError::DuplicateSnapshot {
                    effective_from: snapshot.effective_from,
                });
            }
            if snapshot.effective_from < latest.effective_from {
                return Err(EngineError::NonMonotonicSnapshot {
                    effective_from: snapshot.effective_from,
                    latest: latest.effective_from,
                });
            }
        }
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Returns the snapshot governing `date`, if any.
    pub fn governing(&self, date: NaiveDate) -> Option<&ContractSettingsSnapshot> {
        let idx = self
            .snapshots
            .partition_point(|s| s.effective_from <= date);
        idx.checked_sub(1).map(|i| &self.snapshots[i])
    }

    /// Returns the snapshot governing `date` or `NoApplicableSettings`.
    pub fn governing_or_err(&self, date: NaiveDate) -> EngineResult<&ContractSettingsSnapshot> {
        self.governing(date)
            .ok_or(EngineError::NoApplicableSettings { date })
    }

    /// Returns the earliest snapshot.
    pub fn first(&self) -> Option<&ContractSettingsSnapshot> {
        self.snapshots.first()
    }

    /// Returns all snapshots, oldest first.
    pub fn snapshots(&self) -> &[ContractSettingsSnapshot] {
        &self.snapshots
    }

    /// Returns true if the timeline holds no snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl TryFrom<Vec<ContractSettingsSnapshot>> for SettingsTimeline {
    type Error = EngineError;

    fn try_from(snapshots: Vec<ContractSettingsSnapshot>) -> Result<Self, Self::Error> {
        SettingsTimeline::new(snapshots)
    }
}

impl From<SettingsTimeline> for Vec<ContractSettingsSnapshot> {
    fn from(timeline: SettingsTimeline) -> Self {
        timeline.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot(effective_from: NaiveDate, weekly: &str) -> ContractSettingsSnapshot {
        ContractSettingsSnapshot::new(
            effective_from,
            dec(weekly),
            dec("1600"),
            ContractKind::FullYear,
        )
    }

    #[test]
    fn test_new_sorts_snapshots() {
        let timeline = SettingsTimeline::new(vec![
            snapshot(date(2024, 9, 1), "40"),
            snapshot(date(2024, 1, 1), "35"),
        ])
        .unwrap();

        let dates: Vec<_> = timeline.snapshots().iter().map(|s| s.effective_from).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 9, 1)]);
    }

    #[test]
    fn test_new_rejects_duplicate_effective_dates() {
        let result = SettingsTimeline::new(vec![
            snapshot(date(2024, 1, 1), "35"),
            snapshot(date(2024, 1, 1), "40"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            EngineError::DuplicateSnapshot {
                effective_from: date(2024, 1, 1)
            }
        );
    }

    #[test]
    fn test_push_rejects_backdated_snapshot() {
        let mut timeline = SettingsTimeline::new(vec![snapshot(date(2024, 9, 1), "35")]).unwrap();
        let result = timeline.push(snapshot(date(2024, 1, 1), "40"));

        assert!(matches!(
            result,
            Err(EngineError::NonMonotonicSnapshot { .. })
        ));
        assert_eq!(timeline.snapshots().len(), 1);
    }

    #[test]
    fn test_governing_boundaries() {
        let timeline = SettingsTimeline::new(vec![
            snapshot(date(2024, 1, 1), "35"),
            snapshot(date(2024, 9, 1), "40"),
        ])
        .unwrap();

        assert!(timeline.governing(date(2023, 12, 31)).is_none());
        assert_eq!(
            timeline.governing(date(2024, 1, 1)).unwrap().weekly_contracted_hours,
            dec("35")
        );
        assert_eq!(
            timeline.governing(date(2024, 8, 31)).unwrap().weekly_contracted_hours,
            dec("35")
        );
        assert_eq!(
            timeline.governing(date(2024, 9, 1)).unwrap().weekly_contracted_hours,
            dec("40")
        );
        assert_eq!(
            timeline.governing(date(2030, 1, 1)).unwrap().weekly_contracted_hours,
            dec("40")
        );
    }

    #[test]
    fn test_governing_or_err_before_first_snapshot() {
        let timeline = SettingsTimeline::new(vec![snapshot(date(2024, 1, 1), "35")]).unwrap();
        assert_eq!(
            timeline.governing_or_err(date(2023, 6, 1)).unwrap_err(),
            EngineError::NoApplicableSettings {
                date: date(2023, 6, 1)
            }
        );
    }

    #[test]
    fn test_incomplete_year_requires_weeks_per_year() {
        let mut s = snapshot(date(2024, 1, 1), "35");
        s.contract_kind = ContractKind::IncompleteYear;
        assert!(matches!(
            s.validate(),
            Err(EngineError::InvalidSettings { ref field, .. }) if field == "weeks_per_year"
        ));

        s.weeks_per_year = Some(dec("42"));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_start_month() {
        let mut s = snapshot(date(2024, 1, 1), "35");
        s.leave_reference_period_start_month = Some(0);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_majoration_fields_must_be_paired() {
        let mut s = snapshot(date(2024, 1, 1), "35");
        s.majoration_threshold = Some(dec("9"));
        assert!(s.validate().is_err());
        s.majoration_rate = Some(dec("1.25"));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_timeline_deserializes_and_validates() {
        let json = r#"[
            {"effective_from": "2024-09-01", "weekly_contracted_hours": "40",
             "monthly_gross_salary": "1800", "contract_kind": "full_year"},
            {"effective_from": "2024-01-01", "weekly_contracted_hours": "35",
             "monthly_gross_salary": "1600", "contract_kind": "full_year",
             "leave_reference_period_start_month": 6}
        ]"#;

        let timeline: SettingsTimeline = serde_json::from_str(json).unwrap();
        assert_eq!(timeline.first().unwrap().effective_from, date(2024, 1, 1));
        assert_eq!(timeline.first().unwrap().reference_start_month(1), 6);

        let bad = r#"[
            {"effective_from": "2024-01-01", "weekly_contracted_hours": "0",
             "monthly_gross_salary": "1800", "contract_kind": "full_year"}
        ]"#;
        assert!(serde_json::from_str::<SettingsTimeline>(bad).is_err());
    }
}
