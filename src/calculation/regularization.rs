//! Regularization of previously computed leave pay.
//!
//! Compares two sets of valuations per reference period and reports every
//! period whose valuations changed, even when the amount due did not.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{LeaveReferencePeriod, RegularizationDelta, ValuationResult};

/// Sums `amount_due` per reference period.
pub fn amount_due_by_period(
    valuations: &[ValuationResult],
) -> BTreeMap<LeaveReferencePeriod, Decimal> {
    let mut totals = BTreeMap::new();
    for valuation in valuations {
        *totals.entry(valuation.period).or_insert(Decimal::ZERO) += valuation.amount_due;
    }
    totals
}

fn valuations_by_period(
    valuations: &[ValuationResult],
) -> BTreeMap<LeaveReferencePeriod, Vec<&ValuationResult>> {
    let mut grouped: BTreeMap<LeaveReferencePeriod, Vec<&ValuationResult>> = BTreeMap::new();
    for valuation in valuations {
        grouped.entry(valuation.period).or_default().push(valuation);
    }
    grouped
}

/// Returns one delta per reference period whose valuations differ between
/// `previous` and `recomputed`, ordered by period start.
///
/// A period is reported when any of its blocks changed (dates, maintenance,
/// one-tenth or amount due). A change that leaves the amount due intact,
/// such as a higher one-tenth base still below maintenance, yields a delta
/// with a zero `difference`.
///
/// # Example
///
/// ```
/// use assmat_leave_engine::calculation::diff_valuations;
///
/// assert!(diff_valuations(&[], &[]).is_empty());
/// ```
pub fn diff_valuations(
    previous: &[ValuationResult],
    recomputed: &[ValuationResult],
) -> Vec<RegularizationDelta> {
    let before = valuations_by_period(previous);
    let after = valuations_by_period(recomputed);
    let before_totals = amount_due_by_period(previous);
    let after_totals = amount_due_by_period(recomputed);

    let mut periods: Vec<LeaveReferencePeriod> = before.keys().chain(after.keys()).copied().collect();
    periods.sort();
    periods.dedup();

    periods
        .into_iter()
        .filter(|period| before.get(period) != after.get(period))
        .map(|period| {
            let previous_amount_due = before_totals.get(&period).copied().unwrap_or(Decimal::ZERO);
            let recomputed_amount_due = after_totals.get(&period).copied().unwrap_or(Decimal::ZERO);
            RegularizationDelta {
                period,
                previous_amount_due,
                recomputed_amount_due,
                difference: recomputed_amount_due - previous_amount_due,
            }
        })
        .collect()
}
