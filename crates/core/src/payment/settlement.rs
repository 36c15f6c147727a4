//! Full-sync planning for payment-to-invoice allocations.
//!
//! A payment's allocations are replaced wholesale on every write: the
//! submitted list is the desired end state, keyed by invoice. The plan
//! computed here is applied inside the payment's transaction.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// One payment-to-invoice allocation, as stored or as desired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationRow {
    pub invoice_id: i64,
    pub line_total: Decimal,
    pub notes: Option<String>,
}

/// The row-level changes that turn the existing allocations into the
/// submitted ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    /// Invoices allocated for the first time.
    pub insert: Vec<AllocationRow>,
    /// Invoices already allocated whose amount or notes changed.
    pub update: Vec<AllocationRow>,
    /// Invoice ids whose allocation is no longer submitted.
    pub remove: Vec<i64>,
}

impl SyncPlan {
    /// True if applying the plan would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.update.is_empty() && self.remove.is_empty()
    }
}

/// Computes the changes needed to make `existing` match `submitted`.
///
/// Allocations are keyed by `invoice_id`; when the submitted list repeats
/// an invoice, the last entry wins. Rows equal to their stored counterpart
/// are left untouched, so resubmitting the current state yields an empty
/// plan.
#[must_use]
pub fn plan_sync(existing: &[AllocationRow], submitted: &[AllocationRow]) -> SyncPlan {
    let desired: BTreeMap<i64, &AllocationRow> =
        submitted.iter().map(|row| (row.invoice_id, row)).collect();
    let current: BTreeMap<i64, &AllocationRow> =
        existing.iter().map(|row| (row.invoice_id, row)).collect();

    let mut plan = SyncPlan::default();

    for (invoice_id, row) in &desired {
        match current.get(invoice_id) {
            None => plan.insert.push((*row).clone()),
            Some(stored) if stored != row => plan.update.push((*row).clone()),
            Some(_) => {}
        }
    }

    for invoice_id in current.keys() {
        if !desired.contains_key(invoice_id) {
            plan.remove.push(*invoice_id);
        }
    }

    plan
}

/// Sums allocation amounts into a paid total.
#[must_use]
pub fn total_paid<I>(line_totals: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    line_totals.into_iter().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn row(invoice_id: i64, line_total: Decimal) -> AllocationRow {
        AllocationRow {
            invoice_id,
            line_total,
            notes: None,
        }
    }

    #[test]
    fn test_first_submission_inserts_everything() {
        let plan = plan_sync(&[], &[row(1, dec!(50)), row(2, dec!(30))]);
        assert_eq!(plan.insert.len(), 2);
        assert!(plan.update.is_empty());
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_resubmitting_same_state_is_empty() {
        let state = vec![row(1, dec!(50)), row(2, dec!(30))];
        assert!(plan_sync(&state, &state).is_empty());
    }

    #[test]
    fn test_changed_amount_updates() {
        let existing = vec![row(1, dec!(50))];
        let plan = plan_sync(&existing, &[row(1, dec!(75))]);
        assert_eq!(plan.update, vec![row(1, dec!(75))]);
        assert!(plan.insert.is_empty());
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_changed_notes_update() {
        let existing = vec![row(1, dec!(50))];
        let submitted = vec![AllocationRow {
            notes: Some("partial".into()),
            ..row(1, dec!(50))
        }];
        let plan = plan_sync(&existing, &submitted);
        assert_eq!(plan.update.len(), 1);
    }

    #[test]
    fn test_dropped_allocation_removed() {
        let existing = vec![row(1, dec!(50)), row(2, dec!(30))];
        let plan = plan_sync(&existing, &[row(2, dec!(30))]);
        assert_eq!(plan.remove, vec![1]);
        assert!(plan.insert.is_empty());
        assert!(plan.update.is_empty());
    }

    #[test]
    fn test_duplicate_invoice_last_wins() {
        let plan = plan_sync(&[], &[row(1, dec!(10)), row(1, dec!(20))]);
        assert_eq!(plan.insert, vec![row(1, dec!(20))]);
    }

    #[test]
    fn test_total_paid_sums_amounts() {
        let total = total_paid([dec!(50), dec!(30), dec!(0.50)]);
        assert_eq!(total, dec!(80.50));
    }

    /// Applies a plan to an existing state, returning the resulting rows.
    fn apply(existing: &[AllocationRow], plan: &SyncPlan) -> BTreeMap<i64, AllocationRow> {
        let mut state: BTreeMap<i64, AllocationRow> = existing
            .iter()
            .filter(|r| !plan.remove.contains(&r.invoice_id))
            .map(|r| (r.invoice_id, r.clone()))
            .collect();
        for r in plan.update.iter().chain(&plan.insert) {
            state.insert(r.invoice_id, r.clone());
        }
        state
    }

    fn allocation_strategy() -> impl Strategy<Value = Vec<AllocationRow>> {
        prop::collection::vec((0_i64..8, 0_u32..1000), 0..8).prop_map(|rows| {
            rows.into_iter()
                .map(|(invoice_id, cents)| row(invoice_id, Decimal::new(i64::from(cents), 2)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_applying_plan_reaches_submitted_state(
            existing in allocation_strategy(),
            submitted in allocation_strategy(),
        ) {
            let plan = plan_sync(&existing, &submitted);
            let result = apply(&existing, &plan);
            let desired: BTreeMap<i64, AllocationRow> = submitted
                .iter()
                .map(|r| (r.invoice_id, r.clone()))
                .collect();
            prop_assert_eq!(result, desired);
        }

        #[test]
        fn prop_plan_is_idempotent(
            existing in allocation_strategy(),
            submitted in allocation_strategy(),
        ) {
            let plan = plan_sync(&existing, &submitted);
            let after: Vec<AllocationRow> = apply(&existing, &plan).into_values().collect();
            prop_assert!(plan_sync(&after, &submitted).is_empty());
        }
    }
}
