//! Applying recorded settlements to outstanding splits.
//!
//! A settlement from `paid_by` to `paid_to` clears `paid_by`'s unsettled
//! splits on expenses `paid_to` paid for, oldest expense first. Only whole
//! splits are cleared: the walk stops at the first split the remaining
//! amount cannot fully cover, and that remainder is not credited anywhere.

use crate::amount::Amount;
use crate::model::{Expense, Participant, Split};
use log::debug;
use std::collections::HashMap;

/// Marks splits settled for a payment of `amount` from `paid_by` to `paid_to`.
///
/// `expenses` must hold every expense referenced by `splits`; splits whose
/// expense is missing are left alone. Expenses with the same date are visited
/// in the order their splits appear. Returns the expense ids of the splits
/// that were settled.
pub fn apply_settlement(
    splits: &mut [Split],
    expenses: &[Expense],
    paid_by: &Participant,
    paid_to: &Participant,
    amount: Amount,
) -> Vec<u32> {
    let by_id: HashMap<u32, &Expense> = expenses.iter().map(|e| (e.id, e)).collect();

    let mut candidates: Vec<(usize, &Expense)> = splits
        .iter()
        .enumerate()
        .filter(|(_, split)| !split.settled && &split.member == paid_by)
        .filter_map(|(idx, split)| by_id.get(&split.expense_id).map(|e| (idx, *e)))
        .filter(|(_, expense)| &expense.paid_by == paid_to)
        .collect();
    candidates.sort_by_key(|(_, expense)| expense.date);

    let mut remaining = amount;
    let mut settled = Vec::new();

    for (idx, expense) in candidates {
        if !remaining.is_positive() {
            break;
        }

        let split = &mut splits[idx];
        if remaining < split.amount_owed {
            debug!(
                "Settlement of {} from {} to {}: {} left, not enough to cover {} on expense {}",
                amount, paid_by, paid_to, remaining, split.amount_owed, expense.id
            );
            break;
        }

        split.settled = true;
        remaining -= split.amount_owed;
        settled.push(split.expense_id);
    }

    debug!(
        "Settlement of {} from {} to {} cleared {} split(s)",
        amount,
        paid_by,
        paid_to,
        settled.len()
    );

    settled
}
