//! Stock reconciliation over a movement history.
//!
//! Withdrawals are never linked to the intake batches they used. Consumption is
//! inferred: the total withdrawn volume is drained from intake batches in FIFO
//! order (extraction date, falling back to entry date), and whatever is left is
//! then re-ranked by expiry to suggest what to use first.
//!
//! Everything here is pure and recomputed from scratch on every call; feeding the
//! same slice twice yields the same result.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::movement::Movement;

/// An intake batch together with the volume still attributed to it.
///
/// Invariant: `0 <= remaining_ml <= movement.total_ml()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRemainder<'a> {
    pub movement: &'a Movement,
    pub remaining_ml: i64,
}

/// Intakes minus withdrawals, in millilitres. Zero for an empty history.
pub fn total_balance(movements: &[Movement]) -> i64 {
    movements.iter().map(Movement::signed_ml).sum()
}

/// Net millilitres per bag size, ascending by bag size.
///
/// Every bag size that appears in any movement is a key, even when its net is
/// zero or negative.
pub fn balance_by_unit_volume(movements: &[Movement]) -> BTreeMap<u32, i64> {
    let mut balances = BTreeMap::new();
    for m in movements {
        *balances.entry(m.unit_volume_ml).or_insert(0) += m.signed_ml();
    }
    balances
}

/// FIFO order: allocation date ascending.
pub fn compare_allocation(a: &Movement, b: &Movement) -> Ordering {
    a.allocation_date().cmp(&b.allocation_date())
}

/// Use-first order: expiry ascending (unknown expiry last), then FIFO age.
pub fn compare_priority(a: &Movement, b: &Movement) -> Ordering {
    let expiry = |m: &Movement| m.expiry_date.unwrap_or(NaiveDate::MAX);
    expiry(a)
        .cmp(&expiry(b))
        .then_with(|| compare_allocation(a, b))
}

/// Intake batches that still hold volume after draining all withdrawals FIFO.
///
/// Result is in FIFO order. Ties keep ledger order. When withdrawals exceed
/// every intake the result is simply empty.
pub fn batches_with_remainder(movements: &[Movement]) -> Vec<BatchRemainder<'_>> {
    let mut intakes: Vec<&Movement> = movements.iter().filter(|m| m.is_intake()).collect();
    // `sort_by` is stable, so equal dates keep their insertion order.
    intakes.sort_by(|a, b| compare_allocation(a, b));

    let mut pool: i64 = movements
        .iter()
        .filter(|m| m.is_withdrawal())
        .map(Movement::total_ml)
        .sum();

    let mut remainders = Vec::with_capacity(intakes.len());
    for movement in intakes {
        let total = movement.total_ml();
        let consumed = total.min(pool.max(0));
        pool -= consumed;
        remainders.push(BatchRemainder {
            movement,
            remaining_ml: total - consumed,
        });
    }

    remainders.retain(|b| b.remaining_ml > 0);
    remainders
}

/// Re-rank remainders by [`compare_priority`] (stable).
pub fn prioritize(mut batches: Vec<BatchRemainder<'_>>) -> Vec<BatchRemainder<'_>> {
    batches.sort_by(|a, b| compare_priority(a.movement, b.movement));
    batches
}

/// Suggested consumption order: soonest expiry first, then oldest milk.
pub fn suggested_consumption_order(movements: &[Movement]) -> Vec<BatchRemainder<'_>> {
    prioritize(batches_with_remainder(movements))
}
