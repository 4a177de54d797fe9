//! Milk stock domain module.
//!
//! This crate contains business rules for the bag inventory, implemented purely as
//! deterministic domain logic (no IO, no terminal, no storage): the movement model,
//! the withdrawal guard and the FIFO/expiry reconciliation over a movement history.

pub mod input;
pub mod ledger;
pub mod movement;
pub mod reconcile;

pub use ledger::{RegisterIntake, RegisterWithdrawal, StockCommand, StockLedger};
pub use movement::{Movement, MovementKind, DATE_FORMAT};
pub use reconcile::{
    balance_by_unit_volume, batches_with_remainder, compare_allocation, compare_priority,
    prioritize, suggested_consumption_order, total_balance, BatchRemainder,
};
