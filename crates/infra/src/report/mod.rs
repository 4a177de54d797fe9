//! Operator-facing views over already-reconciled stock.
//!
//! Nothing here computes balances on its own; it only arranges what
//! `milkstock_inventory::reconcile` returns.

pub mod export;
pub mod summary;

pub use export::{export_summary, export_summary_to_path, DEFAULT_EXPORT_RECENT};
pub use summary::{ReportOptions, StockReport, VolumeBalance};

use milkstock_inventory::Movement;

/// The last `n` movements, in ledger order.
pub fn recent(movements: &[Movement], n: usize) -> &[Movement] {
    &movements[movements.len().saturating_sub(n)..]
}
