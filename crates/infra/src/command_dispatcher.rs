//! Command execution pipeline (application-level orchestration).
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the full movement log (always reloaded, never cached)
//!   ↓
//! 2. Rehydrate the stock ledger from it
//!   ↓
//! 3. Handle the command (pure decision logic, produces movements)
//!   ↓
//! 4. Append the movements to the store
//! ```
//!
//! A rejected command never reaches step 4, so the log is untouched on
//! validation or stock-guard failures.
//!
//! This module contains no IO itself; it composes the `MovementStore` trait.

use milkstock_core::{Aggregate, DomainError};
use milkstock_inventory::{Movement, StockCommand, StockLedger};

use crate::movement_store::{MovementStore, MovementStoreError};

#[derive(Debug)]
pub enum DispatchError {
    /// Operator input failed validation (deterministic).
    InvalidInput(String),
    /// Withdrawal larger than the current balance.
    InsufficientStock { requested_ml: i64, available_ml: i64 },
    /// Loading or appending to the movement log failed.
    Store(MovementStoreError),
}

impl DispatchError {
    /// Storage failures end the current operation; everything else is an
    /// operator-facing rejection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DispatchError::Store(_))
    }
}

impl core::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DispatchError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            DispatchError::InsufficientStock {
                requested_ml,
                available_ml,
            } => write!(
                f,
                "withdrawal of {requested_ml} ml exceeds available stock ({available_ml} ml), short by {} ml",
                requested_ml - (*available_ml).max(0)
            ),
            DispatchError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MovementStoreError> for DispatchError {
    fn from(value: MovementStoreError) -> Self {
        DispatchError::Store(value)
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidInput(msg) => DispatchError::InvalidInput(msg),
            DomainError::InsufficientStock {
                requested_ml,
                available_ml,
            } => DispatchError::InsufficientStock {
                requested_ml,
                available_ml,
            },
        }
    }
}

/// Runs stock commands against a movement store.
///
/// Single-threaded and synchronous: nothing guards against another process
/// appending between the load and the append.
#[derive(Debug, Clone)]
pub struct CommandDispatcher<S> {
    store: S,
}

impl<S> CommandDispatcher<S>
where
    S: MovementStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Rehydrate the ledger from the current log.
    pub fn load_ledger(&self) -> Result<(Vec<Movement>, StockLedger), DispatchError> {
        let history = self.store.load_all()?;
        let ledger = StockLedger::from_history(&history);
        Ok((history, ledger))
    }

    /// Fails with `InsufficientStock` when the balance is zero or below.
    pub fn ensure_stock_available(&self) -> Result<i64, DispatchError> {
        let (_, ledger) = self.load_ledger()?;
        ledger.ensure_stock_available()?;
        Ok(ledger.balance_ml())
    }

    /// Execute a command and return the movements that were appended.
    pub fn dispatch(&self, command: StockCommand) -> Result<Vec<Movement>, DispatchError> {
        let (_, ledger) = self.load_ledger()?;

        let movements = match ledger.handle(&command) {
            Ok(movements) => movements,
            Err(err) => {
                tracing::info!(error = %err, balance_ml = ledger.balance_ml(), "command rejected");
                return Err(err.into());
            }
        };

        for m in &movements {
            self.store.append(m)?;
        }

        Ok(movements)
    }
}
