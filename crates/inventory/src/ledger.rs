use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use milkstock_core::{Aggregate, DomainError};

use crate::movement::{Movement, MovementKind};

/// Command: RegisterIntake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterIntake {
    pub date: NaiveDate,
    pub unit_volume_ml: u32,
    pub bag_count: u32,
    pub location: String,
    pub extraction_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub note: String,
}

impl RegisterIntake {
    pub fn total_ml(&self) -> i64 {
        i64::from(self.unit_volume_ml) * i64::from(self.bag_count)
    }
}

/// Command: RegisterWithdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWithdrawal {
    pub date: NaiveDate,
    pub unit_volume_ml: u32,
    pub bag_count: u32,
    pub note: String,
}

impl RegisterWithdrawal {
    pub fn total_ml(&self) -> i64 {
        i64::from(self.unit_volume_ml) * i64::from(self.bag_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockCommand {
    RegisterIntake(RegisterIntake),
    RegisterWithdrawal(RegisterWithdrawal),
}

/// Aggregate: the whole stock ledger, rehydrated from the movement log.
///
/// Only the running balance is tracked; batch-level allocation is derived on
/// demand by [`crate::reconcile`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockLedger {
    balance_ml: i64,
    version: u64,
}

impl StockLedger {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Rebuild the ledger from a loaded history.
    pub fn from_history(movements: &[Movement]) -> Self {
        let mut ledger = Self::empty();
        ledger.replay(movements);
        ledger
    }

    /// Net millilitres in stock (intakes − withdrawals).
    pub fn balance_ml(&self) -> i64 {
        self.balance_ml
    }
}

impl Aggregate for StockLedger {
    type Command = StockCommand;
    type Event = Movement;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.balance_ml += event.signed_ml();
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            StockCommand::RegisterIntake(cmd) => self.handle_intake(cmd),
            StockCommand::RegisterWithdrawal(cmd) => self.handle_withdrawal(cmd),
        }
    }
}

impl StockLedger {
    fn ensure_positive(unit_volume_ml: u32, bag_count: u32) -> Result<(), DomainError> {
        if unit_volume_ml == 0 {
            return Err(DomainError::invalid_input("volume per bag must be greater than zero"));
        }
        if bag_count == 0 {
            return Err(DomainError::invalid_input("bag count must be greater than zero"));
        }
        Ok(())
    }

    /// Fail fast when there is nothing left to withdraw.
    pub fn ensure_stock_available(&self) -> Result<(), DomainError> {
        if self.balance_ml <= 0 {
            return Err(DomainError::insufficient_stock(0, self.balance_ml));
        }
        Ok(())
    }

    fn handle_intake(&self, cmd: &RegisterIntake) -> Result<Vec<Movement>, DomainError> {
        Self::ensure_positive(cmd.unit_volume_ml, cmd.bag_count)?;

        Ok(vec![Movement {
            kind: MovementKind::Intake,
            date: cmd.date,
            unit_volume_ml: cmd.unit_volume_ml,
            bag_count: cmd.bag_count,
            location: cmd.location.clone(),
            extraction_date: cmd.extraction_date,
            expiry_date: cmd.expiry_date,
            note: cmd.note.clone(),
        }])
    }

    // Only the aggregate balance is guarded; a bag size with no stock of its
    // own can still be withdrawn while other sizes cover the total.
    fn handle_withdrawal(&self, cmd: &RegisterWithdrawal) -> Result<Vec<Movement>, DomainError> {
        Self::ensure_positive(cmd.unit_volume_ml, cmd.bag_count)?;

        let requested = cmd.total_ml();
        if self.balance_ml <= 0 || requested > self.balance_ml {
            return Err(DomainError::insufficient_stock(requested, self.balance_ml));
        }

        Ok(vec![Movement {
            kind: MovementKind::Withdrawal,
            date: cmd.date,
            unit_volume_ml: cmd.unit_volume_ml,
            bag_count: cmd.bag_count,
            location: String::new(),
            extraction_date: None,
            expiry_date: None,
            note: cmd.note.clone(),
        }])
    }
}
