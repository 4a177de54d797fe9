use std::sync::Arc;

use thiserror::Error;

use milkstock_inventory::Movement;

/// Movement store operation error.
///
/// These are **infrastructure errors** (storage, parsing of persisted rows) as
/// opposed to domain errors (input validation, stock guard).
#[derive(Debug, Error)]
pub enum MovementStoreError {
    /// A persisted row could not be turned into a valid movement.
    ///
    /// `line` is the 1-based physical row, header included.
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    #[error("movement log I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("movement log CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl MovementStoreError {
    pub fn malformed(line: u64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Append-only movement log.
///
/// ## Load Semantics
///
/// `load_all()`:
/// - Returns every movement in the order it was appended (no re-sorting)
/// - Returns an empty vector if the log doesn't exist yet, creating it
/// - Fails on the first row that doesn't parse; a corrupted log is not
///   partially loaded
///
/// ## Append Semantics
///
/// `append()`:
/// - Writes exactly one movement at the end of the log
/// - Never rewrites earlier records
/// - Either the whole row lands or nothing does
///
/// There is no locking: two processes appending at the same time can interleave.
pub trait MovementStore {
    /// Load the full history.
    fn load_all(&self) -> Result<Vec<Movement>, MovementStoreError>;

    /// Durably append one movement.
    fn append(&self, movement: &Movement) -> Result<(), MovementStoreError>;

    /// Append several movements in order.
    ///
    /// The default appends one at a time; stores that can write the whole batch
    /// at once should override it so a failure leaves nothing behind.
    fn append_batch(&self, movements: &[Movement]) -> Result<(), MovementStoreError> {
        for m in movements {
            self.append(m)?;
        }
        Ok(())
    }
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn load_all(&self) -> Result<Vec<Movement>, MovementStoreError> {
        (**self).load_all()
    }

    fn append(&self, movement: &Movement) -> Result<(), MovementStoreError> {
        (**self).append(movement)
    }

    fn append_batch(&self, movements: &[Movement]) -> Result<(), MovementStoreError> {
        (**self).append_batch(movements)
    }
}

impl<S> MovementStore for &S
where
    S: MovementStore + ?Sized,
{
    fn load_all(&self) -> Result<Vec<Movement>, MovementStoreError> {
        (**self).load_all()
    }

    fn append(&self, movement: &Movement) -> Result<(), MovementStoreError> {
        (**self).append(movement)
    }

    fn append_batch(&self, movements: &[Movement]) -> Result<(), MovementStoreError> {
        (**self).append_batch(movements)
    }
}
