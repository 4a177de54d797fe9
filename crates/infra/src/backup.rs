//! JSON backup of the whole movement log.
//!
//! A backup is a JSON array of movements using the persisted column names
//! (`tipo`, `data`, `volume_ml`, ...). Restoring only ever appends, and only
//! into an empty log, so an existing history is never rewritten.

use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;

use milkstock_inventory::Movement;

use crate::movement_store::{MovementStore, MovementStoreError};

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("backup I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("backup is not a valid movement list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backup entry {index} is invalid: {reason}")]
    InvalidEntry { index: usize, reason: String },

    #[error("refusing to restore into a log that already holds {0} movement(s)")]
    LogNotEmpty(usize),

    #[error(transparent)]
    Store(#[from] MovementStoreError),
}

pub fn write_backup<W: Write>(movements: &[Movement], out: W) -> Result<(), BackupError> {
    serde_json::to_writer_pretty(out, movements)?;
    Ok(())
}

pub fn write_backup_to_path(movements: &[Movement], path: &Path) -> Result<(), BackupError> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_backup(movements, &mut file)?;
    file.write_all(b"\n")?;
    file.flush()?;
    tracing::info!(path = %path.display(), count = movements.len(), "wrote backup");
    Ok(())
}

/// Parse a backup and check every entry is a usable movement.
pub fn read_backup<R: Read>(input: R) -> Result<Vec<Movement>, BackupError> {
    let movements: Vec<Movement> = serde_json::from_reader(input)?;
    for (index, m) in movements.iter().enumerate() {
        if m.unit_volume_ml == 0 || m.bag_count == 0 {
            return Err(BackupError::InvalidEntry {
                index,
                reason: "volume_ml and quantidade_sacos must be positive".to_string(),
            });
        }
    }
    Ok(movements)
}

/// Append a backup into an empty store, in backup order.
///
/// The whole backup goes through a single `append_batch`, so a store that
/// writes batches atomically is left empty when the restore fails and the
/// restore can simply be retried. Returns the number of movements written.
pub fn restore<S: MovementStore>(store: &S, movements: &[Movement]) -> Result<usize, BackupError> {
    let existing = store.load_all()?.len();
    if existing > 0 {
        return Err(BackupError::LogNotEmpty(existing));
    }
    store.append_batch(movements)?;
    tracing::info!(count = movements.len(), "restored movements from backup");
    Ok(movements.len())
}
