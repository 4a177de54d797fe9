use std::sync::RwLock;

use milkstock_inventory::Movement;

use super::r#trait::{MovementStore, MovementStoreError};

/// In-memory append-only movement log.
///
/// Intended for tests/benches. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryMovementStore {
    movements: RwLock<Vec<Movement>>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with an existing history.
    pub fn with_movements(movements: Vec<Movement>) -> Self {
        Self {
            movements: RwLock::new(movements),
        }
    }
}

impl MovementStore for InMemoryMovementStore {
    fn load_all(&self) -> Result<Vec<Movement>, MovementStoreError> {
        let movements = self
            .movements
            .read()
            .map_err(|_| std::io::Error::other("lock poisoned"))?;
        Ok(movements.clone())
    }

    fn append(&self, movement: &Movement) -> Result<(), MovementStoreError> {
        let mut movements = self
            .movements
            .write()
            .map_err(|_| std::io::Error::other("lock poisoned"))?;
        movements.push(movement.clone());
        Ok(())
    }

    fn append_batch(&self, batch: &[Movement]) -> Result<(), MovementStoreError> {
        let mut movements = self
            .movements
            .write()
            .map_err(|_| std::io::Error::other("lock poisoned"))?;
        movements.extend_from_slice(batch);
        Ok(())
    }
}
