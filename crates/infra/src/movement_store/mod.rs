//! Append-only movement log boundary.
//!
//! The store only loads and appends; every balance is derived by the
//! reconciliation functions in `milkstock-inventory`.

pub mod csv_file;
pub mod in_memory;
pub mod r#trait;

pub use csv_file::{CsvMovementStore, HEADER};
pub use in_memory::InMemoryMovementStore;
pub use r#trait::{MovementStore, MovementStoreError};
