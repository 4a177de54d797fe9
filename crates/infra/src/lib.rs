//! Infrastructure layer: movement log storage, reporting, backups, config.

pub mod backup;
pub mod command_dispatcher;
pub mod config;
pub mod movement_store;
pub mod report;

pub use command_dispatcher::{CommandDispatcher, DispatchError};
pub use config::{Config, ConfigError};
pub use movement_store::{CsvMovementStore, InMemoryMovementStore, MovementStore, MovementStoreError};
