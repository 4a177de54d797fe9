//! Aggregate trait for event-sourced domain models.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Aggregates must not perform IO or side effects. They should only return events
/// describing what happened; persisting them is the caller's job.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Number of events applied so far.
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single event.
    ///
    /// Implementations should remain deterministic and bump `version()` by one
    /// per applied event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Apply a full history in order.
    fn replay<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a Self::Event>,
        Self::Event: 'a,
    {
        for event in events {
            self.apply(event);
        }
    }
}
