//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are domain objects that are **immutable** and **compared by value**.
/// A recorded movement is the canonical example: two intakes of the same bags on the
/// same day with the same note are indistinguishable, and once written a movement is
/// never edited. Corrections are new, offsetting values.
///
/// The trait requires:
/// - **Clone**: Value objects should be cheap to copy (they're values, not references)
/// - **PartialEq**: Value objects are compared by their attribute values
/// - **Debug**: Value objects should be debuggable (helpful for logging, testing)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
