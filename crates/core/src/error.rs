//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (input
/// validation and the stock guard). Storage failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An operator-supplied value failed validation (missing, not a number,
    /// not a `YYYY-MM-DD` date, not positive).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A withdrawal asked for more milk than the ledger currently holds.
    #[error("insufficient stock: {requested_ml} ml requested, {available_ml} ml available")]
    InsufficientStock { requested_ml: i64, available_ml: i64 },
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn insufficient_stock(requested_ml: i64, available_ml: i64) -> Self {
        Self::InsufficientStock {
            requested_ml,
            available_ml,
        }
    }

    /// How many millilitres a rejected withdrawal was short by.
    ///
    /// `None` for every other error kind.
    pub fn shortfall_ml(&self) -> Option<i64> {
        match self {
            Self::InsufficientStock {
                requested_ml,
                available_ml,
            } => Some(*requested_ml - (*available_ml).max(0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortfall_is_reported_for_insufficient_stock() {
        let err = DomainError::insufficient_stock(150, 100);
        assert_eq!(err.shortfall_ml(), Some(50));
        assert_eq!(
            err.to_string(),
            "insufficient stock: 150 ml requested, 100 ml available"
        );
    }

    #[test]
    fn shortfall_treats_overdrawn_balance_as_empty() {
        let err = DomainError::insufficient_stock(80, -20);
        assert_eq!(err.shortfall_ml(), Some(80));
    }

    #[test]
    fn shortfall_is_absent_for_other_errors() {
        assert_eq!(DomainError::invalid_input("x").shortfall_ml(), None);
    }
}
