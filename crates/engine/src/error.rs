//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidInput`] returned before any write when an amount or a name is
//!   rejected.
//! - [`PartyNotFound`] returned when a name does not resolve to a party.
//! - [`ObligationNotFound`] returned when an obligation id does not exist.
//! - [`InvariantViolation`] returned when stored payments exceed an
//!   obligation, or when stored amounts no longer add up within `i64`.
//!   Neither happens to data written through the engine.
//! - [`StorageFailure`] returned when the database rejects a statement.
//!
//! Halting states that are not failures (an unknown item healthiness, a
//! payment with nothing to settle) are modeled as outcomes, see
//! [`ExpenseOutcome`] and [`PaymentOutcome`].
//!
//!  [`InvalidInput`]: EngineError::InvalidInput
//!  [`PartyNotFound`]: EngineError::PartyNotFound
//!  [`ObligationNotFound`]: EngineError::ObligationNotFound
//!  [`InvariantViolation`]: EngineError::InvariantViolation
//!  [`StorageFailure`]: EngineError::StorageFailure
//!  [`ExpenseOutcome`]: crate::ExpenseOutcome
//!  [`PaymentOutcome`]: crate::PaymentOutcome
use sea_orm::DbErr;
use thiserror::Error;

use crate::ObligationId;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" not found! Please add them first.")]
    PartyNotFound(String),
    #[error("Debt {0} not found!")]
    ObligationNotFound(ObligationId),
    #[error("Ledger invariant violated: {0}")]
    InvariantViolation(String),
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::PartyNotFound(a), Self::PartyNotFound(b)) => a == b,
            (Self::ObligationNotFound(a), Self::ObligationNotFound(b)) => a == b,
            (Self::InvariantViolation(a), Self::InvariantViolation(b)) => a == b,
            (Self::StorageFailure(a), Self::StorageFailure(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
