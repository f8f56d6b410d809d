//! The module contains the errors the engine can return.
//!
//! Every variant belongs to one [`ErrorKind`], so callers can map failures
//! to user-visible responses deliberately instead of catching a generic
//! error:
//!
//! - [`Validation`] malformed or missing input (amount, date, kind, ...).
//! - [`NotFound`] a referenced member, transaction or expense is absent.
//! - [`Collaborator`] the data store or the payment provider failed.
//! - [`Unauthorized`] the bearer token or login credentials did not match.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`Collaborator`]: EngineError::Collaborator
//!  [`Unauthorized`]: EngineError::Unauthorized
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Collaborator failure: {0}")]
    Collaborator(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Collaborator,
    Unauthorized,
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Collaborator(_) | Self::Database(_) => ErrorKind::Collaborator,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Collaborator(a), Self::Collaborator(b)) => a == b,
            (Self::Unauthorized, Self::Unauthorized) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
