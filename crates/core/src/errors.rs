//! Core error types for the campusdesk back office.
//!
//! This module defines transport-agnostic error types. HTTP-specific errors
//! (from reqwest, response parsing, etc.) are converted to these types by the
//! connect layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::payments::PaymentError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the back office.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Payment rejected: {0}")]
    Payment(#[from] PaymentError),

    #[error("Collaborator request failed: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Broad classes of failure, in the order the payment form reacts to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caught before any network call; the offending field is flagged.
    InputValidation,
    /// A transaction reference is already attached to another payment.
    UniquenessConflict,
    /// Network or server failure talking to the remote API.
    Collaborator,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::Forbidden(_) => ErrorKind::InputValidation,
            Error::Payment(PaymentError::DuplicateTransactionRef { .. }) => {
                ErrorKind::UniquenessConflict
            }
            Error::Payment(_) => ErrorKind::InputValidation,
            Error::Collaborator(_) => ErrorKind::Collaborator,
            Error::Unexpected(_) => ErrorKind::Internal,
        }
    }
}

/// Failures reported while talking to the remote REST API.
///
/// Details are kept as strings so this type stays independent of the HTTP
/// client in use.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
