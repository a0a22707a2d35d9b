// --- File: crates/rissala_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// Message returned to clients for every server-side failure.
pub const GENERIC_SERVER_ERROR: &str = "Erreur serveur";

/// The base error type for request handling in the relay.
///
/// Client-caused errors carry a message that is safe to return verbatim;
/// store failures are logged in full and surfaced as [`GENERIC_SERVER_ERROR`].
#[derive(Error, Debug)]
pub enum RelayError {
    /// A required request field was missing or empty
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Reading or writing the user directory failed
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for RelayError {
    fn status_code(&self) -> u16 {
        match self {
            RelayError::ValidationError(_) => 400,
            RelayError::DatabaseError(_) => 500,
        }
    }
}

impl RelayError {
    /// The message that may be shown to the HTTP caller.
    pub fn public_message(&self) -> String {
        match self {
            RelayError::ValidationError(message) => message.clone(),
            RelayError::DatabaseError(_) => GENERIC_SERVER_ERROR.to_string(),
        }
    }

    /// Whether the error was caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> RelayError {
    RelayError::ValidationError(message.to_string())
}

pub fn database_error<T: fmt::Display>(message: T) -> RelayError {
    RelayError::DatabaseError(message.to_string())
}
