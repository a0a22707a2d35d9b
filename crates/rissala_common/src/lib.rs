// --- File: crates/rissala_common/src/lib.rs ---

pub mod error;   // Error handling
pub mod http;    // HTTP responses
pub mod logging; // Logging utilities

// Re-export error types and utilities for easier access
pub use error::{
    database_error, validation_error, HttpStatusCode, RelayError, GENERIC_SERVER_ERROR,
};

// Re-export HTTP utilities for easier access
pub use http::{handle_status_result, StatusBody};

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};
