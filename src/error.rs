//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the crate.
//! It centralizes error management, providing a consistent way to handle and represent
//! the error conditions that can occur, from token issuance failures to validation
//! failures.
//!
//! Expected failure paths (bad credentials, missing tasks, invalid input) travel as
//! `Result`/`Option`/`bool` values and never panic; `AppError` carries the typed
//! variants callers can branch on. The only panicking path in the crate is using a
//! task orchestrator whose session handle is gone, which is a programming error
//! rather than a runtime condition.

use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the crate.
///
/// Each variant corresponds to a specific type of error, often carrying a message
/// detailing the issue.
#[derive(Debug)]
pub enum AppError {
    /// A mutating task operation was invoked without an authenticated session.
    /// Unlike the soft query paths, this is surfaced as a hard error the caller
    /// must handle.
    NotAuthenticated,
    /// Represents a situation where a requested resource was not found.
    NotFound(String),
    /// Represents an error due to failed input validation.
    /// Wraps errors from the `validator` crate.
    ValidationError(String),
    /// Represents an unexpected internal error (e.g. payload serialization).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::NotAuthenticated => write!(f, "Not authenticated"),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// The detailed validation messages are preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Converts `serde_json::Error` into `AppError::InternalServerError`.
///
/// This is typically used when token payload serialization fails.
impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
