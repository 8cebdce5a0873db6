//! Unified error type for biztrack.
//!
//! Store failures, validation failures and missing-session failures all flow through
//! [`Error`] so the state manager can record one display message per failed operation.

use thiserror::Error;

/// Every failure the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Underlying database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Store-level failure reported by a backend that is not a database
    #[error("{message}")]
    Store {
        /// Message surfaced verbatim from the backend
        message: String,
    },

    /// A store call was made without an authenticated session
    #[error("User not authenticated")]
    NotAuthenticated,

    /// Input rejected before it reached the store
    #[error("Validation failed: {message}")]
    Validation {
        /// Which field failed and why
        message: String,
    },

    /// Amount is negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// No transaction with this id belongs to the current user
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// The requested id
        id: i64,
    },

    /// The user has no business profile yet
    #[error("Business profile not found for user {user_id}")]
    ProfileNotFound {
        /// Owner of the missing profile
        user_id: String,
    },

    /// A capture provider failed to produce a result
    #[error("Capture failed: {message}")]
    Capture {
        /// Provider-specific reason
        message: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
