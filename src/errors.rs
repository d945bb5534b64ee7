//! Unified error type for the discount rules crate.

use thiserror::Error;

/// Errors raised by discount rules and their collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// A database query or connection failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Invalid configuration or input data
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A required argument was absent
    #[error("Invalid argument: {name} must be provided")]
    InvalidArgument { name: String },

    /// An otherwise valid argument is missing a part the operation needs
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// A stored setting does not parse as the requested type
    #[error("Setting '{key}' holds a value that cannot be read: '{value}'")]
    InvalidSetting { key: String, value: String },

    /// No customer with this ID
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i64 },

    /// No country with this ISO code
    #[error("Country not found: {code}")]
    CountryNotFound { code: String },

    /// No discount with this ID
    #[error("Discount not found: {id}")]
    DiscountNotFound { id: i64 },

    /// No discount requirement with this ID
    #[error("Discount requirement not found: {id}")]
    DiscountRequirementNotFound { id: i64 },

    /// Reading a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable could not be read
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
