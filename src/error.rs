//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine reports: configuration problems, missing
//! tax-year rule sets and rejected payroll inputs.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All fallible operations in the engine return this error type.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "regular_hours".to_string(),
///     message: "must not be negative".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid input 'regular_hours': must not be negative");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A tax-year rule set was parsed but is internally inconsistent.
    #[error("Invalid tax rules for {tax_year}: {message}")]
    InvalidRules {
        /// The tax year of the offending rule set.
        tax_year: i32,
        /// What is wrong with the rule set.
        message: String,
    },

    /// No rule set is effective on the requested date.
    #[error("No tax-year rules effective on {date}")]
    TaxYearNotFound {
        /// The date for which rules were requested.
        date: NaiveDate,
    },

    /// A payroll input field violates the engine's input contract.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A calculated amount did not fit in a `Decimal`.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
