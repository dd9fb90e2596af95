//! Response types for the payroll API.
//!
//! This module defines the computation response envelopes, the error
//! response structure and the mapping from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;
use crate::models::PayrollResult;

/// A computed payroll result with the metadata of the computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResponse {
    /// Unique identifier for this computation.
    pub calculation_id: Uuid,
    /// When the computation was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that performed the computation.
    pub engine_version: String,
    /// The employee the result is for.
    pub employee_id: String,
    /// The tax year of the rule set that was applied.
    pub tax_year: i32,
    /// The itemized result.
    pub result: PayrollResult,
}

/// An employee whose computation failed within a pay run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunFailure {
    /// The employee whose computation failed.
    pub employee_id: String,
    /// Why it failed.
    pub error: ApiError,
}

/// Totals across the successful computations of a pay run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayRunTotals {
    /// Number of employees computed successfully.
    pub employees: usize,
    /// Sum of gross pay.
    pub gross_pay: Decimal,
    /// Sum of employee tax withholdings.
    pub tax_withholdings: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
    /// Sum of employer costs.
    pub employer_costs: Decimal,
}

impl PayRunTotals {
    /// Adds one employee's result to the totals.
    pub fn add(&mut self, result: &PayrollResult) {
        self.employees += 1;
        self.gross_pay += result.earnings.gross_pay;
        self.tax_withholdings += result.taxes.total;
        self.net_pay += result.net_pay;
        self.employer_costs += result.employer.total;
    }
}

/// The outcome of a pay run.
///
/// Each employee is computed independently; failures are listed alongside
/// the successful results rather than aborting the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayRunResponse {
    /// Unique identifier for this pay run.
    pub run_id: Uuid,
    /// When the run was performed.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that performed the run.
    pub engine_version: String,
    /// The pay date of the run.
    pub pay_date: NaiveDate,
    /// The tax year of the rule set that was applied.
    pub tax_year: i32,
    /// Successful computations, in request order.
    pub results: Vec<PayrollResponse>,
    /// Failed computations, in request order.
    pub failures: Vec<PayRunFailure>,
    /// Totals across `results`.
    pub totals: PayRunTotals,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an invalid input error response for a payroll input field.
    pub fn invalid_input(field: &str, message: &str) -> Self {
        Self::with_details(
            "INVALID_INPUT",
            format!("Invalid input '{}': {}", field, message),
            format!("The field '{}' violates the payroll input contract", field),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidRules { tax_year, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid tax rules for {}", tax_year),
                    message,
                ),
            },
            EngineError::TaxYearNotFound { date } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "TAX_YEAR_NOT_FOUND",
                    format!("No tax-year rules effective on {}", date),
                    "The pay date falls before the earliest configured tax year",
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::invalid_input(&field, &message),
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
