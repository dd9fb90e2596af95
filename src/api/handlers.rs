//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::PayrollEngine;
use crate::error::EngineError;
use crate::models::PayrollInput;

use super::request::{PayRunRequest, PayrollRequest};
use super::response::{
    ApiError, ApiErrorResponse, PayRunFailure, PayRunResponse, PayRunTotals, PayrollResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/compute", post(compute_handler))
        .route("/payroll/pay-run", post(pay_run_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Converts a JSON extraction failure into a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("unknown variant") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Computes one employee's result and wraps it in a response envelope.
fn compute_for_employee(
    engine: &PayrollEngine,
    employee_id: String,
    input: &PayrollInput,
) -> Result<PayrollResponse, EngineError> {
    let result = engine.compute(input)?;
    Ok(PayrollResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id,
        tax_year: engine.rules().tax_year,
        result,
    })
}

/// Handler for POST /payroll/compute endpoint.
///
/// Accepts one employee's payroll input and returns the itemized result.
async fn compute_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let engine = match state.engine_for(request.pay_date) {
        Ok(engine) => engine,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                pay_date = %request.pay_date,
                error = %err,
                "No rule set for pay date"
            );
            return engine_error_response(err);
        }
    };

    let start_time = Instant::now();
    match compute_for_employee(&engine, request.employee_id.clone(), &request.input) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %response.employee_id,
                tax_year = response.tax_year,
                gross_pay = %response.result.earnings.gross_pay,
                net_pay = %response.result.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll computed successfully"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                error = %err,
                "Payroll computation failed"
            );
            engine_error_response(err)
        }
    }
}

/// Handler for POST /payroll/pay-run endpoint.
///
/// Computes every employee in the run against the rule set for the pay
/// date. An employee whose input is rejected is listed under `failures`;
/// the rest of the run still completes.
async fn pay_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing pay run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let engine = match state.engine_for(request.pay_date) {
        Ok(engine) => engine,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                pay_date = %request.pay_date,
                error = %err,
                "No rule set for pay date"
            );
            return engine_error_response(err);
        }
    };

    let start_time = Instant::now();
    let mut results = Vec::with_capacity(request.employees.len());
    let mut failures = Vec::new();
    let mut totals = PayRunTotals::default();

    for employee in request.employees {
        match compute_for_employee(&engine, employee.employee_id.clone(), &employee.input) {
            Ok(response) => {
                totals.add(&response.result);
                results.push(response);
            }
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    employee_id = %employee.employee_id,
                    error = %err,
                    "Employee skipped in pay run"
                );
                let api_error: ApiErrorResponse = err.into();
                failures.push(PayRunFailure {
                    employee_id: employee.employee_id,
                    error: api_error.error,
                });
            }
        }
    }

    info!(
        correlation_id = %correlation_id,
        employees = totals.employees,
        failures = failures.len(),
        gross_pay = %totals.gross_pay,
        net_pay = %totals.net_pay,
        duration_us = start_time.elapsed().as_micros(),
        "Pay run completed"
    );

    json_response(
        StatusCode::OK,
        PayRunResponse {
            run_id: correlation_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            pay_date: request.pay_date,
            tax_year: engine.rules().tax_year,
            results,
            failures,
            totals,
        },
    )
}
