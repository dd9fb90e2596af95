//! HTTP API module for the payroll engine.
//!
//! This module provides the REST API endpoints a pay-run workflow calls to
//! compute one employee's pay or a whole pay run.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{PayRunEmployee, PayRunRequest, PayrollRequest};
pub use response::{
    ApiError, ApiErrorResponse, PayRunFailure, PayRunResponse, PayRunTotals, PayrollResponse,
};
pub use state::AppState;
