//! HTTP API for the Payroll Engine.
//!
//! A thin axum adapter over [`PayrollRunManager`](crate::lifecycle::PayrollRunManager):
//! create, inspect, recompute and process runs, and download the
//! disbursement file of a processed run.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CreateRunRequest, ProcessRunRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
