//! Request types for the Payroll Engine API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lifecycle::CallerContext;
use crate::models::RunConfiguration;

/// Request body for `POST /runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRunRequest {
    /// Calendar month of the run (1-12).
    pub month: u32,
    /// Calendar year of the run.
    pub year: i32,
    /// Whether to pay one extra month of basic salary as a bonus.
    #[serde(default)]
    pub include_13th_month: bool,
    /// Percentage of basic salary paid as an airtime/data cash benefit.
    #[serde(default)]
    pub airtime_data_percentage: Decimal,
}

impl From<CreateRunRequest> for RunConfiguration {
    fn from(req: CreateRunRequest) -> Self {
        RunConfiguration {
            month: req.month,
            year: req.year,
            include_13th_month: req.include_13th_month,
            airtime_data_percentage: req.airtime_data_percentage,
        }
    }
}

/// Request body for `POST /runs/:run_id/process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRunRequest {
    /// The approving user or service.
    pub actor: String,
}

impl From<ProcessRunRequest> for CallerContext {
    fn from(req: ProcessRunRequest) -> Self {
        CallerContext::new(req.actor)
    }
}
