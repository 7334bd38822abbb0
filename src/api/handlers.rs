//! HTTP request handlers for the Payroll Engine API.
//!
//! This module contains the handler functions for all API endpoints.
//! Manager calls block on the run locks and on the ledger and directory,
//! so every handler runs them on tokio's blocking pool.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::lifecycle::{CallerContext, PayrollRunManager};
use crate::models::RunConfiguration;

use super::request::{CreateRunRequest, ProcessRunRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/runs", post(create_run_handler).get(list_runs_handler))
        .route("/runs/:run_id", get(get_run_handler))
        .route("/runs/:run_id/recompute", post(recompute_run_handler))
        .route("/runs/:run_id/process", post(process_run_handler))
        .route("/runs/:run_id/disbursement", get(disbursement_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

/// Runs a manager operation on the blocking pool.
///
/// Engine errors become their mapped response; a panicked or cancelled
/// task becomes a 500.
async fn run_blocking<T, F>(
    state: &AppState,
    correlation_id: Uuid,
    operation: F,
) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce(&PayrollRunManager) -> EngineResult<T> + Send + 'static,
{
    let manager = state.shared_manager();
    match tokio::task::spawn_blocking(move || operation(&manager)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(correlation_id, err)),
        Err(join_error) => {
            warn!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Manager task failed"
            );
            Err(ApiErrorResponse::internal("Run manager task failed").into_response())
        }
    }
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
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
    ApiErrorResponse::bad_request(error).into_response()
}

/// Handler for `POST /runs`.
///
/// Creates a draft run for the requested period and returns it with its
/// lines.
async fn create_run_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create run request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config: RunConfiguration = request.into();
    let start_time = Instant::now();
    match run_blocking(&state, correlation_id, move |manager| manager.create_run(config)).await {
        Ok(created) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %created.run.id,
                employee_count = created.run.totals.employee_count,
                duration_us = start_time.elapsed().as_micros(),
                "Run created"
            );
            json_response(StatusCode::CREATED, created)
        }
        Err(response) => response,
    }
}

/// Handler for `GET /runs`.
async fn list_runs_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    match run_blocking(&state, correlation_id, |manager| Ok(manager.list_runs())).await {
        Ok(runs) => json_response(StatusCode::OK, runs),
        Err(response) => response,
    }
}

/// Handler for `GET /runs/:run_id`.
async fn get_run_handler(State(state): State<AppState>, Path(run_id): Path<Uuid>) -> Response {
    let correlation_id = Uuid::new_v4();
    match run_blocking(&state, correlation_id, move |manager| manager.get_run(run_id)).await {
        Ok(run) => json_response(StatusCode::OK, run),
        Err(response) => response,
    }
}

/// Handler for `POST /runs/:run_id/recompute`.
async fn recompute_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing recompute request");

    match run_blocking(&state, correlation_id, move |manager| manager.recompute_run(run_id)).await
    {
        Ok(run) => json_response(StatusCode::OK, run),
        Err(response) => response,
    }
}

/// Handler for `POST /runs/:run_id/process`.
///
/// Posts the run's journal and marks it processed on behalf of the actor
/// named in the body.
async fn process_run_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
    payload: Result<Json<ProcessRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, run_id = %run_id, "Processing process request");

    let caller: CallerContext = match payload {
        Ok(Json(req)) => req.into(),
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if caller.actor.trim().is_empty() {
        return ApiErrorResponse::bad_request(ApiError::validation_error(
            "actor must not be empty",
        ))
        .into_response();
    }

    let actor = caller.actor.clone();
    match run_blocking(&state, correlation_id, move |manager| {
        manager.process_run(run_id, &caller)
    })
    .await
    {
        Ok(run) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %run_id,
                actor = %actor,
                "Run processed"
            );
            json_response(StatusCode::OK, run)
        }
        Err(response) => response,
    }
}

/// Handler for `GET /runs/:run_id/disbursement`.
///
/// Returns the disbursement file of a processed run as `text/csv`.
async fn disbursement_handler(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match run_blocking(&state, correlation_id, move |manager| {
        manager.export_disbursement_csv(run_id)
    })
    .await
    {
        Ok(csv) => {
            info!(correlation_id = %correlation_id, run_id = %run_id, "Disbursement exported");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/csv")],
                csv,
            )
                .into_response()
        }
        Err(response) => response,
    }
}
