//! HTTP request handlers for the site payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Duration;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{aggregate_by_site, aggregate_by_worker, compute_salary};
use crate::config::Role;
use crate::models::{PayrollMonth, SalarySnapshot, SnapshotKey};

use super::auth::Caller;
use super::request::{
    CreatePreviewRequest, RecordAttendanceRequest, SiteLaborQuery, SnapshotListQuery,
    SnapshotRequest, WorkerLaborQuery,
};
use super::response::{ApiErrorResponse, ApiResponse, PreviewCreated};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/preview", post(create_preview_handler))
        .route("/preview/:id", get(get_preview_handler))
        .route("/attendance", post(record_attendance_handler))
        .route("/labor/workers", get(worker_labor_handler))
        .route("/labor/sites", get(site_labor_handler))
        .route(
            "/salary/snapshots",
            get(list_snapshots_handler).post(issue_snapshot_handler),
        )
        .route("/salary/snapshots/approve", post(approve_snapshot_handler))
        .route("/salary/snapshots/pay", post(pay_snapshot_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(ApiResponse::success(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Handler for POST /preview.
///
/// Stores the grid and returns the id the display step fetches it with.
async fn create_preview_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<CreatePreviewRequest>, JsonRejection>,
) -> ApiResult<Json<PreviewCreated>> {
    let Json(request) = payload?;
    request.data.validate()?;

    let ttl = request.ttl_seconds.map(Duration::from_secs);
    if ttl.is_some_and(|ttl| ttl.is_zero()) {
        return Err(ApiErrorResponse::validation("ttlSeconds must be greater than zero"));
    }

    let id = state.previews().create(request.data, ttl);
    info!(user_id = %caller.user_id, session_id = %id, "Preview session created");

    Ok(Json(PreviewCreated { success: true, id }))
}

/// Handler for GET /preview/{id}.
///
/// Unknown and expired ids both answer 404.
async fn get_preview_handler(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    match state.previews().get(&id) {
        Some(data) => Ok(Json(ApiResponse::success(data))),
        None => Err(ApiErrorResponse::not_found()),
    }
}

/// Handler for POST /attendance.
async fn record_attendance_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<RecordAttendanceRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    caller.require(&[Role::Admin, Role::SiteManager])?;
    let Json(request) = payload?;
    if request.entries.is_empty() {
        return Err(ApiErrorResponse::validation("entries must not be empty"));
    }

    let correlation_id = Uuid::new_v4();
    let recorded = state
        .attendance()
        .record(request.entries, state.config())
        .inspect_err(|err| {
            warn!(correlation_id = %correlation_id, error = %err, "Attendance batch rejected");
        })?;

    info!(
        correlation_id = %correlation_id,
        user_id = %caller.user_id,
        recorded,
        "Attendance recorded"
    );
    Ok(Json(ApiResponse::success(json!({ "recorded": recorded }))))
}

/// Handler for GET /labor/workers.
///
/// Non-admin callers only ever see their own totals.
async fn worker_labor_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<WorkerLaborQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let month = PayrollMonth::new(query.year, query.month)?;
    let worker_id = caller.worker_scope(query.worker_id)?;

    let entries = state
        .attendance()
        .entries_in(month, worker_id.as_deref(), None);
    Ok(Json(ApiResponse::success(aggregate_by_worker(&entries, month))))
}

/// Handler for GET /labor/sites.
async fn site_labor_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<SiteLaborQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    caller.require(&[Role::Admin, Role::SiteManager])?;
    let Query(query) = query?;
    let month = PayrollMonth::new(query.year, query.month)?;

    let entries = state
        .attendance()
        .entries_in(month, None, query.site_id.as_deref());
    Ok(Json(ApiResponse::success(aggregate_by_site(&entries, month))))
}

/// Handler for GET /salary/snapshots.
///
/// Non-admin callers are forced to their own worker id regardless of the
/// `workerId` they pass.
async fn list_snapshots_handler(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<SnapshotListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let worker_id = caller.worker_scope(query.worker_id.clone())?;
    let filter = query.into_filter(worker_id)?;

    let snapshots = state.snapshots().list(&filter);
    Ok(Json(ApiResponse::success(snapshots)))
}

/// Handler for POST /salary/snapshots.
///
/// Computes the worker's pay for the month from recorded attendance and
/// stores it as an issued snapshot.
async fn issue_snapshot_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<SnapshotRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SalarySnapshot>>> {
    caller.require(&[Role::Admin])?;
    let Json(request) = payload?;
    let month = request.period()?;
    let correlation_id = Uuid::new_v4();

    let config = state.config();
    let worker = config.get_worker(&request.worker_id)?;
    let entries = state
        .attendance()
        .entries_in(month, Some(worker.id.as_str()), None);
    let summaries = aggregate_by_worker(&entries, month);
    let computation = compute_salary(
        worker,
        summaries.first(),
        month,
        &config.service().payroll,
    )
    .inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Salary computation failed");
    })?;

    let snapshot = state.snapshots().issue(computation).inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Snapshot issue refused");
    })?;

    info!(
        correlation_id = %correlation_id,
        worker_id = %worker.id,
        period = %month,
        entries = entries.len(),
        net_pay = %snapshot.computation.net_pay,
        "Salary snapshot computed"
    );
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Handler for POST /salary/snapshots/approve.
async fn approve_snapshot_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<SnapshotRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SalarySnapshot>>> {
    caller.require(&[Role::Admin])?;
    let Json(request) = payload?;
    let key = SnapshotKey::new(request.worker_id.clone(), request.period()?);

    let snapshot = state.snapshots().approve(&key)?;
    info!(user_id = %caller.user_id, worker_id = %key.worker_id, period = %key.month, "Salary snapshot approved");
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Handler for POST /salary/snapshots/pay.
///
/// Paying an already-paid snapshot succeeds without changing it.
async fn pay_snapshot_handler(
    State(state): State<AppState>,
    caller: Caller,
    payload: Result<Json<SnapshotRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<SalarySnapshot>>> {
    caller.require(&[Role::Admin])?;
    let Json(request) = payload?;
    let key = SnapshotKey::new(request.worker_id.clone(), request.period()?);

    let snapshot = state.snapshots().pay(&key)?;
    info!(
        user_id = %caller.user_id,
        worker_id = %key.worker_id,
        period = %key.month,
        version = snapshot.version,
        "Salary snapshot paid"
    );
    Ok(Json(ApiResponse::success(snapshot)))
}
