//! Attendance and payroll endpoints.
//!
//! Pay is never stored; the payroll endpoint derives it from attendance on
//! every request.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::NaiveDate;
use girder_core::access::Permission;
use girder_core::models::{AttendanceRecord, AttendanceStatus};
use girder_core::AppError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_services::{payroll_summary, ChangeEventType, PayrollSummary};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MarkAttendanceRequest {
    pub worker_id: Uuid,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub overtime_hours: Option<Decimal>,
    #[serde(default)]
    pub deduction: Option<Decimal>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AttendanceDateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayrollPeriodQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkerPayrollResponse {
    pub worker_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub days_recorded: usize,
    pub summary: PayrollSummary,
}

/// Mark attendance. Re-marking the same worker and date updates in place.
#[utoipa::path(
    post,
    path = "/api/attendance",
    tag = "labour",
    request_body = MarkAttendanceRequest,
    responses(
        (status = 200, body = AttendanceRecord),
        (status = 403, description = "Missing attendance:mark permission"),
        (status = 404, description = "Worker not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn mark_attendance(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<MarkAttendanceRequest>,
) -> Result<Json<AttendanceRecord>, HttpAppError> {
    ctx.require(Permission::AttendanceMark)?;

    let record = state
        .db
        .attendance
        .mark(
            ctx.organization_id,
            request.worker_id,
            request.date,
            request.status,
            request.overtime_hours,
            request.deduction.unwrap_or(Decimal::ZERO),
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "attendance_records",
        record.id,
    );

    Ok(Json(record))
}

/// Attendance sheet for one date.
#[utoipa::path(
    get,
    path = "/api/attendance",
    tag = "labour",
    params(AttendanceDateQuery),
    responses((status = 200, body = [AttendanceRecord]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_attendance(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<AttendanceDateQuery>,
) -> Result<Json<Vec<AttendanceRecord>>, HttpAppError> {
    let records = state
        .db
        .attendance
        .list_for_date(ctx.organization_id, query.date)
        .await?;
    Ok(Json(records))
}

/// Derived payroll for one worker over an inclusive period.
#[utoipa::path(
    get,
    path = "/api/payroll/{worker_id}",
    tag = "labour",
    params(
        ("worker_id" = Uuid, Path, description = "Worker id"),
        PayrollPeriodQuery
    ),
    responses(
        (status = 200, body = WorkerPayrollResponse),
        (status = 403, description = "Missing reports:view permission"),
        (status = 404, description = "Worker not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, worker_id = %worker_id))]
pub async fn worker_payroll(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<Uuid>,
    Query(query): Query<PayrollPeriodQuery>,
) -> Result<Json<WorkerPayrollResponse>, HttpAppError> {
    ctx.require(Permission::ReportsView)?;

    if query.from > query.to {
        return Err(AppError::InvalidInput(
            "Period start must not be after period end".to_string(),
        )
        .into());
    }

    let workers = state.db.workers.list(ctx.organization_id).await?;
    let worker = workers
        .into_iter()
        .find(|w| w.id == worker_id)
        .ok_or_else(|| AppError::NotFound("Worker not found".to_string()))?;

    let records = state
        .db
        .attendance
        .list_for_worker(ctx.organization_id, worker_id, query.from, query.to)
        .await?;

    let summary = payroll_summary(worker.daily_rate, &records);

    Ok(Json(WorkerPayrollResponse {
        worker_id,
        from: query.from,
        to: query.to,
        days_recorded: records.len(),
        summary,
    }))
}
