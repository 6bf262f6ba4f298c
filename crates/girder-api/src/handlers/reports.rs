//! Report endpoints.
//!
//! Reports are returned as structured documents (title, metadata, tabular
//! sections). Rendering to a concrete format is a client concern; the server
//! only assembles the content.

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{NaiveDate, Utc};
use girder_core::access::Permission;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use girder_services::{
    daily_progress, daily_progress_report, goods_receipt_report, payroll_report, payroll_summary,
    purchase_order_report, ReportDocument,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ProgressReportQuery {
    pub date: Option<NaiveDate>,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PayrollReportQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/reports/purchase-orders/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Purchase order id")),
    responses(
        (status = 200, body = ReportDocument),
        (status = 403, description = "Missing reports:view permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, purchase_order_id = %id))]
pub async fn purchase_order_report_doc(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportDocument>, HttpAppError> {
    ctx.require(Permission::ReportsView)?;

    let order = state
        .db
        .materials
        .get_purchase_order(ctx.organization_id, id)
        .await?;
    let vendor = state
        .db
        .materials
        .get_vendor(ctx.organization_id, order.vendor_id)
        .await?;
    let items = state.db.materials.purchase_order_items(order.id).await?;

    Ok(Json(purchase_order_report(&order, &vendor, &items)))
}

#[utoipa::path(
    get,
    path = "/api/reports/goods-receipts/{id}",
    tag = "reports",
    params(("id" = Uuid, Path, description = "Goods receipt id")),
    responses(
        (status = 200, body = ReportDocument),
        (status = 403, description = "Missing reports:view permission"),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id, goods_receipt_id = %id))]
pub async fn goods_receipt_report_doc(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReportDocument>, HttpAppError> {
    ctx.require(Permission::ReportsView)?;

    let receipt = state
        .db
        .materials
        .get_goods_receipt(ctx.organization_id, id)
        .await?;
    let entries = state
        .db
        .materials
        .stock_entries_for_receipt(ctx.organization_id, receipt.id)
        .await?;

    Ok(Json(goods_receipt_report(&receipt, &entries)))
}

#[utoipa::path(
    get,
    path = "/api/reports/daily-progress",
    tag = "reports",
    params(ProgressReportQuery),
    responses(
        (status = 200, body = ReportDocument),
        (status = 403, description = "Missing reports:view permission")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn daily_progress_report_doc(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProgressReportQuery>,
) -> Result<Json<ReportDocument>, HttpAppError> {
    ctx.require(Permission::ReportsView)?;

    let org = ctx.organization_id;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let tasks = state.db.tasks.list(org, query.project_id).await?;
    let issues = state.db.issues.list(org, query.project_id).await?;
    let workers = state.db.workers.list(org).await?;
    let attendance = state.db.attendance.list_for_date(org, date).await?;

    let summary = daily_progress(date, query.project_id, &tasks, &issues, &workers, &attendance);

    Ok(Json(daily_progress_report(&summary)))
}

/// Payroll report for every worker over an inclusive period. Pay is derived
/// from attendance at request time.
#[utoipa::path(
    get,
    path = "/api/reports/payroll",
    tag = "reports",
    params(PayrollReportQuery),
    responses(
        (status = 200, body = ReportDocument),
        (status = 403, description = "Missing reports:view permission")
    )
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn payroll_report_doc(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<PayrollReportQuery>,
) -> Result<Json<ReportDocument>, HttpAppError> {
    ctx.require(Permission::ReportsView)?;

    if query.from > query.to {
        return Err(girder_core::AppError::InvalidInput(
            "Period start must not be after period end".to_string(),
        )
        .into());
    }

    let org = ctx.organization_id;
    let workers = state.db.workers.list(org).await?;

    let mut lines = Vec::with_capacity(workers.len());
    for worker in workers {
        let records = state
            .db
            .attendance
            .list_for_worker(org, worker.id, query.from, query.to)
            .await?;
        let summary = payroll_summary(worker.daily_rate, &records);
        lines.push((worker, summary));
    }

    Ok(Json(payroll_report(query.from, query.to, &lines)))
}
