//! Compliance scorecard and daily progress endpoints.
//!
//! Both are computed on request from current records. Nothing is cached or
//! persisted, so a fix to an underlying record shows up on the next call.

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::auth::RequestContext;
use crate::error::HttpAppError;
use crate::state::AppState;
use girder_services::{
    daily_progress, evaluate_compliance, ComplianceInputs, ComplianceReport, DailyProgressSummary,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct DailyProgressQuery {
    /// Defaults to today when omitted.
    pub date: Option<NaiveDate>,
    pub project_id: Option<Uuid>,
}

/// Compliance scorecard for the active organization.
#[utoipa::path(
    get,
    path = "/api/compliance",
    tag = "insights",
    responses((status = 200, body = ComplianceReport))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn get_compliance_report(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<ComplianceReport>, HttpAppError> {
    let org = ctx.organization_id;

    let projects = state.db.projects.list(org).await?;
    let tasks = state.db.tasks.list(org, None).await?;
    let issues = state.db.issues.list(org, None).await?;
    let incidents = state.db.safety.list(org).await?;
    let inspections = state.db.inspections.list(org).await?;
    let workers = state.db.workers.list(org).await?;

    let report = evaluate_compliance(
        ComplianceInputs {
            projects: &projects,
            tasks: &tasks,
            issues: &issues,
            incidents: &incidents,
            inspections: &inspections,
            workers: &workers,
        },
        Utc::now().date_naive(),
    );

    tracing::debug!(score = report.score, findings = report.total_findings, "Compliance evaluated");

    Ok(Json(report))
}

/// Daily progress summary, optionally scoped to one project.
#[utoipa::path(
    get,
    path = "/api/progress",
    tag = "insights",
    params(DailyProgressQuery),
    responses((status = 200, body = DailyProgressSummary))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn get_daily_progress(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DailyProgressQuery>,
) -> Result<Json<DailyProgressSummary>, HttpAppError> {
    let org = ctx.organization_id;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let tasks = state.db.tasks.list(org, query.project_id).await?;
    let issues = state.db.issues.list(org, query.project_id).await?;
    let workers = state.db.workers.list(org).await?;
    let attendance = state.db.attendance.list_for_date(org, date).await?;

    let summary = daily_progress(date, query.project_id, &tasks, &issues, &workers, &attendance);

    Ok(Json(summary))
}
