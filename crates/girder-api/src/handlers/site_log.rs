//! Safety incident and inspection-checklist endpoints.
//!
//! Both feed the compliance scorecard: unresolved incidents fail it,
//! incomplete inspections warn on it.

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::NaiveDate;
use girder_core::access::Permission;
use girder_core::models::{IncidentStatus, Inspection, InspectionStatus, SafetyIncident};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::RequestContext;
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;
use girder_services::ChangeEventType;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReportIncidentRequest {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
    pub occurred_on: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIncidentStatusRequest {
    pub status: IncidentStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInspectionRequest {
    pub project_id: Uuid,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    pub scheduled_for: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInspectionStatusRequest {
    pub status: InspectionStatus,
}

#[utoipa::path(
    get,
    path = "/api/safety-incidents",
    tag = "site-log",
    responses((status = 200, body = [SafetyIncident]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_incidents(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SafetyIncident>>, HttpAppError> {
    let incidents = state.db.safety.list(ctx.organization_id).await?;
    Ok(Json(incidents))
}

#[utoipa::path(
    post,
    path = "/api/safety-incidents",
    tag = "site-log",
    request_body = ReportIncidentRequest,
    responses(
        (status = 200, body = SafetyIncident),
        (status = 403, description = "Missing checklists:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn report_incident(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ReportIncidentRequest>,
) -> Result<Json<SafetyIncident>, HttpAppError> {
    ctx.require(Permission::ChecklistsManage)?;

    let incident = state
        .db
        .safety
        .create(
            ctx.organization_id,
            request.project_id,
            &request.description,
            request.occurred_on,
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "safety_incidents",
        incident.id,
    );

    Ok(Json(incident))
}

#[utoipa::path(
    patch,
    path = "/api/safety-incidents/{id}/status",
    tag = "site-log",
    params(("id" = Uuid, Path, description = "Incident id")),
    request_body = UpdateIncidentStatusRequest,
    responses(
        (status = 200, body = SafetyIncident),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, incident_id = %id))]
pub async fn update_incident_status(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(request): axum::Json<UpdateIncidentStatusRequest>,
) -> Result<Json<SafetyIncident>, HttpAppError> {
    ctx.require(Permission::ChecklistsManage)?;

    let incident = state
        .db
        .safety
        .update_status(ctx.organization_id, id, request.status)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "safety_incidents",
        incident.id,
    );

    Ok(Json(incident))
}

#[utoipa::path(
    get,
    path = "/api/inspections",
    tag = "site-log",
    responses((status = 200, body = [Inspection]))
)]
#[tracing::instrument(skip(state, ctx), fields(organization_id = %ctx.organization_id))]
pub async fn list_inspections(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Inspection>>, HttpAppError> {
    let inspections = state.db.inspections.list(ctx.organization_id).await?;
    Ok(Json(inspections))
}

#[utoipa::path(
    post,
    path = "/api/inspections",
    tag = "site-log",
    request_body = CreateInspectionRequest,
    responses(
        (status = 200, body = Inspection),
        (status = 403, description = "Missing checklists:manage permission")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id))]
pub async fn create_inspection(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateInspectionRequest>,
) -> Result<Json<Inspection>, HttpAppError> {
    ctx.require(Permission::ChecklistsManage)?;

    let inspection = state
        .db
        .inspections
        .create(
            ctx.organization_id,
            request.project_id,
            &request.title,
            request.scheduled_for,
        )
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Insert,
        "inspections",
        inspection.id,
    );

    Ok(Json(inspection))
}

#[utoipa::path(
    patch,
    path = "/api/inspections/{id}/status",
    tag = "site-log",
    params(("id" = Uuid, Path, description = "Inspection id")),
    request_body = UpdateInspectionStatusRequest,
    responses(
        (status = 200, body = Inspection),
        (status = 404, description = "Not found")
    )
)]
#[tracing::instrument(skip(state, ctx, request), fields(organization_id = %ctx.organization_id, inspection_id = %id))]
pub async fn update_inspection_status(
    ctx: RequestContext,
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    axum::Json(request): axum::Json<UpdateInspectionStatusRequest>,
) -> Result<Json<Inspection>, HttpAppError> {
    ctx.require(Permission::ChecklistsManage)?;

    let inspection = state
        .db
        .inspections
        .update_status(ctx.organization_id, id, request.status)
        .await?;

    state.change_feed.publish(
        ctx.organization_id,
        ChangeEventType::Update,
        "inspections",
        inspection.id,
    );

    Ok(Json(inspection))
}
